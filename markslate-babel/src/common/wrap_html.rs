//! Flow-level raw HTML wrapping
//!
//! Raw HTML left standing between blocks (a pasted table, an iframe) is put
//! into a paragraph of its own. The rich document converter then sees it as
//! an inline `html` node and keeps it atomic instead of looking inside.

use crate::mdast::{Node, Root};

pub fn wrap_html(root: &mut Root) {
    wrap_flow(&mut root.children);
}

fn wrap_flow(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Html(_) => {
                let html = std::mem::replace(node, Node::paragraph(Vec::new()));
                *node = Node::paragraph(vec![html]);
            }
            Node::Blockquote(_) | Node::List(_) | Node::ListItem(_) | Node::Root(_) => {
                if let Some(children) = node.children_mut() {
                    wrap_flow(children);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::Blockquote;

    #[test]
    fn wraps_block_html_only() {
        let mut root = Root::new(vec![
            Node::html("<table></table>"),
            Node::paragraph(vec![Node::html("<b>"), Node::text("a")]),
            Node::Blockquote(Blockquote {
                children: vec![Node::html("<hr class=\"x\">")],
            }),
        ]);
        wrap_html(&mut root);
        assert_eq!(
            root.children,
            vec![
                Node::paragraph(vec![Node::html("<table></table>")]),
                Node::paragraph(vec![Node::html("<b>"), Node::text("a")]),
                Node::Blockquote(Blockquote {
                    children: vec![Node::paragraph(vec![Node::html("<hr class=\"x\">")])],
                }),
            ]
        );
    }
}
