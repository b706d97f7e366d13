//! Trailing break removal
//!
//! A hard break or whitespace at the very end of a paragraph or heading has no
//! markdown rendering that survives a round trip (`a\` on the last line is a
//! literal backslash). They are dropped, also when they sit at the end of a
//! trailing emphasis, strong or strikethrough run.

use crate::mdast::{Node, Root};

pub fn strip_trailing_breaks(root: &mut Root) {
    strip_flow(&mut root.children);
}

fn strip_flow(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Paragraph(paragraph) => strip_phrasing(&mut paragraph.children),
            Node::Heading(heading) => strip_phrasing(&mut heading.children),
            other => {
                if let Some(children) = other.children_mut() {
                    strip_flow(children);
                }
            }
        }
    }
}

fn strip_phrasing(children: &mut Vec<Node>) {
    while let Some(last) = children.last_mut() {
        let emptied = match last {
            Node::Break => true,
            Node::Text(text) => {
                let len = text.value.trim_end().len();
                text.value.truncate(len);
                text.value.is_empty()
            }
            Node::Emphasis(_) | Node::Strong(_) | Node::Delete(_) => match last.children_mut() {
                Some(inner) => {
                    strip_phrasing(inner);
                    inner.is_empty()
                }
                None => false,
            },
            _ => false,
        };
        if !emptied {
            break;
        }
        children.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{Emphasis, InlineCode};

    fn strip(children: Vec<Node>) -> Vec<Node> {
        let mut root = Root::new(vec![Node::paragraph(children)]);
        strip_trailing_breaks(&mut root);
        match root.children.remove(0) {
            Node::Paragraph(p) => p.children,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn drops_trailing_breaks_and_spaces() {
        assert_eq!(
            strip(vec![Node::text("a"), Node::Break, Node::text(" \n"), Node::Break]),
            vec![Node::text("a")]
        );
    }

    #[test]
    fn keeps_inner_breaks() {
        let children = vec![Node::text("a"), Node::Break, Node::text("b")];
        assert_eq!(strip(children.clone()), children);
    }

    #[test]
    fn descends_into_trailing_marks() {
        assert_eq!(
            strip(vec![
                Node::text("a "),
                Node::Emphasis(Emphasis {
                    children: vec![Node::text("b"), Node::Break],
                }),
            ]),
            vec![
                Node::text("a "),
                Node::Emphasis(Emphasis {
                    children: vec![Node::text("b")],
                }),
            ]
        );
        assert_eq!(
            strip(vec![
                Node::text("a"),
                Node::Emphasis(Emphasis {
                    children: vec![Node::Break],
                }),
            ]),
            vec![Node::text("a")]
        );
    }

    #[test]
    fn stops_at_other_inline_nodes() {
        let children = vec![
            Node::InlineCode(InlineCode { value: " ".into() }),
            Node::text(""),
        ];
        assert_eq!(
            strip(children),
            vec![Node::InlineCode(InlineCode { value: " ".into() })]
        );
    }
}
