//! HTML parsing (HTML text → HTML tree)
//!
//! `html5ever` parses with browser error recovery into an `RcDom`, which is
//! then copied into owned [`HtmlNode`]s. Only the content of `<body>` is kept;
//! doctype and processing instructions are dropped.

use super::nodes::{Element, HtmlNode};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::trace;

/// Parse an HTML document or fragment into the nodes of its body.
pub fn parse_html(html: &str) -> Vec<HtmlNode> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let root = find_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());
    let nodes = convert_children(&root);
    trace!(nodes = nodes.len(), "parsed html");
    nodes
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { name, .. } = &child.data {
            if &*name.local == tag {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

fn convert_children(handle: &Handle) -> Vec<HtmlNode> {
    handle.children.borrow().iter().filter_map(convert).collect()
}

fn convert(handle: &Handle) -> Option<HtmlNode> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), String::from(&*attr.value)))
                .collect();
            Some(HtmlNode::Element(Element {
                tag: name.local.to_string().to_ascii_lowercase(),
                attrs,
                children: convert_children(handle),
            }))
        }
        NodeData::Text { contents } => Some(HtmlNode::Text(String::from(&**contents.borrow()))),
        NodeData::Comment { contents } => Some(HtmlNode::Comment(String::from(&**contents))),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_body_content_only() {
        let nodes = parse_html("<html><head><title>x</title></head><body><p>a</p></body></html>");
        assert_eq!(nodes, vec![HtmlNode::element("p", vec![HtmlNode::text("a")])]);
    }

    #[test]
    fn parses_fragments_with_attributes() {
        let nodes = parse_html("<a href=\"u\" title=\"t\">x</a><!-- c -->");
        assert_eq!(
            nodes,
            vec![
                HtmlNode::Element(
                    Element::new("a")
                        .with_attr("href", "u")
                        .with_attr("title", "t")
                        .with_children(vec![HtmlNode::text("x")])
                ),
                HtmlNode::Comment(" c ".into()),
            ]
        );
    }

    #[test]
    fn tag_names_are_lowercase_strings() {
        let nodes = parse_html("<DIV><SPAN>a</SPAN></DIV>");
        match nodes.as_slice() {
            [HtmlNode::Element(div)] => {
                assert_eq!(div.tag, "div");
                assert_eq!(
                    div.children,
                    vec![HtmlNode::element("span", vec![HtmlNode::text("a")])]
                );
            }
            other => panic!("expected one element, got {other:?}"),
        }
    }

    #[test]
    fn recovers_from_unclosed_tags() {
        let nodes = parse_html("<p>a<b>b");
        assert_eq!(
            nodes,
            vec![HtmlNode::element(
                "p",
                vec![
                    HtmlNode::text("a"),
                    HtmlNode::element("b", vec![HtmlNode::text("b")]),
                ]
            )]
        );
    }
}
