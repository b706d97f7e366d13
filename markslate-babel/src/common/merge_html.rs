//! Inline HTML span merging
//!
//! The markdown grammar reports `<span>*</span>` as three inline nodes: an
//! opening tag, whatever sits in between, and a closing tag. The rich document
//! has no notion of an open tag, so every balanced span is collapsed into one
//! raw HTML node whose value is the span's source text.

use crate::formats::markdown::serializer::stringify_phrasing;
use crate::mdast::{Node, Root};
use once_cell::sync::Lazy;
use regex::Regex;

static OPENING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<([A-Za-z][A-Za-z0-9-]*)(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>$"#)
        .expect("valid opening tag regex")
});

static CLOSING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^</([A-Za-z][A-Za-z0-9-]*)\s*>$").expect("valid closing tag regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn merge_inline_html(root: &mut Root) {
    for child in root.children.iter_mut() {
        merge_node(child);
    }
}

fn merge_node(node: &mut Node) {
    let phrasing_container = matches!(
        node,
        Node::Paragraph(_)
            | Node::Heading(_)
            | Node::Emphasis(_)
            | Node::Strong(_)
            | Node::Delete(_)
            | Node::Link(_)
            | Node::LinkReference(_)
    );
    let Some(children) = node.children_mut() else {
        return;
    };
    for child in children.iter_mut() {
        merge_node(child);
    }
    if phrasing_container {
        merge_spans(children);
    }
}

fn opening_name(value: &str) -> Option<String> {
    if value.ends_with("/>") {
        return None;
    }
    let caps = OPENING_TAG.captures(value)?;
    let name = caps[1].to_ascii_lowercase();
    (!VOID_ELEMENTS.contains(&name.as_str())).then_some(name)
}

fn closing_name(value: &str) -> Option<String> {
    CLOSING_TAG
        .captures(value)
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// Index of the node closing the tag opened at `open`, honouring nesting of
/// the same element.
fn find_close(nodes: &[Node], open: usize, name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, node) in nodes.iter().enumerate().skip(open + 1) {
        let Node::Html(html) = node else {
            continue;
        };
        if opening_name(&html.value).as_deref() == Some(name) {
            depth += 1;
        } else if closing_name(&html.value).as_deref() == Some(name) {
            if depth == 0 {
                return Some(index);
            }
            depth -= 1;
        }
    }
    None
}

fn merge_spans(nodes: &mut Vec<Node>) {
    let mut index = 0;
    while index < nodes.len() {
        let name = match &nodes[index] {
            Node::Html(html) => opening_name(&html.value),
            _ => None,
        };
        let close = name.and_then(|name| find_close(nodes.as_slice(), index, &name));
        if let Some(close) = close {
            let span: Vec<Node> = nodes.drain(index..=close).collect();
            nodes.insert(index, Node::html(stringify_phrasing(&span)));
        }
        index += 1;
    }
}
