//! Syntax tree to rich document
//!
//! Block nodes map one to one onto blocks. Inline content is flattened: mark
//! nodes (strong, emphasis, delete) do not become nodes of their own but add a
//! mark to every leaf produced underneath them, including leaves inside links
//! and the placeholder leaves of void inlines nested in them. Inline code is a
//! leaf carrying the `code` mark.
//!
//! Independent visits of nested mark nodes leave adjacent leaves with equal
//! marks behind (`**a ~~b~~~~c~~**` yields `b` and `c` both bold and struck),
//! so the result always goes through [`normalize`](super::normalize).

use super::nodes::{Block, BlockType, Document, Inline, InlineType, Leaf, Mark, Marks, Node, Text};
use super::normalize::normalize_document;
use crate::mdast;
use serde_json::{Map, Value};
use tracing::trace;

/// Convert a syntax tree into a canonical rich document.
pub fn mdast_to_slate(root: &mdast::Root) -> Document {
    let mut doc = Document::new(convert_blocks(&root.children));
    normalize_document(&mut doc);
    trace!(blocks = doc.nodes.len(), "converted syntax tree to rich document");
    doc
}

/// Convert flow content. Runs of phrasing nodes found at flow level are
/// gathered into one paragraph.
fn convert_blocks(children: &[mdast::Node]) -> Vec<Node> {
    let mut out = Vec::new();
    let mut phrasing: Vec<&mdast::Node> = Vec::new();

    for child in children {
        // Html directly inside a flow container is a raw HTML block
        if child.is_phrasing() && !matches!(child, mdast::Node::Html(_)) {
            phrasing.push(child);
            continue;
        }
        flush_phrasing(&mut phrasing, &mut out);
        out.extend(convert_block(child));
    }
    flush_phrasing(&mut phrasing, &mut out);
    out
}

fn flush_phrasing(phrasing: &mut Vec<&mdast::Node>, out: &mut Vec<Node>) {
    if phrasing.is_empty() {
        return;
    }
    let mut nodes = Vec::new();
    for node in phrasing.drain(..) {
        convert_inline(node, &Marks::new(), &mut nodes);
    }
    out.push(Node::block(BlockType::Paragraph, nodes));
}

fn convert_block(node: &mdast::Node) -> Vec<Node> {
    use mdast::Node as M;

    let block = match node {
        M::Root(root) => return convert_blocks(&root.children),
        M::Paragraph(p) => Block::new(BlockType::Paragraph, convert_inlines(&p.children)),
        M::Heading(h) => Block::new(BlockType::heading(h.depth), convert_inlines(&h.children)),
        M::Blockquote(q) => Block::new(BlockType::Quote, convert_blocks(&q.children)),
        M::List(list) => {
            let kind = if list.ordered {
                BlockType::NumberedList
            } else {
                BlockType::BulletedList
            };
            let items = list.children.iter().flat_map(convert_block).collect();
            let mut block = Block::new(kind, items);
            if let Some(start) = list.start.filter(|s| list.ordered && *s != 1) {
                block = block.with_data("start", start);
            }
            if list.spread {
                block = block.with_data("loose", true);
            }
            block
        }
        M::ListItem(item) => Block::new(BlockType::ListItem, convert_blocks(&item.children)),
        M::Code(code) => {
            let mut block = Block::new(BlockType::CodeBlock, vec![Node::plain_text(&code.value)]);
            if let Some(lang) = &code.lang {
                block = block.with_data("lang", lang.as_str());
            }
            block
        }
        M::Html(html) => Block::void(BlockType::Html, data(&[("html", html.value.clone().into())])),
        M::ThematicBreak => Block::void(BlockType::ThematicBreak, Map::new()),
        M::ComponentBlock(component) => Block::void(
            BlockType::Component,
            data(&[
                ("shortcode", component.name.clone().into()),
                ("shortcodeData", component.data.clone()),
            ]),
        ),
        // squashed before conversion; nothing to show if one survives
        M::Definition(_) => return Vec::new(),
        phrasing => {
            let mut nodes = Vec::new();
            convert_inline(phrasing, &Marks::new(), &mut nodes);
            Block::new(BlockType::Paragraph, nodes)
        }
    };
    vec![Node::Block(block)]
}

fn convert_inlines(children: &[mdast::Node]) -> Vec<Node> {
    let mut out = Vec::new();
    for child in children {
        convert_inline(child, &Marks::new(), &mut out);
    }
    out
}

fn with_mark(marks: &Marks, mark: Mark) -> Marks {
    let mut next = marks.clone();
    next.insert(mark);
    next
}

/// Visit an inline subtree, pushing rich-document nodes that carry `marks`.
fn convert_inline(node: &mdast::Node, marks: &Marks, out: &mut Vec<Node>) {
    use mdast::Node as M;

    match node {
        M::Text(text) => push_leaf(out, &text.value, marks.clone()),
        M::InlineCode(code) => push_leaf(out, &code.value, with_mark(marks, Mark::Code)),
        M::Strong(n) => visit_all(&n.children, &with_mark(marks, Mark::Bold), out),
        M::Emphasis(n) => visit_all(&n.children, &with_mark(marks, Mark::Italic), out),
        M::Delete(n) => visit_all(&n.children, &with_mark(marks, Mark::Strikethrough), out),
        M::Link(link) => {
            let mut nodes = Vec::new();
            visit_all(&link.children, marks, &mut nodes);
            let mut inline = Inline::new(InlineType::Link, nodes).with_data("url", link.url.as_str());
            if let Some(title) = &link.title {
                inline = inline.with_data("title", title.as_str());
            }
            out.push(Node::Inline(inline));
        }
        M::LinkReference(reference) => visit_all(&reference.children, marks, out),
        M::Image(image) => {
            let mut fields = vec![
                ("url", Value::from(image.url.as_str())),
                ("alt", Value::from(image.alt.as_str())),
            ];
            if let Some(title) = &image.title {
                fields.push(("title", title.as_str().into()));
            }
            out.push(Node::Inline(Inline::void(
                InlineType::Image,
                data(&fields),
                marks.clone(),
            )));
        }
        M::ImageReference(reference) => push_leaf(out, &reference.alt, marks.clone()),
        M::Break => out.push(Node::Inline(Inline::void(
            InlineType::Break,
            Map::new(),
            marks.clone(),
        ))),
        M::Html(html) => out.push(Node::Inline(Inline::void(
            InlineType::Html,
            data(&[("html", html.value.clone().into())]),
            marks.clone(),
        ))),
        M::ComponentInline(component) => out.push(Node::Inline(Inline::void(
            InlineType::Component,
            data(&[
                ("shortcode", component.name.clone().into()),
                ("shortcodeData", component.data.clone()),
            ]),
            marks.clone(),
        ))),
        // flow content in phrasing position keeps only its text
        other => push_leaf(out, &other.to_plain_text(), marks.clone()),
    }
}

fn visit_all(children: &[mdast::Node], marks: &Marks, out: &mut Vec<Node>) {
    for child in children {
        convert_inline(child, marks, out);
    }
}

fn push_leaf(out: &mut Vec<Node>, text: &str, marks: Marks) {
    let leaf = Leaf::new(text, marks);
    match out.last_mut() {
        Some(Node::Text(prev)) => prev.leaves.push(leaf),
        _ => out.push(Node::Text(Text::new(vec![leaf]))),
    }
}

fn data(fields: &[(&str, Value)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
