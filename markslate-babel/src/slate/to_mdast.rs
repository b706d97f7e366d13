//! Rich document to syntax tree
//!
//! Written as explicit per-type dispatch rather than a generic tree rewrite:
//! the flat leaf sequences of the rich document have to be re-nested into
//! mark wrapper nodes, which has no counterpart in the other direction.
//!
//! Nesting is re-derived per run. A block's inline content is flattened into
//! pieces (leaves, and inline nodes whose marks are the intersection of the
//! marks of all their leaves). Consecutive pieces with the same style (marks
//! other than `code`) form one run, and each run becomes a single wrapper
//! chain. Wrappers always nest in the canonical mark order: strong innermost,
//! then emphasis, then delete outermost. Code is always the leaf itself
//! (`inlineCode`). Because the order is fixed, two neighbouring runs that
//! share marks produce wrapper chains the serializer can place side by side
//! without reinterpreting either.

use super::nodes::{Block, BlockType, Document, Inline, InlineType, Mark, Marks, Node};
use crate::mdast;
use crate::shortcode::{ShortcodeKind, ShortcodeRegistry};
use serde_json::Value;
use tracing::{debug, trace};

/// Convert a rich document into a syntax tree.
pub fn slate_to_mdast(doc: &Document, shortcodes: &ShortcodeRegistry) -> mdast::Root {
    let converter = Converter { shortcodes };
    let root = mdast::Root::new(converter.blocks(&doc.nodes));
    trace!(children = root.children.len(), "converted rich document to syntax tree");
    root
}

struct Converter<'a> {
    shortcodes: &'a ShortcodeRegistry,
}

/// One element of a flattened inline sequence.
enum Piece<'a> {
    Leaf { text: &'a str, marks: Marks },
    Inline { node: &'a Inline, marks: Marks },
}

impl Piece<'_> {
    fn marks(&self) -> &Marks {
        match self {
            Piece::Leaf { marks, .. } | Piece::Inline { marks, .. } => marks,
        }
    }

    /// Marks that turn into wrapper nodes.
    fn style(&self) -> Marks {
        let mut style = self.marks().clone();
        style.remove(&Mark::Code);
        style
    }
}

impl Converter<'_> {
    /// Convert nodes in flow position. Inline content found directly in a
    /// container block is wrapped in a paragraph.
    fn blocks(&self, nodes: &[Node]) -> Vec<mdast::Node> {
        let mut out = Vec::new();
        let mut pending: Vec<Node> = Vec::new();
        for node in nodes {
            match node {
                Node::Block(block) => {
                    self.flush_inlines(&mut pending, &mut out);
                    out.push(self.block(block));
                }
                other => pending.push(other.clone()),
            }
        }
        self.flush_inlines(&mut pending, &mut out);
        out
    }

    fn flush_inlines(&self, pending: &mut Vec<Node>, out: &mut Vec<mdast::Node>) {
        if pending.is_empty() {
            return;
        }
        let children = self.inlines(pending, &Marks::new());
        pending.clear();
        if !children.is_empty() {
            out.push(mdast::Node::paragraph(children));
        }
    }

    fn block(&self, block: &Block) -> mdast::Node {
        use mdast::Node as M;

        match block.kind {
            BlockType::Paragraph => M::paragraph(self.inlines(&block.nodes, &Marks::new())),
            BlockType::HeadingOne
            | BlockType::HeadingTwo
            | BlockType::HeadingThree
            | BlockType::HeadingFour
            | BlockType::HeadingFive
            | BlockType::HeadingSix => M::Heading(mdast::Heading {
                depth: block.kind.heading_depth().unwrap_or(1),
                children: self.inlines(&block.nodes, &Marks::new()),
            }),
            BlockType::Quote => M::Blockquote(mdast::Blockquote {
                children: self.blocks(&block.nodes),
            }),
            BlockType::BulletedList | BlockType::NumberedList => {
                let ordered = block.kind == BlockType::NumberedList;
                let spread = block
                    .data
                    .get("loose")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let start = ordered.then(|| {
                    block
                        .data
                        .get("start")
                        .and_then(Value::as_u64)
                        .and_then(|s| u32::try_from(s).ok())
                        .unwrap_or(1)
                });
                let children = block
                    .nodes
                    .iter()
                    .map(|child| self.list_item(child, spread))
                    .collect();
                M::List(mdast::List {
                    ordered,
                    start,
                    spread,
                    children,
                })
            }
            // a stray list item gets a list of its own
            BlockType::ListItem => M::List(mdast::List {
                ordered: false,
                start: None,
                spread: false,
                children: vec![mdast::Node::ListItem(mdast::ListItem {
                    spread: false,
                    children: self.blocks(&block.nodes),
                })],
            }),
            BlockType::CodeBlock => M::Code(mdast::Code {
                lang: block
                    .data_str("lang")
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
                value: block.nodes.iter().map(Node::text_content).collect(),
            }),
            BlockType::ThematicBreak => M::ThematicBreak,
            BlockType::Html => M::html(block.data_str("html").unwrap_or_default()),
            BlockType::Component => {
                let name = block.data_str("shortcode").unwrap_or_default().to_string();
                if self.shortcodes.lookup(&name, ShortcodeKind::Block).is_none() {
                    debug!(shortcode = %name, "no block definition registered, keeping data as-is");
                }
                M::ComponentBlock(mdast::Component {
                    name,
                    data: block.data.get("shortcodeData").cloned().unwrap_or(Value::Null),
                })
            }
        }
    }

    fn list_item(&self, node: &Node, spread: bool) -> mdast::Node {
        let children = match node {
            Node::Block(block) if block.kind == BlockType::ListItem => self.blocks(&block.nodes),
            other => self.blocks(std::slice::from_ref(other)),
        };
        mdast::Node::ListItem(mdast::ListItem { spread, children })
    }

    /// Convert inline content, treating `strip` as marks already applied by
    /// an enclosing wrapper.
    fn inlines(&self, nodes: &[Node], strip: &Marks) -> Vec<mdast::Node> {
        let mut pieces = Vec::new();
        flatten(nodes, strip, &mut pieces);

        let mut out = Vec::new();
        let mut start = 0;
        while start < pieces.len() {
            let style = pieces[start].style();
            let mut end = start + 1;
            while end < pieces.len() && pieces[end].style() == style {
                end += 1;
            }
            let content = self.run_content(&pieces[start..end], strip, &style);
            if !content.is_empty() {
                out.extend(wrap(content, &style));
            }
            start = end;
        }
        out
    }

    /// The unwrapped content of one run.
    fn run_content(&self, pieces: &[Piece<'_>], strip: &Marks, style: &Marks) -> Vec<mdast::Node> {
        let mut inner_strip = strip.clone();
        inner_strip.extend(style.iter().copied());

        let mut content: Vec<mdast::Node> = Vec::new();
        for piece in pieces {
            match piece {
                Piece::Leaf { text, marks } if marks.contains(&Mark::Code) => {
                    content.push(mdast::Node::InlineCode(mdast::InlineCode {
                        value: text.to_string(),
                    }))
                }
                Piece::Leaf { text, .. } => match content.last_mut() {
                    Some(mdast::Node::Text(prev)) => prev.value.push_str(text),
                    _ => content.push(mdast::Node::text(*text)),
                },
                Piece::Inline { node, .. } => {
                    content.push(self.inline(node, &inner_strip));
                }
            }
        }
        content
    }

    fn inline(&self, inline: &Inline, strip: &Marks) -> mdast::Node {
        use mdast::Node as M;

        match inline.kind {
            InlineType::Link => M::Link(mdast::Link {
                url: inline.data_str("url").unwrap_or_default().to_string(),
                title: inline.data_str("title").map(str::to_string),
                children: self.inlines(&inline.nodes, strip),
            }),
            InlineType::Image => M::Image(mdast::Image {
                url: inline.data_str("url").unwrap_or_default().to_string(),
                title: inline.data_str("title").map(str::to_string),
                alt: inline.data_str("alt").unwrap_or_default().to_string(),
            }),
            InlineType::Break => M::Break,
            InlineType::Html => M::html(inline.data_str("html").unwrap_or_default()),
            InlineType::Component => {
                let name = inline.data_str("shortcode").unwrap_or_default().to_string();
                if self.shortcodes.lookup(&name, ShortcodeKind::Inline).is_none() {
                    debug!(shortcode = %name, "no inline definition registered, keeping data as-is");
                }
                M::ComponentInline(mdast::Component {
                    name,
                    data: inline.data.get("shortcodeData").cloned().unwrap_or(Value::Null),
                })
            }
        }
    }
}

/// Flatten inline content into pieces, removing `strip` from every mark set.
fn flatten<'a>(nodes: &'a [Node], strip: &Marks, out: &mut Vec<Piece<'a>>) {
    for node in nodes {
        match node {
            Node::Text(text) => {
                for leaf in text.leaves.iter().filter(|l| !l.text.is_empty()) {
                    out.push(Piece::Leaf {
                        text: &leaf.text,
                        marks: leaf.marks.difference(strip).copied().collect(),
                    });
                }
            }
            Node::Inline(inline) => out.push(Piece::Inline {
                node: inline,
                marks: common_marks(node)
                    .difference(strip)
                    .copied()
                    .collect(),
            }),
            // blocks inside inline content only contribute their leaves
            Node::Block(block) => flatten(&block.nodes, strip, out),
        }
    }
}

/// Marks shared by every non-empty leaf of a node (every leaf, for a node
/// holding only empty ones).
fn common_marks(node: &Node) -> Marks {
    let all = node.leaves();
    let filled: Vec<_> = all.iter().filter(|l| !l.text.is_empty()).copied().collect();
    let chosen = if filled.is_empty() { all } else { filled };
    let mut leaves = chosen.into_iter();
    let Some(first) = leaves.next() else {
        return Marks::new();
    };
    leaves.fold(first.marks.clone(), |acc, leaf| {
        acc.intersection(&leaf.marks).copied().collect()
    })
}

/// Wrap content in the canonical nesting: strong, then emphasis, then delete.
fn wrap(content: Vec<mdast::Node>, style: &Marks) -> Vec<mdast::Node> {
    use mdast::Node as M;

    let mut children = content;
    for mark in style {
        let wrapped = match mark {
            Mark::Bold => M::Strong(mdast::Strong { children }),
            Mark::Italic => M::Emphasis(mdast::Emphasis { children }),
            Mark::Strikethrough => M::Delete(mdast::Delete { children }),
            Mark::Code => continue,
        };
        children = vec![wrapped];
    }
    children
}
