//! Syntax tree node types
//!
//! A closed set of markdown node kinds modelled after mdast. Container kinds own
//! their children, leaf kinds (`Text`, `Code`, `Html`, `InlineCode`) hold a
//! `value` and never children. The two component kinds carry a resolved
//! shortcode instead of markup.

use serde::Serialize;
use serde_json::Value;

/// How a link or image reference was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceKind {
    /// `[text]`
    Shortcut,
    /// `[text][]`
    Collapsed,
    /// `[text][id]`
    Full,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Root {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub depth: u8, // 1-6
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Blockquote {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub start: Option<u32>,
    pub spread: bool,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ListItem {
    pub spread: bool,
    pub children: Vec<Node>,
}

/// Fenced or indented code block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Code {
    pub lang: Option<String>,
    pub value: String,
}

/// Raw HTML, either a flow block or an inline span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Html {
    pub value: String,
}

/// Link reference definition (`[id]: url "title"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub identifier: String,
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Emphasis {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Strong {
    pub children: Vec<Node>,
}

/// GFM strikethrough.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Delete {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineCode {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub url: String,
    pub title: Option<String>,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReference {
    pub identifier: String,
    pub label: String,
    pub reference_kind: ReferenceKind,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    pub identifier: String,
    pub label: String,
    pub reference_kind: ReferenceKind,
    pub alt: String,
}

/// A resolved shortcode: its tag name and the structured arguments produced
/// by the definition's `parse_args`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub name: String,
    pub data: Value,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root(Root),
    Paragraph(Paragraph),
    Heading(Heading),
    ThematicBreak,
    Blockquote(Blockquote),
    List(List),
    ListItem(ListItem),
    Code(Code),
    Html(Html),
    Definition(Definition),
    Text(Text),
    Emphasis(Emphasis),
    Strong(Strong),
    Delete(Delete),
    InlineCode(InlineCode),
    Break,
    Link(Link),
    Image(Image),
    LinkReference(LinkReference),
    ImageReference(ImageReference),
    ComponentBlock(Component),
    ComponentInline(Component),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(Text {
            value: value.into(),
        })
    }

    pub fn paragraph(children: Vec<Node>) -> Node {
        Node::Paragraph(Paragraph { children })
    }

    pub fn html(value: impl Into<String>) -> Node {
        Node::Html(Html {
            value: value.into(),
        })
    }

    /// Children of a container node, `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(n) => Some(&n.children),
            Node::Paragraph(n) => Some(&n.children),
            Node::Heading(n) => Some(&n.children),
            Node::Blockquote(n) => Some(&n.children),
            Node::List(n) => Some(&n.children),
            Node::ListItem(n) => Some(&n.children),
            Node::Emphasis(n) => Some(&n.children),
            Node::Strong(n) => Some(&n.children),
            Node::Delete(n) => Some(&n.children),
            Node::Link(n) => Some(&n.children),
            Node::LinkReference(n) => Some(&n.children),
            Node::ThematicBreak
            | Node::Code(_)
            | Node::Html(_)
            | Node::Definition(_)
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Break
            | Node::Image(_)
            | Node::ImageReference(_)
            | Node::ComponentBlock(_)
            | Node::ComponentInline(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(n) => Some(&mut n.children),
            Node::Paragraph(n) => Some(&mut n.children),
            Node::Heading(n) => Some(&mut n.children),
            Node::Blockquote(n) => Some(&mut n.children),
            Node::List(n) => Some(&mut n.children),
            Node::ListItem(n) => Some(&mut n.children),
            Node::Emphasis(n) => Some(&mut n.children),
            Node::Strong(n) => Some(&mut n.children),
            Node::Delete(n) => Some(&mut n.children),
            Node::Link(n) => Some(&mut n.children),
            Node::LinkReference(n) => Some(&mut n.children),
            Node::ThematicBreak
            | Node::Code(_)
            | Node::Html(_)
            | Node::Definition(_)
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Break
            | Node::Image(_)
            | Node::ImageReference(_)
            | Node::ComponentBlock(_)
            | Node::ComponentInline(_) => None,
        }
    }

    /// Whether this node may appear inside a paragraph.
    ///
    /// `Html` counts as phrasing: flow-level raw HTML is only allowed at the
    /// top of a container and is recognised there by position.
    pub fn is_phrasing(&self) -> bool {
        matches!(
            self,
            Node::Text(_)
                | Node::Emphasis(_)
                | Node::Strong(_)
                | Node::Delete(_)
                | Node::InlineCode(_)
                | Node::Break
                | Node::Link(_)
                | Node::Image(_)
                | Node::LinkReference(_)
                | Node::ImageReference(_)
                | Node::Html(_)
                | Node::ComponentInline(_)
        )
    }

    /// Concatenated text of the subtree, as used for image alt text.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(self, &mut out);
        out
    }
}

fn collect_plain_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&t.value),
        Node::InlineCode(c) => out.push_str(&c.value),
        Node::Code(c) => out.push_str(&c.value),
        Node::Image(i) => out.push_str(&i.alt),
        Node::ImageReference(i) => out.push_str(&i.alt),
        Node::Break => out.push('\n'),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    collect_plain_text(child, out);
                }
            }
        }
    }
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Root { children }
    }

    /// A root holding one empty paragraph.
    pub fn empty_paragraph() -> Self {
        Root {
            children: vec![Node::paragraph(Vec::new())],
        }
    }
}
