//! Rich-document node types
//!
//! The editor-facing model: a document of blocks, blocks of blocks or of
//! inlines and text, text made of leaves. A leaf is a run of characters with
//! one exact set of marks. The JSON shape follows the `object`/`type`/`data`/
//! `nodes`/`leaves` layout editors of this family consume.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Text style. The derived ordering (bold, italic, strikethrough, code) is the
/// canonical order used when nesting wrappers back into a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bold,
    Italic,
    Strikethrough,
    Code,
}

pub type Marks = BTreeSet<Mark>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading-one")]
    HeadingOne,
    #[serde(rename = "heading-two")]
    HeadingTwo,
    #[serde(rename = "heading-three")]
    HeadingThree,
    #[serde(rename = "heading-four")]
    HeadingFour,
    #[serde(rename = "heading-five")]
    HeadingFive,
    #[serde(rename = "heading-six")]
    HeadingSix,
    #[serde(rename = "bulleted-list")]
    BulletedList,
    #[serde(rename = "numbered-list")]
    NumberedList,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "quote")]
    Quote,
    #[serde(rename = "code-block")]
    CodeBlock,
    #[serde(rename = "thematic-break")]
    ThematicBreak,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "component")]
    Component,
}

impl BlockType {
    const HEADINGS: [BlockType; 6] = [
        BlockType::HeadingOne,
        BlockType::HeadingTwo,
        BlockType::HeadingThree,
        BlockType::HeadingFour,
        BlockType::HeadingFive,
        BlockType::HeadingSix,
    ];

    /// Heading block for a depth, clamped to 1..=6.
    pub fn heading(depth: u8) -> BlockType {
        let index = usize::from(depth.clamp(1, 6)) - 1;
        Self::HEADINGS[index]
    }

    /// Depth of a heading block, `None` for every other type.
    pub fn heading_depth(self) -> Option<u8> {
        Self::HEADINGS
            .iter()
            .position(|h| *h == self)
            .map(|i| i as u8 + 1)
    }

    /// Void blocks hold no editable text.
    pub fn is_void(self) -> bool {
        matches!(
            self,
            BlockType::ThematicBreak | BlockType::Html | BlockType::Component
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineType {
    Link,
    Image,
    Break,
    Html,
    Component,
}

impl InlineType {
    pub fn is_void(self) -> bool {
        !matches!(self, InlineType::Link)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "object", rename = "document")]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Inline(Inline),
    Text(Text),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inline {
    #[serde(rename = "type")]
    pub kind: InlineType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leaf {
    pub text: String,
    #[serde(default)]
    pub marks: Marks,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Document { nodes }
    }

    /// Decode a document from its JSON form.
    pub fn from_json(source: &str) -> Result<Document, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, FormatError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

impl Block {
    pub fn new(kind: BlockType, nodes: Vec<Node>) -> Self {
        Block {
            kind,
            data: Map::new(),
            nodes,
        }
    }

    /// A void block: its only child is an empty text.
    pub fn void(kind: BlockType, data: Map<String, Value>) -> Self {
        Block {
            kind,
            data,
            nodes: vec![Node::Text(Text::empty(Marks::new()))],
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

impl Inline {
    pub fn new(kind: InlineType, nodes: Vec<Node>) -> Self {
        Inline {
            kind,
            data: Map::new(),
            nodes,
        }
    }

    /// A void inline whose empty leaf carries the marks in effect around it.
    pub fn void(kind: InlineType, data: Map<String, Value>, marks: Marks) -> Self {
        Inline {
            kind,
            data,
            nodes: vec![Node::Text(Text::empty(marks))],
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

impl Text {
    pub fn new(leaves: Vec<Leaf>) -> Self {
        Text { leaves }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Text {
            leaves: vec![Leaf::new(text, Marks::new())],
        }
    }

    pub fn empty(marks: Marks) -> Self {
        Text {
            leaves: vec![Leaf::new("", marks)],
        }
    }

    /// Concatenated text of all leaves.
    pub fn content(&self) -> String {
        self.leaves.iter().map(|l| l.text.as_str()).collect()
    }
}

impl Leaf {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Leaf {
            text: text.into(),
            marks,
        }
    }
}

impl Node {
    pub fn block(kind: BlockType, nodes: Vec<Node>) -> Node {
        Node::Block(Block::new(kind, nodes))
    }

    pub fn plain_text(text: impl Into<String>) -> Node {
        Node::Text(Text::plain(text))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Block(b) => &b.nodes,
            Node::Inline(i) => &i.nodes,
            Node::Text(_) => &[],
        }
    }

    /// Concatenated text of every leaf under this node.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.content(),
            other => other.children().iter().map(Node::text_content).collect(),
        }
    }

    /// Every leaf under this node, in document order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a Node, out: &mut Vec<&'a Leaf>) {
    match node {
        Node::Text(t) => out.extend(t.leaves.iter()),
        other => {
            for child in other.children() {
                collect_leaves(child, out);
            }
        }
    }
}

/// Shorthand for building mark sets.
pub fn marks(list: &[Mark]) -> Marks {
    list.iter().copied().collect()
}
