//! Leaf canonicalization
//!
//! Converting nested mark nodes produces runs of sibling text nodes and
//! adjacent leaves with identical marks. A canonical document has at most one
//! text node between two non-text siblings, no two adjacent leaves with the
//! same mark set, and no empty leaf unless it is the only one.

use super::nodes::{Document, Leaf, Node, Text};

pub fn normalize_document(doc: &mut Document) {
    normalize_children(&mut doc.nodes);
}

/// Canonicalize a child list in place, recursing into blocks and inlines.
pub fn normalize_children(nodes: &mut Vec<Node>) {
    for node in nodes.iter_mut() {
        match node {
            Node::Block(block) => {
                normalize_children(&mut block.nodes);
                ensure_text(&mut block.nodes);
            }
            Node::Inline(inline) => {
                normalize_children(&mut inline.nodes);
                ensure_text(&mut inline.nodes);
            }
            Node::Text(_) => {}
        }
    }

    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        if let (Some(Node::Text(prev)), Node::Text(next)) = (merged.last_mut(), &node) {
            prev.leaves.extend(next.leaves.iter().cloned());
            continue;
        }
        merged.push(node);
    }
    for node in merged.iter_mut() {
        if let Node::Text(text) = node {
            merge_leaves(text);
        }
    }
    *nodes = merged;
}

/// Merge adjacent leaves that share a mark set and drop empty leaves.
pub fn merge_leaves(text: &mut Text) {
    let mut placeholder: Option<Leaf> = None;
    let mut leaves: Vec<Leaf> = Vec::with_capacity(text.leaves.len());
    for leaf in text.leaves.drain(..) {
        if leaf.text.is_empty() {
            placeholder.get_or_insert(leaf);
            continue;
        }
        match leaves.last_mut() {
            Some(prev) if prev.marks == leaf.marks => prev.text.push_str(&leaf.text),
            _ => leaves.push(leaf),
        }
    }
    if leaves.is_empty() {
        // a void node's placeholder leaf keeps its marks
        leaves.push(placeholder.unwrap_or_default());
    }
    text.leaves = leaves;
}

fn ensure_text(nodes: &mut Vec<Node>) {
    if nodes.is_empty() {
        nodes.push(Node::Text(Text::empty(Default::default())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slate::nodes::{marks, BlockType, Mark};

    #[test]
    fn merges_equal_marks() {
        let mut text = Text::new(vec![
            Leaf::new("a ", marks(&[Mark::Bold])),
            Leaf::new("b", marks(&[Mark::Bold, Mark::Strikethrough])),
            Leaf::new("c", marks(&[Mark::Strikethrough, Mark::Bold])),
        ]);
        merge_leaves(&mut text);
        assert_eq!(
            text.leaves,
            vec![
                Leaf::new("a ", marks(&[Mark::Bold])),
                Leaf::new("bc", marks(&[Mark::Bold, Mark::Strikethrough])),
            ]
        );
    }

    #[test]
    fn drops_empty_leaves_between_equal_marks() {
        let mut text = Text::new(vec![
            Leaf::new("a", marks(&[Mark::Italic])),
            Leaf::new("", Default::default()),
            Leaf::new("b", marks(&[Mark::Italic])),
        ]);
        merge_leaves(&mut text);
        assert_eq!(text.leaves, vec![Leaf::new("ab", marks(&[Mark::Italic]))]);
    }

    #[test]
    fn keeps_marks_of_lone_empty_leaf() {
        let mut text = Text::empty(marks(&[Mark::Bold]));
        merge_leaves(&mut text);
        assert_eq!(text.leaves, vec![Leaf::new("", marks(&[Mark::Bold]))]);
    }

    #[test]
    fn joins_sibling_text_nodes() {
        let mut nodes = vec![Node::block(
            BlockType::Paragraph,
            vec![Node::plain_text("a"), Node::plain_text("b")],
        )];
        normalize_children(&mut nodes);
        assert_eq!(
            nodes,
            vec![Node::block(BlockType::Paragraph, vec![Node::plain_text("ab")])]
        );
    }

    #[test]
    fn empty_blocks_get_an_empty_text() {
        let mut nodes = vec![Node::block(BlockType::Paragraph, vec![])];
        normalize_children(&mut nodes);
        assert_eq!(
            nodes,
            vec![Node::block(
                BlockType::Paragraph,
                vec![Node::Text(Text::empty(Default::default()))]
            )]
        );
    }
}
