//! Components in markdown, with and without definitions.

use crate::common::{components, cycle};
use markslate_babel::slate::{BlockType, InlineType, Node};
use markslate_babel::{markdown_to_slate, ShortcodeRegistry};
use serde_json::json;

#[test]
fn unknown_block_tag_stays_visible() {
    let md = ":::warning\nlevel: high\n:::";
    assert_eq!(cycle(md, &components()), md);
}

#[test]
fn unknown_inline_tag_stays_visible() {
    let md = "press :key[Esc] now";
    assert_eq!(cycle(md, &components()), md);
}

#[test]
fn block_component_becomes_void_block() {
    let doc = markdown_to_slate("intro\n\n:::note\ntitle: Hi\n:::\n\noutro", &components());
    assert_eq!(doc.nodes.len(), 3);
    let Node::Block(block) = &doc.nodes[1] else {
        panic!("expected a block, got {:?}", doc.nodes[1]);
    };
    assert_eq!(block.kind, BlockType::Component);
    assert_eq!(block.data_str("shortcode"), Some("note"));
    assert_eq!(block.data.get("shortcodeData"), Some(&json!({"title": "Hi"})));
}

#[test]
fn block_component_round_trips() {
    let md = "intro\n\n:::note\ntitle: Hi\n:::\n\noutro";
    assert_eq!(cycle(md, &components()), md);
}

#[test]
fn inline_component_round_trips() {
    let md = "press :kbd[Esc] to close";
    assert_eq!(cycle(md, &components()), md);

    let doc = markdown_to_slate(md, &components());
    let inline = doc.nodes[0]
        .children()
        .iter()
        .find_map(|node| match node {
            Node::Inline(inline) => Some(inline),
            _ => None,
        })
        .expect("an inline component");
    assert_eq!(inline.kind, InlineType::Component);
    assert_eq!(inline.data_str("shortcode"), Some("kbd"));
}

#[test]
fn empty_block_component() {
    let md = ":::note\n:::";
    assert_eq!(cycle(md, &components()), md);
}

#[test]
fn components_inside_code_are_left_alone() {
    let md = "```\n:::note\ntitle: Hi\n:::\n```";
    assert_eq!(cycle(md, &components()), md);
}

#[test]
fn registry_is_consulted_per_call() {
    let md = ":::note\ntitle: Hi\n:::";
    let with = markdown_to_slate(md, &components());
    let without = markdown_to_slate(md, &ShortcodeRegistry::new());
    assert_ne!(with, without);
}

#[test]
fn text_shaped_like_an_encoded_block_is_kept() {
    let md = ":::tip SGk=";
    assert_eq!(cycle(md, &components()), md);
}
