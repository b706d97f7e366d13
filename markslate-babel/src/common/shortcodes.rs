//! Shortcode resolution
//!
//! Turns shortcode syntax into component nodes for every tag the registry
//! knows:
//!
//! - block position: a paragraph whose only content is an encoded component
//!   line (`:::name <payload>`, see `formats::markdown::component_blocks`);
//! - inline position: `:name[args]` inside text, not directly preceded by a
//!   letter or digit.
//!
//! A tag is resolved only when a definition of the right kind exists and its
//! `parse_args` accepts the arguments. Everything else stays text.

use crate::formats::markdown::component_blocks::{decode_payload, ENCODED};
use crate::mdast::{Component, Node, Root};
use crate::shortcode::{ShortcodeKind, ShortcodeRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z0-9_-]+)\[([^\]\n]*)\]").expect("valid inline shortcode regex"));

pub fn resolve_shortcodes(root: &mut Root, shortcodes: &ShortcodeRegistry) {
    resolve_children(&mut root.children, shortcodes);
}

fn resolve_children(nodes: &mut Vec<Node>, shortcodes: &ShortcodeRegistry) {
    let mut out = Vec::with_capacity(nodes.len());
    for mut node in nodes.drain(..) {
        if let Some(component) = block_component(&node, shortcodes) {
            out.push(Node::ComponentBlock(component));
            continue;
        }
        if let Node::Text(text) = &node {
            out.extend(split_inline(&text.value, shortcodes));
            continue;
        }
        if let Some(children) = node.children_mut() {
            resolve_children(children, shortcodes);
        }
        out.push(node);
    }
    *nodes = out;
}

fn block_component(node: &Node, shortcodes: &ShortcodeRegistry) -> Option<Component> {
    let Node::Paragraph(paragraph) = node else {
        return None;
    };
    let [Node::Text(text)] = paragraph.children.as_slice() else {
        return None;
    };
    let caps = ENCODED.captures(&text.value)?;
    if !caps[1].is_empty() {
        return None;
    }
    let name = &caps[2];
    let Some(definition) = shortcodes.lookup(name, ShortcodeKind::Block) else {
        debug!(shortcode = name, "no block definition, leaving as text");
        return None;
    };
    let body = decode_payload(&caps[3])?;
    match definition.parse_args(&body) {
        Some(data) => Some(Component {
            name: name.to_string(),
            data,
        }),
        None => {
            debug!(shortcode = name, "block arguments rejected, leaving as text");
            None
        }
    }
}

/// Split a text value around resolvable inline shortcodes.
fn split_inline(value: &str, shortcodes: &ShortcodeRegistry) -> Vec<Node> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(value) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let preceded_by_word = value[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric());
        if preceded_by_word {
            continue;
        }
        let name = &caps[1];
        let Some(definition) = shortcodes.lookup(name, ShortcodeKind::Inline) else {
            continue;
        };
        let Some(data) = definition.parse_args(&caps[2]) else {
            debug!(shortcode = name, "inline arguments rejected, leaving as text");
            continue;
        };
        if whole.start() > last {
            out.push(Node::text(&value[last..whole.start()]));
        }
        out.push(Node::ComponentInline(Component {
            name: name.to_string(),
            data,
        }));
        last = whole.end();
    }

    if last < value.len() || out.is_empty() {
        out.push(Node::text(&value[last..]));
    }
    out
}
