//! Reference squashing
//!
//! Replaces `[text][id]` / `![alt][id]` references with inline links and
//! images using the matching `[id]: url "title"` definition, then drops every
//! definition from the tree. A reference without a definition degrades to the
//! bracketed text it was written as.
//!
//! comrak resolves references while parsing, so on markdown input this pass
//! usually only removes leftovers; trees built by other means (or by a parser
//! that keeps references) rely on it.

use crate::mdast::{
    Definition, Image, ImageReference, Link, LinkReference, Node, ReferenceKind, Root,
};
use std::collections::HashMap;
use tracing::debug;

pub fn squash_references(root: &mut Root) {
    let mut definitions = HashMap::new();
    collect_definitions(&root.children, &mut definitions);
    rewrite(&mut root.children, &definitions);
}

/// Definition labels match case-insensitively with collapsed whitespace.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn collect_definitions(nodes: &[Node], out: &mut HashMap<String, Definition>) {
    for node in nodes {
        match node {
            // the first definition of a label wins
            Node::Definition(def) => {
                out.entry(normalize_label(&def.identifier))
                    .or_insert_with(|| def.clone());
            }
            other => {
                if let Some(children) = other.children() {
                    collect_definitions(children, out);
                }
            }
        }
    }
}

fn rewrite(nodes: &mut Vec<Node>, definitions: &HashMap<String, Definition>) {
    let mut out = Vec::with_capacity(nodes.len());
    for mut node in nodes.drain(..) {
        if let Some(children) = node.children_mut() {
            rewrite(children, definitions);
        }
        match node {
            Node::Definition(_) => {}
            Node::LinkReference(reference) => out.extend(squash_link(reference, definitions)),
            Node::ImageReference(reference) => out.extend(squash_image(reference, definitions)),
            other => out.push(other),
        }
    }
    merge_text(&mut out);
    *nodes = out;
}

fn squash_link(reference: LinkReference, definitions: &HashMap<String, Definition>) -> Vec<Node> {
    match definitions.get(&normalize_label(&reference.identifier)) {
        Some(def) => vec![Node::Link(Link {
            url: def.url.clone(),
            title: def.title.clone(),
            children: reference.children,
        })],
        None => {
            debug!(label = %reference.label, "link reference has no definition");
            let mut out = vec![Node::text("[")];
            out.extend(reference.children);
            out.push(Node::text(closing_brackets(reference.reference_kind, &reference.label)));
            out
        }
    }
}

fn squash_image(reference: ImageReference, definitions: &HashMap<String, Definition>) -> Vec<Node> {
    match definitions.get(&normalize_label(&reference.identifier)) {
        Some(def) => vec![Node::Image(Image {
            url: def.url.clone(),
            title: def.title.clone(),
            alt: reference.alt,
        })],
        None => {
            debug!(label = %reference.label, "image reference has no definition");
            vec![Node::text(format!(
                "![{}{}",
                reference.alt,
                closing_brackets(reference.reference_kind, &reference.label)
            ))]
        }
    }
}

fn closing_brackets(kind: ReferenceKind, label: &str) -> String {
    match kind {
        ReferenceKind::Shortcut => "]".to_string(),
        ReferenceKind::Collapsed => "][]".to_string(),
        ReferenceKind::Full => format!("][{label}]"),
    }
}

fn merge_text(nodes: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        if let (Some(Node::Text(prev)), Node::Text(next)) = (merged.last_mut(), &node) {
            prev.value.push_str(&next.value);
            continue;
        }
        merged.push(node);
    }
    *nodes = merged;
}
