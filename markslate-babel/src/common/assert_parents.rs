//! Parent/child typing repair
//!
//! Trees built from pasted HTML can hold any node under any parent: a list
//! inside a link, a heading inside bold text, bare text next to paragraphs.
//! This pass rewrites such a tree until every parent holds children of the
//! right category:
//!
//! - flow nodes inside a phrasing parent are hoisted out by splitting the
//!   parent around them (`<b>a<p>b</p>c</b>` becomes three siblings);
//! - phrasing runs inside a flow parent are wrapped into paragraphs;
//! - list children that are not items are wrapped into items, and items
//!   found outside a list are gathered into a bulleted list;
//! - paragraphs are trimmed and dropped when nothing but whitespace is left,
//!   marks and links without content are dropped.
//!
//! Raw HTML standing directly in a flow parent is kept as a block.

use crate::mdast::{List, ListItem, Node, Paragraph, Root};
use tracing::debug;

pub fn assert_parents(root: &mut Root) {
    let children = std::mem::take(&mut root.children);
    root.children = flow(children);
}

/// Repair the content of a flow parent (root, blockquote, list item).
fn flow(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run: Vec<Node> = Vec::new();
    let mut stray_items: Vec<Node> = Vec::new();

    for node in nodes.into_iter().flat_map(repair) {
        if !matches!(node, Node::ListItem(_)) {
            flush_items(&mut stray_items, &mut out);
        }
        match node {
            Node::Html(_) => {
                flush_run(&mut run, &mut out);
                out.push(node);
            }
            node if node.is_phrasing() => run.push(node),
            Node::ListItem(_) => {
                flush_run(&mut run, &mut out);
                stray_items.push(node);
            }
            Node::Paragraph(paragraph) => {
                flush_run(&mut run, &mut out);
                push_paragraph(paragraph.children, &mut out);
            }
            other => {
                flush_run(&mut run, &mut out);
                out.push(other);
            }
        }
    }
    flush_run(&mut run, &mut out);
    flush_items(&mut stray_items, &mut out);
    out
}

fn flush_run(run: &mut Vec<Node>, out: &mut Vec<Node>) {
    if !run.is_empty() {
        push_paragraph(std::mem::take(run), out);
    }
}

fn flush_items(items: &mut Vec<Node>, out: &mut Vec<Node>) {
    if items.is_empty() {
        return;
    }
    debug!(items = items.len(), "list items outside a list, wrapping");
    out.push(Node::List(List {
        ordered: false,
        start: None,
        spread: false,
        children: std::mem::take(items),
    }));
}

fn push_paragraph(mut children: Vec<Node>, out: &mut Vec<Node>) {
    trim_phrasing(&mut children);
    if !is_blank(&children) {
        out.push(Node::Paragraph(Paragraph { children }));
    }
}

/// Repair one node; phrasing parents may split into several siblings.
fn repair(node: Node) -> Vec<Node> {
    match node {
        Node::Root(root) => root.children.into_iter().flat_map(repair).collect(),
        Node::Blockquote(mut quote) => {
            quote.children = flow(quote.children);
            vec![Node::Blockquote(quote)]
        }
        Node::ListItem(mut item) => {
            item.children = flow(item.children);
            vec![Node::ListItem(item)]
        }
        Node::List(mut list) => {
            list.children = list_children(list.children);
            if list.children.is_empty() {
                Vec::new()
            } else {
                vec![Node::List(list)]
            }
        }
        Node::Paragraph(paragraph) => split_phrasing(paragraph.children, |children| {
            Node::Paragraph(Paragraph { children })
        }),
        Node::Heading(heading) => {
            let depth = heading.depth;
            split_phrasing(heading.children, move |children| {
                Node::Heading(crate::mdast::Heading { depth, children })
            })
        }
        mut node @ (Node::Emphasis(_)
        | Node::Strong(_)
        | Node::Delete(_)
        | Node::Link(_)
        | Node::LinkReference(_)) => {
            let children = node
                .children_mut()
                .map(std::mem::take)
                .unwrap_or_default();
            let template = node;
            split_phrasing(children, move |children| {
                let mut part = template.clone();
                if let Some(slot) = part.children_mut() {
                    *slot = children;
                }
                part
            })
            .into_iter()
            .filter(|part| part.children().map_or(true, |c| !c.is_empty()))
            .collect()
        }
        leaf => vec![leaf],
    }
}

/// Repair the children of a phrasing parent and split it around any flow
/// node among them. `rebuild` recreates the parent for one phrasing run.
fn split_phrasing(children: Vec<Node>, rebuild: impl Fn(Vec<Node>) -> Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    let mut split = false;

    for child in children.into_iter().flat_map(repair) {
        if child.is_phrasing() {
            run.push(child);
        } else {
            split = true;
            if !run.is_empty() {
                out.push(rebuild(std::mem::take(&mut run)));
            }
            out.push(child);
        }
    }
    if !run.is_empty() || !split {
        out.push(rebuild(run));
    }
    if split {
        debug!("flow content inside a phrasing parent, splitting");
    }
    out
}

fn list_children(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut loose: Vec<Node> = Vec::new();

    let flush = |loose: &mut Vec<Node>, out: &mut Vec<Node>| {
        if is_blank(loose) {
            loose.clear();
            return;
        }
        out.push(Node::ListItem(ListItem {
            spread: false,
            children: flow(std::mem::take(loose)),
        }));
    };

    for child in children {
        match child {
            Node::ListItem(mut item) => {
                flush(&mut loose, &mut out);
                item.children = flow(item.children);
                out.push(Node::ListItem(item));
            }
            other => loose.push(other),
        }
    }
    flush(&mut loose, &mut out);
    out
}

/// Whether phrasing content has nothing visible.
fn is_blank(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| match node {
        Node::Text(text) => text.value.trim().is_empty(),
        Node::Break => true,
        _ => false,
    })
}

/// Remove leading and trailing whitespace of a phrasing run.
fn trim_phrasing(nodes: &mut Vec<Node>) {
    while let Some(Node::Text(text)) = nodes.first_mut() {
        let trimmed = text.value.trim_start();
        if trimmed.is_empty() {
            nodes.remove(0);
        } else {
            text.value = trimmed.to_string();
            break;
        }
    }
    while let Some(last) = nodes.last_mut() {
        match last {
            Node::Text(text) => {
                let trimmed = text.value.trim_end();
                if trimmed.is_empty() {
                    nodes.pop();
                } else {
                    text.value.truncate(trimmed.len());
                    break;
                }
            }
            Node::Break => {
                nodes.pop();
            }
            _ => break,
        }
    }
}
