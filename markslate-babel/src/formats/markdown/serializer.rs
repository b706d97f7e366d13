//! Markdown serialization (syntax tree → Markdown)
//!
//! Pipeline: escape pass → trailing break removal → stringification → encoded
//! component lines expanded to their fenced form → trailing whitespace
//! trimmed.
//!
//! The stringifier uses one fixed style: `-` bullets, `1.` ordered markers,
//! `_` emphasis, `**` strong, `~~` strikethrough, `---` rules, ATX headings and
//! backtick fences. Text values are written verbatim; all escaping happens in
//! the escape pass so nothing gets escaped twice.

use super::component_blocks::{decode_lines, encoded_line};
use crate::common::escape_markdown::escape_markdown;
use crate::common::images_to_text::image_literal;
use crate::common::strip_trailing_breaks::strip_trailing_breaks;
use crate::mdast::{Component, Definition, List, Node, ReferenceKind, Root};
use crate::shortcode::{inline_args, yaml_body, ShortcodeKind, ShortcodeRegistry};
use once_cell::sync::Lazy;

static NO_SHORTCODES: Lazy<ShortcodeRegistry> = Lazy::new(ShortcodeRegistry::new);

/// Serialize a syntax tree. `None` serializes an empty document.
pub fn serialize_mdast(root: Option<&Root>, shortcodes: &ShortcodeRegistry) -> String {
    let mut tree = root.cloned().unwrap_or_else(Root::empty_paragraph);
    escape_markdown(&mut tree);
    strip_trailing_breaks(&mut tree);
    hoist_edge_breaks(&mut tree.children);

    let stringifier = Stringifier { shortcodes };
    let text = stringifier.flow(&tree.children);
    decode_lines(&text).trim_end().to_string()
}

/// Source text of inline nodes, exactly as the stringifier writes them.
pub(crate) fn stringify_phrasing(nodes: &[Node]) -> String {
    Stringifier {
        shortcodes: &NO_SHORTCODES,
    }
    .phrasing(nodes)
}

/// Link or image destination, wrapped in `<>` when the bare form would not
/// parse back.
pub fn link_destination(url: &str) -> String {
    let needs_brackets = url.is_empty()
        || url
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '(' | ')'));
    if needs_brackets {
        format!("<{}>", url.replace('<', "\\<").replace('>', "\\>"))
    } else {
        url.to_string()
    }
}

/// ` "title"` with quotes and backslashes escaped, or nothing.
pub fn link_title(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => {
            format!(" \"{}\"", title.replace('\\', "\\\\").replace('"', "\\\""))
        }
        _ => String::new(),
    }
}

/// Hard breaks at the edges of a mark would end up between the delimiter and
/// the text; move them outside the mark.
fn hoist_edge_breaks(nodes: &mut Vec<Node>) {
    let mut out = Vec::with_capacity(nodes.len());
    for mut node in nodes.drain(..) {
        let is_mark = matches!(node, Node::Emphasis(_) | Node::Strong(_) | Node::Delete(_));
        let (mut leading, mut trailing) = (0, 0);
        if let Some(children) = node.children_mut() {
            hoist_edge_breaks(children);
            if is_mark {
                leading = children.iter().take_while(|c| matches!(c, Node::Break)).count();
                children.drain(..leading);
                trailing = children
                    .iter()
                    .rev()
                    .take_while(|c| matches!(c, Node::Break))
                    .count();
                children.truncate(children.len() - trailing);
            }
        }
        out.extend(std::iter::repeat_with(|| Node::Break).take(leading));
        out.push(node);
        out.extend(std::iter::repeat_with(|| Node::Break).take(trailing));
    }
    *nodes = out;
}

struct Stringifier<'r> {
    shortcodes: &'r ShortcodeRegistry,
}

/// A rendered inline node. Marks keep their parts apart until the neighbours
/// are known, so the emphasis delimiter can be chosen.
enum Piece {
    Plain(String),
    Mark {
        delimiter: &'static str,
        emphasis: bool,
        lead: String,
        core: String,
        trail: String,
        /// Whether the core begins and ends inside plain text.
        text_edges: (bool, bool),
    },
}

impl Piece {
    fn first_char(&self) -> Option<char> {
        match self {
            Piece::Plain(text) => text.chars().next(),
            Piece::Mark {
                delimiter,
                lead,
                core,
                trail,
                ..
            } => lead
                .chars()
                .next()
                .or_else(|| (!core.is_empty()).then(|| delimiter.chars().next()).flatten())
                .or_else(|| trail.chars().next()),
        }
    }
}

fn is_word(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Unicode punctuation and symbols as delimiter flanking sees them.
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// A neighbour that keeps a delimiter from flanking punctuation.
fn blocks_flanking(c: Option<char>) -> bool {
    c.is_some_and(|c| !c.is_whitespace() && !is_punctuation(c))
}

/// Punctuation that may sit outside a mark without changing what it parses as.
fn is_movable(c: char) -> bool {
    is_punctuation(c) && !matches!(c, '\\' | '&' | ';')
}

/// Split punctuation off the edges of a mark's core where a delimiter next to
/// it would not flank: `x**(a)**y` would not parse as strong, `x(**a**)y`
/// does. Only plain-text edges are touched, and never an escaped character.
fn flanking_core(
    core: &str,
    edges: (bool, bool),
    before: Option<char>,
    after: Option<char>,
) -> (&str, &str, &str) {
    let mut start = 0;
    if edges.0 && blocks_flanking(before) {
        start = core
            .char_indices()
            .find(|&(_, c)| !is_movable(c))
            .map_or(core.len(), |(i, _)| i);
    }
    let rest = &core[start..];
    let mut end = rest.len();
    if edges.1 && blocks_flanking(after) {
        let chars: Vec<(usize, char)> = rest.char_indices().collect();
        let mut k = chars.len();
        while k > 0 {
            let (_, c) = chars[k - 1];
            let escaped = k >= 2 && chars[k - 2].1 == '\\';
            if !is_movable(c) || escaped {
                break;
            }
            k -= 1;
        }
        end = chars.get(k).map_or(rest.len(), |&(i, _)| i);
    }
    (&core[..start], &rest[..end], &rest[end..])
}

impl Stringifier<'_> {
    fn flow(&self, nodes: &[Node]) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(nodes.len());
        let mut previous: Option<&Node> = None;
        for node in nodes {
            let rendered = match (node, previous) {
                (Node::List(list), Some(Node::List(prev))) if prev.ordered == list.ordered => {
                    let alternate = blocks.last().is_some_and(|b| uses_default_marker(b, list));
                    self.list(list, alternate)
                }
                _ => self.block(node),
            };
            previous = Some(node);
            if !rendered.is_empty() {
                blocks.push(rendered);
            }
        }
        blocks.join("\n\n")
    }

    fn block(&self, node: &Node) -> String {
        match node {
            Node::Root(root) => self.flow(&root.children),
            Node::Paragraph(paragraph) => self.phrasing(&paragraph.children),
            Node::Heading(heading) => {
                let hashes = "#".repeat(usize::from(heading.depth.clamp(1, 6)));
                let content = self.phrasing(&heading.children);
                if content.is_empty() {
                    hashes
                } else {
                    format!("{hashes} {content}")
                }
            }
            Node::ThematicBreak => "---".to_string(),
            Node::Blockquote(quote) => {
                let inner = self.flow(&quote.children);
                if inner.is_empty() {
                    return ">".to_string();
                }
                inner
                    .split('\n')
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {line}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Node::List(list) => self.list(list, false),
            Node::ListItem(item) => {
                self.list_item("-", &item.children, !item.spread)
            }
            Node::Code(code) => {
                let longest = longest_run(&code.value, '`');
                let fence = "`".repeat(longest.max(2) + 1);
                let lang = code.lang.as_deref().unwrap_or("");
                if code.value.is_empty() {
                    format!("{fence}{lang}\n{fence}")
                } else {
                    format!("{fence}{lang}\n{}\n{fence}", code.value)
                }
            }
            Node::Html(html) => html.value.clone(),
            Node::Definition(definition) => self.definition(definition),
            Node::ComponentBlock(component) => self.component_block(component),
            other => self.phrasing(std::slice::from_ref(other)),
        }
    }

    fn list(&self, list: &List, alternate: bool) -> String {
        let start = list.start.unwrap_or(1);
        let tight = !list.spread;
        let items: Vec<String> = list
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let marker = if list.ordered {
                    let delimiter = if alternate { ')' } else { '.' };
                    let number = u64::from(start) + index as u64;
                    format!("{number}{delimiter}")
                } else if alternate {
                    "*".to_string()
                } else {
                    "-".to_string()
                };
                match child {
                    Node::ListItem(item) => {
                        self.list_item(&marker, &item.children, tight && !item.spread)
                    }
                    other => self.list_item(&marker, std::slice::from_ref(other), tight),
                }
            })
            .collect();
        items.join(if tight { "\n" } else { "\n\n" })
    }

    fn list_item(&self, marker: &str, children: &[Node], tight: bool) -> String {
        let mut content = String::new();
        for (index, child) in children.iter().enumerate() {
            let rendered = self.block(child);
            if index > 0 {
                let interrupts = matches!(
                    child,
                    Node::List(_) | Node::Code(_) | Node::Heading(_) | Node::Blockquote(_)
                );
                content.push_str(if tight && interrupts { "\n" } else { "\n\n" });
            }
            content.push_str(&rendered);
        }
        if content.is_empty() {
            return marker.to_string();
        }

        let indent = " ".repeat(marker.chars().count() + 1);
        let mut out = String::with_capacity(content.len() + marker.len() + 1);
        for (index, line) in content.split('\n').enumerate() {
            if index == 0 {
                out.push_str(marker);
                out.push(' ');
            } else {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&indent);
                }
            }
            out.push_str(line);
        }
        out
    }

    fn definition(&self, definition: &Definition) -> String {
        format!(
            "[{}]: {}{}",
            definition.identifier,
            link_destination(&definition.url),
            link_title(definition.title.as_deref())
        )
    }

    fn component_block(&self, component: &Component) -> String {
        let body = match self.shortcodes.lookup(&component.name, ShortcodeKind::Block) {
            Some(definition) => definition.serialize_args(&component.data),
            None => yaml_body(&component.data),
        };
        encoded_line(&component.name, &body)
    }

    fn phrasing(&self, nodes: &[Node]) -> String {
        let pieces: Vec<Piece> = nodes.iter().map(|node| self.piece(node)).collect();
        let mut out = String::new();

        for (index, piece) in pieces.iter().enumerate() {
            match piece {
                Piece::Plain(text) => out.push_str(text),
                Piece::Mark {
                    delimiter,
                    emphasis,
                    lead,
                    core,
                    trail,
                    text_edges,
                } => {
                    out.push_str(lead);
                    let next = trail
                        .chars()
                        .next()
                        .or_else(|| pieces.get(index + 1).and_then(Piece::first_char));
                    let (head, core, tail) =
                        flanking_core(core, *text_edges, out.chars().next_back(), next);
                    out.push_str(head);
                    if !core.is_empty() {
                        let delimiter = if *emphasis {
                            let before = out.chars().next_back();
                            let after = tail.chars().next().or(next);
                            if is_word(before) || is_word(after) {
                                "*"
                            } else {
                                "_"
                            }
                        } else {
                            delimiter
                        };
                        out.push_str(delimiter);
                        out.push_str(core);
                        out.push_str(delimiter);
                    }
                    out.push_str(tail);
                    out.push_str(trail);
                }
            }
        }
        out
    }

    fn piece(&self, node: &Node) -> Piece {
        match node {
            Node::Emphasis(mark) => self.mark("_", true, &mark.children),
            Node::Strong(mark) => self.mark("**", false, &mark.children),
            Node::Delete(mark) => self.mark("~~", false, &mark.children),
            other => Piece::Plain(self.inline(other)),
        }
    }

    /// Split rendered mark content into surrounding whitespace and a core
    /// that the delimiters hug.
    fn mark(&self, delimiter: &'static str, emphasis: bool, children: &[Node]) -> Piece {
        let content = self.phrasing(children);
        let trimmed_start = content.trim_start();
        let lead = content[..content.len() - trimmed_start.len()].to_string();
        let core_str = trimmed_start.trim_end();
        let trail = trimmed_start[core_str.len()..].to_string();

        let mut core = core_str.to_string();
        let backslashes = core.chars().rev().take_while(|&c| c == '\\').count();
        if backslashes % 2 == 1 {
            core.push('\\');
        }
        let is_text_edge = |node: Option<&Node>, trim: fn(&str) -> &str| {
            matches!(node, Some(Node::Text(text)) if !trim(&text.value).is_empty())
        };
        Piece::Mark {
            delimiter,
            emphasis,
            lead,
            core,
            trail,
            text_edges: (
                is_text_edge(children.first(), str::trim_start),
                is_text_edge(children.last(), str::trim_end),
            ),
        }
    }

    fn inline(&self, node: &Node) -> String {
        match node {
            Node::Text(text) => text.value.clone(),
            Node::Html(html) => html.value.clone(),
            Node::Break => "\\\n".to_string(),
            Node::InlineCode(code) => inline_code(&code.value),
            Node::Link(link) => format!(
                "[{}]({}{})",
                self.phrasing(&link.children),
                link_destination(&link.url),
                link_title(link.title.as_deref())
            ),
            Node::Image(image) => image_literal(image),
            Node::LinkReference(reference) => {
                let text = self.phrasing(&reference.children);
                reference_suffix(format!("[{text}]"), reference.reference_kind, &reference.label)
            }
            Node::ImageReference(reference) => {
                let alt = reference.alt.replace('\\', "\\\\").replace(']', "\\]");
                reference_suffix(format!("![{alt}]"), reference.reference_kind, &reference.label)
            }
            Node::ComponentInline(component) => {
                let args = match self.shortcodes.lookup(&component.name, ShortcodeKind::Inline) {
                    Some(definition) => definition.serialize_args(&component.data),
                    None => inline_args(&component.data),
                };
                format!(":{}[{}]", component.name, args)
            }
            Node::Emphasis(_) | Node::Strong(_) | Node::Delete(_) => {
                self.phrasing(std::slice::from_ref(node))
            }
            other => self.block(other),
        }
    }
}

fn reference_suffix(mut head: String, kind: ReferenceKind, label: &str) -> String {
    match kind {
        ReferenceKind::Shortcut => {}
        ReferenceKind::Collapsed => head.push_str("[]"),
        ReferenceKind::Full => {
            head.push('[');
            head.push_str(label);
            head.push(']');
        }
    }
    head
}

/// Whether a rendered list already used the default marker, so an adjacent
/// list of the same kind needs the other one.
fn uses_default_marker(rendered: &str, list: &List) -> bool {
    if list.ordered {
        let digits = rendered.chars().take_while(char::is_ascii_digit).count();
        rendered[digits..].starts_with('.')
    } else {
        rendered.starts_with('-')
    }
}

fn longest_run(value: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in value.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn inline_code(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let ticks = "`".repeat(longest_run(value, '`') + 1);
    let pad = value.starts_with('`')
        || value.ends_with('`')
        || (value.starts_with(' ') && value.ends_with(' ') && !value.trim().is_empty());
    if pad {
        format!("{ticks} {value} {ticks}")
    } else {
        format!("{ticks}{value}{ticks}")
    }
}
