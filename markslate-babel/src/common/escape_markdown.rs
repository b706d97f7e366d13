//! Markdown escaping of text nodes
//!
//! Text reaching the serializer is emitted verbatim, so this pass is the only
//! place where characters that would be read back as markup get a backslash.
//! It works on the tree rather than on the output string because whether a
//! character is significant depends on its position: `-` matters only at the
//! start of a line, `]` matters inside link text, and so on.
//!
//! Escaped anywhere:
//!
//! - `*`, `` ` `` and `~`
//! - `_` unless it sits between two alphanumerics
//! - `\` before ASCII punctuation, a newline or the end of the text
//! - `[` when it could open a link, and both brackets inside link text
//! - `<` when it could start a tag or an autolink
//!
//! Escaped at the start of a line (after up to three spaces): ATX heading
//! markers, `>`, `-`, `+ `, setext `=` lines and ordered list markers.
//!
//! `&` is never escaped; entity text is kept literal by the parser.
//!
//! Left alone: code, raw HTML, demoted image paragraphs and the literal form of
//! unresolved component blocks.

use super::images_to_text::is_image_paragraph;
use crate::mdast::{Node, Root};
use once_cell::sync::Lazy;
use regex::Regex;

static COMPONENT_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*):::[A-Za-z0-9_-]+[ \t]*$").expect("valid component opening regex")
});

pub fn escape_markdown(root: &mut Root) {
    escape_flow(&mut root.children);
}

fn escape_flow(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Paragraph(paragraph) => {
                if !is_image_paragraph(&paragraph.children) {
                    escape_phrasing(&mut paragraph.children, true, false);
                }
            }
            Node::Heading(heading) => {
                single_line(&mut heading.children);
                escape_phrasing(&mut heading.children, true, false);
                protect_closing_sequence(&mut heading.children);
            }
            Node::Code(_) | Node::Html(_) => {}
            other => {
                if let Some(children) = other.children_mut() {
                    escape_flow(children);
                }
            }
        }
    }
}

fn escape_phrasing(nodes: &mut [Node], mut line_start: bool, in_link: bool) {
    let count = nodes.len();
    for (index, node) in nodes.iter_mut().enumerate() {
        let last = index + 1 == count;
        match node {
            Node::Text(text) => {
                if text.value.is_empty() {
                    continue;
                }
                let ends_line = text.value.ends_with('\n');
                text.value = escape_text(&text.value, line_start, last, in_link);
                line_start = ends_line;
            }
            Node::Break => line_start = true,
            Node::Link(_) | Node::LinkReference(_) => {
                if let Some(children) = node.children_mut() {
                    escape_phrasing(children, false, true);
                }
                line_start = false;
            }
            Node::Emphasis(_) | Node::Strong(_) | Node::Delete(_) => {
                if let Some(children) = node.children_mut() {
                    escape_phrasing(children, false, in_link);
                }
                line_start = false;
            }
            _ => line_start = false,
        }
    }
}

/// Escape one text value.
///
/// `line_start` tells whether the value begins a line of output; `last` is
/// false when more inline nodes follow it in the same parent.
fn escape_text(value: &str, line_start: bool, last: bool, in_link: bool) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 8);
    let mut at_line_start = line_start;
    let mut i = 0;

    while i < chars.len() {
        if at_line_start {
            if let Some(end) = literal_component_end(&chars, i) {
                out.extend(&chars[i..end]);
                i = end;
                continue;
            }
            at_line_start = false;
            i = escape_line_start(&chars, i, &mut out);
            continue;
        }

        let c = chars[i];
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        match c {
            '\n' => {
                out.push('\n');
                at_line_start = true;
            }
            '\\' => {
                let significant = next.map_or(true, |n| n == '\n' || n.is_ascii_punctuation());
                out.push_str(if significant { "\\\\" } else { "\\" });
            }
            '*' | '`' | '~' => {
                out.push('\\');
                out.push(c);
            }
            '_' => {
                let intraword = prev.is_some_and(char::is_alphanumeric)
                    && next.is_some_and(char::is_alphanumeric);
                if !intraword {
                    out.push('\\');
                }
                out.push('_');
            }
            '[' => {
                if in_link || opens_link(&chars, i, last) {
                    out.push('\\');
                }
                out.push('[');
            }
            ']' if in_link => out.push_str("\\]"),
            '<' => {
                if next.is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?')) {
                    out.push('\\');
                }
                out.push('<');
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

/// Whether the `[` at `at` could be read as the start of a link, image,
/// reference or definition.
fn opens_link(chars: &[char], at: usize, last: bool) -> bool {
    let mut found_close = false;
    for k in at + 1..chars.len() {
        if chars[k] != ']' {
            continue;
        }
        found_close = true;
        match chars.get(k + 1) {
            Some('(' | '[' | ':') => return true,
            None if !last => return true,
            _ => {}
        }
    }
    !found_close && !last
}

/// Handle the block-level markers that only count at the start of a line.
/// Returns the index where ordinary escaping resumes.
fn escape_line_start(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut i = start;
    while i < chars.len() && i - start < 3 && chars[i] == ' ' {
        out.push(' ');
        i += 1;
    }
    let Some(&c) = chars.get(i) else {
        return i;
    };
    let after = |j: usize| chars.get(j).copied();
    let ends_marker = |j: usize| matches!(after(j), None | Some(' ' | '\t' | '\n'));

    match c {
        '#' => {
            let run = chars[i..].iter().take_while(|&&h| h == '#').count();
            if run <= 6 && ends_marker(i + run) {
                out.push('\\');
            }
        }
        '>' | '-' => out.push('\\'),
        '+' if ends_marker(i + 1) => out.push('\\'),
        '=' => {
            let rest: String = chars[i..].iter().take_while(|&&x| x != '\n').collect();
            if rest.trim_end().chars().all(|x| x == '=') {
                out.push('\\');
            }
        }
        '0'..='9' => {
            let digits = chars[i..].iter().take_while(|d| d.is_ascii_digit()).count();
            let marker = i + digits;
            if digits <= 9 && matches!(after(marker), Some('.' | ')')) && ends_marker(marker + 1) {
                out.extend(&chars[i..marker]);
                out.push('\\');
                out.push(chars[marker]);
                return marker + 1;
            }
        }
        _ => {}
    }
    i
}

/// End index (exclusive) of a literal component block starting at `start`,
/// if the line at `start` opens one that is closed later in the value.
fn literal_component_end(chars: &[char], start: usize) -> Option<usize> {
    let line_end = |from: usize| {
        chars[from..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(chars.len(), |p| from + p)
    };
    let first_end = line_end(start);
    let opening: String = chars[start..first_end].iter().collect();
    let caps = COMPONENT_OPENING.captures(&opening)?;
    let closing = format!("{}:::", &caps[1]);

    let mut cursor = first_end;
    while cursor < chars.len() {
        let from = cursor + 1;
        let end = line_end(from);
        let line: String = chars[from..end].iter().collect();
        if line.trim_end() == closing {
            return Some((end + 1).min(chars.len()));
        }
        cursor = end;
    }
    None
}

/// Headings are one line: newlines become spaces and hard breaks vanish.
fn single_line(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Text(text) => {
                if text.value.contains('\n') {
                    text.value = text.value.replace('\n', " ");
                }
            }
            Node::Break => *node = Node::text(" "),
            other => {
                if let Some(children) = other.children_mut() {
                    single_line(children);
                }
            }
        }
    }
}

/// A heading ending in ` #` would lose the hashes as a closing sequence.
fn protect_closing_sequence(nodes: &mut [Node]) {
    let Some(Node::Text(text)) = nodes.last_mut() else {
        return;
    };
    let trimmed = text.value.trim_end();
    let without_hashes = trimmed.trim_end_matches('#');
    if without_hashes.len() < trimmed.len() && without_hashes.ends_with([' ', '\t']) {
        let at = without_hashes.len();
        text.value.insert(at, '\\');
    }
}
