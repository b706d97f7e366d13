//! Single-line encoding of fenced component blocks
//!
//! A block component is written over several lines and its body is YAML:
//!
//!     :::note
//!     title: Heads up
//!     items:
//!       - one
//!     :::
//!
//! A generic markdown parser would read the body as paragraphs and lists. So
//! before parsing, every such block is rewritten into one line,
//! `:::note <marker><base64 body>`, which parses as a plain text paragraph.
//! The serializer emits the same one-line form and expands it back at the
//! very end. The encoding only ever exists inside markup strings.
//!
//! The marker is a private-use character, so a line of user text that merely
//! looks like `:::note SGk=` is never taken for an encoded block. Sources that
//! already contain the marker are not supported.
//!
//! An opening line without a matching closing `:::` (same indentation) is left
//! untouched. Lines inside fenced code blocks are never rewritten.

use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use regex::Regex;

/// Payload used for a block with an empty body.
pub const EMPTY_PAYLOAD: &str = "-";

/// Leads the payload of every line written by [`encoded_line`].
pub const MARKER: char = '\u{E001}';

static OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*):::([A-Za-z0-9_-]+)[ \t]*$").expect("valid opening regex"));

/// `:::name <marker>payload` with an optional indentation prefix.
pub static ENCODED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*):::([A-Za-z0-9_-]+) \x{E001}(-|[A-Za-z0-9+/]+={0,2})[ \t]*$")
        .expect("valid encoded regex")
});

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("valid fence regex"));

pub fn encode_payload(body: &str) -> String {
    if body.is_empty() {
        EMPTY_PAYLOAD.to_string()
    } else {
        STANDARD.encode(body)
    }
}

/// Decode a payload; `None` when it is not valid base64 of UTF-8 text.
pub fn decode_payload(payload: &str) -> Option<String> {
    if payload == EMPTY_PAYLOAD {
        return Some(String::new());
    }
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

/// Encoded line for a component.
pub fn encoded_line(name: &str, body: &str) -> String {
    format!(":::{name} {MARKER}{}", encode_payload(body))
}

/// The multi-line fenced form of a component, with every line indented.
pub fn literal_block(indent: &str, name: &str, body: &str) -> String {
    let mut out = format!("{indent}:::{name}\n");
    for line in body.lines() {
        if !line.is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str(":::");
    out
}

/// Tracks whether a line sequence is inside a fenced code block.
#[derive(Default)]
struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    /// Feed one line; returns true when the line belongs to a code fence
    /// (including the fence lines themselves).
    fn step(&mut self, line: &str) -> bool {
        let marker = FENCE.captures(line).map(|caps| {
            let run = &caps[1];
            (run.chars().next().unwrap_or('`'), run.len())
        });
        match (self.open, marker) {
            (None, Some(marker)) => {
                self.open = Some(marker);
                true
            }
            (Some((ch, len)), Some((c, l))) if c == ch && l >= len && is_closing(line, c) => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

fn is_closing(line: &str, fence: char) -> bool {
    line.trim().chars().all(|c| c == fence)
}

/// Rewrite every fenced component block into its one-line form.
pub fn encode_blocks(source: &str) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fences = FenceTracker::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end_matches('\r');
        if fences.step(line) {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        }
        let Some(caps) = OPENING.captures(line) else {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        };
        let indent = caps[1].to_string();
        let closing = format!("{indent}:::");
        let close_at = lines[i + 1..]
            .iter()
            .position(|l| l.trim_end() == closing)
            .map(|offset| i + 1 + offset);

        match close_at {
            Some(end) => {
                let body: Vec<&str> = lines[i + 1..end]
                    .iter()
                    .map(|l| {
                        let l = l.trim_end_matches('\r');
                        l.strip_prefix(indent.as_str()).unwrap_or(l)
                    })
                    .collect();
                out.push(format!("{indent}{}", encoded_line(&caps[2], &body.join("\n"))));
                i = end + 1;
            }
            None => {
                out.push(lines[i].to_string());
                i += 1;
            }
        }
    }
    out.join("\n")
}

/// Expand every encoded line outside code fences back into the fenced form.
/// Lines whose payload does not decode are kept as they are.
pub fn decode_lines(text: &str) -> String {
    let mut fences = FenceTracker::default();
    text.split('\n')
        .map(|line| {
            if fences.step(line) {
                return line.to_string();
            }
            expand_line(line).unwrap_or_else(|| line.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expand encoded lines inside a literal taken from the tree (text, code,
/// HTML). Unlike [`decode_lines`] there are no fences to respect.
pub fn restore_literal(value: &str) -> Option<String> {
    if !value.contains(":::") {
        return None;
    }
    let mut changed = false;
    let restored = value
        .split('\n')
        .map(|line| match expand_line(line) {
            Some(expanded) => {
                changed = true;
                expanded
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    changed.then_some(restored)
}

fn expand_line(line: &str) -> Option<String> {
    let caps = ENCODED.captures(line)?;
    let body = decode_payload(&caps[3])?;
    Some(literal_block(&caps[1], &caps[2], &body))
}
