//! HTML serialization (HTML tree → HTML text)
//!
//! Text and attribute values are escaped; entity references already present
//! in text are kept, since markdown text carries them literally. Raw nodes are
//! written as they are. Block elements end with a newline to keep the output
//! readable.

use super::nodes::{is_block, is_void, HtmlNode};
use once_cell::sync::Lazy;
use regex::Regex;

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("valid entity regex")
});

/// Options for HTML serialization
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Wrap the fragment in a complete document
    pub standalone: bool,
    /// Document title, used when standalone
    pub title: Option<String>,
}

pub fn serialize_nodes(nodes: &[HtmlNode], options: &HtmlOptions) -> String {
    let mut body = String::new();
    for node in nodes {
        write_node(node, &mut body);
    }
    let body = body.trim_end();
    if options.standalone {
        wrap_in_document(body, options.title.as_deref().unwrap_or(""))
    } else {
        body.to_string()
    }
}

/// Source text of a single node.
pub fn outer_html(node: &HtmlNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out.trim_end().to_string()
}

fn write_node(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text(text) => out.push_str(&escape_text(text)),
        HtmlNode::Raw(raw) => out.push_str(raw),
        HtmlNode::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        HtmlNode::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if is_void(&element.tag) {
                if is_block(&element.tag) {
                    out.push('\n');
                }
                return;
            }
            if matches!(element.tag.as_str(), "ul" | "ol" | "blockquote") {
                out.push('\n');
            }
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
            if is_block(&element.tag) {
                out.push('\n');
            }
        }
    }
}

fn escape(s: &str, quotes: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (index, c) in s.char_indices() {
        match c {
            '&' if !ENTITY.is_match(&s[index..]) => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    escape(s, false)
}

/// Escape an attribute value (double-quoted).
pub fn escape_attr(s: &str) -> String {
    escape(s, true)
}

/// Wrap the content in a complete HTML document
fn wrap_in_document(body_html: &str, title: &str) -> String {
    let escaped_title = escape_text(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="markslate">
  <title>{escaped_title}</title>
</head>
<body>
{body_html}
</body>
</html>"#
    )
}
