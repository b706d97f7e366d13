//! Orphan image demotion
//!
//! An image standing alone in a top-level paragraph has no surrounding
//! context the rich document could attach it to. It is replaced by a text node
//! holding its own markdown, `![alt](url "title")`, so the alt text stays
//! visible and nothing is lost when the document is written back.

use crate::formats::markdown::serializer::{link_destination, link_title};
use crate::mdast::{Image, Node, Root};
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^!\[((?:[^\]\\]|\\.)*)\]\((<[^>\n]*>|[^\s()<>]*)(?: "((?:[^"\\]|\\.)*)")?\)$"#)
        .expect("valid image literal regex")
});

pub fn images_to_text(root: &mut Root) {
    for child in root.children.iter_mut() {
        if let Node::Paragraph(paragraph) = child {
            if let [Node::Image(image)] = paragraph.children.as_slice() {
                let literal = image_literal(image);
                paragraph.children = vec![Node::text(literal)];
            }
        }
    }
}

/// Markdown source of an image.
pub fn image_literal(image: &Image) -> String {
    let alt = image.alt.replace('\\', "\\\\").replace(']', "\\]");
    format!(
        "![{alt}]({}{})",
        link_destination(&image.url),
        link_title(image.title.as_deref())
    )
}

/// Recognise text produced by [`image_literal`].
pub fn parse_image_literal(text: &str) -> Option<Image> {
    let caps = IMAGE_LITERAL.captures(text)?;
    let url = &caps[2];
    let url = url
        .strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url);
    Some(Image {
        url: unescape(url),
        title: caps.get(3).map(|t| unescape(t.as_str())),
        alt: unescape(&caps[1]),
    })
}

/// Whether a paragraph consists of a demoted image only.
pub fn is_image_paragraph(children: &[Node]) -> bool {
    matches!(children, [Node::Text(t)] if IMAGE_LITERAL.is_match(&t.value))
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}
