//! HTML format implementation
//!
//! HTML is a secondary surface: it is written for previews and read when
//! content is pasted into the editor. It is never round-tripped.
//!
//! # Library Choice
//!
//! We use `html5ever` + `markup5ever_rcdom` for parsing: a browser-grade
//! HTML5 parser that recovers from malformed markup the way browsers do,
//! which matters for clipboard content. The parsed `RcDom` is copied into
//! the owned [`nodes::HtmlNode`] tree, which is also what the preview writer
//! serializes.
//!
//! # Pipelines
//!
//! Export: markdown → syntax tree → [`from_mdast`] → [`serializer`].
//! Components are rendered through their definition, raw HTML passes through.
//!
//! Import: [`parser`] → [`emoji`] → [`to_mdast`] →
//! `common::assert_parents` → `common::wrap_html` → rich document.
//!
//! # Element Mapping Table
//!
//! | HTML (import)                                   | Syntax tree      |
//! |-------------------------------------------------|------------------|
//! | `p`, `div`-like containers with inline content  | `paragraph`      |
//! | `h1`..`h6`                                      | `heading`        |
//! | `ul` / `ol` (`start`), `li`                     | `list`, `listItem` |
//! | `blockquote`                                    | `blockquote`     |
//! | `pre` (`language-*` class)                      | `code`           |
//! | `hr` / `br`                                     | `thematicBreak` / `break` |
//! | `em`, `i`, `span[font-style:italic]`            | `emphasis`       |
//! | `strong`, `b`, `span[font-weight:bold]`         | `strong`         |
//! | `del`, `s`, `strike`, `span[line-through]`      | `delete`         |
//! | `code`                                          | `inlineCode`     |
//! | `a[href]` / `img[src]`                          | `link` / `image` |
//! | `table`, `iframe`, `video`, `sup`, ...          | `html` (raw)     |
//! | `script`, `style`, `head`, ...                  | dropped          |

pub mod emoji;
pub mod from_mdast;
pub mod nodes;
pub mod parser;
pub mod serializer;
pub mod to_mdast;

pub use serializer::HtmlOptions;

use crate::common::{assert_parents::assert_parents, wrap_html::wrap_html};
use crate::error::FormatError;
use crate::format::Format;
use crate::mdast::Root;
use crate::shortcode::ShortcodeRegistry;
use crate::slate::{self, Document};
use std::collections::HashMap;
use tracing::trace;

/// Render a syntax tree as HTML.
pub fn mdast_to_html(root: &Root, shortcodes: &ShortcodeRegistry, options: &HtmlOptions) -> String {
    let nodes = from_mdast::mdast_to_html_nodes(root, shortcodes);
    serializer::serialize_nodes(&nodes, options)
}

/// Import HTML into a syntax tree with valid parent/child typing.
pub fn html_to_mdast(html: &str) -> Root {
    let mut nodes = parser::parse_html(html);
    emoji::replace_emoji(&mut nodes);
    let mut tree = to_mdast::html_nodes_to_mdast(&nodes);
    assert_parents(&mut tree);
    trace!(children = tree.children.len(), "imported html");
    tree
}

/// Import HTML into a rich document.
pub fn html_to_slate(html: &str) -> Document {
    let mut tree = html_to_mdast(html);
    wrap_html(&mut tree);
    slate::mdast_to_slate(&tree)
}

/// Format implementation for HTML
#[derive(Debug, Default)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML preview and clipboard import"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _shortcodes: &ShortcodeRegistry) -> Result<Document, FormatError> {
        Ok(html_to_slate(source))
    }

    fn serialize(&self, doc: &Document, shortcodes: &ShortcodeRegistry) -> Result<String, FormatError> {
        self.serialize_with_options(doc, shortcodes, &HashMap::new())
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        shortcodes: &ShortcodeRegistry,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let html_options = html_options(options)?;
        let tree = slate::slate_to_mdast(doc, shortcodes);
        Ok(mdast_to_html(&tree, shortcodes, &html_options))
    }
}

/// Read `standalone` and `title` from format options.
fn html_options(options: &HashMap<String, String>) -> Result<HtmlOptions, FormatError> {
    let mut html_options = HtmlOptions::default();
    for (key, value) in options {
        match key.as_str() {
            "standalone" => {
                html_options.standalone = value.parse().map_err(|_| {
                    FormatError::SerializationError(format!(
                        "Invalid value '{value}' for 'standalone', expected true or false"
                    ))
                })?;
            }
            "title" => html_options.title = Some(value.clone()),
            other => {
                return Err(FormatError::NotSupported(format!(
                    "Format 'html' does not support the '{other}' option"
                )))
            }
        }
    }
    Ok(html_options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slate::{BlockType, Mark, Node};

    #[test]
    fn pasted_html_becomes_valid_document() {
        let doc = html_to_slate("<b>a<ul><li>b</li></ul></b><table><tr><td>c</td></tr></table>");
        let kinds: Vec<BlockType> = doc
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::Block(block) => Some(block.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![BlockType::Paragraph, BlockType::BulletedList, BlockType::Paragraph]
        );
        let first = doc.nodes[0].leaves();
        assert!(first[0].marks.contains(&Mark::Bold));
    }

    #[test]
    fn standalone_option() {
        let doc = html_to_slate("<p>x</p>");
        let shortcodes = ShortcodeRegistry::new();
        let mut options = HashMap::new();
        options.insert("standalone".to_string(), "true".to_string());
        let html = HtmlFormat
            .serialize_with_options(&doc, &shortcodes, &options)
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>x</p>"));

        options.insert("standalone".to_string(), "yes".to_string());
        assert!(HtmlFormat
            .serialize_with_options(&doc, &shortcodes, &options)
            .is_err());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let mut options = HashMap::new();
        options.insert("theme".to_string(), "dark".to_string());
        assert!(matches!(
            html_options(&options),
            Err(FormatError::NotSupported(_))
        ));
    }
}
