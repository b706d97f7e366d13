//! Markdown format implementation
//!
//! Bidirectional conversion between CommonMark (plus GFM strikethrough and
//! shortcodes) and the rich document, by way of the mdast-style syntax tree.
//!
//! # Library Choice
//!
//! We use the `comrak` crate for parsing. Its tokenizer is configured by
//! [`guard::TokenizerGuard`] so that bare URLs stay text and entity
//! references are not decoded. Serialization is our own: a small stringifier
//! with one fixed style, because the rich document's text must come back
//! out exactly as the escape pass prepared it.
//!
//! # Element Mapping Table
//!
//! | Markdown                | Syntax tree      | Rich document                         |
//! |-------------------------|------------------|---------------------------------------|
//! | Paragraph               | `paragraph`      | `paragraph` block                     |
//! | `#`..`######` heading   | `heading`        | `heading-one`..`heading-six` block    |
//! | `-` / `1.` list         | `list`           | `bulleted-list` / `numbered-list`     |
//! | `>` quote               | `blockquote`     | `quote` block                         |
//! | Fenced code             | `code`           | `code-block` block (`data.lang`)      |
//! | `---`                   | `thematicBreak`  | `thematic-break` void block           |
//! | Block HTML              | `html`           | `html` void block (`data.html`)       |
//! | `:::name` ... `:::`     | `componentBlock` | `component` void block                |
//! | `_em_` `**strong**` `~~del~~` | marks      | `italic` / `bold` / `strikethrough`   |
//! | `` `code` ``            | `inlineCode`     | `code` mark                           |
//! | `[text](url "title")`   | `link`           | `link` inline                         |
//! | `![alt](url)`           | `image`          | `image` void inline                   |
//! | `\` line break          | `break`          | `break` void inline                   |
//! | Inline HTML             | `html`           | `html` void inline                    |
//! | `:name[args]`           | `componentInline`| `component` void inline               |
//!
//! # Lossy Conversions
//!
//! - Reference links and definitions are resolved into inline links.
//! - A standalone image is kept as its literal source text.
//! - Setext headings, `*` bullets, indented code and `*emphasis*` come back
//!   in the fixed style.

pub mod component_blocks;
pub mod guard;
pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::shortcode::ShortcodeRegistry;
use crate::slate::{self, Document};

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with shortcodes"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, shortcodes: &ShortcodeRegistry) -> Result<Document, FormatError> {
        let tree = parser::parse_to_mdast(source, shortcodes);
        Ok(slate::mdast_to_slate(&tree))
    }

    fn serialize(&self, doc: &Document, shortcodes: &ShortcodeRegistry) -> Result<String, FormatError> {
        let tree = slate::slate_to_mdast(doc, shortcodes);
        Ok(serializer::serialize_mdast(Some(&tree), shortcodes))
    }
}
