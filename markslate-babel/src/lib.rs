//! Markdown, syntax tree, rich-document and HTML interoperability
//!
//!     This crate converts between markdown text, a markdown syntax tree (mdast), the rich
//!     document an editor works on (slate) and HTML. Markdown is the storage format, the rich
//!     document is the editing format, HTML is written for previews and read from the clipboard.
//!
//!     TLDR: For format authors:
//!         - Markdown parsing is delegated to comrak, HTML parsing to html5ever. We never write a
//!           tokenizer here, only adapters from the library's tree to the syntax tree.
//!         - Every conversion goes through the syntax tree (./mdast), with the shared passes in
//!           ./common applied on the way.
//!         - Components (shortcodes) are resolved through a ShortcodeRegistry passed to every call,
//!           never through global state.
//!
//! Architecture
//!
//!     The syntax tree is the hub. Markdown parses into it and is serialized from it, the rich
//!     document is converted to and from it (./slate), HTML is written from it and read into it
//!     (./formats/html). Normalizations that more than one direction needs live in ./common as
//!     plain tree rewrites, so each one can be tested in isolation.
//!
//!     This is a pure lib, that is, it powers markslate-cli but is shell agnostic: no code here
//!     should suppose a shell environment, be it std print, env vars etc.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── shortcode               # Component definitions and their registry
//!     ├── mdast                   # Markdown syntax tree
//!     ├── slate                   # Rich document and its syntax tree conversions
//!     ├── common                  # Shared tree rewrites
//!     └── formats
//!         ├── markdown            # parser.rs, serializer.rs, component payloads
//!         ├── html                # parser.rs, serializer.rs, to/from syntax tree
//!         └── json                # Rich document as JSON
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so they are included
//!     from tests/lib.rs.
//!
//! Round Trips
//!
//!     markdown → slate → markdown is expected to be stable: converting the output again yields
//!     the same text. The first pass may normalize (list markers, emphasis delimiters, escapes),
//!     later passes must not change anything. HTML is one-way in both directions.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod mdast;
pub mod registry;
pub mod shortcode;
pub mod slate;

pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;
pub use shortcode::{Shortcode, ShortcodeKind, ShortcodeRegistry, TemplateShortcode};

use formats::html::HtmlOptions;

/// Parses markdown into the syntax tree, resolving registered components.
pub fn markdown_to_mdast(source: &str, shortcodes: &ShortcodeRegistry) -> mdast::Root {
    formats::markdown::parser::parse_to_mdast(source, shortcodes)
}

/// Serializes a syntax tree to markdown. A missing tree yields an empty string.
pub fn mdast_to_markdown(root: Option<&mdast::Root>, shortcodes: &ShortcodeRegistry) -> String {
    formats::markdown::serializer::serialize_mdast(root, shortcodes)
}

pub fn markdown_to_slate(source: &str, shortcodes: &ShortcodeRegistry) -> slate::Document {
    slate::mdast_to_slate(&markdown_to_mdast(source, shortcodes))
}

pub fn slate_to_markdown(doc: &slate::Document, shortcodes: &ShortcodeRegistry) -> String {
    let tree = slate::slate_to_mdast(doc, shortcodes);
    mdast_to_markdown(Some(&tree), shortcodes)
}

/// Renders markdown as an HTML fragment.
pub fn markdown_to_html(source: &str, shortcodes: &ShortcodeRegistry) -> String {
    let tree = markdown_to_mdast(source, shortcodes);
    formats::html::mdast_to_html(&tree, shortcodes, &HtmlOptions::default())
}

/// Imports HTML (typically clipboard content) into a rich document.
pub fn html_to_slate(html: &str) -> slate::Document {
    formats::html::html_to_slate(html)
}
