//! Tree rewrites shared by the conversion pipelines.
//!
//! Every pass takes a syntax tree by `&mut` and is total. The markdown parser
//! runs `merge_html`, `squash_references`, `images_to_text` and `shortcodes`
//! in that order; the serializer runs `escape_markdown` and
//! `strip_trailing_breaks`; HTML import runs `assert_parents` and `wrap_html`.

pub mod assert_parents;
pub mod escape_markdown;
pub mod images_to_text;
pub mod merge_html;
pub mod shortcodes;
pub mod squash_references;
pub mod strip_trailing_breaks;
pub mod wrap_html;
