//! Markdown syntax tree
//!
//! The tree every other representation is converted through. Markdown text
//! parses into it (see `formats::markdown::parser`), the rich document and the
//! HTML tree are converted to and from it.

pub mod nodes;

pub use nodes::*;
