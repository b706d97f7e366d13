//! Markdown format tests
//!
//! Markdown → rich document → markdown conversions, checked on the text.

mod properties;
mod round_trip;
mod shortcodes;
mod whitespace;
