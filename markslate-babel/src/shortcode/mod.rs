//! Shortcode plugin interface
//!
//! Shortcodes are custom components embedded in markdown. Block shortcodes use
//! the fenced form
//!
//!     :::name
//!     <body>
//!     :::
//!
//! and inline shortcodes the form `:name[args]`. The pipeline never knows what
//! a component means: every stage asks a [`ShortcodeRegistry`] for the
//! definition registered under the exact (case-sensitive) tag name and
//! delegates parsing, serialization and rendering to it. A tag with no
//! definition is not an error, the syntax is simply left as literal text.
//!
//! The registry is built once by the application and then shared read-only,
//! so conversions holding `&ShortcodeRegistry` can run from several threads.

mod template;

pub use template::TemplateShortcode;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Structured arguments of a component, as produced by [`Shortcode::parse_args`].
pub type ShortcodeData = Value;

/// Where a shortcode may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcodeKind {
    /// Stands alone as a block (`:::name` ... `:::`)
    Block,
    /// Appears inside running text (`:name[args]`)
    Inline,
}

/// A component definition supplied by the embedding application.
pub trait Shortcode: Send + Sync {
    /// Tag name, matched exactly.
    fn name(&self) -> &str;

    fn kind(&self) -> ShortcodeKind;

    /// Map the raw argument text (block body or inline `[args]`) to structured
    /// data. `None` means the text is not a valid invocation and the syntax
    /// stays literal.
    fn parse_args(&self, args: &str) -> Option<ShortcodeData>;

    /// Inverse of [`Shortcode::parse_args`].
    fn serialize_args(&self, data: &ShortcodeData) -> String;

    /// HTML fragment used for previews.
    fn render(&self, data: &ShortcodeData) -> String;
}

/// Lookup table from tag name to definition.
#[derive(Default)]
pub struct ShortcodeRegistry {
    shortcodes: HashMap<String, Box<dyn Shortcode>>,
}

impl ShortcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same name.
    pub fn register<S: Shortcode + 'static>(&mut self, shortcode: S) {
        self.shortcodes
            .insert(shortcode.name().to_string(), Box::new(shortcode));
    }

    /// Builder-style [`ShortcodeRegistry::register`].
    pub fn with<S: Shortcode + 'static>(mut self, shortcode: S) -> Self {
        self.register(shortcode);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Shortcode> {
        self.shortcodes.get(name).map(|s| s.as_ref())
    }

    /// A definition registered under `name` that is also of the given kind.
    pub fn lookup(&self, name: &str, kind: ShortcodeKind) -> Option<&dyn Shortcode> {
        self.get(name).filter(|s| s.kind() == kind)
    }

    pub fn has(&self, name: &str) -> bool {
        self.shortcodes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.shortcodes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.shortcodes.is_empty()
    }
}

impl std::fmt::Debug for ShortcodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcodeRegistry")
            .field("shortcodes", &self.list())
            .finish()
    }
}

/// YAML text for component data, used when no definition is available to
/// serialize it. Empty objects and null produce an empty body.
pub fn yaml_body(data: &ShortcodeData) -> String {
    match data {
        Value::Null => String::new(),
        Value::Object(map) if map.is_empty() => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// One-line argument text for inline component data with no definition.
/// A lone `text` string is written as is, anything else as compact JSON.
pub fn inline_args(data: &ShortcodeData) -> String {
    match data {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(map) if map.is_empty() => String::new(),
        Value::Object(map) if map.len() == 1 => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => data.to_string(),
        },
        other => other.to_string(),
    }
}
