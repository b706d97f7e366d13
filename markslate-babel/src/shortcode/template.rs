//! Data-driven shortcode definitions

use super::{yaml_body, Shortcode, ShortcodeData, ShortcodeKind};
use crate::formats::html::serializer::escape_attr;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("valid placeholder regex"));

/// A shortcode defined by a name, a kind and an HTML template.
///
/// Block bodies are YAML mappings and become JSON objects; an empty body is an
/// empty object. Inline arguments are kept whole as `{"text": args}`. The
/// template replaces `{{key}}` with the HTML-escaped value of `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateShortcode {
    name: String,
    kind: ShortcodeKind,
    template: String,
}

impl TemplateShortcode {
    pub fn new(name: impl Into<String>, kind: ShortcodeKind, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            template: template.into(),
        }
    }

    pub fn block(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::new(name, ShortcodeKind::Block, template)
    }

    pub fn inline(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::new(name, ShortcodeKind::Inline, template)
    }
}

impl Shortcode for TemplateShortcode {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ShortcodeKind {
        self.kind
    }

    fn parse_args(&self, args: &str) -> Option<ShortcodeData> {
        match self.kind {
            ShortcodeKind::Inline => {
                let mut map = Map::new();
                map.insert("text".to_string(), Value::String(args.to_string()));
                Some(Value::Object(map))
            }
            ShortcodeKind::Block => {
                if args.trim().is_empty() {
                    return Some(Value::Object(Map::new()));
                }
                match serde_yaml::from_str::<Value>(args) {
                    Ok(Value::Object(map)) => Some(Value::Object(map)),
                    Ok(Value::Null) => Some(Value::Object(Map::new())),
                    _ => None,
                }
            }
        }
    }

    fn serialize_args(&self, data: &ShortcodeData) -> String {
        match self.kind {
            ShortcodeKind::Inline => data
                .get("text")
                .map(value_text)
                .unwrap_or_default(),
            ShortcodeKind::Block => yaml_body(data),
        }
    }

    fn render(&self, data: &ShortcodeData) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| {
                data.pointer(&format!("/{}", caps[1].replace('.', "/")))
                    .map(|v| escape_attr(&value_text(v)))
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
