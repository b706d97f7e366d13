//! Rich document JSON format
//!
//! The editor stores documents as JSON; this format reads and writes that
//! representation as it is, so documents can be converted from and to files.

use crate::error::FormatError;
use crate::format::Format;
use crate::shortcode::ShortcodeRegistry;
use crate::slate::Document;

/// Format implementation for rich document JSON
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Rich document JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _shortcodes: &ShortcodeRegistry) -> Result<Document, FormatError> {
        Document::from_json(source)
    }

    fn serialize(&self, doc: &Document, _shortcodes: &ShortcodeRegistry) -> Result<String, FormatError> {
        doc.to_json_pretty()
    }
}
