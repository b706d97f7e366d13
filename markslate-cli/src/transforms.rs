//! CLI-specific transforms
//!
//! This module defines the views available through `markslate inspect`. Each one shows the
//! markdown input at a different stage of the pipeline:
//!
//! - `mdast`: the normalized markdown syntax tree, as JSON
//! - `slate`: the rich document an editor would receive, as JSON
//! - `html`: the preview fragment
//!
//! Components are resolved against the registry built from configuration, so the output is
//! what an application with the same `[[shortcodes]]` would see.

use markslate_babel::formats::html::{mdast_to_html, HtmlOptions};
use markslate_babel::{markdown_to_mdast, slate, ShortcodeRegistry};

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["mdast", "slate", "html"];

pub const DEFAULT_TRANSFORM: &str = "mdast";

/// Execute a named transform on markdown source.
///
/// # Examples
///
/// ```ignore
/// let registry = ShortcodeRegistry::new();
/// let output = execute_transform("# Title", "slate", &registry, &HtmlOptions::default())?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    shortcodes: &ShortcodeRegistry,
    html_options: &HtmlOptions,
) -> Result<String, String> {
    let tree = markdown_to_mdast(source, shortcodes);

    match transform_name {
        "mdast" => serde_json::to_string_pretty(&tree)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "slate" => slate::mdast_to_slate(&tree)
            .to_json_pretty()
            .map_err(|e| e.to_string()),
        "html" => Ok(mdast_to_html(&tree, shortcodes, html_options)),
        other => Err(format!(
            "Unknown transform '{other}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}
