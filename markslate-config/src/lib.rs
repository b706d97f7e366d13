//! Shared configuration loader for the markslate toolchain.
//!
//! `defaults/markslate.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MarkslateConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use markslate_babel::shortcode::{ShortcodeKind, ShortcodeRegistry, TemplateShortcode};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/markslate.default.toml");

/// Top-level configuration consumed by markslate applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkslateConfig {
    pub logging: LoggingConfig,
    pub convert: ConvertConfig,
    #[serde(default)]
    pub shortcodes: Vec<ShortcodeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` filter directive, e.g. `warn` or `markslate_babel=debug`.
    pub level: String,
}

/// Format-specific conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub standalone: bool,
}

/// A component declared in configuration rather than in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShortcodeConfig {
    pub name: String,
    pub kind: ShortcodeKind,
    pub template: String,
}

impl MarkslateConfig {
    /// Build the component registry from the `[[shortcodes]]` entries.
    /// Later entries replace earlier ones with the same name.
    pub fn registry(&self) -> ShortcodeRegistry {
        let mut registry = ShortcodeRegistry::new();
        for shortcode in &self.shortcodes {
            registry.register(TemplateShortcode::new(
                shortcode.name.clone(),
                shortcode.kind,
                shortcode.template.clone(),
            ));
        }
        registry
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer configuration text, e.g. a string embedded by a host application.
    pub fn with_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MarkslateConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarkslateConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use markslate_babel::slate_to_markdown;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.logging.level, "warn");
        assert!(!config.convert.html.standalone);
        assert!(config.shortcodes.is_empty());
        assert!(config.registry().is_empty());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.html.standalone", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.convert.html.standalone);
    }

    #[test]
    fn shortcodes_build_a_registry() {
        let config = Loader::new()
            .with_str(
                r#"
[[shortcodes]]
name = "note"
kind = "block"
template = "<aside>{{title}}</aside>"

[[shortcodes]]
name = "kbd"
kind = "inline"
template = "<kbd>{{text}}</kbd>"
"#,
            )
            .build()
            .expect("config to build");

        assert_eq!(config.shortcodes.len(), 2);
        assert_eq!(config.shortcodes[1].kind, ShortcodeKind::Inline);

        let registry = config.registry();
        assert_eq!(registry.list(), vec!["kbd", "note"]);
        assert_eq!(
            registry.get("note").map(|s| s.kind()),
            Some(ShortcodeKind::Block)
        );

        let doc = markslate_babel::markdown_to_slate(":::note\ntitle: Hi\n:::", &registry);
        assert_eq!(slate_to_markdown(&doc, &registry), ":::note\ntitle: Hi\n:::");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/nonexistent/markslate.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/markslate.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.logging.level, "warn");
    }
}
