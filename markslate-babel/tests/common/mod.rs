//! Shared helpers for the integration tests.

use markslate_babel::{
    markdown_to_slate, slate_to_markdown, ShortcodeRegistry, TemplateShortcode,
};

/// markdown → rich document → markdown
pub fn cycle(markdown: &str, shortcodes: &ShortcodeRegistry) -> String {
    slate_to_markdown(&markdown_to_slate(markdown, shortcodes), shortcodes)
}

/// A registry with one block and one inline component.
pub fn components() -> ShortcodeRegistry {
    ShortcodeRegistry::new()
        .with(TemplateShortcode::block(
            "note",
            r#"<aside class="note"><b>{{title}}</b></aside>"#,
        ))
        .with(TemplateShortcode::inline("kbd", "<kbd>{{text}}</kbd>"))
}

#[test]
fn cycle_of_empty_input_is_empty() {
    assert_eq!(cycle("", &ShortcodeRegistry::new()), "");
}
