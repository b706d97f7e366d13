//! Tokenizer guard
//!
//! Two behaviours of a stock CommonMark/GFM parser are wrong for documents
//! edited in a rich-text editor and written back out:
//!
//! - bare URLs (`www.example.com`, `https://...`) are turned into links, which
//!   the serializer would then write as `[..](..)`;
//! - entity references (`&lt;`, `&#123;`) are decoded to characters, so
//!   `&lt;div&gt;` would come back as a raw `<div>`.
//!
//! The guard switches the first off through comrak's options and hides the
//! second from the parser: the `&` of every entity reference is swapped for a
//! private-use sentinel before parsing and swapped back in every literal of
//! the resulting tree.
//!
//! It also splits touching strikethrough runs. GFM only pairs `~` runs of
//! equal length, so in `~~b~~~~c~~` the middle `~~~~` neither closes nor
//! opens and the whole span stays literal. A private-use joiner between the
//! two halves (`~~b~~<joiner>~~c~~`) yields two sibling strikethroughs; the
//! joiner is removed again when literals are restored.

use comrak::ComrakOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

const SENTINEL: char = '\u{E000}';
const JOINER: char = '\u{E002}';

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("valid entity regex")
});

/// `~~x~~~~y~~` with no whitespace just inside either pair.
static TOUCHING_STRIKES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(~~[^~\s](?:[^~\n]*[^~\s])?)~~~~([^~\s](?:[^~\n]*[^~\s])?~~)")
        .expect("valid strikethrough regex")
});

/// Built-in scanning rules the guard can switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerRule {
    /// GFM extended autolinks (bare URLs and `www.` hosts)
    BareUrlAutolink,
    /// Decoding of `&name;` / `&#n;` references into characters
    EntityDecoding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerGuard {
    disabled: Vec<ScannerRule>,
}

impl Default for TokenizerGuard {
    /// Both rules disabled.
    fn default() -> Self {
        Self {
            disabled: vec![ScannerRule::BareUrlAutolink, ScannerRule::EntityDecoding],
        }
    }
}

impl TokenizerGuard {
    /// A guard that leaves every rule enabled.
    #[cfg(test)]
    pub fn permissive() -> Self {
        Self {
            disabled: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn disable(mut self, rule: ScannerRule) -> Self {
        if !self.disabled.contains(&rule) {
            self.disabled.push(rule);
        }
        self
    }

    pub fn is_disabled(&self, rule: ScannerRule) -> bool {
        self.disabled.contains(&rule)
    }

    /// Parser options: CommonMark with GFM strikethrough.
    pub fn options(&self) -> ComrakOptions<'static> {
        let mut options = ComrakOptions::default();
        options.extension.strikethrough = true;
        options.extension.autolink = !self.is_disabled(ScannerRule::BareUrlAutolink);
        options.parse.smart = false;
        options
    }

    /// Hide entity references from the parser and split touching
    /// strikethrough runs.
    ///
    /// Each step is skipped when the source already contains its private-use
    /// character, since restoring would rewrite or delete it.
    pub fn protect<'a>(&self, source: &'a str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(source);
        if self.is_disabled(ScannerRule::EntityDecoding) && !source.contains(SENTINEL) {
            text = ENTITY.replace_all(source, |caps: &regex::Captures| {
                format!("{SENTINEL}{}", &caps[0][1..])
            });
        }
        if !source.contains(JOINER) {
            // chains like `~~a~~~~b~~~~c~~` need one pass per joint
            loop {
                let split = match TOUCHING_STRIKES.replace_all(&text, "${1}~~\u{E002}~~${2}") {
                    Cow::Owned(split) => split,
                    Cow::Borrowed(_) => break,
                };
                text = Cow::Owned(split);
            }
        }
        text
    }

    /// Undo [`TokenizerGuard::protect`] in a literal taken from the tree.
    pub fn restore(&self, value: &str) -> String {
        if value.contains(SENTINEL) || value.contains(JOINER) {
            value.replace(SENTINEL, "&").replace(JOINER, "")
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protects_and_restores_entities() {
        let guard = TokenizerGuard::default();
        let protected = guard.protect("a &lt;b&gt; &#123; &#x1F; & c &amp");
        assert!(!protected.contains("&lt;"));
        assert!(protected.contains("& c &amp"));
        assert_eq!(guard.restore(&protected), "a &lt;b&gt; &#123; &#x1F; & c &amp");
    }

    #[test]
    fn permissive_guard_changes_nothing() {
        let guard = TokenizerGuard::permissive();
        assert_eq!(guard.protect("&lt;"), "&lt;");
        assert!(!guard.is_disabled(ScannerRule::EntityDecoding));
    }

    #[test]
    fn autolink_follows_rule() {
        assert!(!TokenizerGuard::default().options().extension.autolink);
        assert!(TokenizerGuard::permissive().options().extension.autolink);
        assert!(TokenizerGuard::default().options().extension.strikethrough);
    }

    #[test]
    fn splits_touching_strikethrough_runs() {
        let guard = TokenizerGuard::default();
        let protected = guard.protect("**a ~~b~~~~c~~**");
        assert_eq!(protected, "**a ~~b~~\u{E002}~~c~~**");
        assert_eq!(guard.restore(&protected), "**a ~~b~~~~c~~**");

        let chain = guard.protect("~~a~~~~b~~~~c~~");
        assert_eq!(chain, "~~a~~\u{E002}~~b~~\u{E002}~~c~~");
    }

    #[test]
    fn lone_tilde_runs_are_left_alone() {
        let guard = TokenizerGuard::default();
        assert_eq!(guard.protect("a~~~~b"), "a~~~~b");
        assert_eq!(guard.protect("~~ a~~~~b~~"), "~~ a~~~~b~~");
    }

    #[test]
    fn sentinel_in_source_disables_protection() {
        let guard = TokenizerGuard::default();
        let source = "\u{E000} &lt;";
        assert_eq!(guard.protect(source), source);
    }
}
