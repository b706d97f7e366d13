//! Canonical markdown survives the rich-document cycle unchanged.

use crate::common::cycle;
use insta::assert_snapshot;
use markslate_babel::ShortcodeRegistry;

fn assert_stable(markdown: &str) {
    assert_eq!(cycle(markdown, &ShortcodeRegistry::new()), markdown);
}

#[test]
fn inline_code_with_escaped_tag() {
    assert_stable("`&lt;div&gt;`");
}

#[test]
fn raw_code_element_with_entities() {
    assert_stable("x <code>&lt;div&gt;</code> y");
}

#[test]
fn link_inside_strong() {
    assert_stable("**a[b](c)d**");
}

#[test]
fn code_inside_emphasis() {
    assert_stable("_`a`_");
    assert_stable("_`a`b_");
}

#[test]
fn inline_image() {
    assert_stable("a ![b](c)");
}

#[test]
fn html_with_markup_characters() {
    assert_stable("<span>*</span>");
}

#[test]
fn interrupted_strong() {
    assert_stable("**a**b**c**");
}

#[test]
fn entities_in_text() {
    assert_stable("a &lt;b&gt; &amp; c");
}

#[test]
fn standalone_image_is_kept() {
    assert_stable("![alt text](pic.png \"Title\")");
}

#[test]
fn blocks() {
    assert_stable(
        "# Title\n\nSome _text_ with `code`.\n\n> quoted\n\n- one\n- two\n\n1. first\n2. second\n\n---\n\n```rust\nfn main() {}\n```",
    );
}

#[test]
fn nested_mark_is_split_per_segment() {
    let md = cycle("**a _b_ c**", &ShortcodeRegistry::new());
    assert_snapshot!(md, @"**a** _**b**_ **c**");
}

#[test]
fn emphasis_is_normalized() {
    let md = cycle("# *Title*\n\n*a* __b__", &ShortcodeRegistry::new());
    assert_snapshot!(md, @r"
    # _Title_

    _a_ **b**
    ");
}

#[test]
fn single_tilde_strikethrough_is_normalized() {
    let md = cycle("H~2~O", &ShortcodeRegistry::new());
    assert_snapshot!(md, @"H~~2~~O");
}
