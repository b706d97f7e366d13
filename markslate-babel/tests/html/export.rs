use crate::common::components;
use insta::assert_snapshot;
use markslate_babel::{markdown_to_html, ShortcodeRegistry};

#[test]
fn document_preview() {
    let html = markdown_to_html(
        "# Title\n\nSome *text* and [a link](http://x.org \"T\").\n\n- one\n- two\n\n```js\nlet a = 1 < 2;\n```",
        &ShortcodeRegistry::new(),
    );
    assert_snapshot!(html, @r#"
    <h1>Title</h1>
    <p>Some <em>text</em> and <a href="http://x.org" title="T">a link</a>.</p>
    <ul>
    <li>one</li>
    <li>two</li>
    </ul>
    <pre><code class="language-js">let a = 1 &lt; 2;
    </code></pre>
    "#);
}

#[test]
fn components_render_through_their_definition() {
    let html = markdown_to_html(
        ":::note\ntitle: Mind <this>\n:::\n\npress :kbd[Esc]",
        &components(),
    );
    assert_eq!(
        html,
        "<aside class=\"note\"><b>Mind &lt;this&gt;</b></aside><p>press <kbd>Esc</kbd></p>"
    );
}

#[test]
fn unknown_component_renders_as_text() {
    let html = markdown_to_html(":::note\ntitle: Hi\n:::", &ShortcodeRegistry::new());
    assert_eq!(html, "<p>:::note\ntitle: Hi\n:::</p>");
}

#[test]
fn raw_html_passes_through() {
    let html = markdown_to_html("a <span class=\"x\">**b**</span>", &ShortcodeRegistry::new());
    assert_eq!(html, "<p>a <span class=\"x\">**b**</span></p>");
}
