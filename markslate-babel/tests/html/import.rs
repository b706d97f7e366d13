use markslate_babel::slate::{BlockType, Leaf, Mark, Marks, Node};
use markslate_babel::{html_to_slate, slate_to_markdown, ShortcodeRegistry};

fn to_markdown(html: &str) -> String {
    slate_to_markdown(&html_to_slate(html), &ShortcodeRegistry::new())
}

fn block_types(html: &str) -> Vec<BlockType> {
    html_to_slate(html)
        .nodes
        .iter()
        .filter_map(|node| match node {
            Node::Block(block) => Some(block.kind),
            _ => None,
        })
        .collect()
}

#[test]
fn semantic_markup() {
    assert_eq!(
        to_markdown("<h2>Plan</h2><p>Do <em>this</em>, <strong>then</strong> <del>that</del>.</p>"),
        "## Plan\n\nDo _this_, **then** ~~that~~."
    );
}

#[test]
fn lists_and_quotes() {
    assert_eq!(
        to_markdown("<ol start=\"2\"><li>a</li><li>b</li></ol><blockquote><p>q</p></blockquote>"),
        "2. a\n3. b\n\n> q"
    );
}

#[test]
fn google_docs_wrapper_is_not_bold() {
    let html = r#"<b style="font-weight:normal;" id="docs-internal-guid-1"><p><span style="font-weight:700">Bold</span> plain</p></b>"#;
    assert_eq!(to_markdown(html), "**Bold** plain");
}

#[test]
fn styled_spans_become_marks() {
    let doc = html_to_slate(
        r#"<p><span style="font-style: italic; text-decoration: line-through">x</span></p>"#,
    );
    let leaves: Vec<Leaf> = doc.nodes[0].leaves().into_iter().cloned().collect();
    let expected: Marks = [Mark::Italic, Mark::Strikethrough].into_iter().collect();
    assert_eq!(leaves, vec![Leaf::new("x", expected)]);
}

#[test]
fn block_inside_inline_is_hoisted() {
    assert_eq!(
        block_types("<a href=\"http://x.org\">a<h1>b</h1>c</a>"),
        vec![BlockType::Paragraph, BlockType::HeadingOne, BlockType::Paragraph]
    );
}

#[test]
fn scripts_and_styles_are_dropped() {
    assert_eq!(
        to_markdown("<style>p { color: red }</style><p>kept</p><script>alert(1)</script>"),
        "kept"
    );
}

#[test]
fn emoji_images_become_text() {
    assert_eq!(
        to_markdown(r#"<p>ok <img class="emoji" alt="👍" src="thumbs.png"></p>"#),
        "ok 👍"
    );
}

#[test]
fn unsupported_elements_are_kept_as_html() {
    let doc = html_to_slate("<table><tr><td>a</td></tr></table>");
    assert_eq!(doc.nodes.len(), 1);
    let html_inlines: Vec<_> = doc.nodes[0]
        .children()
        .iter()
        .filter(|node| matches!(node, Node::Inline(inline) if inline.data_str("html").is_some()))
        .collect();
    assert_eq!(html_inlines.len(), 1);
}

#[test]
fn empty_paste_gives_empty_document() {
    assert!(html_to_slate("").nodes.is_empty());
    assert!(html_to_slate("<p> </p>").nodes.is_empty());
}
