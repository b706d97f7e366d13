//! Whitespace at mark boundaries is emitted outside the delimiters.

use markslate_babel::slate::{BlockType, Document, Leaf, Mark, Marks, Node, Text};
use markslate_babel::{slate_to_markdown, ShortcodeRegistry};

fn marks(list: &[Mark]) -> Marks {
    list.iter().copied().collect()
}

fn render(leaves: Vec<Leaf>) -> String {
    let doc = Document::new(vec![Node::block(
        BlockType::Paragraph,
        vec![Node::Text(Text::new(leaves))],
    )]);
    slate_to_markdown(&doc, &ShortcodeRegistry::new())
}

#[test]
fn trailing_space_moves_after_the_closing_delimiter() {
    let md = render(vec![
        Leaf::new("foo ", marks(&[Mark::Bold])),
        Leaf::new("bar", Marks::new()),
    ]);
    assert_eq!(md, "**foo** bar");
}

#[test]
fn leading_space_moves_before_the_opening_delimiter() {
    let md = render(vec![
        Leaf::new("foo", Marks::new()),
        Leaf::new(" bar", marks(&[Mark::Bold])),
    ]);
    assert_eq!(md, "foo **bar**");
}

#[test]
fn whitespace_only_mark_is_dropped() {
    let md = render(vec![
        Leaf::new("a", Marks::new()),
        Leaf::new(" ", marks(&[Mark::Italic])),
        Leaf::new("b", Marks::new()),
    ]);
    assert_eq!(md, "a b");
}

#[test]
fn overlapping_marks_share_one_wrapper_chain() {
    let md = render(vec![
        Leaf::new("a ", marks(&[Mark::Bold])),
        Leaf::new("b", marks(&[Mark::Bold, Mark::Strikethrough])),
        Leaf::new("c", marks(&[Mark::Bold, Mark::Strikethrough])),
    ]);
    assert_eq!(md, "**a** ~~**bc**~~");
}

#[test]
fn punctuation_between_words_stays_outside_the_delimiters() {
    let md = render(vec![
        Leaf::new("x", Marks::new()),
        Leaf::new("(a)", marks(&[Mark::Bold])),
        Leaf::new("y", Marks::new()),
    ]);
    assert_eq!(md, "x(**a**)y");

    let doc = markslate_babel::markdown_to_slate(&md, &ShortcodeRegistry::new());
    assert_eq!(
        doc.nodes[0].leaves().into_iter().cloned().collect::<Vec<_>>(),
        vec![
            Leaf::new("x(", Marks::new()),
            Leaf::new("a", marks(&[Mark::Bold])),
            Leaf::new(")y", Marks::new()),
        ]
    );
}
