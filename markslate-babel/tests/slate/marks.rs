use markslate_babel::slate::{self, Leaf, Mark, Marks};
use markslate_babel::{markdown_to_slate, mdast_to_markdown, slate_to_markdown, ShortcodeRegistry};

fn marks(list: &[Mark]) -> Marks {
    list.iter().copied().collect()
}

fn leaves(doc: &slate::Document) -> Vec<Leaf> {
    doc.nodes[0].leaves().into_iter().cloned().collect()
}

#[test]
fn adjacent_equal_marks_merge_into_one_leaf() {
    let doc = markdown_to_slate("**a ~~b~~~~c~~**", &ShortcodeRegistry::new());
    assert_eq!(
        leaves(&doc),
        vec![
            Leaf::new("a ", marks(&[Mark::Bold])),
            Leaf::new("bc", marks(&[Mark::Bold, Mark::Strikethrough])),
        ]
    );
}

#[test]
fn merged_marks_serialize_with_one_wrapper() {
    let registry = ShortcodeRegistry::new();
    let doc = markdown_to_slate("**a ~~b~~~~c~~**", &registry);
    assert_eq!(slate_to_markdown(&doc, &registry), "**a** ~~**bc**~~");
}

#[test]
fn missing_tree_serializes_to_empty_string() {
    assert_eq!(mdast_to_markdown(None, &ShortcodeRegistry::new()), "");
}
