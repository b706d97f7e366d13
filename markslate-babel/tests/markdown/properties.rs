//! The markdown → rich document → markdown cycle reaches a fixed point after
//! one pass.

use crate::common::cycle;
use markslate_babel::ShortcodeRegistry;
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => word(),
        1 => word().prop_map(|w| format!("**{w}**")),
        1 => word().prop_map(|w| format!("*{w}*")),
        1 => word().prop_map(|w| format!("~~{w}~~")),
        1 => word().prop_map(|w| format!("`{w}`")),
        1 => (word(), word()).prop_map(|(t, u)| format!("[{t}](http://{u}.org)")),
    ]
}

fn line() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..6).prop_map(|segments| segments.join(" "))
}

fn block() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => line(),
        1 => (1..4usize, line()).prop_map(|(depth, text)| format!("{} {text}", "#".repeat(depth))),
        1 => prop::collection::vec(line(), 1..4)
            .prop_map(|items| items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")),
        1 => prop::collection::vec(line(), 1..4).prop_map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(n, i)| format!("{}. {i}", n + 1))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        1 => line().prop_map(|text| format!("> {text}")),
        1 => word().prop_map(|w| format!("```\n{w}\n```")),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 1..5).prop_map(|blocks| blocks.join("\n\n"))
}

proptest! {
    #[test]
    fn cycle_is_idempotent(markdown in document()) {
        let registry = ShortcodeRegistry::new();
        let once = cycle(&markdown, &registry);
        let twice = cycle(&once, &registry);
        prop_assert_eq!(once, twice);
    }
}
