//! Markdown parsing (Markdown → syntax tree)
//!
//! Pipeline: component blocks encoded → entities protected → comrak AST →
//! syntax tree → inline HTML spans merged → normalizers (reference squashing,
//! image demotion, shortcode resolution) → unresolved component blocks
//! restored as literal text.
//!
//! Parsing never fails. Anything comrak does not recognise already comes back
//! as text or raw HTML, and unknown components end up as visible literal text.

use super::component_blocks::{encode_blocks, restore_literal};
use super::guard::TokenizerGuard;
use crate::common::{images_to_text, merge_html, shortcodes, squash_references};
use crate::mdast::{self, Node, Root};
use crate::shortcode::ShortcodeRegistry;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena};
use tracing::trace;

/// Parse markdown into a normalized syntax tree.
pub fn parse_to_mdast(source: &str, shortcodes: &ShortcodeRegistry) -> Root {
    let mut tree = parse_raw(source);
    merge_html::merge_inline_html(&mut tree);
    squash_references::squash_references(&mut tree);
    images_to_text::images_to_text(&mut tree);
    shortcodes::resolve_shortcodes(&mut tree, shortcodes);
    restore_components(&mut tree);
    trace!(children = tree.children.len(), "parsed markdown");
    tree
}

/// Parse markdown without running any normalizer.
pub fn parse_raw(source: &str) -> Root {
    let guard = TokenizerGuard::default();
    let encoded = encode_blocks(source);
    let protected = guard.protect(&encoded);

    let arena = Arena::new();
    let options = guard.options();
    let root = parse_document(&arena, &protected, &options);

    let converter = Converter { guard: &guard };
    Root::new(converter.children(root))
}

struct Converter<'g> {
    guard: &'g TokenizerGuard,
}

impl Converter<'_> {
    fn children<'a>(&self, node: &'a AstNode<'a>) -> Vec<Node> {
        let mut out: Vec<Node> = Vec::new();
        for child in node.children() {
            for converted in self.node(child) {
                if let (Some(Node::Text(prev)), Node::Text(next)) = (out.last_mut(), &converted) {
                    prev.value.push_str(&next.value);
                    continue;
                }
                out.push(converted);
            }
        }
        out
    }

    fn node<'a>(&self, node: &'a AstNode<'a>) -> Vec<Node> {
        let restore = |s: &str| self.guard.restore(s);
        let value = node.data.borrow().value.clone();

        let converted = match value {
            NodeValue::Document => return self.children(node),
            NodeValue::Paragraph => Node::paragraph(self.children(node)),
            NodeValue::Heading(heading) => Node::Heading(mdast::Heading {
                depth: heading.level,
                children: self.children(node),
            }),
            NodeValue::ThematicBreak => Node::ThematicBreak,
            NodeValue::BlockQuote => Node::Blockquote(mdast::Blockquote {
                children: self.children(node),
            }),
            NodeValue::List(list) => {
                let spread = !list.tight;
                let children = self
                    .children(node)
                    .into_iter()
                    .map(|child| match child {
                        Node::ListItem(item) => Node::ListItem(mdast::ListItem { spread, ..item }),
                        other => other,
                    })
                    .collect();
                Node::List(mdast::List {
                    ordered: list.list_type == ListType::Ordered,
                    start: (list.list_type == ListType::Ordered)
                        .then(|| u32::try_from(list.start).unwrap_or(1)),
                    spread,
                    children,
                })
            }
            NodeValue::Item(_) => Node::ListItem(mdast::ListItem {
                spread: false,
                children: self.children(node),
            }),
            NodeValue::CodeBlock(code) => {
                let info = restore(code.info.trim());
                let lang = info.split_whitespace().next().map(str::to_string);
                let literal = restore(&code.literal);
                Node::Code(mdast::Code {
                    lang,
                    value: literal
                        .strip_suffix('\n')
                        .map(str::to_string)
                        .unwrap_or(literal),
                })
            }
            NodeValue::HtmlBlock(html) => Node::html(restore(html.literal.trim_end())),
            NodeValue::Text(text) => {
                let value = restore(&text);
                if value.is_empty() {
                    // a joiner between touching strikethroughs
                    return Vec::new();
                }
                Node::text(value)
            }
            NodeValue::SoftBreak => Node::text("\n"),
            NodeValue::LineBreak => Node::Break,
            NodeValue::Code(code) => Node::InlineCode(mdast::InlineCode {
                value: restore(&code.literal),
            }),
            NodeValue::HtmlInline(html) => Node::html(restore(&html)),
            NodeValue::Emph => Node::Emphasis(mdast::Emphasis {
                children: self.children(node),
            }),
            NodeValue::Strong => Node::Strong(mdast::Strong {
                children: self.children(node),
            }),
            NodeValue::Strikethrough => Node::Delete(mdast::Delete {
                children: self.children(node),
            }),
            NodeValue::Link(link) => Node::Link(mdast::Link {
                url: restore(&link.url),
                title: non_empty(restore(&link.title)),
                children: self.children(node),
            }),
            NodeValue::Image(link) => {
                let alt: String = self.children(node).iter().map(Node::to_plain_text).collect();
                Node::Image(mdast::Image {
                    url: restore(&link.url),
                    title: non_empty(restore(&link.title)),
                    alt,
                })
            }
            // extensions that are switched off, kept as their content
            _ => return self.children(node),
        };
        vec![converted]
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Expand component blocks that no definition claimed back into their
/// literal fenced form, wherever the encoded line ended up.
fn restore_components(root: &mut Root) {
    fn walk(nodes: &mut [Node]) {
        for node in nodes {
            match node {
                Node::Text(mdast::Text { value })
                | Node::Html(mdast::Html { value })
                | Node::Code(mdast::Code { value, .. })
                | Node::InlineCode(mdast::InlineCode { value }) => {
                    if let Some(restored) = restore_literal(value) {
                        *value = restored;
                    }
                }
                other => {
                    if let Some(children) = other.children_mut() {
                        walk(children);
                    }
                }
            }
        }
    }
    walk(&mut root.children);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::TemplateShortcode;
    use serde_json::json;

    fn parse(source: &str) -> Root {
        parse_to_mdast(source, &ShortcodeRegistry::new())
    }

    fn first_paragraph(root: &Root) -> &[Node] {
        match root.children.first() {
            Some(Node::Paragraph(p)) => &p.children,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn parses_marks_and_links() {
        let root = parse("**a[b](c)d**");
        assert_eq!(
            first_paragraph(&root),
            &[Node::Strong(mdast::Strong {
                children: vec![
                    Node::text("a"),
                    Node::Link(mdast::Link {
                        url: "c".into(),
                        title: None,
                        children: vec![Node::text("b")],
                    }),
                    Node::text("d"),
                ],
            })]
        );
    }

    #[test]
    fn bare_urls_are_not_linked() {
        let root = parse("see https://example.com and www.example.com");
        assert_eq!(
            first_paragraph(&root),
            &[Node::text("see https://example.com and www.example.com")]
        );
    }

    #[test]
    fn entities_stay_literal() {
        let root = parse("a &lt;b&gt; &amp; `&lt;c&gt;`");
        assert_eq!(
            first_paragraph(&root),
            &[
                Node::text("a &lt;b&gt; &amp; "),
                Node::InlineCode(mdast::InlineCode {
                    value: "&lt;c&gt;".into()
                }),
            ]
        );
    }

    #[test]
    fn touching_strikethroughs_are_siblings() {
        let root = parse("**a ~~b~~~~c~~**");
        let delete = |text: &str| {
            Node::Delete(mdast::Delete {
                children: vec![Node::text(text)],
            })
        };
        assert_eq!(
            first_paragraph(&root),
            &[Node::Strong(mdast::Strong {
                children: vec![Node::text("a "), delete("b"), delete("c")],
            })]
        );
    }

    #[test]
    fn look_alike_encoded_line_stays_text() {
        let root = parse(":::tip SGk=");
        assert_eq!(first_paragraph(&root), &[Node::text(":::tip SGk=")]);
    }

    #[test]
    fn soft_breaks_join_text() {
        let root = parse("a\nb");
        assert_eq!(first_paragraph(&root), &[Node::text("a\nb")]);
    }

    #[test]
    fn code_block_loses_trailing_newline() {
        let root = parse("```rust extra\nfn x() {}\n```");
        assert_eq!(
            root.children,
            vec![Node::Code(mdast::Code {
                lang: Some("rust".into()),
                value: "fn x() {}".into(),
            })]
        );
    }

    #[test]
    fn tight_and_loose_lists() {
        let tight = parse("- a\n- b");
        let loose = parse("1. a\n\n2. b");
        match (&tight.children[0], &loose.children[0]) {
            (Node::List(t), Node::List(l)) => {
                assert!(!t.spread && !t.ordered && t.start.is_none());
                assert!(l.spread && l.ordered);
                assert_eq!(l.start, Some(1));
            }
            other => panic!("expected two lists, got {other:?}"),
        }
    }

    #[test]
    fn inline_html_span_is_atomic() {
        let root = parse("x <span>*</span> y");
        assert_eq!(
            first_paragraph(&root),
            &[Node::text("x "), Node::html("<span>*</span>"), Node::text(" y")]
        );
    }

    #[test]
    fn registered_block_component_resolves() {
        let registry = ShortcodeRegistry::new().with(TemplateShortcode::block("note", ""));
        let root = parse_to_mdast("a\n\n:::note\ntitle: Hi\n:::\n\nb", &registry);
        assert_eq!(
            root.children[1],
            Node::ComponentBlock(mdast::Component {
                name: "note".into(),
                data: json!({"title": "Hi"}),
            })
        );
    }

    #[test]
    fn unknown_block_component_stays_literal() {
        let root = parse(":::note\ntitle: Hi\n:::");
        assert_eq!(first_paragraph(&root), &[Node::text(":::note\ntitle: Hi\n:::")]);
    }

    #[test]
    fn unclosed_component_is_plain_text() {
        let root = parse(":::note\ntitle: Hi");
        assert_eq!(first_paragraph(&root), &[Node::text(":::note\ntitle: Hi")]);
    }
}
