//! Syntax tree → HTML tree
//!
//! Used for previews. Components are expanded through their definition's
//! `render`; raw HTML passes through untouched. A paragraph holding a demoted
//! image literal renders as the image it stands for.

use super::nodes::{Element, HtmlNode};
use crate::common::images_to_text::{is_image_paragraph, parse_image_literal};
use crate::formats::markdown::component_blocks::literal_block;
use crate::mdast::{self, Node};
use crate::shortcode::{inline_args, yaml_body, ShortcodeKind, ShortcodeRegistry};

pub fn mdast_to_html_nodes(root: &mdast::Root, shortcodes: &ShortcodeRegistry) -> Vec<HtmlNode> {
    let converter = Converter { shortcodes };
    converter.nodes(&root.children, false)
}

struct Converter<'r> {
    shortcodes: &'r ShortcodeRegistry,
}

impl Converter<'_> {
    fn nodes(&self, nodes: &[Node], tight: bool) -> Vec<HtmlNode> {
        nodes.iter().flat_map(|node| self.node(node, tight)).collect()
    }

    /// `tight` is set for the direct children of a tight list item, whose
    /// paragraphs are written without `<p>`.
    fn node(&self, node: &Node, tight: bool) -> Vec<HtmlNode> {
        let element = |tag: &str, children: &[Node]| {
            vec![HtmlNode::element(tag, self.nodes(children, false))]
        };

        match node {
            Node::Root(root) => self.nodes(&root.children, false),
            Node::Paragraph(paragraph) => {
                if let Some(image) = demoted_image(&paragraph.children) {
                    vec![HtmlNode::element("p", vec![image])]
                } else if tight {
                    self.nodes(&paragraph.children, false)
                } else {
                    element("p", &paragraph.children)
                }
            }
            Node::Heading(heading) => element(&format!("h{}", heading.depth.clamp(1, 6)), &heading.children),
            Node::ThematicBreak => vec![HtmlNode::element("hr", Vec::new())],
            Node::Blockquote(quote) => element("blockquote", &quote.children),
            Node::List(list) => {
                let mut ol = Element::new(if list.ordered { "ol" } else { "ul" });
                if let Some(start) = list.start.filter(|&start| list.ordered && start != 1) {
                    ol = ol.with_attr("start", start.to_string());
                }
                let items = list
                    .children
                    .iter()
                    .flat_map(|child| match child {
                        Node::ListItem(item) => {
                            let tight = !list.spread && !item.spread;
                            vec![HtmlNode::element("li", self.nodes(&item.children, tight))]
                        }
                        other => self.node(other, false),
                    })
                    .collect();
                vec![HtmlNode::Element(ol.with_children(items))]
            }
            Node::ListItem(item) => element("li", &item.children),
            Node::Code(code) => {
                let mut inner = Element::new("code");
                if let Some(lang) = code.lang.as_deref().filter(|lang| !lang.is_empty()) {
                    inner = inner.with_attr("class", format!("language-{lang}"));
                }
                let inner = inner.with_children(vec![HtmlNode::text(format!("{}\n", code.value))]);
                vec![HtmlNode::element("pre", vec![HtmlNode::Element(inner)])]
            }
            Node::Html(html) => vec![HtmlNode::Raw(html.value.clone())],
            Node::Definition(_) => Vec::new(),
            Node::Text(text) => vec![HtmlNode::text(text.value.clone())],
            Node::Emphasis(mark) => element("em", &mark.children),
            Node::Strong(mark) => element("strong", &mark.children),
            Node::Delete(mark) => element("del", &mark.children),
            Node::InlineCode(code) => vec![HtmlNode::element(
                "code",
                vec![HtmlNode::text(code.value.clone())],
            )],
            Node::Break => vec![HtmlNode::element("br", Vec::new())],
            Node::Link(link) => {
                let mut a = Element::new("a").with_attr("href", link.url.clone());
                if let Some(title) = &link.title {
                    a = a.with_attr("title", title.clone());
                }
                vec![HtmlNode::Element(a.with_children(self.nodes(&link.children, false)))]
            }
            Node::Image(image) => vec![image_element(image)],
            Node::LinkReference(reference) => self.nodes(&reference.children, false),
            Node::ImageReference(reference) => vec![HtmlNode::text(reference.alt.clone())],
            Node::ComponentBlock(component) => {
                match self.shortcodes.lookup(&component.name, ShortcodeKind::Block) {
                    Some(definition) => vec![HtmlNode::Raw(definition.render(&component.data))],
                    None => {
                        let literal = literal_block("", &component.name, &yaml_body(&component.data));
                        vec![HtmlNode::element("p", vec![HtmlNode::text(literal)])]
                    }
                }
            }
            Node::ComponentInline(component) => {
                match self.shortcodes.lookup(&component.name, ShortcodeKind::Inline) {
                    Some(definition) => vec![HtmlNode::Raw(definition.render(&component.data))],
                    None => {
                        let literal = format!(":{}[{}]", component.name, inline_args(&component.data));
                        vec![HtmlNode::text(literal)]
                    }
                }
            }
        }
    }
}

fn demoted_image(children: &[Node]) -> Option<HtmlNode> {
    if !is_image_paragraph(children) {
        return None;
    }
    let [Node::Text(text)] = children else {
        return None;
    };
    parse_image_literal(&text.value).map(|image| image_element(&image))
}

fn image_element(image: &mdast::Image) -> HtmlNode {
    let mut img = Element::new("img")
        .with_attr("src", image.url.clone())
        .with_attr("alt", image.alt.clone());
    if let Some(title) = &image.title {
        img = img.with_attr("title", title.clone());
    }
    HtmlNode::Element(img)
}
