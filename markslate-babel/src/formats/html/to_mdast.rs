//! HTML tree → syntax tree
//!
//! Maps semantic elements to their markdown counterparts and interprets the
//! presentational markup rich editors put on the clipboard (`<b>`, `<i>`,
//! styled `<span>`s). Elements with no markdown counterpart but visible
//! meaning (tables, media, `<sup>`, ...) are kept as raw HTML; anything else is
//! transparent and only its content is kept. The result may break
//! parent/child typing rules; `common::assert_parents` repairs it.

use super::nodes::{Element, HtmlNode};
use super::serializer::outer_html;
use crate::mdast::{self, Node};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\n\f]+").expect("valid whitespace regex"));

/// Elements dropped together with their content.
const DROPPED: &[&str] = &[
    "script", "style", "head", "title", "meta", "link", "template", "noscript", "button", "input",
    "select", "textarea",
];

/// Elements kept verbatim as raw HTML.
const PRESERVED: &[&str] = &[
    "iframe", "video", "audio", "table", "details", "sup", "sub", "kbd", "u", "mark", "svg",
    "canvas",
];

/// Containers whose phrasing content forms a paragraph of its own.
const BLOCK_CONTAINERS: &[&str] = &[
    "div", "section", "article", "header", "footer", "main", "aside", "nav", "figure",
    "figcaption", "address", "center", "dd", "dt", "dl", "form", "fieldset",
];

pub fn html_nodes_to_mdast(nodes: &[HtmlNode]) -> mdast::Root {
    mdast::Root::new(convert_all(nodes))
}

fn convert_all(nodes: &[HtmlNode]) -> Vec<Node> {
    nodes.iter().flat_map(convert).collect()
}

/// Text outside `<pre>` has its whitespace collapsed; `<pre>` content is
/// read whole by [`code_block`].
fn convert(node: &HtmlNode) -> Vec<Node> {
    match node {
        HtmlNode::Text(text) => vec![Node::text(WHITESPACE.replace_all(text, " ").into_owned())],
        HtmlNode::Comment(_) => Vec::new(),
        HtmlNode::Raw(raw) => vec![Node::html(raw.clone())],
        HtmlNode::Element(element) => convert_element(element),
    }
}

fn convert_element(element: &Element) -> Vec<Node> {
    let tag = element.tag.as_str();
    if DROPPED.contains(&tag) {
        return Vec::new();
    }
    if PRESERVED.contains(&tag) {
        return vec![Node::html(outer_html(&HtmlNode::Element(element.clone())))];
    }
    let children = || convert_all(&element.children);

    let node = match tag {
        "p" => Node::paragraph(children()),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Node::Heading(mdast::Heading {
            depth: tag[1..].parse().unwrap_or(1),
            children: children(),
        }),
        "blockquote" => Node::Blockquote(mdast::Blockquote {
            children: children(),
        }),
        "ul" | "ol" => Node::List(mdast::List {
            ordered: tag == "ol",
            start: (tag == "ol").then(|| {
                element
                    .attr("start")
                    .and_then(|start| start.trim().parse().ok())
                    .unwrap_or(1)
            }),
            spread: false,
            children: children(),
        }),
        "li" => Node::ListItem(mdast::ListItem {
            spread: false,
            children: children(),
        }),
        "pre" => Node::Code(code_block(element)),
        "hr" => Node::ThematicBreak,
        "br" => Node::Break,
        "em" | "i" | "cite" | "dfn" => Node::Emphasis(mdast::Emphasis {
            children: children(),
        }),
        "strong" => Node::Strong(mdast::Strong {
            children: children(),
        }),
        "b" => {
            // Google Docs wraps whole documents in <b style="font-weight:normal">
            if is_normal_weight(element) {
                return children();
            }
            Node::Strong(mdast::Strong {
                children: children(),
            })
        }
        "del" | "s" | "strike" => Node::Delete(mdast::Delete {
            children: children(),
        }),
        "code" | "tt" | "samp" => Node::InlineCode(mdast::InlineCode {
            value: element.text_content(),
        }),
        "a" => match element.attr("href") {
            Some(href) => Node::Link(mdast::Link {
                url: href.to_string(),
                title: element.attr("title").map(str::to_string),
                children: children(),
            }),
            None => return children(),
        },
        "img" => match element.attr("src") {
            Some(src) => Node::Image(mdast::Image {
                url: src.to_string(),
                title: element.attr("title").map(str::to_string),
                alt: element.attr("alt").unwrap_or_default().to_string(),
            }),
            None => return Vec::new(),
        },
        "span" | "font" => return styled(element, children()),
        _ if BLOCK_CONTAINERS.contains(&tag) => {
            let content = children();
            if !content.is_empty() && content.iter().all(Node::is_phrasing) {
                Node::paragraph(content)
            } else {
                return content;
            }
        }
        _ => return children(),
    };
    vec![node]
}

fn code_block(element: &Element) -> mdast::Code {
    let code = element.children.iter().find_map(|child| match child {
        HtmlNode::Element(inner) if inner.tag == "code" => Some(inner),
        _ => None,
    });
    let lang = code
        .and_then(|code| code.attr("class"))
        .or_else(|| element.attr("class"))
        .and_then(|classes| {
            classes
                .split_whitespace()
                .find_map(|class| class.strip_prefix("language-").or_else(|| class.strip_prefix("lang-")))
        })
        .or_else(|| element.attr("data-lang"))
        .map(str::to_string);
    let text = element.text_content();
    let value = text.strip_suffix('\n').unwrap_or(&text).to_string();
    mdast::Code { lang, value }
}

fn is_normal_weight(element: &Element) -> bool {
    matches!(element.style("font-weight").as_deref(), Some("normal" | "400"))
}

/// Wrap span content according to its inline style.
fn styled(element: &Element, content: Vec<Node>) -> Vec<Node> {
    let bold = element.style("font-weight").is_some_and(|weight| {
        weight == "bold" || weight == "bolder" || weight.parse::<u16>().is_ok_and(|w| w >= 600)
    });
    let italic = element
        .style("font-style")
        .is_some_and(|style| style == "italic" || style == "oblique");
    let strike = element
        .style("text-decoration")
        .or_else(|| element.style("text-decoration-line"))
        .is_some_and(|decoration| decoration.contains("line-through"));

    let mut nodes = content;
    if bold {
        nodes = vec![Node::Strong(mdast::Strong { children: nodes })];
    }
    if italic {
        nodes = vec![Node::Emphasis(mdast::Emphasis { children: nodes })];
    }
    if strike {
        nodes = vec![Node::Delete(mdast::Delete { children: nodes })];
    }
    nodes
}
