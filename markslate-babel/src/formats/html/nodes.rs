//! HTML tree node types
//!
//! A small owned DOM used in transit between the syntax tree and HTML text.
//! It is built from the parser's `RcDom` on import and from the syntax tree
//! on export, and never outlives one conversion.

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li", "main", "menu", "nav", "ol",
    "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element(Element),
    Text(String),
    Comment(String),
    /// Trusted markup written out verbatim (raw HTML, rendered components).
    Raw(String),
}

/// An element with a lowercase tag name and attributes in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<HtmlNode>) -> Self {
        self.children = children;
        self
    }

    /// Attribute value by (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Value of one property of the inline `style` attribute, lowercased.
    pub fn style(&self, property: &str) -> Option<String> {
        self.attr("style")?.split(';').find_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(property)
                .then(|| value.trim().to_ascii_lowercase())
        })
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(HtmlNode::text_content).collect()
    }
}

impl HtmlNode {
    pub fn element(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Element(Element::new(tag).with_children(children))
    }

    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Text(value.into())
    }

    pub fn text_content(&self) -> String {
        match self {
            HtmlNode::Element(element) => element.text_content(),
            HtmlNode::Text(text) => text.clone(),
            HtmlNode::Comment(_) | HtmlNode::Raw(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_attributes_classes_and_styles() {
        let span = Element::new("span")
            .with_attr("Class", "a emoji")
            .with_attr("style", "font-weight: 700; Font-Style:Italic");
        assert_eq!(span.attr("class"), Some("a emoji"));
        assert!(span.has_class("emoji"));
        assert!(!span.has_class("emo"));
        assert_eq!(span.style("font-weight").as_deref(), Some("700"));
        assert_eq!(span.style("font-style").as_deref(), Some("italic"));
        assert_eq!(span.style("color"), None);
    }

    #[test]
    fn text_content_skips_comments() {
        let node = HtmlNode::element(
            "p",
            vec![
                HtmlNode::text("a"),
                HtmlNode::Comment("x".into()),
                HtmlNode::element("b", vec![HtmlNode::text("c")]),
            ],
        );
        assert_eq!(node.text_content(), "ac");
    }
}
