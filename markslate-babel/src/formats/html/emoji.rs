//! Emoji image recognition
//!
//! Rich editors paste emoji as images: Dropbox Paper keeps the character in a
//! `data-emoji-ch` attribute, other editors mark the image with an `emoji`
//! class and put the character or `:shortcode:` in `alt`. Such images become
//! plain text so they do not turn into image nodes.

use super::nodes::{Element, HtmlNode};

pub fn replace_emoji(nodes: &mut [HtmlNode]) {
    for node in nodes {
        let HtmlNode::Element(element) = node else {
            continue;
        };
        if let Some(text) = emoji_text(element) {
            *node = HtmlNode::Text(text);
        } else {
            replace_emoji(&mut element.children);
        }
    }
}

fn emoji_text(element: &Element) -> Option<String> {
    if element.tag != "img" {
        return None;
    }
    if let Some(ch) = element.attr("data-emoji-ch").filter(|ch| !ch.is_empty()) {
        return Some(ch.to_string());
    }
    element
        .has_class("emoji")
        .then(|| element.attr("alt"))
        .flatten()
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
}
