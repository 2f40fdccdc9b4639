//! In-memory page model.
//!
//! Widgets never build HTML strings directly; they look up their target by
//! [`Selector`] and mutate the element tree. The page is serialized once, at
//! the end of a run, by [`Page::render_html`].

use chrono::{DateTime, Utc};
use std::fmt;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The two lookups the dashboard markup relies on: `#id` and `.class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Id(&'static str),
    Class(&'static str),
}

impl Selector {
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Id(id) => element.id() == Some(*id),
            Selector::Class(class) => element.has_class(class),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Class(class) => write!(f, ".{}", class),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        match self.attributes.iter_mut().find(|(name, _)| name == "class") {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(class);
            }
            None => self
                .attributes
                .push(("class".to_string(), class.to_string())),
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(attr, _)| attr == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Replaces every child with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::Text(text.into()));
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Text of all descendant text nodes, trimmed and joined by single spaces.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                Node::Element(element) => element.collect_text(parts),
            }
        }
    }

    pub fn find(&self, selector: Selector) -> Option<&Element> {
        if selector.matches(self) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|element| element.find(selector))
    }

    pub fn find_mut(&mut self, selector: Selector) -> Option<&mut Element> {
        if selector.matches(self) {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let Node::Element(element) = child {
                if let Some(found) = element.find_mut(selector) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn replace_descendant(&mut self, selector: Selector, slot: &mut Option<Element>) -> bool {
        for child in self.children.iter_mut() {
            if let Node::Element(element) = child {
                if selector.matches(element) {
                    if let Some(replacement) = slot.take() {
                        *element = replacement;
                    }
                    return true;
                }
                if element.replace_descendant(selector, slot) {
                    return true;
                }
            }
        }
        false
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape(value));
            out.push('"');
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&html_escape(text)),
                Node::Element(element) => element.write_html(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub body: Element,
    pub head_scripts: Vec<String>,
    pub inline_script: Option<String>,
}

impl Page {
    pub fn new(title: &str, body: Element) -> Self {
        Self {
            title: title.to_string(),
            body,
            head_scripts: Vec::new(),
            inline_script: None,
        }
    }

    pub fn query(&self, selector: Selector) -> Option<&Element> {
        self.body.find(selector)
    }

    pub fn query_mut(&mut self, selector: Selector) -> Option<&mut Element> {
        self.body.find_mut(selector)
    }

    /// Swaps the first element matching `selector` for `replacement`,
    /// discarding the old node and its id. Returns false when nothing matched.
    pub fn replace(&mut self, selector: Selector, replacement: Element) -> bool {
        let mut slot = Some(replacement);
        self.body.replace_descendant(selector, &mut slot)
    }

    pub fn render_html(&self, generated_at: DateTime<Utc>) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"UTF-8\">\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        out.push_str(&format!("<title>{}</title>\n", html_escape(&self.title)));
        for src in &self.head_scripts {
            out.push_str(&format!("<script src=\"{}\"></script>\n", html_escape(src)));
        }
        out.push_str("</head>\n");

        self.body.write_html(&mut out);
        out.push('\n');

        out.push_str(&format!(
            "<!-- generated {} -->\n",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(script) = &self.inline_script {
            out.push_str("<script>\n");
            out.push_str(script);
            out.push_str("\n</script>\n");
        }
        out.push_str("</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> Element {
        Element::new("body")
            .with_child(
                Element::new("header")
                    .with_child(Element::new("span").with_class("badge active-badge").with_text("…")),
            )
            .with_child(Element::new("div").with_id("papersList"))
    }

    #[test]
    fn test_query_by_id_and_class() {
        let mut page = Page::new("t", sample_body());
        assert!(page.query(Selector::Id("papersList")).is_some());
        assert!(page.query(Selector::Class("active-badge")).is_some());
        assert!(page.query(Selector::Class("active")).is_none());

        page.query_mut(Selector::Class("active-badge"))
            .unwrap()
            .set_text("3 Active Learners");
        assert_eq!(
            page.query(Selector::Class("badge")).unwrap().text_content(),
            "3 Active Learners"
        );
    }

    #[test]
    fn test_replace_discards_original_node() {
        let mut page = Page::new("t", sample_body());
        let replaced = page.replace(
            Selector::Id("papersList"),
            Element::new("div").with_class("error-card").with_text("boom"),
        );
        assert!(replaced);
        assert!(page.query(Selector::Id("papersList")).is_none());
        assert!(page.query(Selector::Class("error-card")).is_some());
        assert!(!page.replace(Selector::Id("papersList"), Element::new("div")));
    }

    #[test]
    fn test_html_is_escaped() {
        let element = Element::new("a")
            .with_attr("href", "https://x.com/?a=1&b=\"2\"")
            .with_text("<script>");
        assert_eq!(
            element.to_html(),
            "<a href=\"https://x.com/?a=1&amp;b=&quot;2&quot;\">&lt;script&gt;</a>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let input = Element::new("input").with_id("searchInput");
        assert_eq!(input.to_html(), "<input id=\"searchInput\">");
    }

    #[test]
    fn test_text_content_joins_nested_text() {
        let card = Element::new("div")
            .with_child(Element::new("h3").with_text(" b@x.com "))
            .with_child(Element::new("span").with_text("91% match"));
        assert_eq!(card.text_content(), "b@x.com 91% match");
    }
}
