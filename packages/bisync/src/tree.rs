//! Safe document tree produced by the sanitizer and consumed by the differ.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Node of a sanitized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SafeNode {
    Element(SafeElement),
    Text { content: String },
}

/// Element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SafeElement {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<SafeNode>,
}

impl SafeNode {
    pub fn text(content: impl Into<String>) -> Self {
        SafeNode::Text {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&SafeElement> {
        match self {
            SafeNode::Element(element) => Some(element),
            SafeNode::Text { .. } => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut SafeElement> {
        match self {
            SafeNode::Element(element) => Some(element),
            SafeNode::Text { .. } => None,
        }
    }

    /// Compact markup for this node.
    pub fn to_markup(&self) -> String {
        let mut output = String::new();
        write_node(self, &mut output);
        output
    }
}

impl From<SafeElement> for SafeNode {
    fn from(element: SafeElement) -> Self {
        SafeNode::Element(element)
    }
}

impl SafeElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<SafeNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Value of a non-empty `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &SafeElement> {
        self.children.iter().filter_map(SafeNode::as_element)
    }

    /// Depth-first search for a descendant element by id, including self.
    pub fn find_by_id(&self, id: &str) -> Option<&SafeElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut SafeElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .filter_map(SafeNode::as_element_mut)
            .find_map(|child| child.find_by_id_mut(id))
    }

    /// Compact markup for this element and its subtree.
    pub fn to_markup(&self) -> String {
        let mut output = String::new();
        write_element(self, &mut output);
        output
    }

    /// Compact markup of the children only.
    pub fn inner_markup(&self) -> String {
        let mut output = String::new();
        for child in &self.children {
            write_node(child, &mut output);
        }
        output
    }
}

fn write_node(node: &SafeNode, output: &mut String) {
    match node {
        SafeNode::Element(element) => write_element(element, output),
        SafeNode::Text { content } => output.push_str(&escape_text(content)),
    }
}

fn write_element(element: &SafeElement, output: &mut String) {
    output.push('<');
    output.push_str(&element.tag);
    for (name, value) in &element.attributes {
        let _ = write!(output, " {}=\"{}\"", name, escape_attr(value));
    }
    if element.children.is_empty() {
        output.push_str("/>");
        return;
    }
    output.push('>');
    for child in &element.children {
        write_node(child, output);
    }
    let _ = write!(output, "</{}>", element.tag);
}

/// Escape text content for markup output.
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for a double-quoted markup attribute.
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_serialization() {
        let tree = SafeElement::new("g")
            .with_child(
                SafeElement::new("rect")
                    .with_attr("id", "a")
                    .with_attr("width", "10"),
            )
            .with_child(SafeElement::new("text").with_child(SafeNode::text("Tom & Jerry")));

        assert_eq!(
            tree.to_markup(),
            r#"<g><rect id="a" width="10"/><text>Tom &amp; Jerry</text></g>"#
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let rect = SafeElement::new("rect").with_attr("fill", r#"a"b"#);
        assert_eq!(rect.to_markup(), r#"<rect fill="a&quot;b"/>"#);
    }

    #[test]
    fn test_find_by_id() {
        let mut tree = SafeElement::new("g").with_child(
            SafeElement::new("g").with_child(SafeElement::new("rect").with_attr("id", "deep")),
        );
        assert_eq!(tree.find_by_id("deep").map(|e| e.tag.as_str()), Some("rect"));
        assert!(tree.find_by_id("missing").is_none());

        if let Some(rect) = tree.find_by_id_mut("deep") {
            rect.attributes.insert("x".into(), "5".into());
        }
        assert_eq!(tree.find_by_id("deep").and_then(|e| e.attr("x")), Some("5"));
    }
}
