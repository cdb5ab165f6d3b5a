use crate::dom::memory::{escape_attribute, escape_text};
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Markup emitted for separator markers
pub const SEPARATOR_MARKUP: &str = "<hr>";

/// Node of the simplified output tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputNode {
    pub tag_name: String,

    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutputChild>,
}

/// Child slot of an output node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputChild {
    Element(OutputNode),
    /// Chunks long sibling lists for downstream consumers
    Separator,
}

impl OutputNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self { tag_name: tag_name.into(), ..Default::default() }
    }

    /// Builder method: set text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Semantic name carried by the node
    pub fn name(&self) -> Option<&str> {
        self.get_attribute("name")
    }

    pub fn push_child(&mut self, child: OutputNode) {
        self.children.push(OutputChild::Element(child));
    }

    pub fn push_separator(&mut self) {
        self.children.push(OutputChild::Separator);
    }

    /// Element children, separators skipped
    pub fn element_children(&self) -> impl Iterator<Item = &OutputNode> {
        self.children.iter().filter_map(|child| match child {
            OutputChild::Element(node) => Some(node),
            OutputChild::Separator => None,
        })
    }

    pub fn separator_count(&self) -> usize {
        self.children.iter().filter(|c| matches!(c, OutputChild::Separator)).count()
    }

    /// Count this node and all element descendants
    pub fn count_elements(&self) -> usize {
        1 + self.element_children().map(OutputNode::count_elements).sum::<usize>()
    }

    /// Depth-first search for the first node with the given semantic name
    pub fn find_by_name(&self, name: &str) -> Option<&OutputNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.element_children().find_map(|child| child.find_by_name(name))
    }

    /// All nodes with the given semantic name, in document order
    pub fn find_all_by_name<'a>(&'a self, name: &str, found: &mut Vec<&'a OutputNode>) {
        if self.name() == Some(name) {
            found.push(self);
        }
        for child in self.element_children() {
            child.find_all_by_name(name, found);
        }
    }

    /// Serialize as simplified markup
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        self.write_markup(&mut markup);
        markup
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag_name);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, escape_attribute(value)));
        }
        out.push('>');

        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            match child {
                OutputChild::Element(node) => node.write_markup(out),
                OutputChild::Separator => out.push_str(SEPARATOR_MARKUP),
            }
        }

        out.push_str(&format!("</{}>", self.tag_name));
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OutputNode {
        let mut list = OutputNode::new("ul").with_attribute("name", "cart");
        list.push_child(OutputNode::new("li").with_attribute("name", "cart.kettle").with_text("Kettle"));
        list.push_separator();
        list.push_child(OutputNode::new("li").with_attribute("name", "cart.kettle").with_text("Kettle & Lid"));
        list
    }

    #[test]
    fn test_to_markup() {
        assert_eq!(
            sample().to_markup(),
            "<ul name=\"cart\"><li name=\"cart.kettle\">Kettle</li><hr><li name=\"cart.kettle\">Kettle &amp; Lid</li></ul>"
        );
    }

    #[test]
    fn test_counts() {
        let list = sample();
        assert_eq!(list.count_elements(), 3);
        assert_eq!(list.separator_count(), 1);
        assert_eq!(list.element_children().count(), 2);
    }

    #[test]
    fn test_find_by_name() {
        let list = sample();
        assert_eq!(list.find_by_name("cart.kettle").and_then(|n| n.text.as_deref()), Some("Kettle"));
        assert!(list.find_by_name("cart.toaster").is_none());

        let mut found = Vec::new();
        list.find_all_by_name("cart.kettle", &mut found);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_json_roundtrip_keeps_separators() {
        let list = sample();
        let json = list.to_json().unwrap();
        assert!(json.contains("\"kind\": \"separator\""));

        let back: OutputNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
