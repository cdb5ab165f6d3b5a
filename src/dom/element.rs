use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Serializable snapshot of a DOM element and its subtree
///
/// This is the format the browser snapshot script emits and the input of
/// [`crate::dom::MemoryDocument::from_element`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Element attributes in source order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Child elements and text runs in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotChild>,

    /// Bounding box in viewport coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Node below a snapshot element: a text run (a JSON string) or an element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SnapshotChild {
    Text(String),
    Element(ElementNode),
}

/// Bounding box coordinates for an element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            bounding_box: None,
        }
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: append a text run
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(SnapshotChild::Text(text.into()));
        self
    }

    /// Builder method: append a child element
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(SnapshotChild::Element(child));
        self
    }

    /// Builder method: set bounding box
    pub fn with_bounding_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox { x, y, width, height });
        self
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Child elements, text runs skipped
    pub fn elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(|child| match child {
            SnapshotChild::Element(element) => Some(element),
            SnapshotChild::Text(_) => None,
        })
    }

    /// Direct text of the element, text of child elements excluded
    pub fn own_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                SnapshotChild::Text(text) => Some(text.as_str()),
                SnapshotChild::Element(_) => None,
            })
            .collect()
    }

    /// Count this element and all of its descendants
    pub fn count_elements(&self) -> usize {
        1 + self.elements().map(ElementNode::count_elements).sum::<usize>()
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `other` lies entirely inside this box (edges inclusive)
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_creation() {
        let element = ElementNode::new("button")
            .with_attribute("id", "test-id")
            .with_attribute("class", "btn primary")
            .with_text("Click me")
            .with_bounding_box(0.0, 0.0, 10.0, 10.0);

        assert!(element.is_tag("BUTTON"));
        assert_eq!(element.get_attribute("id"), Some(&"test-id".to_string()));
        assert_eq!(element.own_text(), "Click me");
        assert!(element.bounding_box.is_some());
    }

    #[test]
    fn test_count_elements() {
        let tree = ElementNode::new("body")
            .with_child(ElementNode::new("header").with_child(ElementNode::new("button")))
            .with_child(ElementNode::new("main"));

        assert_eq!(tree.count_elements(), 4);
    }

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "tag_name": "div",
            "attributes": {"id": "box", "class": "a"},
            "children": ["hello ", {"tag_name": "span"}, " there"],
            "bounding_box": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}
        }"#;

        let node: ElementNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.attributes.keys().collect::<Vec<_>>(), vec!["id", "class"]);
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.own_text(), "hello  there");
        let span = node.elements().next().unwrap();
        assert!(span.is_tag("span") && span.attributes.is_empty());
        assert_eq!(node.bounding_box, Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_bounding_box_contains() {
        let viewport = BoundingBox::new(0.0, 0.0, 800.0, 600.0);

        assert!(viewport.contains(&BoundingBox::new(10.0, 20.0, 100.0, 50.0)));
        assert!(viewport.contains(&BoundingBox::new(0.0, 0.0, 800.0, 600.0)));
        assert!(!viewport.contains(&BoundingBox::new(750.0, 20.0, 100.0, 50.0)));
        assert!(!viewport.contains(&BoundingBox::new(10.0, -5.0, 100.0, 50.0)));
        assert!(!viewport.contains(&BoundingBox::new(10.0, 700.0, 10.0, 10.0)));
    }
}
