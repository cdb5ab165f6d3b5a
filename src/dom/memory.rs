use crate::dom::css::CompiledSelector;
use crate::dom::element::{BoundingBox, ElementNode, SnapshotChild};
use crate::dom::{LiveDocument, NodeId};
use crate::error::{ExtractError, Result};
use indexmap::IndexMap;

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Viewport used when none is configured
pub const DEFAULT_VIEWPORT: BoundingBox = BoundingBox { x: 0.0, y: 0.0, width: 1280.0, height: 720.0 };

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind {
    Element { tag_name: String, attributes: IndexMap<String, String> },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MemoryNode {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    bounding_box: Option<BoundingBox>,
}

/// Arena-backed document held entirely in memory
///
/// Node handles are arena indices, so they stay valid for the lifetime of the
/// document and survive cloning.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    viewport: BoundingBox,
}

impl MemoryDocument {
    /// Create a document whose root element has the given tag
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![MemoryNode {
                kind: NodeKind::Element { tag_name: root_tag.into().to_ascii_lowercase(), attributes: IndexMap::new() },
                parent: None,
                children: Vec::new(),
                bounding_box: None,
            }],
            viewport: DEFAULT_VIEWPORT,
        }
    }

    /// Builder method: set the viewport
    pub fn with_viewport(mut self, viewport: BoundingBox) -> Self {
        self.viewport = viewport;
        self
    }

    /// Build a document from an element snapshot
    pub fn from_element(root: &ElementNode) -> Self {
        let mut doc = Self::new(root.tag_name.as_str());
        let root_id = doc.root();
        doc.import_snapshot(root_id, root);
        doc
    }

    fn import_snapshot(&mut self, id: NodeId, snapshot: &ElementNode) {
        for (name, value) in &snapshot.attributes {
            self.insert_attribute(id, name, value);
        }
        self.nodes[id.index()].bounding_box = snapshot.bounding_box;

        for child in &snapshot.children {
            match child {
                SnapshotChild::Text(text) => {
                    self.append_text(id, text);
                }
                SnapshotChild::Element(element) => {
                    let child_id = self.append_element(id, element.tag_name.as_str());
                    self.import_snapshot(child_id, element);
                }
            }
        }
    }

    /// Append an element under `parent` and return its handle
    pub fn append_element(&mut self, parent: NodeId, tag_name: impl Into<String>) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element { tag_name: tag_name.into().to_ascii_lowercase(), attributes: IndexMap::new() },
        )
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(MemoryNode { kind, parent: Some(parent), children: Vec::new(), bounding_box: None });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Builder-style attribute setter for documents under construction
    ///
    /// Attributes on text nodes are ignored.
    pub fn insert_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element { attributes, .. }) = self.nodes.get_mut(node.index()).map(|n| &mut n.kind) {
            attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn set_bounding_box(&mut self, node: NodeId, bounding_box: BoundingBox) {
        if let Some(entry) = self.nodes.get_mut(node.index()) {
            entry.bounding_box = Some(bounding_box);
        }
    }

    /// Total number of element nodes
    pub fn count_elements(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n.kind, NodeKind::Element { .. })).count()
    }

    /// Arena entry of a handle issued by this document
    pub(crate) fn entry(&self, id: NodeId) -> &MemoryNode {
        &self.nodes[id.index()]
    }

    fn node(&self, id: NodeId) -> Result<&MemoryNode> {
        self.nodes.get(id.index()).ok_or(ExtractError::UnknownNode(id))
    }

    /// Element descendants of `context` in document order
    fn descendants(&self, context: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[context.index()].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if matches!(node.kind, NodeKind::Element { .. }) {
                found.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.index()];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.index()];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Element { tag_name, attributes } => {
                out.push('<');
                out.push_str(tag_name);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag_name.as_str()) {
                    return;
                }
                for child in &node.children {
                    self.write_markup(*child, out);
                }
                out.push_str(&format!("</{}>", tag_name));
            }
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.index())?.kind {
            NodeKind::Element { tag_name, .. } => Some(tag_name.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute_value(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.index())?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }
}

impl LiveDocument for MemoryDocument {
    fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    fn query(&self, context: NodeId, selector: &str, direct_child_only: bool) -> Result<Vec<NodeId>> {
        let selector = CompiledSelector::parse(selector)?;
        let context_node = self.node(context)?;

        let candidates = if direct_child_only {
            context_node.children.iter().copied().filter(|id| self.tag_name(*id).is_some()).collect()
        } else {
            self.descendants(context)
        };
        Ok(candidates.into_iter().filter(|id| selector.matches(self, *id, context)).collect())
    }

    fn tag(&self, node: NodeId) -> Result<String> {
        self.node(node)?;
        self.tag_name(node)
            .map(str::to_string)
            .ok_or_else(|| ExtractError::DocumentFailed(format!("node {} is not an element", node)))
    }

    fn text(&self, node: NodeId) -> Result<String> {
        self.node(node)?;
        let mut text = String::new();
        self.collect_text(node, &mut text);
        Ok(text)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        self.node(node)?;
        Ok(self.attribute_value(node, &name.to_ascii_lowercase()).map(str::to_string))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        if matches!(self.node(node)?.kind, NodeKind::Text(_)) {
            return Err(ExtractError::DocumentFailed(format!("cannot set '{}' on text node {}", name, node)));
        }
        self.insert_attribute(node, name, value);
        Ok(())
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    fn bounding_box(&self, node: NodeId) -> Result<Option<BoundingBox>> {
        Ok(self.node(node)?.bounding_box)
    }

    fn viewport(&self) -> Result<BoundingBox> {
        Ok(self.viewport)
    }

    fn serialize(&self, node: NodeId) -> Result<String> {
        self.node(node)?;
        let mut markup = String::new();
        self.write_markup(node, &mut markup);
        Ok(markup)
    }

    fn clone_document(&self) -> Result<MemoryDocument> {
        Ok(self.clone())
    }
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub(crate) fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
