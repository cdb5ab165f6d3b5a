//! Live document boundary
//!
//! The extraction engine never talks to a rendering engine directly. Everything
//! it needs from a page goes through the [`LiveDocument`] trait:
//! - MemoryDocument: in-memory arena document (HTML import, snapshots, tests)
//! - ElementNode: serializable element snapshot used to build memory documents
//! - css: selector matching for memory documents (scraper's grammar, `selectors` engine)
//!
//! The Chrome-backed implementation lives in [`crate::browser::TabDocument`].

pub mod css;
pub mod element;
mod html;
pub mod memory;

pub use css::CompiledSelector;
pub use element::{BoundingBox, ElementNode, SnapshotChild};
pub use memory::MemoryDocument;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a node of a [`LiveDocument`]
///
/// Handles are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Query and mutation capabilities the engine requires from a document
///
/// Query results are always element nodes in document order.
pub trait LiveDocument {
    /// The document element
    fn root(&self) -> NodeId;

    /// Find elements matching `selector` below `context`
    ///
    /// With `direct_child_only`, only the element children of `context` are tested.
    fn query(&self, context: NodeId, selector: &str, direct_child_only: bool) -> Result<Vec<NodeId>>;

    /// First descendant of `context` matching `selector`
    fn query_first(&self, context: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query(context, selector, false)?.into_iter().next())
    }

    /// Lowercase tag name
    fn tag(&self, node: NodeId) -> Result<String>;

    /// Rendered text of the node and its descendants
    fn text(&self, node: NodeId) -> Result<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    /// Parent element, `None` for the root
    fn parent(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn bounding_box(&self, node: NodeId) -> Result<Option<BoundingBox>>;

    /// The visible area, in the same coordinate space as [`LiveDocument::bounding_box`]
    fn viewport(&self) -> Result<BoundingBox>;

    /// Current value of a form control
    fn input_value(&self, node: NodeId) -> Result<Option<String>> {
        self.attribute(node, "value")
    }

    /// Checked state of a radio button or checkbox
    fn is_checked(&self, node: NodeId) -> Result<bool> {
        Ok(self.attribute(node, "checked")?.is_some())
    }

    /// Markup of the node and its subtree
    fn serialize(&self, node: NodeId) -> Result<String>;

    /// Deep snapshot of the whole document, detached from the live one
    fn clone_document(&self) -> Result<MemoryDocument>;
}
