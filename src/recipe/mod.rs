//! Recipes: declarative descriptions of what to extract from a page
//!
//! - RecipeNode: one class of element (selector, naming, text, interactivity)
//! - PageRecipeCatalog: ordered (rule, recipe) pairs choosing the recipe of a page
//! - config: JSON catalog files and their schema
//! - functions: closure-backed slots for text, metadata and attribute functions

pub mod catalog;
pub mod config;
pub mod functions;

pub use catalog::{CatalogEntry, MatchRule, PageRecipeCatalog};
pub use config::{catalog_schema, CatalogFile, NameSpec, PageSpec, RecipeSpec, TextSpec};
pub use functions::{AttributeComputer, FunctionRegistry, MetadataGenerator, MetadataRecord, TextExtractor};

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Where the text of a node comes from
#[derive(Clone, Default)]
pub enum TextSource {
    /// No text
    #[default]
    None,
    /// Text of the first descendant matching the selector
    Selector(String),
    /// Text computed by a function
    Extractor(Arc<dyn TextExtractor>),
    /// The node's own rendered text
    OwnText,
}

impl fmt::Debug for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::None => f.write_str("None"),
            TextSource::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
            TextSource::Extractor(_) => f.write_str("Extractor(<fn>)"),
            TextSource::OwnText => f.write_str("OwnText"),
        }
    }
}

/// How the semantic name of a node is formed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameMode {
    /// The node is unnamed and its parent's name passes through
    #[default]
    None,
    Literal(String),
    /// Slug of the resolved text
    FromText,
    /// Index of the node among its recipe's matches
    FromPosition,
}

/// Declarative description of one class of element
///
/// Recipe nodes are immutable once built and shared through `Arc`, so the
/// interaction registry can point back at them after a pass.
#[derive(Clone, Default)]
pub struct RecipeNode {
    /// Selector resolved against the parent's live node (or the document root)
    pub selector: String,
    /// Output tag, defaults to the live tag
    pub tag_name: Option<String>,
    pub text: TextSource,
    /// Template whose first `{}` is replaced by the text
    pub text_format: Option<String>,
    /// Store the resolved text on the output node
    pub attach_text: bool,
    pub name: NameMode,
    pub clickable: bool,
    /// Descendant that receives the clickable tag instead of the node itself
    pub click_selector: Option<String>,
    pub keep_attributes: Vec<String>,
    pub class_override: Option<String>,
    pub id_override: Option<String>,
    /// Applied last, in insertion order
    pub attribute_computers: IndexMap<String, Arc<dyn AttributeComputer>>,
    pub metadata: Option<Arc<dyn MetadataGenerator>>,
    pub children: Vec<Arc<RecipeNode>>,
    pub direct_child_only: bool,
    pub query_from_root: bool,
    /// Separator interval for this node's children
    pub separator_every: Option<usize>,
    /// Output text when the node ends up without children
    pub empty_placeholder: Option<String>,
}

impl RecipeNode {
    /// Create a recipe node matching `selector`
    pub fn new(selector: impl Into<String>) -> Self {
        Self { selector: selector.into(), ..Default::default() }
    }

    /// Builder method: override the output tag
    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    /// Builder method: take text from the first descendant matching `selector`
    pub fn text_selector(mut self, selector: impl Into<String>) -> Self {
        self.text = TextSource::Selector(selector.into());
        self
    }

    /// Builder method: compute text with a function
    pub fn text_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.text = TextSource::Extractor(Arc::new(extractor));
        self
    }

    /// Builder method: use the node's own text
    pub fn own_text(mut self) -> Self {
        self.text = TextSource::OwnText;
        self
    }

    pub fn text_format(mut self, template: impl Into<String>) -> Self {
        self.text_format = Some(template.into());
        self
    }

    pub fn attach_text(mut self) -> Self {
        self.attach_text = true;
        self
    }

    /// Builder method: literal name segment
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = NameMode::Literal(name.into());
        self
    }

    pub fn name_from_text(mut self) -> Self {
        self.name = NameMode::FromText;
        self
    }

    pub fn name_from_position(mut self) -> Self {
        self.name = NameMode::FromPosition;
        self
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    /// Builder method: mark clickable, tagging the descendant matching `selector`
    pub fn click_target(mut self, selector: impl Into<String>) -> Self {
        self.clickable = true;
        self.click_selector = Some(selector.into());
        self
    }

    pub fn keep_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.keep_attributes.push(attribute.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class_override = Some(class.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id_override = Some(id.into());
        self
    }

    pub fn computed_attribute(mut self, name: impl Into<String>, computer: impl AttributeComputer + 'static) -> Self {
        self.attribute_computers.insert(name.into(), Arc::new(computer));
        self
    }

    pub fn metadata(mut self, generator: impl MetadataGenerator + 'static) -> Self {
        self.metadata = Some(Arc::new(generator));
        self
    }

    /// Builder method: append a child recipe
    pub fn child(mut self, child: RecipeNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn direct_child_only(mut self) -> Self {
        self.direct_child_only = true;
        self
    }

    pub fn query_from_root(mut self) -> Self {
        self.query_from_root = true;
        self
    }

    pub fn separator_every(mut self, interval: usize) -> Self {
        self.separator_every = Some(interval);
        self
    }

    pub fn empty_placeholder(mut self, text: impl Into<String>) -> Self {
        self.empty_placeholder = Some(text.into());
        self
    }

    /// Count this recipe node and all nested ones
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(|c| c.count_nodes()).sum::<usize>()
    }
}

impl fmt::Debug for RecipeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeNode")
            .field("selector", &self.selector)
            .field("name", &self.name)
            .field("text", &self.text)
            .field("clickable", &self.clickable)
            .field("metadata", &self.metadata.is_some())
            .field("attribute_computers", &self.attribute_computers.keys().collect::<Vec<_>>())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
