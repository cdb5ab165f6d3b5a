//! Function slots of recipe nodes
//!
//! Recipes can delegate text extraction, metadata generation and attribute
//! derivation to code. Each slot is a trait implemented by plain closures, so
//! recipes built in Rust can pass closures directly while JSON catalogs refer
//! to functions by name through a [`FunctionRegistry`].

use crate::dom::{LiveDocument, NodeId};
use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A named payload produced by a [`MetadataGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub name: String,
    pub payload: serde_json::Value,
}

impl MetadataRecord {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { name: name.into(), payload }
    }
}

/// Computes the display text of a node
pub trait TextExtractor: Send + Sync {
    fn extract(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<String>;
}

/// Produces a metadata record for a node, or nothing
pub trait MetadataGenerator: Send + Sync {
    fn generate(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<Option<MetadataRecord>>;
}

/// Derives one output attribute from a node, or nothing
pub trait AttributeComputer: Send + Sync {
    fn compute(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<Option<String>>;
}

impl<F> TextExtractor for F
where
    F: Fn(&dyn LiveDocument, NodeId) -> Result<String> + Send + Sync,
{
    fn extract(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<String> {
        self(doc, node)
    }
}

impl<F> MetadataGenerator for F
where
    F: Fn(&dyn LiveDocument, NodeId) -> Result<Option<MetadataRecord>> + Send + Sync,
{
    fn generate(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<Option<MetadataRecord>> {
        self(doc, node)
    }
}

impl<F> AttributeComputer for F
where
    F: Fn(&dyn LiveDocument, NodeId) -> Result<Option<String>> + Send + Sync,
{
    fn compute(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<Option<String>> {
        self(doc, node)
    }
}

/// Reads one attribute of the node (`attr:<name>`)
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValue {
    pub attribute: String,
}

impl TextExtractor for AttributeValue {
    fn extract(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<String> {
        Ok(doc.attribute(node, &self.attribute)?.unwrap_or_default())
    }
}

impl AttributeComputer for AttributeValue {
    fn compute(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<Option<String>> {
        doc.attribute(node, &self.attribute)
    }
}

/// Records the node's text under a fixed name (`text:<name>`)
#[derive(Debug, Clone, PartialEq)]
pub struct TextRecord {
    pub name: String,
}

impl MetadataGenerator for TextRecord {
    fn generate(&self, doc: &dyn LiveDocument, node: NodeId) -> Result<Option<MetadataRecord>> {
        let text = crate::extract::text::collapse_whitespace(&doc.text(node)?);
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(MetadataRecord::new(self.name.clone(), serde_json::Value::String(text))))
    }
}

/// Named functions that JSON recipe catalogs can refer to
///
/// Besides registered functions, two built-in name schemes resolve without
/// registration: `attr:<attribute>` (text extractors and attribute computers)
/// and `text:<record name>` (metadata generators).
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    text_extractors: HashMap<String, Arc<dyn TextExtractor>>,
    metadata_generators: HashMap<String, Arc<dyn MetadataGenerator>>,
    attribute_computers: HashMap<String, Arc<dyn AttributeComputer>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_text_extractor(&mut self, name: impl Into<String>, extractor: impl TextExtractor + 'static) {
        self.text_extractors.insert(name.into(), Arc::new(extractor));
    }

    pub fn register_metadata_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl MetadataGenerator + 'static,
    ) {
        self.metadata_generators.insert(name.into(), Arc::new(generator));
    }

    pub fn register_attribute_computer(
        &mut self,
        name: impl Into<String>,
        computer: impl AttributeComputer + 'static,
    ) {
        self.attribute_computers.insert(name.into(), Arc::new(computer));
    }

    pub fn text_extractor(&self, name: &str) -> Result<Arc<dyn TextExtractor>> {
        if let Some(extractor) = self.text_extractors.get(name) {
            return Ok(Arc::clone(extractor));
        }
        match builtin_argument(name, "attr:") {
            Some(attribute) => Ok(Arc::new(AttributeValue { attribute })),
            None => Err(unknown_function("text extractor", name)),
        }
    }

    pub fn metadata_generator(&self, name: &str) -> Result<Arc<dyn MetadataGenerator>> {
        if let Some(generator) = self.metadata_generators.get(name) {
            return Ok(Arc::clone(generator));
        }
        match builtin_argument(name, "text:") {
            Some(record) => Ok(Arc::new(TextRecord { name: record })),
            None => Err(unknown_function("metadata generator", name)),
        }
    }

    pub fn attribute_computer(&self, name: &str) -> Result<Arc<dyn AttributeComputer>> {
        if let Some(computer) = self.attribute_computers.get(name) {
            return Ok(Arc::clone(computer));
        }
        match builtin_argument(name, "attr:") {
            Some(attribute) => Ok(Arc::new(AttributeValue { attribute })),
            None => Err(unknown_function("attribute computer", name)),
        }
    }
}

fn builtin_argument(name: &str, prefix: &str) -> Option<String> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty()).map(str::to_string)
}

fn unknown_function(kind: &str, name: &str) -> ExtractError {
    ExtractError::InvalidConfig(format!("unknown {} '{}'", kind, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn sample() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new("body");
        let root = doc.root();
        let price = doc.append_element(root, "span");
        doc.insert_attribute(price, "data-price", "4.99");
        doc.append_text(price, "  $4.99 ");
        (doc, price)
    }

    #[test]
    fn test_closure_slots() {
        let (doc, price) = sample();
        let extractor = |doc: &dyn LiveDocument, node: NodeId| -> Result<String> { Ok(doc.tag(node)?.to_uppercase()) };
        assert_eq!(extractor.extract(&doc, price).unwrap(), "SPAN");
    }

    #[test]
    fn test_registered_functions_win() {
        let (doc, price) = sample();
        let mut functions = FunctionRegistry::new();
        functions.register_text_extractor("attr:data-price", |_: &dyn LiveDocument, _: NodeId| -> Result<String> {
            Ok("overridden".to_string())
        });

        let extractor = functions.text_extractor("attr:data-price").unwrap();
        assert_eq!(extractor.extract(&doc, price).unwrap(), "overridden");
    }

    #[test]
    fn test_builtin_attribute_functions() {
        let (doc, price) = sample();
        let functions = FunctionRegistry::new();

        let extractor = functions.text_extractor("attr:data-price").unwrap();
        assert_eq!(extractor.extract(&doc, price).unwrap(), "4.99");

        let computer = functions.attribute_computer("attr:missing").unwrap();
        assert_eq!(computer.compute(&doc, price).unwrap(), None);
    }

    #[test]
    fn test_builtin_text_record() {
        let (doc, price) = sample();
        let generator = FunctionRegistry::new().metadata_generator("text:price").unwrap();

        let record = generator.generate(&doc, price).unwrap().unwrap();
        assert_eq!(record, MetadataRecord::new("price", serde_json::json!("$4.99")));
    }

    #[test]
    fn test_unknown_functions() {
        let functions = FunctionRegistry::new();
        assert!(matches!(functions.text_extractor("price"), Err(ExtractError::InvalidConfig(_))));
        assert!(matches!(functions.metadata_generator("attr:x"), Err(ExtractError::InvalidConfig(_))));
        assert!(matches!(functions.attribute_computer("attr:"), Err(ExtractError::InvalidConfig(_))));
    }
}
