//! JSON recipe catalogs
//!
//! A catalog file lists page recipes in priority order:
//!
//! ```json
//! {
//!   "config": { "dropdown_option_tag": "a" },
//!   "pages": [
//!     {
//!       "match": { "path": "/cart", "tolerates_ref_suffix": true },
//!       "recipe": {
//!         "selector": "body",
//!         "children": [
//!           { "selector": ".item", "name": "from_text", "text": { "selector": ".title" }, "clickable": true }
//!         ]
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Function slots are given by name and resolved through a [`FunctionRegistry`].

use crate::error::{ExtractError, Result};
use crate::extract::ExtractorConfig;
use crate::recipe::catalog::{MatchRule, PageRecipeCatalog};
use crate::recipe::functions::FunctionRegistry;
use crate::recipe::{NameMode, RecipeNode, TextSource};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Top-level catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// Engine settings (attribute names, dropdown lookup)
    #[serde(default)]
    pub config: ExtractorConfig,

    /// Page recipes, first match wins
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

/// A match rule and the recipe it selects
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    #[serde(rename = "match")]
    pub rule: MatchRule,
    pub recipe: RecipeSpec,
}

/// Text source of a recipe node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextSpec {
    /// Text of the first descendant matching this selector
    Selector(String),
    /// Name of a registered text extractor (or `attr:<name>`)
    Extractor(String),
    /// The node's own text
    Own,
}

/// Naming mode of a recipe node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NameSpec {
    Literal(String),
    FromText,
    FromPosition,
}

/// Serializable form of a [`RecipeNode`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RecipeSpec {
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,
    /// Keep the resolved text on the output node
    pub add_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameSpec>,
    pub clickable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_selector: Option<String>,
    pub keep_attributes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Output attribute name → attribute computer name
    pub computed_attributes: IndexMap<String, String>,
    /// Metadata generator name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub children: Vec<RecipeSpec>,
    pub direct_child_only: bool,
    pub query_from_root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_every: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl RecipeSpec {
    /// Resolve function names and build the recipe tree
    pub fn build(&self, functions: &FunctionRegistry) -> Result<RecipeNode> {
        if self.selector.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("recipe selector must not be empty".to_string()));
        }
        if self.separator_every == Some(0) {
            return Err(ExtractError::InvalidConfig(format!(
                "recipe '{}': separator_every must be at least 1",
                self.selector
            )));
        }

        let text = match &self.text {
            None => TextSource::None,
            Some(TextSpec::Selector(selector)) => TextSource::Selector(selector.clone()),
            Some(TextSpec::Extractor(name)) => TextSource::Extractor(functions.text_extractor(name)?),
            Some(TextSpec::Own) => TextSource::OwnText,
        };

        let name = match &self.name {
            None => NameMode::None,
            Some(NameSpec::Literal(literal)) => NameMode::Literal(literal.clone()),
            Some(NameSpec::FromText) => NameMode::FromText,
            Some(NameSpec::FromPosition) => NameMode::FromPosition,
        };

        let mut attribute_computers = IndexMap::new();
        for (attribute, function) in &self.computed_attributes {
            attribute_computers.insert(attribute.clone(), functions.attribute_computer(function)?);
        }

        let metadata = match &self.metadata {
            Some(function) => Some(functions.metadata_generator(function)?),
            None => None,
        };

        let children = self
            .children
            .iter()
            .map(|child| child.build(functions).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        Ok(RecipeNode {
            selector: self.selector.clone(),
            tag_name: self.tag_name.clone(),
            text,
            text_format: self.text_format.clone(),
            attach_text: self.add_text,
            name,
            clickable: self.clickable,
            click_selector: self.click_selector.clone(),
            keep_attributes: self.keep_attributes.clone(),
            class_override: self.class.clone(),
            id_override: self.id.clone(),
            attribute_computers,
            metadata,
            children,
            direct_child_only: self.direct_child_only,
            query_from_root: self.query_from_root,
            separator_every: self.separator_every,
            empty_placeholder: self.empty_message.clone(),
        })
    }
}

impl CatalogFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build the catalog, resolving every function name
    pub fn build_catalog(&self, functions: &FunctionRegistry) -> Result<PageRecipeCatalog> {
        let mut catalog = PageRecipeCatalog::new();
        for page in &self.pages {
            catalog.push(page.rule.clone(), page.recipe.build(functions)?);
        }
        Ok(catalog)
    }
}

/// JSON schema of the catalog file format
pub fn catalog_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(CatalogFile)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{LiveDocument, NodeId};

    const CART_CATALOG: &str = r##"{
        "config": { "dropdown_option_tag": "li" },
        "pages": [
            {
                "match": { "path": "/cart", "tolerates_ref_suffix": true },
                "recipe": {
                    "selector": "body",
                    "name": { "literal": "cart" },
                    "children": [
                        {
                            "selector": ".item",
                            "name": "from_text",
                            "text": { "selector": ".title" },
                            "clickable": true,
                            "computed_attributes": { "data-sku": "attr:data-asin" },
                            "metadata": "price"
                        }
                    ],
                    "separator_every": 2,
                    "empty_message": "Your cart is empty"
                }
            },
            {
                "match": { "selector": "#search" },
                "recipe": { "selector": "#search", "text": "own", "add_text": true }
            }
        ]
    }"##;

    fn functions() -> FunctionRegistry {
        let mut functions = FunctionRegistry::new();
        functions.register_metadata_generator(
            "price",
            |_: &dyn LiveDocument, _: NodeId| -> Result<Option<crate::recipe::MetadataRecord>> { Ok(None) },
        );
        functions
    }

    #[test]
    fn test_load_catalog() {
        let file = CatalogFile::from_json(CART_CATALOG).unwrap();
        assert_eq!(file.config.dropdown_option_tag, "li");
        assert_eq!(file.config.clickable_attribute, "data-clickable-id");

        let catalog = file.build_catalog(&functions()).unwrap();
        assert_eq!(catalog.len(), 2);

        let cart = &catalog.iter().next().unwrap().recipe;
        assert_eq!(cart.name, NameMode::Literal("cart".to_string()));
        assert_eq!(cart.separator_every, Some(2));
        assert_eq!(cart.empty_placeholder.as_deref(), Some("Your cart is empty"));

        let item = &cart.children[0];
        assert_eq!(item.name, NameMode::FromText);
        assert!(item.clickable);
        assert!(item.metadata.is_some());
        assert!(item.attribute_computers.contains_key("data-sku"));
    }

    #[test]
    fn test_unknown_function_rejected() {
        let file = CatalogFile::from_json(CART_CATALOG).unwrap();
        let err = file.build_catalog(&FunctionRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "pages": [{ "match": { "path": "/" }, "recipe": { "selector": "body", "clikable": true } }] }"#;
        assert!(matches!(CatalogFile::from_json(json), Err(ExtractError::Json(_))));
    }

    #[test]
    fn test_invalid_recipes_rejected() {
        let zero_interval = RecipeSpec { selector: "ul".to_string(), separator_every: Some(0), ..Default::default() };
        assert!(matches!(zero_interval.build(&FunctionRegistry::new()), Err(ExtractError::InvalidConfig(_))));

        let no_selector = RecipeSpec::default();
        assert!(matches!(no_selector.build(&FunctionRegistry::new()), Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn test_catalog_schema() {
        let schema = catalog_schema();
        let text = schema.to_string();
        assert!(text.contains("pages"));
        assert!(text.contains("RecipeSpec"));
    }
}
