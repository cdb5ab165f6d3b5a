use crate::dom::LiveDocument;
use crate::error::{ExtractError, Result};
use crate::recipe::RecipeNode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Condition deciding whether a catalog entry applies to the current page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MatchRule {
    /// Matches on the normalized location path
    Path {
        path: String,
        /// Also accept `<path>/ref=...` and `<path>ref=...`
        #[serde(default)]
        tolerates_ref_suffix: bool,
    },
    /// Matches when `selector` finds a node, optionally containing `contains`
    Text {
        selector: String,
        /// Case-insensitive substring required in the found node's text
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contains: Option<String>,
    },
}

impl MatchRule {
    pub fn path(path: impl Into<String>) -> Self {
        MatchRule::Path { path: path.into(), tolerates_ref_suffix: false }
    }

    pub fn path_with_ref(path: impl Into<String>) -> Self {
        MatchRule::Path { path: path.into(), tolerates_ref_suffix: true }
    }

    pub fn text(selector: impl Into<String>) -> Self {
        MatchRule::Text { selector: selector.into(), contains: None }
    }

    pub fn text_containing(selector: impl Into<String>, contains: impl Into<String>) -> Self {
        MatchRule::Text { selector: selector.into(), contains: Some(contains.into()) }
    }

    /// Evaluate the rule against a document and an already normalized path
    pub fn matches(&self, doc: &dyn LiveDocument, normalized_path: &str) -> Result<bool> {
        match self {
            MatchRule::Path { path, tolerates_ref_suffix } => {
                if normalized_path == path {
                    return Ok(true);
                }
                // The separator-less form is accepted as well
                Ok(*tolerates_ref_suffix
                    && (normalized_path.starts_with(&format!("{}/ref=", path))
                        || normalized_path.starts_with(&format!("{}ref=", path))))
            }
            MatchRule::Text { selector, contains } => {
                let Some(found) = doc.query_first(doc.root(), selector)? else {
                    return Ok(false);
                };
                match contains {
                    None => Ok(true),
                    Some(needle) => Ok(doc.text(found)?.to_lowercase().contains(&needle.to_lowercase())),
                }
            }
        }
    }
}

/// Strip trailing slashes, keeping a bare `/` intact
pub fn normalize_path(path: &str) -> &str {
    if path == "/" { path } else { path.trim_end_matches('/') }
}

/// One rule and the recipe it selects
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub rule: MatchRule,
    pub recipe: Arc<RecipeNode>,
}

/// Ordered list of page recipes; the first matching rule wins
#[derive(Debug, Clone, Default)]
pub struct PageRecipeCatalog {
    entries: Vec<CatalogEntry>,
}

impl PageRecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: append a page recipe
    pub fn with_page(mut self, rule: MatchRule, recipe: RecipeNode) -> Self {
        self.push(rule, recipe);
        self
    }

    pub fn push(&mut self, rule: MatchRule, recipe: RecipeNode) {
        self.entries.push(CatalogEntry { rule, recipe: Arc::new(recipe) });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Pick the recipe for the current document and location
    ///
    /// A rule that fails to evaluate is logged and skipped.
    pub fn select(&self, doc: &dyn LiveDocument, current_path: &str) -> Result<&Arc<RecipeNode>> {
        let path = normalize_path(current_path);

        for (position, entry) in self.entries.iter().enumerate() {
            match entry.rule.matches(doc, path) {
                Ok(true) => {
                    log::debug!("Recipe #{} ({:?}) selected for path '{}'", position, entry.rule, path);
                    return Ok(&entry.recipe);
                }
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Failed to evaluate recipe rule #{} ({:?}): {}", position, entry.rule, e);
                }
            }
        }

        Err(ExtractError::NoMatchingRecipe { path: path.to_string() })
    }
}
