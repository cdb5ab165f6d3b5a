use crate::recipe::RecipeNode;
use indexmap::IndexMap;
use std::sync::Arc;

/// Map of semantic names to the recipe nodes of interactive elements
///
/// Names written onto live nodes (`data-clickable-id`, `data-input-id`) are
/// looked up here to find the recipe that produced them.
///
/// The registry is never cleared by the engine: entries from earlier passes
/// stay until a later pass registers the same name again, so lookups may
/// return stale recipes for elements that no longer exist. Hosts that need a
/// clean slate call [`InteractionRegistry::clear`] themselves.
#[derive(Debug, Clone, Default)]
pub struct InteractionRegistry {
    clickables: IndexMap<String, Arc<RecipeNode>>,
    inputs: IndexMap<String, Arc<RecipeNode>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clickable target, replacing any previous entry with this name
    pub fn register_clickable(&mut self, name: impl Into<String>, recipe: Arc<RecipeNode>) {
        let name = name.into();
        if self.clickables.insert(name.clone(), recipe).is_some() {
            log::debug!("Clickable name '{}' re-registered", name);
        }
    }

    /// Register an input target, replacing any previous entry with this name
    pub fn register_input(&mut self, name: impl Into<String>, recipe: Arc<RecipeNode>) {
        let name = name.into();
        if self.inputs.insert(name.clone(), recipe).is_some() {
            log::debug!("Input name '{}' re-registered", name);
        }
    }

    pub fn clickable(&self, name: &str) -> Option<&Arc<RecipeNode>> {
        self.clickables.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&Arc<RecipeNode>> {
        self.inputs.get(name)
    }

    /// Clickable names in first-registration order
    pub fn clickable_names(&self) -> impl Iterator<Item = &str> {
        self.clickables.keys().map(String::as_str)
    }

    /// Input names in first-registration order
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    /// Total number of registered names across both maps
    pub fn len(&self) -> usize {
        self.clickables.len() + self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clickables.is_empty() && self.inputs.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.clickables.clear();
        self.inputs.clear();
    }

    /// Export names and recipe selectors to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let selectors = |map: &IndexMap<String, Arc<RecipeNode>>| -> IndexMap<String, String> {
            map.iter().map(|(name, recipe)| (name.clone(), recipe.selector.clone())).collect()
        };
        serde_json::to_string_pretty(&serde_json::json!({
            "clickables": selectors(&self.clickables),
            "inputs": selectors(&self.inputs),
        }))
    }
}
