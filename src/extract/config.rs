use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Attributes copied from live nodes onto output nodes unless overridden
pub const DEFAULT_PRESERVED_ATTRIBUTES: &[&str] =
    &["alt", "title", "type", "value", "role", "aria-label", "aria-hidden", "aria-selected"];

/// Engine settings: the attribute names written onto live documents and the
/// lookup rules for dropdown expansion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Marks clickable live nodes with their semantic name
    pub clickable_attribute: String,

    /// Marks text/number inputs with their semantic name
    pub input_attribute: String,

    /// Marks selection controls with their semantic name
    pub select_attribute: String,

    /// Name of the metadata record attached to a live node
    pub meta_name_attribute: String,

    /// JSON payload of the metadata record attached to a live node
    pub meta_data_attribute: String,

    /// Set on visible interactive nodes of marked snapshots
    pub visible_attribute: String,

    /// Attributes copied to every output node when present and non-empty
    pub preserved_attributes: Vec<String>,

    /// Finds the current-value label of a selection control within its parent
    pub dropdown_label_selector: String,

    /// Tag of the option elements listed for a selection control
    pub dropdown_option_tag: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            clickable_attribute: "data-clickable-id".to_string(),
            input_attribute: "data-input-id".to_string(),
            select_attribute: "data-select-id".to_string(),
            meta_name_attribute: "data-element-meta-name".to_string(),
            meta_data_attribute: "data-element-meta-data".to_string(),
            visible_attribute: "data-visible".to_string(),
            preserved_attributes: DEFAULT_PRESERVED_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
            dropdown_label_selector: ".a-dropdown-prompt".to_string(),
            dropdown_option_tag: "a".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ExtractorConfig =
            serde_json::from_str(r#"{"visible_attribute": "data-in-view", "preserved_attributes": ["href"]}"#).unwrap();

        assert_eq!(config.visible_attribute, "data-in-view");
        assert_eq!(config.preserved_attributes, vec!["href"]);
        assert_eq!(config.clickable_attribute, "data-clickable-id");
        assert_eq!(config.dropdown_option_tag, "a");
    }

    #[test]
    fn test_default_allow_list() {
        let config = ExtractorConfig::default();
        assert_eq!(config.preserved_attributes.len(), 8);
        assert!(config.preserved_attributes.iter().any(|a| a == "aria-selected"));
    }
}
