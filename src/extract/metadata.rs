use crate::dom::{LiveDocument, NodeId};
use crate::error::Result;
use crate::extract::ExtractorConfig;
use crate::recipe::RecipeNode;
use indexmap::IndexMap;

/// Collected metadata payloads grouped by record name, in document order
pub type PageMeta = IndexMap<String, Vec<serde_json::Value>>;

/// Run the recipe's metadata generator and tag the record onto the live node
///
/// Returns the record name when one was written. A generator that produces
/// nothing or fails leaves the node untouched.
pub fn extract_metadata(
    doc: &mut dyn LiveDocument,
    node: NodeId,
    recipe: &RecipeNode,
    config: &ExtractorConfig,
) -> Result<Option<String>> {
    let Some(generator) = &recipe.metadata else {
        return Ok(None);
    };

    let record = match generator.generate(&*doc, node) {
        Ok(Some(record)) => record,
        Ok(None) => return Ok(None),
        Err(e) => {
            log::warn!("Metadata generator of '{}' failed on {}: {}", recipe.selector, node, e);
            return Ok(None);
        }
    };

    let payload = serde_json::to_string(&record.payload)?;
    doc.set_attribute(node, &config.meta_name_attribute, &record.name)?;
    doc.set_attribute(node, &config.meta_data_attribute, &payload)?;
    Ok(Some(record.name))
}

/// Gather every metadata record tagged onto the document
///
/// Payloads that are not valid JSON are logged and skipped.
pub fn collect_page_meta(doc: &dyn LiveDocument, config: &ExtractorConfig) -> Result<PageMeta> {
    let mut meta = PageMeta::new();
    let selector = format!("[{}]", config.meta_name_attribute);

    for node in doc.query(doc.root(), &selector, false)? {
        let Some(name) = doc.attribute(node, &config.meta_name_attribute)? else {
            continue;
        };
        let raw = doc.attribute(node, &config.meta_data_attribute)?.unwrap_or_default();
        match serde_json::from_str(&raw) {
            Ok(payload) => meta.entry(name).or_default().push(payload),
            Err(e) => log::warn!("Skipping metadata '{}' on {}: invalid payload: {}", name, node, e),
        }
    }
    Ok(meta)
}
