use crate::dom::{LiveDocument, NodeId};
use crate::error::Result;
use crate::extract::output::OutputNode;
use crate::recipe::RecipeNode;

/// Copy a live attribute onto the output node when present and non-empty
fn copy_attribute(doc: &dyn LiveDocument, node: NodeId, name: &str, output: &mut OutputNode) -> Result<()> {
    if let Some(value) = doc.attribute(node, name)?.filter(|v| !v.is_empty()) {
        output.set_attribute(name, value);
    }
    Ok(())
}

/// Fill the output node's attributes, in order: the allow-list, the recipe's
/// kept attributes, class/id overrides, then attribute computers.
pub fn compose_attributes(
    doc: &dyn LiveDocument,
    node: NodeId,
    recipe: &RecipeNode,
    allow_list: &[String],
    output: &mut OutputNode,
) -> Result<()> {
    for name in allow_list.iter().chain(&recipe.keep_attributes) {
        copy_attribute(doc, node, name, output)?;
    }

    if let Some(class) = &recipe.class_override {
        output.set_attribute("class", class.as_str());
    }
    if let Some(id) = &recipe.id_override {
        output.set_attribute("id", id.as_str());
    }

    for (name, computer) in &recipe.attribute_computers {
        match computer.compute(doc, node) {
            Ok(Some(value)) => output.set_attribute(name.as_str(), value),
            Ok(None) => {}
            Err(e) => log::warn!("Attribute computer '{}' of '{}' failed on {}: {}", name, recipe.selector, node, e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::extract::ExtractorConfig;

    fn link() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new("body");
        let root = doc.root();
        let link = doc.append_element(root, "a");
        doc.insert_attribute(link, "href", "/dp/B00X");
        doc.insert_attribute(link, "title", "Kettle");
        doc.insert_attribute(link, "aria-label", "");
        doc.insert_attribute(link, "class", "a-link-normal");
        doc.insert_attribute(link, "role", "link");
        (doc, link)
    }

    fn allow_list() -> Vec<String> {
        ExtractorConfig::default().preserved_attributes
    }

    #[test]
    fn test_allow_list_skips_empty_and_unlisted() {
        let (doc, link) = link();
        let mut output = OutputNode::new("a");
        compose_attributes(&doc, link, &RecipeNode::new("a"), &allow_list(), &mut output).unwrap();

        assert_eq!(output.get_attribute("title"), Some("Kettle"));
        assert_eq!(output.get_attribute("role"), Some("link"));
        assert_eq!(output.get_attribute("aria-label"), None);
        assert_eq!(output.get_attribute("href"), None);
        assert_eq!(output.get_attribute("class"), None);
    }

    #[test]
    fn test_keep_and_overrides() {
        let (doc, link) = link();
        let recipe = RecipeNode::new("a").keep_attribute("href").class("product-link").id("first");
        let mut output = OutputNode::new("a");
        compose_attributes(&doc, link, &recipe, &allow_list(), &mut output).unwrap();

        assert_eq!(output.get_attribute("href"), Some("/dp/B00X"));
        assert_eq!(output.get_attribute("class"), Some("product-link"));
        assert_eq!(output.get_attribute("id"), Some("first"));
    }

    #[test]
    fn test_computers_run_last() {
        let (doc, link) = link();
        let recipe = RecipeNode::new("a")
            .class("product-link")
            .computed_attribute("class", |_: &dyn LiveDocument, _: NodeId| -> Result<Option<String>> {
                Ok(Some("computed".to_string()))
            })
            .computed_attribute("title", |_: &dyn LiveDocument, _: NodeId| -> Result<Option<String>> { Ok(None) });
        let mut output = OutputNode::new("a");
        compose_attributes(&doc, link, &recipe, &allow_list(), &mut output).unwrap();

        assert_eq!(output.get_attribute("class"), Some("computed"));
        assert_eq!(output.get_attribute("title"), Some("Kettle"));
    }

    #[test]
    fn test_idempotent() {
        let (doc, link) = link();
        let recipe = RecipeNode::new("a").keep_attribute("href");
        let mut output = OutputNode::new("a");

        compose_attributes(&doc, link, &recipe, &allow_list(), &mut output).unwrap();
        let once = output.attributes.clone();
        compose_attributes(&doc, link, &recipe, &allow_list(), &mut output).unwrap();

        assert_eq!(output.attributes, once);
    }
}
