use crate::dom::{LiveDocument, NodeId};
use crate::error::Result;
use crate::recipe::{RecipeNode, TextSource};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Apply a format template: the first `{}` receives the text, and a template
/// without a placeholder replaces the text entirely
pub fn apply_format(template: &str, text: &str) -> String {
    if template.contains("{}") { template.replacen("{}", text, 1) } else { template.to_string() }
}

/// Resolve the display text of `node` according to `recipe`
///
/// Missing selector targets yield empty text; extractor failures are logged and
/// treated as empty.
pub fn resolve_text(doc: &dyn LiveDocument, node: NodeId, recipe: &RecipeNode) -> Result<String> {
    let raw = match &recipe.text {
        TextSource::None => String::new(),
        TextSource::Selector(selector) => match doc.query_first(node, selector)? {
            Some(target) => doc.text(target)?,
            None => {
                log::debug!("Text selector '{}' matched nothing below {}", selector, node);
                String::new()
            }
        },
        TextSource::Extractor(extractor) => extractor.extract(doc, node).unwrap_or_else(|e| {
            log::warn!("Text extractor of '{}' failed on {}: {}", recipe.selector, node, e);
            String::new()
        }),
        TextSource::OwnText => doc.text(node)?,
    };

    let text = collapse_whitespace(&raw);
    Ok(match &recipe.text_format {
        Some(template) => apply_format(template, &text),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::error::ExtractError;

    fn product() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new("body");
        let root = doc.root();
        let item = doc.append_element(root, "div");
        doc.insert_attribute(item, "data-asin", "B00X");
        let title = doc.append_element(item, "h2");
        doc.append_text(title, "\n   Electric \t Kettle  ");
        let price = doc.append_element(item, "span");
        doc.append_text(price, " 24.99 ");
        (doc, item)
    }

    #[test]
    fn test_selector_source() {
        let (doc, item) = product();
        let recipe = RecipeNode::new("div").text_selector("h2");
        assert_eq!(resolve_text(&doc, item, &recipe).unwrap(), "Electric Kettle");

        let missing = RecipeNode::new("div").text_selector(".rating");
        assert_eq!(resolve_text(&doc, item, &missing).unwrap(), "");
    }

    #[test]
    fn test_own_text_and_none() {
        let (doc, item) = product();
        assert_eq!(resolve_text(&doc, item, &RecipeNode::new("div").own_text()).unwrap(), "Electric Kettle 24.99");
        assert_eq!(resolve_text(&doc, item, &RecipeNode::new("div")).unwrap(), "");
    }

    #[test]
    fn test_extractor_source() {
        let (doc, item) = product();
        let recipe = RecipeNode::new("div").text_extractor(|doc: &dyn LiveDocument, node: NodeId| -> Result<String> {
            Ok(doc.attribute(node, "data-asin")?.unwrap_or_default())
        });
        assert_eq!(resolve_text(&doc, item, &recipe).unwrap(), "B00X");

        let failing = RecipeNode::new("div").text_extractor(|_: &dyn LiveDocument, _: NodeId| -> Result<String> {
            Err(ExtractError::DocumentFailed("boom".to_string()))
        });
        assert_eq!(resolve_text(&doc, item, &failing).unwrap(), "");
    }

    #[test]
    fn test_format_template() {
        let (doc, item) = product();

        let recipe = RecipeNode::new("div").text_selector("span").text_format("Price: ${} USD");
        assert_eq!(resolve_text(&doc, item, &recipe).unwrap(), "Price: $24.99 USD");

        let fixed = RecipeNode::new("div").text_selector("span").text_format("Buy");
        assert_eq!(resolve_text(&doc, item, &fixed).unwrap(), "Buy");
    }

    #[test]
    fn test_apply_format_first_placeholder_only() {
        assert_eq!(apply_format("{} of {}", "1"), "1 of {}");
        assert_eq!(apply_format("{}", ""), "");
    }
}
