//! Extraction engine
//!
//! One pass over a page selects the page's recipe, walks it against the live
//! document and produces:
//! - an [`OutputNode`] tree (simplified, annotated markup)
//! - entries in the [`InteractionRegistry`] for every tagged interactive node
//! - metadata records attached to live nodes, later gathered by [`collect_page_meta`]
//!
//! [`RecipeEngine`] bundles the catalog, the settings and the registry behind
//! the three outward operations: `select_and_process`, `collect_meta` and
//! `mark_visible`.

pub mod attributes;
pub mod config;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod registry;
pub mod text;
pub mod transducer;
pub mod visibility;

pub use config::ExtractorConfig;
pub use metadata::{PageMeta, collect_page_meta};
pub use output::{OutputChild, OutputNode};
pub use registry::InteractionRegistry;
pub use transducer::TreeTransducer;

use crate::dom::LiveDocument;
use crate::error::Result;
use crate::recipe::{CatalogFile, FunctionRegistry, PageRecipeCatalog};
use std::path::Path;

/// Recipe catalog, settings and interaction registry of one host
#[derive(Debug, Default)]
pub struct RecipeEngine {
    catalog: PageRecipeCatalog,
    config: ExtractorConfig,
    registry: InteractionRegistry,
}

impl RecipeEngine {
    pub fn new(catalog: PageRecipeCatalog) -> Self {
        Self { catalog, ..Default::default() }
    }

    /// Builder method: replace the settings
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build an engine from a JSON catalog file's contents
    pub fn from_json(json: &str, functions: &FunctionRegistry) -> Result<Self> {
        Self::from_catalog_file(CatalogFile::from_json(json)?, functions)
    }

    /// Build an engine from a JSON catalog file on disk
    pub fn load(path: impl AsRef<Path>, functions: &FunctionRegistry) -> Result<Self> {
        Self::from_catalog_file(CatalogFile::load(path)?, functions)
    }

    fn from_catalog_file(file: CatalogFile, functions: &FunctionRegistry) -> Result<Self> {
        let catalog = file.build_catalog(functions)?;
        log::debug!("Loaded catalog with {} page recipes", catalog.len());
        Ok(Self::new(catalog).with_config(file.config))
    }

    /// Run one pass over `doc` and return the output tree
    ///
    /// The root recipe's selector is resolved from the document root; when it
    /// matches nothing the document root itself is processed.
    pub fn process_page(&mut self, doc: &mut dyn LiveDocument, current_path: &str) -> Result<OutputNode> {
        let recipe = self.catalog.select(&*doc, current_path)?;

        let root = doc.root();
        let start = match doc.query_first(root, &recipe.selector)? {
            Some(node) => node,
            None => {
                log::warn!("Root recipe '{}' matched nothing, processing the document root", recipe.selector);
                root
            }
        };

        TreeTransducer::new(doc, &self.config, &mut self.registry).process(start, recipe, "", 0)
    }

    /// Run one pass over `doc` and return the output markup
    pub fn select_and_process(&mut self, doc: &mut dyn LiveDocument, current_path: &str) -> Result<String> {
        Ok(self.process_page(doc, current_path)?.to_markup())
    }

    /// Gather metadata records attached to `doc` by earlier passes
    pub fn collect_meta(&self, doc: &dyn LiveDocument) -> Result<PageMeta> {
        collect_page_meta(doc, &self.config)
    }

    /// Markup of a snapshot of `doc` with visible interactive elements marked
    pub fn mark_visible(&self, doc: &dyn LiveDocument) -> Result<String> {
        visibility::mark_visible(doc, &self.config)
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InteractionRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PageRecipeCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::error::ExtractError;
    use crate::recipe::{MatchRule, RecipeNode};

    fn cart_page() -> MemoryDocument {
        MemoryDocument::parse_html(
            r#"<html><body>
                <div id="sc-active-cart">
                    <div class="sc-list-item"><span class="title">Electric Kettle</span></div>
                    <div class="sc-list-item"><span class="title">Toaster</span></div>
                </div>
            </body></html>"#,
        )
    }

    fn engine() -> RecipeEngine {
        RecipeEngine::new(PageRecipeCatalog::new().with_page(
            MatchRule::path_with_ref("/cart"),
            RecipeNode::new("#sc-active-cart").name("cart").child(
                RecipeNode::new(".sc-list-item").text_selector(".title").attach_text().name_from_text().clickable(),
            ),
        ))
    }

    #[test]
    fn test_select_and_process() {
        let mut doc = cart_page();
        let mut engine = engine();

        let markup = engine.select_and_process(&mut doc, "/cart/ref=nav_cart").unwrap();

        assert!(markup.starts_with(r#"<div name="cart"><div name="cart.electric_kettle">"#));
        assert!(markup.contains(r#"name="cart.electric_kettle""#));
        assert_eq!(engine.registry().clickable_names().collect::<Vec<_>>(), vec!["cart.electric_kettle", "cart.toaster"]);
    }

    #[test]
    fn test_no_matching_recipe() {
        let mut doc = cart_page();
        let err = engine().select_and_process(&mut doc, "/cart2").unwrap_err();
        assert!(matches!(err, ExtractError::NoMatchingRecipe { ref path } if path == "/cart2"));
    }

    #[test]
    fn test_root_falls_back_to_document_root() {
        let mut doc = cart_page();
        let mut engine = RecipeEngine::new(
            PageRecipeCatalog::new().with_page(MatchRule::path("/"), RecipeNode::new("#missing").name("page")),
        );

        let output = engine.process_page(&mut doc, "/").unwrap();

        assert_eq!(output.tag_name, "html");
        assert_eq!(output.name(), Some("page"));
    }

    #[test]
    fn test_registry_survives_passes() {
        let mut engine = engine();
        engine.select_and_process(&mut cart_page(), "/cart").unwrap();

        let mut emptied = MemoryDocument::parse_html(r#"<div id="sc-active-cart"></div>"#);
        engine.select_and_process(&mut emptied, "/cart").unwrap();

        assert!(engine.registry().clickable("cart.toaster").is_some());
        engine.registry_mut().clear();
        assert!(engine.registry().is_empty());
    }
}
