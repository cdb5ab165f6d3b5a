//! # dom-recipe
//!
//! Recipe-driven extraction of simplified, named and interaction-indexed trees from live web pages.
//!
//! ## Features
//!
//! - **Recipe Catalog**: ordered page rules (path or content match) choosing the recipe of a page
//! - **Tree Transduction**: walk a recipe in lockstep with the page, producing a simplified output tree
//! - **Semantic Names**: dot-delimited names derived from literals, text or position
//! - **Interaction Registry**: names of clickable targets and inputs, mapped back to their recipes
//! - **Page Metadata**: named JSON records attached to page elements and collected per page
//! - **Visibility Snapshots**: serialized page copies with visible interactive elements marked
//!
//! ## Usage
//!
//! ### Against Parsed HTML
//!
//! ```rust
//! use dom_recipe::{MatchRule, MemoryDocument, PageRecipeCatalog, RecipeEngine, RecipeNode};
//!
//! # fn main() -> dom_recipe::Result<()> {
//! let catalog = PageRecipeCatalog::new().with_page(
//!     MatchRule::path("/cart"),
//!     RecipeNode::new("#cart")
//!         .name("cart")
//!         .child(RecipeNode::new(".item").own_text().attach_text().name_from_text().clickable()),
//! );
//! let mut engine = RecipeEngine::new(catalog);
//!
//! let mut doc = MemoryDocument::parse_html(r#"<div id="cart"><div class="item">Kettle</div></div>"#);
//! let markup = engine.select_and_process(&mut doc, "/cart")?;
//!
//! assert_eq!(markup, r#"<div name="cart"><div name="cart.kettle">Kettle</div></div>"#);
//! assert!(engine.registry().clickable("cart.kettle").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ### Against a Live Browser
//!
//! ```rust,no_run
//! use dom_recipe::{BrowserSession, FunctionRegistry, LaunchOptions, RecipeEngine};
//!
//! # fn main() -> dom_recipe::Result<()> {
//! let mut engine = RecipeEngine::load("catalog.json", &FunctionRegistry::new())?;
//!
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://www.amazon.com/gp/cart/view.html")?;
//! session.wait_for_navigation()?;
//!
//! println!("{}", session.extract(&mut engine)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`recipe`]: recipe nodes, the page catalog, catalog files and function slots
//! - [`extract`]: the transducer, naming and text rules, registry, metadata and visibility
//! - [`dom`]: the live document boundary and the in-memory document
//! - [`browser`]: Chrome session management and the tab-backed document
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod dom;
pub mod error;
pub mod extract;
pub mod recipe;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, TabDocument};
pub use dom::{BoundingBox, ElementNode, LiveDocument, MemoryDocument, NodeId, SnapshotChild};
pub use error::{ExtractError, Result};
pub use extract::{ExtractorConfig, InteractionRegistry, OutputNode, PageMeta, RecipeEngine, TreeTransducer};
pub use recipe::{CatalogFile, FunctionRegistry, MatchRule, MetadataRecord, PageRecipeCatalog, RecipeNode};
