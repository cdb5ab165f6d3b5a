//! Chrome backend
//!
//! - BrowserSession: launch or attach to Chrome, navigate, run extraction passes
//! - TabDocument: the live document of a tab, behind [`crate::dom::LiveDocument`]

pub mod config;
pub mod session;
pub mod tab_document;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
pub use tab_document::TabDocument;
