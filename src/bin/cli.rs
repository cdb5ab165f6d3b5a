//! dom-recipe command line
//!
//! Runs recipe catalogs against saved HTML files or live pages, and prints the
//! catalog file schema.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dom_recipe::recipe::catalog_schema;
use dom_recipe::{BrowserSession, ConnectionOptions, FunctionRegistry, LaunchOptions, LiveDocument, MemoryDocument,
                 RecipeEngine};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dom-recipe")]
#[command(version)]
#[command(about = "Recipe-driven page extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one extraction pass and print the output tree
    Extract {
        /// Recipe catalog (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        browser: BrowserArgs,

        /// Location used for recipe selection (defaults to "/" for files, the URL path for pages)
        #[arg(long, value_name = "PATH")]
        path: Option<String>,

        /// Print the output tree as JSON instead of markup
        #[arg(long)]
        json: bool,

        /// Also print the page metadata collected after the pass
        #[arg(long)]
        meta: bool,

        /// Also print the interaction registry
        #[arg(long)]
        registry: bool,
    },

    /// Print the page with visible interactive elements marked
    Visible {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Print the JSON schema of catalog files
    Schema,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Saved HTML page
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Page to open in Chrome
    #[arg(long, value_name = "URL")]
    url: Option<String>,
}

#[derive(Args)]
struct BrowserArgs {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,
}

impl BrowserArgs {
    fn open(&self, url: &str) -> Result<BrowserSession> {
        let session = match &self.ws_endpoint {
            Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint.as_str()))?,
            None => {
                let mut options = LaunchOptions::new().headless(!self.headed);
                options.chrome_path = self.executable_path.clone();
                options.user_data_dir = self.user_data_dir.clone();
                BrowserSession::launch(options)?
            }
        };

        session.navigate(url)?;
        session.wait_for_navigation()?;
        Ok(session)
    }
}

fn read_html(path: &Path) -> Result<MemoryDocument> {
    let html = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(MemoryDocument::parse_html(&html))
}

fn extract(
    engine: &mut RecipeEngine,
    doc: &mut dyn LiveDocument,
    path: &str,
    json: bool,
    meta: bool,
    registry: bool,
) -> Result<()> {
    let output = engine.process_page(doc, path)?;
    if json {
        println!("{}", output.to_json()?);
    } else {
        println!("{}", output.to_markup());
    }

    if meta {
        println!("{}", serde_json::to_string_pretty(&engine.collect_meta(&*doc)?)?);
    }
    if registry {
        println!("{}", engine.registry().to_json()?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { catalog, source, browser, path, json, meta, registry } => {
            let mut engine = RecipeEngine::load(&catalog, &FunctionRegistry::new())
                .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;

            if let Some(file) = &source.html {
                let mut doc = read_html(file)?;
                let path = path.unwrap_or_else(|| "/".to_string());
                extract(&mut engine, &mut doc, &path, json, meta, registry)?;
            } else if let Some(url) = &source.url {
                let session = browser.open(url)?;
                let path = match path {
                    Some(path) => path,
                    None => session.current_path()?,
                };
                let mut doc = session.document()?;
                extract(&mut engine, &mut doc, &path, json, meta, registry)?;
            }
        }
        Command::Visible { source, browser } => {
            let engine = RecipeEngine::default();
            if let Some(file) = &source.html {
                println!("{}", engine.mark_visible(&read_html(file)?)?);
            } else if let Some(url) = &source.url {
                let session = browser.open(url)?;
                println!("{}", engine.mark_visible(&session.document()?)?);
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&catalog_schema())?);
        }
    }

    Ok(())
}
