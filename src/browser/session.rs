use crate::{browser::{config::{ConnectionOptions, LaunchOptions},
                      tab_document::TabDocument},
            error::{ExtractError, Result},
            extract::RecipeEngine};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Keep pages from detecting automation
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Default idle timeout is 30 seconds, too short for interactive sessions
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path;
        launch_opts.user_data_dir = options.user_data_dir;
        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| ExtractError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| ExtractError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| ExtractError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| ExtractError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // Visible and focused first, then merely visible
        for check in ["document.visibilityState === 'visible' && document.hasFocus()", "document.visibilityState === 'visible'"] {
            for tab in &tabs {
                match tab.evaluate(check, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => log::debug!("Failed to check tab status: {}", e),
                }
            }
        }

        Err(ExtractError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL using the active tab
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| ExtractError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| ExtractError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Path component of the active tab's URL, used for recipe selection
    pub fn current_path(&self) -> Result<String> {
        url_path(&self.tab()?.get_url())
    }

    /// Live document of the active tab
    pub fn document(&self) -> Result<TabDocument> {
        TabDocument::new(self.tab()?)
    }

    /// Run one extraction pass over the active tab and return the output markup
    pub fn extract(&self, engine: &mut RecipeEngine) -> Result<String> {
        let path = self.current_path()?;
        let mut document = self.document()?;
        log::debug!("Extracting '{}'", path);
        engine.select_and_process(&mut document, &path)
    }
}

/// Path component of `url`
pub(crate) fn url_path(url: &str) -> Result<String> {
    let parsed =
        url::Url::parse(url).map_err(|e| ExtractError::TabOperationFailed(format!("Invalid tab URL '{}': {}", url, e)))?;
    Ok(parsed.path().to_string())
}
