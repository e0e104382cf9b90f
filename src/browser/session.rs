//! Browser session lifecycle
//!
//! Wraps a chromiumoxide `Browser` together with its spawned event-handler
//! task. The handler MUST be aborted when the session ends or it keeps
//! running after the browser is gone; `Drop` takes care of the abort.

use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::handler::Handler;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BrowserError, BrowserResult};
use crate::BrowserConfig;

/// Handle to a running Chrome instance, passed into agents on construction.
pub struct BrowserSession {
    id: Uuid,
    browser: Browser,
    handler: Option<JoinHandle<()>>,
}

impl BrowserSession {
    /// Launch a local Chrome with the configured headless mode and window
    /// size.
    pub async fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        info!("Launching browser session (headless: {})", config.headless);

        let mut config_builder = BrowserConfigBuilder::default()
            .window_size(config.window.width, config.window.height);
        if config.headless {
            config_builder = config_builder.headless_mode(HeadlessMode::default());
        } else {
            config_builder = config_builder.with_head();
        }
        let browser_config = config_builder.build().map_err(BrowserError::LaunchFailed)?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        Ok(Self::wrap(browser, handler))
    }

    /// Attach to an already-running Chrome over its CDP websocket endpoint.
    pub async fn connect(ws_url: &str) -> BrowserResult<Self> {
        info!("Connecting browser session to {}", ws_url);

        let (browser, handler) = Browser::connect(ws_url)
            .await
            .map_err(|e| BrowserError::ConnectFailed(e.to_string()))?;

        Ok(Self::wrap(browser, handler))
    }

    fn wrap(browser: Browser, mut handler: Handler) -> Self {
        // Drain CDP events until the browser goes away
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    // Chrome sends CDP events chromiumoxide does not recognize;
                    // those deserialization failures are not fatal
                    let benign = message
                        .contains("data did not match any variant of untagged enum Message")
                        || message.contains("Failed to deserialize WS response");
                    if !benign {
                        warn!("Browser handler error: {:?}", e);
                    }
                }
            }
            debug!("browser event handler finished");
        });

        Self {
            id: Uuid::new_v4(),
            browser,
            handler: Some(handle),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Open a new page and navigate it to `url`.
    pub async fn new_page(&self, url: &str) -> BrowserResult<Page> {
        self.browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))
    }

    /// The first open page, or a fresh blank page when none exist.
    pub async fn current_page(&self) -> BrowserResult<Page> {
        let pages = self
            .browser
            .pages()
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        if let Some(page) = pages.into_iter().next() {
            Ok(page)
        } else {
            self.browser
                .new_page("about:blank")
                .await
                .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))
        }
    }

    /// Shut down Chrome and stop the event handler.
    pub async fn close(mut self) -> BrowserResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed(e.to_string()))?;
        let _ = self.browser.wait().await;

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            debug!("Dropping BrowserSession {} - aborting handler task", self.id);
            handler.abort();
        }
    }
}
