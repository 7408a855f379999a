use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A browser-mediated page session: fetch rendered page source and trigger
/// downloads. Behind a trait so tests can drive the orchestrator without a
/// real browser.
#[async_trait]
pub trait PageSession: Send {
    /// Navigate to `url` and return the rendered page source.
    async fn page_source(&mut self, url: &str) -> Result<String>;

    /// Navigate to `url` to start a download. No page source is produced.
    async fn trigger_download(&mut self, url: &str) -> Result<()>;
}

/// A headless Chrome session with downloads routed to a fixed directory,
/// no prompts. Must be released with [`ChromeSession::close`] on every exit
/// path; an abandoned session leaves a Chrome process behind.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    event_loop: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(chrome_bin: &Path, download_dir: &Path) -> Result<Self> {
        info!("Launching headless Chrome from {:?}", chrome_bin);

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_bin)
            .build()
            .map_err(anyhow::Error::msg)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chrome")?;

        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let download_dir = download_dir
            .canonicalize()
            .context("download directory does not exist")?;

        let behavior = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(download_dir.to_string_lossy())
            .build()
            .map_err(anyhow::Error::msg)?;
        browser
            .execute(behavior)
            .await
            .context("failed to configure download behavior")?;

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open a page")?;

        Ok(Self {
            browser,
            page,
            event_loop,
        })
    }

    /// Shut the browser down and wait for the process to exit.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("failed to close Chrome")?;
        self.browser.wait().await?;
        let _ = self.event_loop.await;
        Ok(())
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn page_source(&mut self, url: &str) -> Result<String> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("failed to navigate to {url}"))?;
        self.page.wait_for_navigation().await?;
        let html = self
            .page
            .content()
            .await
            .with_context(|| format!("failed to read page source of {url}"))?;
        Ok(html)
    }

    async fn trigger_download(&mut self, url: &str) -> Result<()> {
        // Chrome aborts the navigation once the response is handed to the
        // download manager, so a goto error is the expected outcome here.
        if let Err(e) = self.page.goto(url).await {
            debug!("navigation ended for download {url}: {e}");
        }
        Ok(())
    }
}
