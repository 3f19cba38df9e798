//! Page retrieval strategy, selected by [`FetchMode`].
//!
//! Both strategies fetch card pages with a plain GET. They differ only in how
//! the set listing is loaded: a single GET, or a browser session scrolled
//! until the listing stops growing.

use std::time::Duration;

use slabcalc_core::{AppConfig, FetchMode};

use crate::client::PageClient;
use crate::error::ScraperError;
use crate::scroll::scroll_to_exhaustion;
use crate::webdriver::{WebDriverClient, WebDriverSession};

/// Browser settings for scroll-to-load listings.
#[derive(Clone)]
pub struct BrowserListing {
    webdriver: WebDriverClient,
    scroll_delay: Duration,
    max_scroll_iterations: usize,
}

impl BrowserListing {
    #[must_use]
    pub fn new(webdriver: WebDriverClient, scroll_delay: Duration, max_scroll_iterations: usize) -> Self {
        Self {
            webdriver,
            scroll_delay,
            max_scroll_iterations,
        }
    }

    /// Loads `url` in a fresh browser session, scrolls it to exhaustion, and
    /// returns the rendered source.
    ///
    /// The session is always closed before returning, whether loading
    /// succeeded or not. A failure to close is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns the first error from starting the session, navigating,
    /// scrolling, or reading the page source.
    pub async fn load(&self, url: &str) -> Result<String, ScraperError> {
        let mut session = self.webdriver.start_session().await?;
        let result = self.scroll_and_capture(&mut session, url).await;

        let session_id = session.session_id().to_owned();
        if let Err(e) = session.quit().await {
            tracing::warn!(session_id = %session_id, error = %e, "failed to close WebDriver session");
        }

        result
    }

    async fn scroll_and_capture(
        &self,
        session: &mut WebDriverSession,
        url: &str,
    ) -> Result<String, ScraperError> {
        session.navigate(url).await?;
        let outcome =
            scroll_to_exhaustion(session, self.scroll_delay, self.max_scroll_iterations).await?;
        tracing::info!(
            url,
            iterations = outcome.iterations,
            height = outcome.final_height,
            exhausted = outcome.exhausted,
            "listing fully scrolled"
        );
        session.page_source().await
    }
}

/// Where listing and card HTML comes from.
#[derive(Clone)]
pub enum PageSource {
    Plain(PageClient),
    Automated {
        pages: PageClient,
        browser: BrowserListing,
    },
}

impl PageSource {
    /// Builds the strategy named by `mode` from the shared configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if an HTTP client cannot be constructed,
    /// or [`ScraperError::InvalidUrl`] if the WebDriver URL does not parse.
    pub fn from_config(config: &AppConfig, mode: FetchMode) -> Result<Self, ScraperError> {
        let pages = PageClient::new(config.request_timeout_secs, &config.user_agent)?;
        match mode {
            FetchMode::Plain => Ok(PageSource::Plain(pages)),
            FetchMode::Automated => {
                let webdriver =
                    WebDriverClient::new(&config.webdriver_url, config.request_timeout_secs)?;
                Ok(PageSource::Automated {
                    pages,
                    browser: BrowserListing::new(
                        webdriver,
                        Duration::from_millis(config.scroll_delay_ms),
                        config.max_scroll_iterations,
                    ),
                })
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> FetchMode {
        match self {
            PageSource::Plain(_) => FetchMode::Plain,
            PageSource::Automated { .. } => FetchMode::Automated,
        }
    }

    /// Fetches the full set listing, scrolling it first when automated.
    ///
    /// # Errors
    ///
    /// Returns any fetch or WebDriver error.
    pub async fn fetch_listing(&self, url: &str) -> Result<String, ScraperError> {
        match self {
            PageSource::Plain(pages) => pages.fetch_html(url).await,
            PageSource::Automated { browser, .. } => browser.load(url).await,
        }
    }

    /// Fetches a single card page.
    ///
    /// # Errors
    ///
    /// Returns any fetch error.
    pub async fn fetch_card(&self, url: &str) -> Result<String, ScraperError> {
        match self {
            PageSource::Plain(pages) | PageSource::Automated { pages, .. } => {
                pages.fetch_html(url).await
            }
        }
    }
}
