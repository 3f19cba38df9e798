//! Static HTTP page fetcher.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Fetches pages with a single blocking-style GET per call.
///
/// Non-2xx responses are typed errors. There is no retry: a failed fetch is
/// reported once and the caller decides whether to skip or abort.
#[derive(Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Creates a `PageClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure, or an unreadable body.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}
