//! Minimal W3C WebDriver client for driving a headless browser.
//!
//! Only the handful of endpoints needed to load a page, run scripts, and read
//! back the rendered source are implemented. Every response is wrapped in a
//! `{"value": ...}` envelope; error responses carry `value.error` and
//! `value.message`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ScraperError;
use crate::scroll::ScrollSurface;

const HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

#[derive(Debug, Deserialize)]
struct Envelope {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Connection settings for a WebDriver endpoint (chromedriver, geckodriver, ...).
#[derive(Clone)]
pub struct WebDriverClient {
    client: Client,
    base_url: Url,
}

impl WebDriverClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built, or
    /// [`ScraperError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Keep exactly one trailing slash so joins append instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Opens a new headless Chrome session.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WebDriver`] if the driver refuses the session,
    /// or [`ScraperError::Http`] if it cannot be reached.
    pub async fn start_session(&self) -> Result<WebDriverSession, ScraperError> {
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": ["--headless", "--no-sandbox", "--disable-dev-shm-usage"]
                    }
                }
            }
        });

        let url = join(&self.base_url, "session")?;
        let value = send(&self.client, Method::POST, url, Some(&capabilities), "new session").await?;
        let session: NewSession =
            serde_json::from_value(value).map_err(|source| ScraperError::Deserialize {
                context: "new session response".to_string(),
                source,
            })?;

        tracing::debug!(session_id = %session.session_id, "started WebDriver session");

        Ok(WebDriverSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session_id: session.session_id,
        })
    }
}

/// An open browser session. Call [`WebDriverSession::quit`] when done; the
/// browser keeps running otherwise.
pub struct WebDriverSession {
    client: Client,
    base_url: Url,
    session_id: String,
}

impl WebDriverSession {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn endpoint(&self, command: &str) -> Result<Url, ScraperError> {
        if command.is_empty() {
            join(&self.base_url, &format!("session/{}", self.session_id))
        } else {
            join(
                &self.base_url,
                &format!("session/{}/{command}", self.session_id),
            )
        }
    }

    /// Navigates to `url` and waits for the driver's page-load strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WebDriver`] or [`ScraperError::Http`].
    pub async fn navigate(&self, url: &str) -> Result<(), ScraperError> {
        let endpoint = self.endpoint("url")?;
        send(
            &self.client,
            Method::POST,
            endpoint,
            Some(&json!({ "url": url })),
            "navigate",
        )
        .await?;
        Ok(())
    }

    /// Runs a synchronous script and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WebDriver`] or [`ScraperError::Http`].
    pub async fn execute(&self, script: &str) -> Result<Value, ScraperError> {
        let endpoint = self.endpoint("execute/sync")?;
        send(
            &self.client,
            Method::POST,
            endpoint,
            Some(&json!({ "script": script, "args": [] })),
            "execute script",
        )
        .await
    }

    /// Serialized DOM of the current page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WebDriver`] if the driver does not return a string.
    pub async fn page_source(&self) -> Result<String, ScraperError> {
        let endpoint = self.endpoint("source")?;
        match send(&self.client, Method::GET, endpoint, None, "page source").await? {
            Value::String(source) => Ok(source),
            other => Err(ScraperError::WebDriver {
                context: "page source".to_string(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Deletes the session, closing the browser.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WebDriver`] or [`ScraperError::Http`].
    pub async fn quit(self) -> Result<(), ScraperError> {
        let endpoint = self.endpoint("")?;
        send(&self.client, Method::DELETE, endpoint, None, "delete session").await?;
        tracing::debug!(session_id = %self.session_id, "closed WebDriver session");
        Ok(())
    }
}

#[async_trait]
impl ScrollSurface for WebDriverSession {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn content_height(&mut self) -> Result<u64, ScraperError> {
        let value = self.execute(HEIGHT_SCRIPT).await?;
        value
            .as_u64()
            // Some drivers report heights as floats.
            .or_else(|| value.as_f64().filter(|h| *h >= 0.0).map(|h| h.round() as u64))
            .ok_or_else(|| ScraperError::WebDriver {
                context: "content height".to_string(),
                reason: format!("expected a number, got {value}"),
            })
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.execute(SCROLL_SCRIPT).await?;
        Ok(())
    }
}

fn join(base: &Url, path: &str) -> Result<Url, ScraperError> {
    base.join(path).map_err(|e| ScraperError::InvalidUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

/// Sends one WebDriver command and unwraps the `value` envelope.
async fn send(
    client: &Client,
    method: Method,
    url: Url,
    body: Option<&Value>,
    context: &str,
) -> Result<Value, ScraperError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    let envelope = serde_json::from_str::<Envelope>(&text);

    if !status.is_success() {
        let value = envelope.map(|e| e.value).unwrap_or(Value::Null);
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(ScraperError::WebDriver {
            context: context.to_string(),
            reason: format!("HTTP {}: {error}: {message}", status.as_u16()),
        });
    }

    envelope
        .map(|e| e.value)
        .map_err(|source| ScraperError::Deserialize {
            context: format!("WebDriver {context} response"),
            source,
        })
}
