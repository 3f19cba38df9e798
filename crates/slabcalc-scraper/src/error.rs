use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("price section not found on {url}")]
    SectionNotFound { url: String },

    #[error("could not parse {label} price from \"{value}\"")]
    PriceParse { label: String, value: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("WebDriver {context} failed: {reason}")]
    WebDriver { context: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScraperError {
    /// `true` for failures to retrieve a page at all, as opposed to a page
    /// that loaded but did not contain what we needed.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::NotFound { .. }
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::WebDriver { .. }
        )
    }
}
