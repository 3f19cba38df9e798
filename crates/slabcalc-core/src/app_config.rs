use std::path::PathBuf;

use crate::profit::ProfitabilityModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How listing pages are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Single static HTTP GET of the listing page.
    #[default]
    Plain,
    /// Headless browser over WebDriver, scrolled until no more cards load.
    Automated,
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMode::Plain => write!(f, "plain"),
            FetchMode::Automated => write!(f, "automated"),
        }
    }
}

impl std::str::FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(FetchMode::Plain),
            "automated" => Ok(FetchMode::Automated),
            other => Err(format!("unknown fetch mode '{other}' (expected plain or automated)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Origin that relative card links on a listing page are resolved against.
    pub base_origin: String,
    /// Prepended to bare set identifiers and stripped when naming reports.
    pub set_url_prefix: String,
    pub fetch_mode: FetchMode,
    pub webdriver_url: String,
    pub scroll_delay_ms: u64,
    pub max_scroll_iterations: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub output_dir: PathBuf,
    pub profitability: ProfitabilityModel,
}
