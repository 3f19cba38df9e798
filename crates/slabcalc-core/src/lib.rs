//! Domain types, configuration, and the grading profitability model.

pub mod analysis;
pub mod app_config;
pub mod card;
pub mod config;
pub mod csv;
pub mod profit;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, FetchMode};
pub use card::{CardPriceRecord, PriceField, ProfitEstimate, SetReport};
pub use config::{load_app_config, load_app_config_from_env};
pub use csv::CsvError;
pub use profit::{estimate, estimate_record, GradeYield, ProfitabilityModel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
