use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment, FetchMode};
use crate::profit::{GradeYield, ProfitabilityModel};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields the stock
/// pricecharting.com setup with the 3/3/4 grade yield.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_decimal = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        Decimal::from_str(or_default(var, default).trim()).map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SLABCALC_ENV", "development"));
    let log_level = or_default("SLABCALC_LOG_LEVEL", "info");
    let base_origin = or_default("SLABCALC_BASE_ORIGIN", "https://www.pricecharting.com");
    let set_url_prefix = or_default(
        "SLABCALC_SET_URL_PREFIX",
        "https://www.pricecharting.com/console/",
    );
    let fetch_mode = FetchMode::from_str(&or_default("SLABCALC_FETCH_MODE", "plain"))
        .map_err(|reason| invalid("SLABCALC_FETCH_MODE", reason))?;
    let webdriver_url = or_default("SLABCALC_WEBDRIVER_URL", "http://localhost:9515");
    let scroll_delay_ms = parse_u64("SLABCALC_SCROLL_DELAY_MS", "2000")?;
    let max_scroll_iterations = parse_usize("SLABCALC_MAX_SCROLL_ITERATIONS", "200")?;
    let request_timeout_secs = parse_u64("SLABCALC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "SLABCALC_USER_AGENT",
        "slabcalc/0.1 (grading-profitability)",
    );
    let output_dir = PathBuf::from(or_default("SLABCALC_OUTPUT_DIR", "."));

    if max_scroll_iterations == 0 {
        return Err(invalid(
            "SLABCALC_MAX_SCROLL_ITERATIONS",
            "must be at least 1".to_string(),
        ));
    }

    let grading_cost_per_card = parse_decimal("SLABCALC_GRADING_COST", "25")?;
    if grading_cost_per_card.is_sign_negative() {
        return Err(invalid(
            "SLABCALC_GRADING_COST",
            "must not be negative".to_string(),
        ));
    }

    let selling_fee_rate = parse_decimal("SLABCALC_SELLING_FEE_RATE", "0.15")?;
    if selling_fee_rate < Decimal::ZERO || selling_fee_rate > Decimal::ONE {
        return Err(invalid(
            "SLABCALC_SELLING_FEE_RATE",
            format!("{selling_fee_rate} is outside 0..=1"),
        ));
    }

    let grade_yield = GradeYield {
        psa10_count: parse_u32("SLABCALC_YIELD_PSA10", "3")?,
        psa9_count: parse_u32("SLABCALC_YIELD_PSA9", "3")?,
        psa8_count: parse_u32("SLABCALC_YIELD_PSA8", "4")?,
    };
    if grade_yield.batch_size() == 0 {
        return Err(invalid(
            "SLABCALC_YIELD_PSA10",
            "grade yield must contain at least one card".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        base_origin,
        set_url_prefix,
        fetch_mode,
        webdriver_url,
        scroll_delay_ms,
        max_scroll_iterations,
        request_timeout_secs,
        user_agent,
        output_dir,
        profitability: ProfitabilityModel {
            grading_cost_per_card,
            selling_fee_rate,
            grade_yield,
        },
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
