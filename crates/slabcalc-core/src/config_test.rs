use std::collections::HashMap;
use std::env::VarError;

use rust_decimal_macros::dec;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn build_with(pairs: &[(&'static str, &'static str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    build_app_config(lookup_from_map(&map))
}

fn assert_invalid(result: Result<AppConfig, ConfigError>, expected_var: &str) {
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn empty_environment_yields_defaults() {
    let cfg = build_with(&[]).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.base_origin, "https://www.pricecharting.com");
    assert_eq!(cfg.set_url_prefix, "https://www.pricecharting.com/console/");
    assert_eq!(cfg.fetch_mode, FetchMode::Plain);
    assert_eq!(cfg.webdriver_url, "http://localhost:9515");
    assert_eq!(cfg.scroll_delay_ms, 2000);
    assert_eq!(cfg.max_scroll_iterations, 200);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "slabcalc/0.1 (grading-profitability)");
    assert_eq!(cfg.output_dir, PathBuf::from("."));
    assert_eq!(cfg.profitability, ProfitabilityModel::default());
}

#[test]
fn fetch_mode_override_is_case_insensitive() {
    let cfg = build_with(&[("SLABCALC_FETCH_MODE", "Automated")]).unwrap();
    assert_eq!(cfg.fetch_mode, FetchMode::Automated);
}

#[test]
fn unknown_fetch_mode_is_rejected() {
    assert_invalid(
        build_with(&[("SLABCALC_FETCH_MODE", "selenium")]),
        "SLABCALC_FETCH_MODE",
    );
}

#[test]
fn model_overrides_are_applied() {
    let cfg = build_with(&[
        ("SLABCALC_GRADING_COST", "18.99"),
        ("SLABCALC_SELLING_FEE_RATE", "0.1325"),
        ("SLABCALC_YIELD_PSA10", "1"),
        ("SLABCALC_YIELD_PSA9", "4"),
        ("SLABCALC_YIELD_PSA8", "5"),
    ])
    .unwrap();
    assert_eq!(cfg.profitability.grading_cost_per_card, dec!(18.99));
    assert_eq!(cfg.profitability.selling_fee_rate, dec!(0.1325));
    assert_eq!(
        cfg.profitability.grade_yield,
        GradeYield {
            psa10_count: 1,
            psa9_count: 4,
            psa8_count: 5,
        }
    );
}

#[test]
fn grading_cost_must_be_a_decimal() {
    assert_invalid(
        build_with(&[("SLABCALC_GRADING_COST", "twenty-five")]),
        "SLABCALC_GRADING_COST",
    );
}

#[test]
fn negative_grading_cost_is_rejected() {
    assert_invalid(
        build_with(&[("SLABCALC_GRADING_COST", "-5")]),
        "SLABCALC_GRADING_COST",
    );
}

#[test]
fn selling_fee_rate_above_one_is_rejected() {
    assert_invalid(
        build_with(&[("SLABCALC_SELLING_FEE_RATE", "15")]),
        "SLABCALC_SELLING_FEE_RATE",
    );
}

#[test]
fn all_zero_grade_yield_is_rejected() {
    assert_invalid(
        build_with(&[
            ("SLABCALC_YIELD_PSA10", "0"),
            ("SLABCALC_YIELD_PSA9", "0"),
            ("SLABCALC_YIELD_PSA8", "0"),
        ]),
        "SLABCALC_YIELD_PSA10",
    );
}

#[test]
fn scroll_iterations_must_be_positive() {
    assert_invalid(
        build_with(&[("SLABCALC_MAX_SCROLL_ITERATIONS", "0")]),
        "SLABCALC_MAX_SCROLL_ITERATIONS",
    );
}

#[test]
fn request_timeout_must_be_numeric() {
    assert_invalid(
        build_with(&[("SLABCALC_REQUEST_TIMEOUT_SECS", "soon")]),
        "SLABCALC_REQUEST_TIMEOUT_SECS",
    );
}
