//! CSV layout of a set report and the naming rules for its output file.
//!
//! The header is consumed by the `analyze` pass by column name, so it must not
//! drift.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::card::{ProfitEstimate, SetReport};
use crate::csv::write_row;

pub const COL_CARD_URL: &str = "Card URL";
pub const COL_RAW_PRICE: &str = "Raw Price";
pub const COL_PSA8_PRICE: &str = "PSA 8 Price";
pub const COL_PSA9_PRICE: &str = "PSA 9 Price";
pub const COL_PSA10_PRICE: &str = "PSA 10 Price";
pub const COL_EXPECTED_PROFIT: &str = "Expected Profit";

pub const REPORT_HEADER: [&str; 6] = [
    COL_CARD_URL,
    COL_RAW_PRICE,
    COL_PSA8_PRICE,
    COL_PSA9_PRICE,
    COL_PSA10_PRICE,
    COL_EXPECTED_PROFIT,
];

/// Renders a price as a plain decimal without trailing zeros (`"12.5"`, `"100"`).
#[must_use]
pub fn format_price(price: Option<Decimal>) -> String {
    price.map(|p| p.normalize().to_string()).unwrap_or_default()
}

/// Rounds a profit to cents (ties to even) and always prints two decimals.
#[must_use]
pub fn format_profit(profit: Decimal) -> String {
    let rounded = profit.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{rounded:.2}")
}

#[must_use]
pub fn report_row(estimate: &ProfitEstimate) -> [String; 6] {
    let record = &estimate.record;
    [
        record.identifier.clone(),
        format_price(record.raw_price),
        format_price(record.psa8_price),
        format_price(record.psa9_price),
        format_price(record.psa10_price),
        format_profit(estimate.expected_profit),
    ]
}

/// Writes the header followed by one row per scored card.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_report<W: Write>(w: &mut W, report: &SetReport) -> io::Result<()> {
    write_row(w, &REPORT_HEADER)?;
    for estimate in &report.rows {
        write_row(w, &report_row(estimate))?;
    }
    w.flush()
}

/// Turns a set identifier into a full listing URL.
///
/// Absolute URLs pass through untouched; anything else is treated as a
/// suffix of `set_url_prefix` (e.g. `"pokemon-temporal-forces"`).
#[must_use]
pub fn resolve_set_url(identifier: &str, set_url_prefix: &str) -> String {
    let identifier = identifier.trim();
    if identifier.starts_with("http://") || identifier.starts_with("https://") {
        identifier.to_string()
    } else {
        format!(
            "{}/{}",
            set_url_prefix.trim_end_matches('/'),
            identifier.trim_start_matches('/')
        )
    }
}

/// Derives the human-readable set name from its listing URL.
///
/// `"https://www.pricecharting.com/console/pokemon-temporal-forces"` with the
/// default prefix becomes `"Pokemon-Temporal-Forces"`.
#[must_use]
pub fn set_name(set_url: &str, set_url_prefix: &str) -> String {
    let remainder = set_url.strip_prefix(set_url_prefix).unwrap_or(set_url);
    let remainder = remainder.trim_matches('/');
    title_case(remainder).replace(['/', '\\'], "-")
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
///
/// Digits and punctuation both end a run, so `"sv3pt5"` becomes `"Sv3Pt5"`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[must_use]
pub fn report_path(output_dir: &Path, set_name: &str) -> PathBuf {
    output_dir.join(format!("{set_name}.csv"))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::card::CardPriceRecord;

    const PREFIX: &str = "https://www.pricecharting.com/console/";

    fn scored(url: &str, profit: Decimal) -> ProfitEstimate {
        ProfitEstimate {
            record: CardPriceRecord {
                identifier: url.to_string(),
                raw_price: Some(dec!(10.00)),
                psa8_price: Some(dec!(20.5)),
                psa9_price: Some(dec!(40)),
                psa10_price: Some(dec!(1234.56)),
            },
            expected_profit: profit,
        }
    }

    #[test]
    fn header_matches_analysis_columns() {
        assert_eq!(
            REPORT_HEADER.join(","),
            "Card URL,Raw Price,PSA 8 Price,PSA 9 Price,PSA 10 Price,Expected Profit"
        );
    }

    #[test]
    fn format_profit_pads_to_two_decimals() {
        assert_eq!(format_profit(dec!(75)), "75.00");
        assert_eq!(format_profit(dec!(-3.1)), "-3.10");
    }

    #[test]
    fn format_profit_rounds_half_to_even() {
        assert_eq!(format_profit(dec!(76.1322)), "76.13");
        assert_eq!(format_profit(dec!(1.005)), "1.00");
        assert_eq!(format_profit(dec!(1.015)), "1.02");
    }

    #[test]
    fn format_price_strips_trailing_zeros() {
        assert_eq!(format_price(Some(dec!(10.00))), "10");
        assert_eq!(format_price(Some(dec!(20.50))), "20.5");
        assert_eq!(format_price(None), "");
    }

    #[test]
    fn write_report_emits_header_and_rows_in_order() {
        let report = SetReport::new(
            "Pokemon-Test",
            vec![
                scored("https://x.test/a", dec!(75)),
                scored("https://x.test/b", dec!(-12.345)),
            ],
        );
        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], REPORT_HEADER.join(","));
        assert_eq!(lines[1], "https://x.test/a,10,20.5,40,1234.56,75.00");
        assert_eq!(lines[2], "https://x.test/b,10,20.5,40,1234.56,-12.34");
    }

    #[test]
    fn resolve_set_url_appends_bare_identifier() {
        assert_eq!(
            resolve_set_url("pokemon-temporal-forces", PREFIX),
            "https://www.pricecharting.com/console/pokemon-temporal-forces"
        );
    }

    #[test]
    fn resolve_set_url_keeps_absolute_url() {
        let url = "https://www.pricecharting.com/console/pokemon-fusion-strike";
        assert_eq!(resolve_set_url(url, PREFIX), url);
    }

    #[test]
    fn set_name_strips_prefix_and_title_cases() {
        assert_eq!(
            set_name(
                "https://www.pricecharting.com/console/pokemon-temporal-forces",
                PREFIX
            ),
            "Pokemon-Temporal-Forces"
        );
    }

    #[test]
    fn set_name_without_known_prefix_replaces_separators() {
        assert_eq!(
            set_name("https://other.example/sets/base", PREFIX),
            "Https:--Other.Example-Sets-Base"
        );
    }

    #[test]
    fn title_case_restarts_after_digits() {
        assert_eq!(title_case("pokemon-sv3pt5"), "Pokemon-Sv3Pt5");
        assert_eq!(title_case("POKEMON-151"), "Pokemon-151");
    }

    #[test]
    fn report_path_appends_csv_extension() {
        assert_eq!(
            report_path(Path::new("out"), "Pokemon-Temporal-Forces"),
            PathBuf::from("out/Pokemon-Temporal-Forces.csv")
        );
    }
}
