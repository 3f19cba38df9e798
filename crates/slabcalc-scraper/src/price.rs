//! Price extraction from a single card page.
//!
//! The page carries a `<div id="full-prices">` table with one row per grade.
//! Each row's first cell is a label ("Ungraded", "Grade 8", "PSA 10", ...) and
//! the second is a dollar amount, or `-` when the grade has no sales data.

use std::str::FromStr;

use rust_decimal::Decimal;
use slabcalc_core::{CardPriceRecord, PriceField};

use crate::error::ScraperError;
use crate::html::{div_by_id, row_cells, table_rows};

pub const PRICE_SECTION_ID: &str = "full-prices";

/// Value cell content meaning "no data for this grade".
const NO_DATA: &str = "-";

/// Maps a row label onto the price field it feeds.
///
/// Matching is case-sensitive substring search, checked in a fixed order:
/// "Ungraded", then "Grade 8", then "Grade 9", then "PSA 10". The first hit
/// wins, so a label containing both "Ungraded" and "PSA 10" feeds the raw price.
#[must_use]
pub fn classify_label(label: &str) -> Option<PriceField> {
    const LABELS: [(&str, PriceField); 4] = [
        ("Ungraded", PriceField::Raw),
        ("Grade 8", PriceField::Psa8),
        ("Grade 9", PriceField::Psa9),
        ("PSA 10", PriceField::Psa10),
    ];
    LABELS
        .iter()
        .find(|(needle, _)| label.contains(needle))
        .map(|(_, field)| *field)
}

/// Parses a displayed price such as `"$1,234.56"`.
///
/// A leading currency symbol and any thousands separators are dropped.
///
/// # Errors
///
/// Returns [`ScraperError::PriceParse`] if what remains is not a decimal.
pub fn parse_price(field: PriceField, value: &str) -> Result<Decimal, ScraperError> {
    let cleaned: String = value
        .trim()
        .trim_start_matches(['$', '€', '£', '¥'])
        .trim_start()
        .chars()
        .filter(|c| *c != ',')
        .collect();

    Decimal::from_str(&cleaned).map_err(|_| ScraperError::PriceParse {
        label: field.to_string(),
        value: value.to_string(),
    })
}

/// Builds a [`CardPriceRecord`] from one card page.
///
/// Rows with fewer than two cells, a `-` value, or an unrecognized label are
/// skipped. When several rows feed the same field the last one wins. A value
/// that fails to parse is logged and leaves its field untouched; it does not
/// abort the rest of the table.
///
/// # Errors
///
/// Returns [`ScraperError::SectionNotFound`] if the page has no price section.
pub fn extract_card_prices(identifier: &str, html: &str) -> Result<CardPriceRecord, ScraperError> {
    let section = div_by_id(html, PRICE_SECTION_ID).ok_or_else(|| ScraperError::SectionNotFound {
        url: identifier.to_string(),
    })?;

    let mut record = CardPriceRecord::new(identifier);

    for row in table_rows(section) {
        let cells = row_cells(row);
        let [label, value, ..] = cells.as_slice() else {
            continue;
        };

        if value == NO_DATA {
            continue;
        }

        let Some(field) = classify_label(label) else {
            continue;
        };

        match parse_price(field, value) {
            Ok(price) => record.set_price(field, price),
            Err(e) => {
                tracing::warn!(card_url = identifier, error = %e, "skipping unparseable price");
            }
        }
    }

    tracing::debug!(
        card_url = identifier,
        raw = ?record.raw_price,
        psa8 = ?record.psa8_price,
        psa9 = ?record.psa9_price,
        psa10 = ?record.psa10_price,
        "extracted card prices"
    );

    Ok(record)
}
