//! Offline analysis over a previously written set report.
//!
//! Revenue here comes from its own [`RevenueModel`], deliberately separate
//! from the grade yield inside [`crate::ProfitabilityModel`]. The two default
//! to the same 3/3/4 weights but are configured independently.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::csv::{parse_rows, write_row, CsvError};
use crate::report::{
    format_price, format_profit, COL_CARD_URL, COL_EXPECTED_PROFIT, COL_PSA10_PRICE,
    COL_PSA8_PRICE, COL_PSA9_PRICE, COL_RAW_PRICE, REPORT_HEADER,
};

pub const COL_TOTAL_REVENUE: &str = "Total Revenue";
pub const COL_PROFIT_MARGIN: &str = "Profit Margin (%)";

/// Grade weights used to project gross revenue for a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueModel {
    pub psa10_weight: u32,
    pub psa9_weight: u32,
    pub psa8_weight: u32,
}

impl Default for RevenueModel {
    fn default() -> Self {
        Self {
            psa10_weight: 3,
            psa9_weight: 3,
            psa8_weight: 4,
        }
    }
}

impl RevenueModel {
    #[must_use]
    pub fn total_revenue(&self, row: &ReportRow) -> Decimal {
        Decimal::from(self.psa10_weight) * row.psa10_price
            + Decimal::from(self.psa9_weight) * row.psa9_price
            + Decimal::from(self.psa8_weight) * row.psa8_price
    }
}

/// One data row read back from a report CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub card_url: String,
    pub raw_price: Decimal,
    pub psa8_price: Decimal,
    pub psa9_price: Decimal,
    pub psa10_price: Decimal,
    pub expected_profit: Decimal,
}

impl ReportRow {
    fn cells(&self) -> [String; 6] {
        [
            self.card_url.clone(),
            format_price(Some(self.raw_price)),
            format_price(Some(self.psa8_price)),
            format_price(Some(self.psa9_price)),
            format_price(Some(self.psa10_price)),
            format_profit(self.expected_profit),
        ]
    }
}

/// A report row with the derived revenue columns attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedRow {
    pub row: ReportRow,
    pub total_revenue: Decimal,
    /// `None` when total revenue is zero.
    pub profit_margin_pct: Option<Decimal>,
}

/// Parses report CSV text, locating columns by header name.
///
/// # Errors
///
/// - [`CsvError::Empty`] if there is no header row.
/// - [`CsvError::MissingColumn`] if a report column is absent.
/// - [`CsvError::InvalidNumber`] if a price or profit cell does not parse.
pub fn read_report(text: &str) -> Result<Vec<ReportRow>, CsvError> {
    let mut rows = parse_rows(text).into_iter();
    let header = rows.next().ok_or(CsvError::Empty)?;

    let index_of = |name: &str| -> Result<usize, CsvError> {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
    };
    let [url_idx, raw_idx, psa8_idx, psa9_idx, psa10_idx, profit_idx] = [
        index_of(COL_CARD_URL)?,
        index_of(COL_RAW_PRICE)?,
        index_of(COL_PSA8_PRICE)?,
        index_of(COL_PSA9_PRICE)?,
        index_of(COL_PSA10_PRICE)?,
        index_of(COL_EXPECTED_PROFIT)?,
    ];

    rows.enumerate()
        .map(|(i, cells)| {
            // Row numbers are 1-based and count the header.
            let row_number = i + 2;
            let cell = |idx: usize| cells.get(idx).map_or("", |c| c.trim());
            let number = |idx: usize, column: &str| -> Result<Decimal, CsvError> {
                Decimal::from_str(cell(idx)).map_err(|_| CsvError::InvalidNumber {
                    row: row_number,
                    column: column.to_string(),
                    value: cell(idx).to_string(),
                })
            };
            Ok(ReportRow {
                card_url: cell(url_idx).to_string(),
                raw_price: number(raw_idx, COL_RAW_PRICE)?,
                psa8_price: number(psa8_idx, COL_PSA8_PRICE)?,
                psa9_price: number(psa9_idx, COL_PSA9_PRICE)?,
                psa10_price: number(psa10_idx, COL_PSA10_PRICE)?,
                expected_profit: number(profit_idx, COL_EXPECTED_PROFIT)?,
            })
        })
        .collect()
}

/// Attaches total revenue and profit margin to every row, preserving order.
#[must_use]
pub fn with_metrics(rows: &[ReportRow], model: &RevenueModel) -> Vec<AnalyzedRow> {
    rows.iter()
        .map(|row| {
            let total_revenue = model.total_revenue(row);
            let profit_margin_pct = (!total_revenue.is_zero())
                .then(|| row.expected_profit / total_revenue * Decimal::ONE_HUNDRED);
            AnalyzedRow {
                row: row.clone(),
                total_revenue,
                profit_margin_pct,
            }
        })
        .collect()
}

/// Rows sorted by expected profit, highest first. Ties keep file order.
#[must_use]
pub fn sorted_by_profit(rows: &[ReportRow]) -> Vec<ReportRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.expected_profit.cmp(&a.expected_profit));
    sorted
}

/// Rows whose expected profit is strictly above `threshold`, in file order.
#[must_use]
pub fn filter_above(rows: &[ReportRow], threshold: Decimal) -> Vec<ReportRow> {
    rows.iter()
        .filter(|r| r.expected_profit > threshold)
        .cloned()
        .collect()
}

/// Descriptive statistics over the expected-profit column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitSummary {
    pub count: usize,
    pub mean: Decimal,
    pub median: Decimal,
    pub max: Decimal,
    pub min: Decimal,
}

impl ProfitSummary {
    /// Returns `None` for an empty report.
    #[must_use]
    pub fn from_rows(rows: &[ReportRow]) -> Option<Self> {
        let mut profits: Vec<Decimal> = rows.iter().map(|r| r.expected_profit).collect();
        if profits.is_empty() {
            return None;
        }
        profits.sort();

        let count = profits.len();
        let sum: Decimal = profits.iter().sum();
        let mean = sum / Decimal::from(count);
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (profits[mid - 1] + profits[mid]) / Decimal::TWO
        } else {
            profits[mid]
        };

        Some(Self {
            count,
            mean,
            median,
            max: profits[count - 1],
            min: profits[0],
        })
    }
}

impl std::fmt::Display for ProfitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cards: {}", self.count)?;
        writeln!(f, "Average Expected Profit: ${}", format_profit(self.mean))?;
        writeln!(f, "Median Expected Profit: ${}", format_profit(self.median))?;
        writeln!(f, "Maximum Expected Profit: ${}", format_profit(self.max))?;
        write!(f, "Minimum Expected Profit: ${}", format_profit(self.min))
    }
}

/// Presentation settings for [`render_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Print card URLs in full instead of truncating them.
    pub full_width: bool,
    /// Maximum number of rows to print; `None` prints everything.
    pub max_rows: Option<usize>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            full_width: false,
            max_rows: Some(10),
        }
    }
}

const TRUNCATED_URL_WIDTH: usize = 50;

/// Formats rows as an aligned text table of URL, profit, revenue, and margin.
#[must_use]
pub fn render_table(rows: &[AnalyzedRow], options: DisplayOptions) -> String {
    let shown = options.max_rows.unwrap_or(rows.len()).min(rows.len());
    let urls: Vec<String> = rows[..shown]
        .iter()
        .map(|r| {
            let url = &r.row.card_url;
            if options.full_width || url.chars().count() <= TRUNCATED_URL_WIDTH {
                url.clone()
            } else {
                let head: String = url.chars().take(TRUNCATED_URL_WIDTH - 3).collect();
                format!("{head}...")
            }
        })
        .collect();
    let url_width = urls
        .iter()
        .map(|u| u.chars().count())
        .chain(std::iter::once(COL_CARD_URL.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<url_width$}  {:>15}  {:>15}  {:>17}",
        COL_CARD_URL, COL_EXPECTED_PROFIT, COL_TOTAL_REVENUE, COL_PROFIT_MARGIN
    );
    for (url, r) in urls.iter().zip(rows) {
        let margin = r
            .profit_margin_pct
            .map_or_else(|| "-".to_string(), format_profit);
        let _ = writeln!(
            out,
            "{:<url_width$}  {:>15}  {:>15}  {:>17}",
            url,
            format_profit(r.row.expected_profit),
            format_profit(r.total_revenue),
            margin
        );
    }
    if shown < rows.len() {
        let _ = writeln!(out, "... {} more rows", rows.len() - shown);
    }
    out
}

/// Writes rows using the plain report layout.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_rows<W: Write>(w: &mut W, rows: &[ReportRow]) -> io::Result<()> {
    write_row(w, &REPORT_HEADER)?;
    for row in rows {
        write_row(w, &row.cells())?;
    }
    w.flush()
}

/// Writes rows with the two derived columns appended.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_rows_with_metrics<W: Write>(w: &mut W, rows: &[AnalyzedRow]) -> io::Result<()> {
    let mut header: Vec<&str> = REPORT_HEADER.to_vec();
    header.extend([COL_TOTAL_REVENUE, COL_PROFIT_MARGIN]);
    write_row(w, &header)?;
    for r in rows {
        let mut cells: Vec<String> = r.row.cells().into();
        cells.push(format_profit(r.total_revenue));
        cells.push(r.profit_margin_pct.map(format_profit).unwrap_or_default());
        write_row(w, &cells)?;
    }
    w.flush()
}

/// Orders analyzed rows the same way as [`sorted_by_profit`].
#[must_use]
pub fn sort_analyzed(mut rows: Vec<AnalyzedRow>) -> Vec<AnalyzedRow> {
    rows.sort_by(|a, b| b.row.expected_profit.cmp(&a.row.expected_profit));
    rows
}
