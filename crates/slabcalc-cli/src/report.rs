//! `slabcalc report`: enumerate a set, score every card, and write the CSV.
//!
//! Cards are processed one at a time in listing order. A card that cannot be
//! fetched, has no price section, or lacks one of the four prices is logged
//! and skipped; only a failure to load the listing itself aborts the run.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use reqwest::Url;
use slabcalc_core::report::{format_profit, report_path, resolve_set_url, set_name, write_report};
use slabcalc_core::{
    estimate_record, AppConfig, FetchMode, ProfitEstimate, ProfitabilityModel, SetReport,
};
use slabcalc_scraper::{enumerate_card_urls, extract_card_prices, PageSource, ScraperError};

/// Card counts for one report run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReportTotals {
    pub discovered: usize,
    pub included: usize,
    pub skipped: usize,
}

/// Builds the report for the listing at `set_url`.
///
/// # Errors
///
/// Returns the listing fetch error (including WebDriver failures). Per-card
/// errors never surface here.
pub(crate) async fn build_report(
    source: &PageSource,
    set_url: &str,
    base: &Url,
    model: &ProfitabilityModel,
    set_name: &str,
) -> Result<(SetReport, ReportTotals), ScraperError> {
    tracing::info!(set_url, mode = %source.mode(), "loading set listing");
    let listing = source.fetch_listing(set_url).await?;
    let card_urls = enumerate_card_urls(&listing, base);

    let mut totals = ReportTotals {
        discovered: card_urls.len(),
        ..ReportTotals::default()
    };
    let mut rows = Vec::with_capacity(card_urls.len());

    for (index, card_url) in card_urls.iter().enumerate() {
        tracing::info!(
            card_url = %card_url,
            progress = format!("{}/{}", index + 1, totals.discovered),
            "processing card"
        );
        match score_card(source, card_url, model).await {
            Ok(Some(estimate)) => {
                tracing::info!(
                    card_url = %card_url,
                    expected_profit = %format_profit(estimate.expected_profit),
                    "card included"
                );
                rows.push(estimate);
            }
            Ok(None) => totals.skipped += 1,
            Err(e) if e.is_fetch_failure() => {
                tracing::warn!(card_url = %card_url, error = %e, "skipping card: page unavailable");
                totals.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(card_url = %card_url, error = %e, "skipping card: no price data");
                totals.skipped += 1;
            }
        }
    }

    totals.included = rows.len();
    Ok((SetReport::new(set_name, rows), totals))
}

/// Fetches, extracts, and scores one card. `Ok(None)` means the card loaded
/// but is missing at least one price.
async fn score_card(
    source: &PageSource,
    card_url: &str,
    model: &ProfitabilityModel,
) -> Result<Option<ProfitEstimate>, ScraperError> {
    let html = source.fetch_card(card_url).await?;
    let record = extract_card_prices(card_url, &html)?;

    let missing = record.missing_fields();
    if !missing.is_empty() {
        let missing: Vec<String> = missing.iter().map(ToString::to_string).collect();
        tracing::warn!(
            card_url,
            missing = %missing.join(", "),
            "skipping card with incomplete price data"
        );
        return Ok(None);
    }

    Ok(estimate_record(&record, model))
}

/// Runs a full report for `set` and returns the path written.
///
/// # Errors
///
/// Returns an error if the configuration cannot produce a page source, the
/// listing cannot be loaded, or the CSV cannot be written.
pub(crate) async fn run_report(
    config: &AppConfig,
    set: &str,
    mode: FetchMode,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let set_url = resolve_set_url(set, &config.set_url_prefix);
    let name = set_name(&set_url, &config.set_url_prefix);
    let base = Url::parse(&config.base_origin)
        .with_context(|| format!("invalid base origin '{}'", config.base_origin))?;

    let source = PageSource::from_config(config, mode)
        .context("failed to build page source")?;

    let (report, totals) = build_report(&source, &set_url, &base, &config.profitability, &name)
        .await
        .with_context(|| format!("failed to load set listing {set_url}"))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    let path = report_path(output_dir, &report.set_name);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    write_report(&mut BufWriter::new(file), &report)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        set = %report.set_name,
        discovered = totals.discovered,
        written = totals.included,
        skipped = totals.skipped,
        path = %path.display(),
        "report complete"
    );
    println!("Data saved to {}", path.display());

    Ok(path)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
