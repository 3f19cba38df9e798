//! `slabcalc analyze`: derive metrics from a finished report CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rust_decimal::Decimal;
use slabcalc_core::analysis::{
    filter_above, read_report, render_table, sort_analyzed, sorted_by_profit, with_metrics,
    write_rows, write_rows_with_metrics, DisplayOptions, ProfitSummary, RevenueModel,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct AnalyzeOptions {
    pub threshold: Decimal,
    pub revenue: RevenueModel,
    pub display: DisplayOptions,
}

/// The three derivative files written beside the input report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnalysisOutputs {
    pub sorted: PathBuf,
    pub filtered: PathBuf,
    pub with_metrics: PathBuf,
}

impl AnalysisOutputs {
    fn beside(input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map_or_else(|| "report".to_string(), |s| s.to_string_lossy().into_owned());
        let dir = input.parent().unwrap_or_else(|| Path::new(""));
        Self {
            sorted: dir.join(format!("{stem}_Sorted.csv")),
            filtered: dir.join(format!("{stem}_Filtered.csv")),
            with_metrics: dir.join(format!("{stem}_With_Metrics.csv")),
        }
    }
}

/// Reads `input`, prints summary statistics and the top cards, and writes the
/// sorted, filtered, and metrics CSVs next to it.
///
/// # Errors
///
/// Returns an error if the report cannot be read or parsed, or if any output
/// file cannot be written.
pub(crate) fn run_analyze(input: &Path, options: &AnalyzeOptions) -> anyhow::Result<AnalysisOutputs> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let rows = read_report(&text).with_context(|| format!("failed to parse {}", input.display()))?;
    tracing::info!(path = %input.display(), rows = rows.len(), "loaded report");

    let sorted = sorted_by_profit(&rows);
    let filtered = filter_above(&rows, options.threshold);
    let analyzed = with_metrics(&rows, &options.revenue);

    match ProfitSummary::from_rows(&rows) {
        Some(summary) => println!("{summary}"),
        None => println!("Report contains no cards"),
    }
    println!(
        "\nCards with expected profit above ${}: {}",
        options.threshold,
        filtered.len()
    );
    println!(
        "\nTop cards by expected profit:\n{}",
        render_table(&sort_analyzed(analyzed.clone()), options.display)
    );

    let outputs = AnalysisOutputs::beside(input);
    write_csv(&outputs.sorted, |w| write_rows(w, &sorted))?;
    write_csv(&outputs.filtered, |w| write_rows(w, &filtered))?;
    write_csv(&outputs.with_metrics, |w| write_rows_with_metrics(w, &analyzed))?;

    tracing::info!(
        sorted = %outputs.sorted.display(),
        filtered = %outputs.filtered.display(),
        with_metrics = %outputs.with_metrics.display(),
        "analysis files written"
    );
    Ok(outputs)
}

fn write_csv<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write(&mut BufWriter::new(file)).with_context(|| format!("failed to write {}", path.display()))
}
