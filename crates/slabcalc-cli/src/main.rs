mod analyze;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use slabcalc_core::{AppConfig, ConfigError, FetchMode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "slabcalc")]
#[command(about = "Estimate the profitability of grading every card in a trading card set")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a set listing and write a profitability report CSV
    Report {
        /// Set identifier: a URL suffix such as `pokemon-temporal-forces`, or a full URL
        set: String,

        /// How to load the set listing (overrides `SLABCALC_FETCH_MODE`)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Directory the report is written to (overrides `SLABCALC_OUTPUT_DIR`)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Derive revenue and margin metrics from an existing report CSV
    Analyze {
        /// Report CSV produced by `slabcalc report`
        csv: PathBuf,

        /// Keep only cards whose expected profit exceeds this amount
        #[arg(long, default_value = "100")]
        threshold: Decimal,

        #[arg(long, default_value_t = 3)]
        psa10_weight: u32,

        #[arg(long, default_value_t = 3)]
        psa9_weight: u32,

        #[arg(long, default_value_t = 4)]
        psa8_weight: u32,

        /// Rows shown in the printed table
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Print every row with untruncated URLs
        #[arg(long)]
        full_width: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Plain,
    Automated,
}

impl From<ModeArg> for FetchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Plain => FetchMode::Plain,
            ModeArg::Automated => FetchMode::Automated,
        }
    }
}

const DEFAULT_LOG_LEVEL: &str = "info";

/// Log filter to fall back on when `RUST_LOG` is unset. An invalid
/// configuration still gets the default level so `analyze` can run.
fn log_directive(config: &Result<AppConfig, ConfigError>) -> &str {
    config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loads `.env` before reading variables, so `RUST_LOG` may come from there too.
    let config = slabcalc_core::load_app_config();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_directive(&config)))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Report {
            set,
            mode,
            output_dir,
        } => {
            let config = config?;
            tracing::debug!(env = %config.env, fetch_mode = %config.fetch_mode, "configuration loaded");
            let mode = mode.map_or(config.fetch_mode, FetchMode::from);
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            report::run_report(&config, &set, mode, &output_dir).await?;
        }
        Commands::Analyze {
            csv,
            threshold,
            psa10_weight,
            psa9_weight,
            psa8_weight,
            top,
            full_width,
        } => {
            if let Err(e) = &config {
                tracing::debug!(error = %e, "configuration invalid; analyze does not use it");
            }
            let options = analyze::AnalyzeOptions {
                threshold,
                revenue: slabcalc_core::analysis::RevenueModel {
                    psa10_weight,
                    psa9_weight,
                    psa8_weight,
                },
                display: slabcalc_core::analysis::DisplayOptions {
                    full_width,
                    max_rows: if full_width { None } else { Some(top) },
                },
            };
            analyze::run_analyze(&csv, &options)?;
        }
    }

    Ok(())
}
