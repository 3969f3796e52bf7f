//! CLI entry point for the faithfulness rater.
//!
//! Aggregates insertion/deletion faithfulness metrics for saliency-map
//! experiments from a directory of per-sample JSON result files.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use faithfulness_rater::aggregate::aggregate;
use faithfulness_rater::error::EvalError;
use faithfulness_rater::output::{append_record, print_json, print_summary};
use faithfulness_rater::record::{list_record_paths, load_record};
use faithfulness_rater::stats::{IouMasking, SampleStats};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "faithfulness_rater")]
#[command(about = "A tool to aggregate saliency-map faithfulness metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate all result files under <DIR>/json and print the summary
    Evaluate {
        /// Root directory holding the per-sample JSON results
        #[arg(
            long,
            value_name = "DIR",
            default_value = "baseline_results/grounding-dino-lvis-misclassification/HsicAttributionMethod"
        )]
        explanation_dir: PathBuf,

        /// Optional CSV file to append per-sample metrics to
        #[arg(long, value_name = "PATH")]
        per_sample_csv: Option<String>,

        /// Print the summary as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Mask both confidence indicators at IoU > 0.5 instead of
        /// per-threshold masks (0.5 and 0.75)
        #[arg(long, default_value_t = false)]
        legacy_iou_mask: bool,
    },
    /// Compute and print the metrics of a single result file as JSON
    Inspect {
        /// Path to one per-sample JSON result file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Mask both confidence indicators at IoU > 0.5
        #[arg(long, default_value_t = false)]
        legacy_iou_mask: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/faithfulness_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("faithfulness_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            explanation_dir,
            per_sample_csv,
            json,
            legacy_iou_mask,
        } => {
            let result = evaluate(
                &explanation_dir,
                per_sample_csv.as_deref(),
                masking(legacy_iou_mask),
            )?;
            if json {
                print_json(&result)?;
            } else {
                print_summary(&result);
            }
        }
        Commands::Inspect {
            file,
            legacy_iou_mask,
        } => {
            let record = load_record(&file)?;
            let stats = SampleStats::from_record(
                &sample_name(&file),
                &record,
                masking(legacy_iou_mask),
            )
            .map_err(|source| EvalError::Metric {
                path: file.clone(),
                source,
            })?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn masking(legacy: bool) -> IouMasking {
    if legacy {
        IouMasking::LegacyFixed
    } else {
        IouMasking::PerThreshold
    }
}

/// Evaluates every result file under `<explanation_dir>/json` and aggregates
/// the per-sample metrics. Any malformed record aborts the whole run.
#[tracing::instrument(skip(per_sample_csv, masking), fields(dir = %explanation_dir.display()))]
fn evaluate(
    explanation_dir: &Path,
    per_sample_csv: Option<&str>,
    masking: IouMasking,
) -> Result<faithfulness_rater::aggregate::AggregateResult> {
    let json_dir = explanation_dir.join("json");
    let paths = list_record_paths(&json_dir)?;
    if paths.is_empty() {
        bail!("no .json result files found in {}", json_dir.display());
    }
    info!(count = paths.len(), "Result file list loaded");

    let mut all = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let record = load_record(path)?;
        let name = sample_name(path);
        let stats = SampleStats::from_record(&name, &record, masking)
            .map_err(|source| EvalError::Metric {
                path: path.clone(),
                source,
            })?;

        if let Some(csv_path) = per_sample_csv {
            append_record(csv_path, &stats)?;
        }

        debug!(sample = %name, "Sample evaluated");
        if (i + 1) % 500 == 0 {
            info!(processed = i + 1, total = paths.len(), "Progress");
        }

        all.push(stats);
    }

    let result = aggregate(&all)?;
    info!(samples = result.samples, "Aggregation complete");
    Ok(result)
}

fn sample_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}
