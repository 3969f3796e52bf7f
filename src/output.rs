//! Output formatting and persistence for faithfulness metrics.
//!
//! Supports the plain-text stdout summary, JSON serialization, and a
//! per-sample CSV append.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use tracing::debug;

use crate::aggregate::AggregateResult;
use crate::stats::SampleStats;

/// Renders the plain-text summary, every value to 4 decimal places.
pub fn render_summary(result: &AggregateResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Insertion AUC Score: {:.4}\nDeletion AUC Score: {:.4}",
        result.insertion_auc.mean, result.deletion_auc.mean
    );
    let _ = writeln!(
        out,
        "Insertion CLS AUC Score: {:.4}\nDeletion CLS AUC Score: {:.4}",
        result.insertion_cls_auc.mean, result.deletion_cls_auc.mean
    );
    let _ = writeln!(
        out,
        "Insertion IOU AUC Score: {:.4}\nDeletion IOU AUC Score: {:.4}",
        result.insertion_iou_auc.mean, result.deletion_iou_auc.mean
    );
    let _ = writeln!(
        out,
        "Average highest confidence, IOU@0.50: {:.4}, IOU@0.75: {:.4}",
        result.mean_highest_confidence_iou50, result.mean_highest_confidence_iou75
    );
    let _ = writeln!(
        out,
        "Debug successful rate, IOU@0.50: {:.4}, IOU@0.75: {:.4}",
        result.success_rate_iou50, result.success_rate_iou75
    );
    out
}

/// Prints the plain-text summary to stdout.
pub fn print_summary(result: &AggregateResult) {
    print!("{}", render_summary(result));
}

/// Prints an aggregate result as pretty-printed JSON to stdout.
pub fn print_json(result: &AggregateResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Appends a [`SampleStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, stats: &SampleStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}
