//! Corpus-level aggregation of per-sample statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EvalError;
use crate::stats::SampleStats;

/// Success-rate cutoffs on the highest-confidence indicators.
const SUCCESS_CUTOFF_IOU50: f64 = 0.35;
const SUCCESS_CUTOFF_IOU75: f64 = 0.25;

/// Mean and population standard deviation for one AUC channel.
#[derive(Debug, Serialize)]
pub struct ChannelSummary {
    pub mean: f64,
    pub stddev: f64,
}

/// Aggregated faithfulness metrics over a whole result directory.
#[derive(Debug, Serialize)]
pub struct AggregateResult {
    pub generated_at: DateTime<Utc>,
    pub samples: usize,

    pub insertion_auc: ChannelSummary,
    pub deletion_auc: ChannelSummary,
    pub insertion_cls_auc: ChannelSummary,
    pub deletion_cls_auc: ChannelSummary,
    pub insertion_iou_auc: ChannelSummary,
    pub deletion_iou_auc: ChannelSummary,

    pub mean_highest_confidence_iou50: f64,
    pub mean_highest_confidence_iou75: f64,
    pub success_rate_iou50: f64,
    pub success_rate_iou75: f64,
}

/// Averages a series of [`SampleStats`] into a single [`AggregateResult`].
///
/// # Errors
///
/// Returns [`EvalError::Empty`] for an empty input; averaging nothing would
/// otherwise surface as a NaN deep in the summary.
pub fn aggregate(stats: &[SampleStats]) -> Result<AggregateResult, EvalError> {
    if stats.is_empty() {
        return Err(EvalError::Empty);
    }

    let channel = |select: fn(&SampleStats) -> f64| -> ChannelSummary {
        let series: Vec<f64> = stats.iter().map(select).collect();
        let avg = mean(&series);
        ChannelSummary {
            mean: avg,
            stddev: stddev(&series, avg),
        }
    };

    let iou50: Vec<f64> = stats.iter().map(|s| s.highest_confidence_iou50).collect();
    let iou75: Vec<f64> = stats.iter().map(|s| s.highest_confidence_iou75).collect();

    Ok(AggregateResult {
        generated_at: Utc::now(),
        samples: stats.len(),

        insertion_auc: channel(|s| s.insertion_auc),
        deletion_auc: channel(|s| s.deletion_auc),
        insertion_cls_auc: channel(|s| s.insertion_cls_auc),
        deletion_cls_auc: channel(|s| s.deletion_cls_auc),
        insertion_iou_auc: channel(|s| s.insertion_iou_auc),
        deletion_iou_auc: channel(|s| s.deletion_iou_auc),

        mean_highest_confidence_iou50: mean(&iou50),
        mean_highest_confidence_iou75: mean(&iou75),
        success_rate_iou50: fraction_above(&iou50, SUCCESS_CUTOFF_IOU50),
        success_rate_iou75: fraction_above(&iou75, SUCCESS_CUTOFF_IOU75),
    })
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

fn fraction_above(values: &[f64], cutoff: f64) -> f64 {
    let hits = values.iter().filter(|v| **v > cutoff).count();
    hits as f64 / values.len() as f64
}
