//! Per-sample faithfulness statistics.
//!
//! Builds the insertion and deletion curves for one record and integrates
//! each channel (raw score, classification confidence, IoU) into an AUC,
//! plus the two IoU-masked highest-confidence indicators.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::MetricError;
use crate::metrics::trapezoid_auc;
use crate::record::SampleRecord;

/// How the highest-confidence indicators are masked by IoU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IouMasking {
    /// Mask at IoU > 0.5 for the IOU@0.50 indicator and IoU > 0.75 for
    /// IOU@0.75.
    PerThreshold,
    /// Mask both indicators at IoU > 0.5.
    LegacyFixed,
}

/// Metrics computed for a single result file.
#[derive(Debug, Clone, Serialize)]
pub struct SampleStats {
    pub sample: String,
    pub evaluated_at: DateTime<Utc>,

    pub insertion_auc: f64,
    pub deletion_auc: f64,
    pub insertion_cls_auc: f64,
    pub deletion_cls_auc: f64,
    pub insertion_iou_auc: f64,
    pub deletion_iou_auc: f64,

    pub highest_confidence_iou50: f64,
    pub highest_confidence_iou75: f64,
}

impl SampleStats {
    /// Computes all per-sample metrics from one validated record.
    ///
    /// The insertion curve starts at area 0 with the deletion curve's
    /// terminal value ("zero inserted" equals "fully deleted"); the
    /// deletion curve mirrors this on the reversed axis `1 - area`.
    ///
    /// # Errors
    ///
    /// Returns an error if any curve cannot be integrated (see
    /// [`trapezoid_auc`]).
    pub fn from_record(
        sample: &str,
        record: &SampleRecord,
        masking: IouMasking,
    ) -> Result<Self, MetricError> {
        let insertion_x = {
            let mut x = Vec::with_capacity(record.region_area.len() + 1);
            x.push(0.0);
            x.extend_from_slice(&record.region_area);
            x
        };
        let deletion_x: Vec<f64> = insertion_x.iter().map(|a| 1.0 - a).collect();

        let insertion_score = seeded(&record.deletion_score, &record.insertion_score);
        let insertion_iou_score = seeded(&record.deletion_iou, &record.insertion_iou);
        let insertion_cls_score = seeded(&record.deletion_cls, &record.insertion_cls);

        let deletion_score = seeded(&record.insertion_score, &record.deletion_score);
        let deletion_iou_score = seeded(&record.insertion_iou, &record.deletion_iou);
        let deletion_cls_score = seeded(&record.insertion_cls, &record.deletion_cls);

        let iou75_mask = match masking {
            IouMasking::PerThreshold => 0.75,
            IouMasking::LegacyFixed => 0.5,
        };

        Ok(SampleStats {
            sample: sample.to_string(),
            evaluated_at: Utc::now(),

            insertion_auc: trapezoid_auc(&insertion_x, &insertion_score)?,
            deletion_auc: trapezoid_auc(&deletion_x, &deletion_score)?,
            insertion_cls_auc: trapezoid_auc(&insertion_x, &insertion_cls_score)?,
            deletion_cls_auc: trapezoid_auc(&deletion_x, &deletion_cls_score)?,
            insertion_iou_auc: trapezoid_auc(&insertion_x, &insertion_iou_score)?,
            deletion_iou_auc: trapezoid_auc(&deletion_x, &deletion_iou_score)?,

            highest_confidence_iou50: highest_confidence_above_iou(
                &insertion_iou_score,
                &insertion_cls_score,
                0.5,
            ),
            highest_confidence_iou75: highest_confidence_above_iou(
                &insertion_iou_score,
                &insertion_cls_score,
                iou75_mask,
            ),
        })
    }
}

/// Highest classification confidence among positions where the IoU exceeds
/// `threshold`; 0.0 when no position qualifies.
pub fn highest_confidence_above_iou(iou: &[f64], cls: &[f64], threshold: f64) -> f64 {
    iou.iter()
        .zip(cls)
        .filter(|(i, _)| **i > threshold)
        .map(|(_, c)| *c)
        .fold(0.0, f64::max)
}

/// Prepends the terminal value of `seed_from` to `series`.
fn seeded(seed_from: &[f64], series: &[f64]) -> Vec<f64> {
    let mut y = Vec::with_capacity(series.len() + 1);
    y.push(seed_from.last().copied().unwrap_or_default());
    y.extend_from_slice(series);
    y
}
