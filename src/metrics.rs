//! Trapezoidal area-under-curve integration.

use crate::error::MetricError;

/// Computes the area under the curve `(x, y)` with the trapezoidal rule.
///
/// The x-axis may be non-uniformly spaced but must be monotonic over its
/// full length. A non-increasing x yields the positive area (direction -1),
/// so curves built on a reversed axis integrate to the same magnitude as
/// their forward counterparts. Consecutive duplicate x values contribute a
/// zero-width interval.
///
/// # Errors
///
/// Returns an error if the slices differ in length, hold fewer than 2
/// points, or x changes direction.
pub fn trapezoid_auc(x: &[f64], y: &[f64]) -> Result<f64, MetricError> {
    if x.len() != y.len() {
        return Err(MetricError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(MetricError::TooFewPoints(x.len()));
    }

    let mut rising = false;
    let mut falling = false;
    for pair in x.windows(2) {
        if pair[1] > pair[0] {
            rising = true;
        } else if pair[1] < pair[0] {
            falling = true;
        }
    }
    if rising && falling {
        return Err(MetricError::NonMonotonic);
    }
    let direction = if falling { -1.0 } else { 1.0 };

    let mut area = 0.0;
    for i in 1..x.len() {
        area += (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0;
    }

    Ok(direction * area)
}
