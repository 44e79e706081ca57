//! Sampling utility
//!
//! Every metric evaluates both speakers on the grid built here, so the two
//! prediction sequences always share timestamps.

use contracts::{EntrainmentError, Result};

use crate::{Estimator, Prediction};

/// Ratios within this distance of an integer count as exact multiples of the step
const GRID_EPSILON: f64 = 1e-9;

/// Largest grid `sample_times` will build (about 80 MB of times)
pub const MAX_SAMPLES: usize = 10_000_000;

/// Ascending times `start, start + g, ...` covering `[start, end]`.
///
/// The last point is clamped to `end`. `start == end` yields a single point.
///
/// # Errors
/// `InvalidInput` if a bound is not finite, `start > end`, `granularity`
/// is not a positive finite number, or the grid would exceed [`MAX_SAMPLES`].
pub fn sample_times(start: f64, end: f64, granularity: f64) -> Result<Vec<f64>> {
    if !start.is_finite() || !end.is_finite() {
        return Err(EntrainmentError::invalid_input(format!(
            "sampling bounds must be finite, got [{start}, {end}]"
        )));
    }
    if start > end {
        return Err(EntrainmentError::invalid_input(format!(
            "sampling start {start} is after end {end}"
        )));
    }
    if !granularity.is_finite() || granularity <= 0.0 {
        return Err(EntrainmentError::invalid_input(format!(
            "granularity must be a positive finite number, got {granularity}"
        )));
    }

    let steps = (end - start) / granularity;
    let nearest = steps.round();
    let steps = if (steps - nearest).abs() < GRID_EPSILON {
        nearest
    } else {
        steps.ceil()
    };
    // checked before the cast, which saturates
    if !(steps < MAX_SAMPLES as f64) {
        return Err(EntrainmentError::invalid_input(format!(
            "granularity {granularity} over [{start}, {end}] needs more than {MAX_SAMPLES} samples"
        )));
    }
    let steps = steps as usize;

    let mut times: Vec<f64> = (0..=steps).map(|i| start + i as f64 * granularity).collect();
    if let Some(last) = times.last_mut() {
        *last = end;
    }
    Ok(times)
}

/// Predict `estimator` on the grid from [`sample_times`].
pub fn sample(estimator: &Estimator, start: f64, end: f64, granularity: f64) -> Result<Prediction> {
    let times = sample_times(start, end, granularity)?;
    estimator.predict(times)
}
