//! Synchrony
//!
//! Normalized cross-covariance of the two sampled series under a set of
//! candidate lags. Means are taken over the full window before cropping.

use std::ops::Range;

use contracts::{EntrainmentError, IntegrationMethod, Result};
use serde::{Deserialize, Serialize};

use crate::integration::{integrator, Integrator};
use crate::proximity::mean;
use crate::support::CommonSupport;

/// Correlation obtained for one candidate lag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelation {
    pub delta: f64,
    /// Signed correlation; NaN when either cropped series has no variance
    pub value: f64,
}

/// Every tested lag plus the selected one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynchronyProfile {
    pub window: CommonSupport,
    pub integration_method: IntegrationMethod,
    /// In configured order
    pub lags: Vec<LagCorrelation>,
    /// Largest `|value|`, first one on ties; `None` if no lag beat 0
    pub selected: Option<LagCorrelation>,
}

impl SynchronyProfile {
    /// Synchrony value, 0 if no lag produced a nonzero correlation
    pub fn value(&self) -> f64 {
        self.selected.map_or(0.0, |lag| lag.value)
    }

    pub fn delta(&self) -> Option<f64> {
        self.selected.map(|lag| lag.delta)
    }
}

/// Grid shift for `delta`, validated against the window and sample count.
///
/// # Errors
/// `InvalidDelta` if `delta` is not finite, `|delta|` exceeds the window
/// length, or the shift leaves no overlapping sample.
pub(crate) fn lag_shift(
    delta: f64,
    window: &CommonSupport,
    granularity: f64,
    samples: usize,
) -> Result<usize> {
    let span = window.span();
    let invalid = || EntrainmentError::InvalidDelta { delta, span };
    if !delta.is_finite() || delta.abs() > span {
        return Err(invalid());
    }
    let shift = (delta.abs() / granularity).round() as usize;
    if shift >= samples {
        return Err(invalid());
    }
    Ok(shift)
}

/// Sample ranges of `a` and `b` that overlap after shifting `a` by `shift` samples.
fn overlap(delta: f64, shift: usize, samples: usize) -> (Range<usize>, Range<usize>) {
    if delta > 0.0 {
        (shift..samples, 0..samples - shift)
    } else if delta < 0.0 {
        (0..samples - shift, shift..samples)
    } else {
        (0..samples, 0..samples)
    }
}

/// Correlation of `a` against `b` for each `(delta, shift)` pair.
///
/// `a`, `b` and `times` share one grid; shifts come from [`lag_shift`].
pub(crate) fn synchrony_profile_from_samples(
    a: &[f64],
    b: &[f64],
    times: &[f64],
    window: CommonSupport,
    lags: &[(f64, usize)],
    method: IntegrationMethod,
) -> SynchronyProfile {
    let integ = integrator(method);
    let (mean_a, mean_b) = (mean(a), mean(b));
    let dev_a: Vec<f64> = a.iter().map(|v| v - mean_a).collect();
    let dev_b: Vec<f64> = b.iter().map(|v| v - mean_b).collect();

    let mut results = Vec::with_capacity(lags.len());
    let mut selected: Option<LagCorrelation> = None;
    for &(delta, shift) in lags {
        let (range_a, range_b) = overlap(delta, shift, times.len());
        let value = correlation(
            integ,
            &dev_a[range_a.clone()],
            &dev_b[range_b.clone()],
            &times[range_a],
            &times[range_b],
        );
        let lag = LagCorrelation { delta, value };
        tracing::trace!(delta, value, "synchrony lag evaluated");

        // NaN never compares greater, so a flat series leaves the selection at 0
        let best = selected.map_or(0.0, |best| best.value.abs());
        if value.abs() > best {
            selected = Some(lag);
        }
        results.push(lag);
    }

    SynchronyProfile {
        window,
        integration_method: method,
        lags: results,
        selected,
    }
}

/// Numerator is integrated on `b`'s time axis so that `a`'s shifted
/// abscissae stay inside the window.
fn correlation(
    integ: &dyn Integrator,
    dev_a: &[f64],
    dev_b: &[f64],
    times_a: &[f64],
    times_b: &[f64],
) -> f64 {
    let products: Vec<f64> = dev_a.iter().zip(dev_b).map(|(x, y)| x * y).collect();
    let squares_a: Vec<f64> = dev_a.iter().map(|x| x * x).collect();
    let squares_b: Vec<f64> = dev_b.iter().map(|y| y * y).collect();

    let numerator = integ.integrate(&products, times_b);
    let denominator =
        (integ.integrate(&squares_a, times_a) * integ.integrate(&squares_b, times_b)).sqrt();
    numerator / denominator
}
