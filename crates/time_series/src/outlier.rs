//! Outlier filter
//!
//! Drops absent-valued observations, then everything further than
//! `max_deviations` population standard deviations from the mean.

use contracts::{Advisory, EntrainmentError, Observation, ObservationSet, Result};
use tracing::instrument;

/// Result of filtering one observation set
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Retained observations, original order
    pub kept: ObservationSet,
    /// Observations dropped because their value was absent
    pub discarded_absent: Vec<Observation>,
    /// Present-valued observations dropped as outliers
    pub outlier_count: usize,
    /// Diagnostics raised while filtering
    pub advisories: Vec<Advisory>,
}

/// Filter absent values and statistical outliers.
///
/// A zero standard deviation (fewer than two present values, or all equal)
/// keeps every present observation.
///
/// # Errors
/// `InvalidInput` if `max_deviations` is not a positive finite number.
#[instrument(
    name = "time_series_filter_outliers",
    skip(observations),
    fields(observations = observations.len())
)]
pub fn filter_outliers(observations: &ObservationSet, max_deviations: f64) -> Result<FilterOutcome> {
    if !max_deviations.is_finite() || max_deviations <= 0.0 {
        return Err(EntrainmentError::invalid_input(format!(
            "max_deviations must be a positive finite number, got {max_deviations}"
        )));
    }

    let mut advisories = Vec::new();
    let discarded_absent: Vec<Observation> =
        observations.iter().filter(|o| o.is_absent()).copied().collect();

    for obs in &discarded_absent {
        tracing::warn!(
            start = obs.start,
            end = obs.end,
            "discarding observation with absent value"
        );
        advisories.push(Advisory::DiscardedAbsentValue {
            start: obs.start,
            end: obs.end,
        });
    }
    if !discarded_absent.is_empty() {
        metrics::counter!("entrainment_absent_values_total")
            .increment(discarded_absent.len() as u64);
    }

    let present: Vec<f64> = observations.iter().filter_map(Observation::present_value).collect();
    let (mean, std) = mean_and_population_std(&present);
    let threshold = max_deviations * std;

    let kept = observations.retain(|o| match o.present_value() {
        Some(v) => std == 0.0 || (v - mean).abs() < threshold,
        None => false,
    });
    let outlier_count = present.len() - kept.len();

    if outlier_count > 0 {
        tracing::warn!(
            outliers = outlier_count,
            mean,
            std,
            max_deviations,
            "removed outlier observations"
        );
        metrics::counter!("entrainment_outliers_removed_total").increment(outlier_count as u64);
        advisories.push(Advisory::OutliersRemoved {
            count: outlier_count,
        });
    }

    Ok(FilterOutcome {
        kept,
        discarded_absent,
        outlier_count,
        advisories,
    })
}

fn mean_and_population_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
