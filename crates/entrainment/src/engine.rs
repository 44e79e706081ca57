//! Metric engine
//!
//! Resolves the evaluation window, validates the request, samples both
//! estimators on one grid and reduces the samples per metric.

use contracts::{EntrainmentError, IntegrationMethod, MetricConfig, MetricKind, Result};
use serde::{Deserialize, Serialize};
use time_series::{sample, sample_times, Estimator};
use tracing::instrument;

use crate::convergence::convergence;
use crate::proximity::proximity;
use crate::support::{evaluation_window, CommonSupport};
use crate::synchrony::{lag_shift, synchrony_profile_from_samples, SynchronyProfile};

/// Result of one metric evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOutcome {
    pub kind: MetricKind,
    /// May be NaN (convergence on a constant gap)
    pub value: f64,
    /// Lag selected by synchrony
    pub delta: Option<f64>,
    /// Sample points that fell outside either estimator domain
    pub boundary_queries: usize,
}

/// Validated request: window plus synchrony lags as grid shifts
struct Plan {
    window: CommonSupport,
    granularity: f64,
    lags: Vec<(f64, usize)>,
}

fn plan(
    kinds: &[MetricKind],
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<Plan> {
    let window = evaluation_window(a, b, config)?;
    let samples = sample_times(window.start, window.end, config.granularity)?.len();

    let lags = if kinds.contains(&MetricKind::Synchrony) {
        if config.deltas.is_empty() {
            return Err(EntrainmentError::invalid_input(
                "synchrony needs at least one candidate delta",
            ));
        }
        config
            .deltas
            .iter()
            .map(|&delta| Ok((delta, lag_shift(delta, &window, config.granularity, samples)?)))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok(Plan {
        window,
        granularity: config.granularity,
        lags,
    })
}

/// Evaluate several metrics on one shared sampling of both estimators.
///
/// Every request parameter is validated before the estimators are sampled.
/// Outcomes follow the order of `kinds`.
#[instrument(
    name = "entrainment_evaluate_all",
    skip(a, b, config),
    fields(feature = %a.feature())
)]
pub fn evaluate_all(
    kinds: &[MetricKind],
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<Vec<MetricOutcome>> {
    let plan = plan(kinds, a, b, config)?;
    let window = plan.window;

    let samples_a = sample(a, window.start, window.end, plan.granularity)?;
    let samples_b = sample(b, window.start, window.end, plan.granularity)?;
    let boundary_queries = samples_a.boundary_queries() + samples_b.boundary_queries();
    let times = &samples_a.times;

    let mut outcomes = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let (value, delta) = match kind {
            MetricKind::Proximity => (proximity(&samples_a.values, &samples_b.values), None),
            MetricKind::Convergence => (
                convergence(&samples_a.values, &samples_b.values, times),
                None,
            ),
            MetricKind::Synchrony => {
                let profile = synchrony_profile_from_samples(
                    &samples_a.values,
                    &samples_b.values,
                    times,
                    window,
                    &plan.lags,
                    config.integration_method,
                );
                (profile.value(), profile.delta())
            }
        };

        tracing::info!(
            metric = %kind,
            value,
            start = window.start,
            end = window.end,
            boundary_queries,
            "metric computed"
        );
        metrics::counter!(
            "entrainment_metric_evaluations_total",
            "metric" => kind.as_str()
        )
        .increment(1);
        if value.is_finite() {
            metrics::histogram!("entrainment_metric_value", "metric" => kind.as_str())
                .record(value);
        }

        outcomes.push(MetricOutcome {
            kind,
            value,
            delta,
            boundary_queries,
        });
    }
    Ok(outcomes)
}

/// Evaluate one metric.
pub fn evaluate(
    kind: MetricKind,
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<MetricOutcome> {
    let mut outcomes = evaluate_all(&[kind], a, b, config)?;
    outcomes
        .pop()
        .ok_or_else(|| EntrainmentError::invalid_input("no metric evaluated"))
}

/// Evaluate a metric by name (`proximity`, `convergence`/`pearson`, `synchrony`).
///
/// # Errors
/// `UnknownMetric` for any other name, otherwise as [`evaluate`].
pub fn calculate_metric(
    name: &str,
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<f64> {
    let kind: MetricKind = name.parse()?;
    evaluate(kind, a, b, config).map(|outcome| outcome.value)
}

/// Synchrony for every configured lag, not just the selected one.
#[instrument(name = "entrainment_synchrony_profile", skip(a, b, config))]
pub fn synchrony_profile(
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<SynchronyProfile> {
    let plan = plan(&[MetricKind::Synchrony], a, b, config)?;
    let window = plan.window;
    let samples_a = sample(a, window.start, window.end, plan.granularity)?;
    let samples_b = sample(b, window.start, window.end, plan.granularity)?;

    Ok(synchrony_profile_from_samples(
        &samples_a.values,
        &samples_b.values,
        &samples_a.times,
        window,
        &plan.lags,
        config.integration_method,
    ))
}

/// Synchrony value under both integration strategies
pub fn synchrony_by_method(
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<[(IntegrationMethod, f64); 2]> {
    let mc = synchrony_profile(
        a,
        b,
        &config
            .clone()
            .with_integration_method(IntegrationMethod::MonteCarlo),
    )?;
    let trapz = synchrony_profile(
        a,
        b,
        &config
            .clone()
            .with_integration_method(IntegrationMethod::Trapezoidal),
    )?;
    Ok([
        (IntegrationMethod::MonteCarlo, mc.value()),
        (IntegrationMethod::Trapezoidal, trapz.value()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EstimatorConfig, Observation, ObservationSet};
    use time_series::build_estimator;

    const VALUES_A: [f64; 6] = [100.003, 200.002, 300.002, 100.003, 200.002, 300.002];
    const VALUES_B: [f64; 6] = [300.002, 200.002, 100.003, 300.002, 200.002, 100.003];

    fn estimator(bounds: &[(f64, f64)], values: &[f64], k: usize) -> Estimator {
        let observations = bounds
            .iter()
            .zip(values)
            .map(|(&(s, e), &v)| Observation::new(s, e, Some(v)).unwrap())
            .collect();
        let set = ObservationSet::new(observations).unwrap();
        build_estimator(&set, "F0_MAX", &EstimatorConfig::with_k(k)).unwrap()
    }

    /// Midpoints 2 10 20 30 38 48
    fn speaker_a(k: usize) -> Estimator {
        let bounds = [(0.0, 4.0), (8.0, 12.0), (16.0, 24.0), (28.0, 32.0), (36.0, 40.0), (44.0, 52.0)];
        estimator(&bounds, &VALUES_A, k)
    }

    /// Midpoints 4 14 22 32 42 50, opposite phase to `speaker_a`
    fn speaker_b(k: usize) -> Estimator {
        let bounds = [(0.0, 8.0), (12.0, 16.0), (20.0, 24.0), (28.0, 36.0), (40.0, 44.0), (48.0, 52.0)];
        estimator(&bounds, &VALUES_B, k)
    }

    #[test]
    fn test_self_proximity_is_zero_over_explicit_window() {
        let a = speaker_a(4);
        let twin = speaker_a(4);
        let config = MetricConfig::default().with_window(0.0, 52.0);
        let outcome = evaluate(MetricKind::Proximity, &a, &twin, &config).unwrap();
        assert_eq!(outcome.value, 0.0);
        // [0, 2) and (48, 52] on both estimators
        assert!(outcome.boundary_queries > 0);
    }

    #[test]
    fn test_self_synchrony_is_one() {
        let a = speaker_a(4);
        for method in [IntegrationMethod::MonteCarlo, IntegrationMethod::Trapezoidal] {
            let config = MetricConfig::default().with_integration_method(method);
            let outcome = evaluate(MetricKind::Synchrony, &a, &a, &config).unwrap();
            assert_eq!(outcome.value, 1.0, "{method}");
            assert_eq!(outcome.delta, Some(0.0));
            assert_eq!(outcome.boundary_queries, 0);
        }
    }

    #[test]
    fn test_self_convergence_is_nan() {
        let a = speaker_a(4);
        let value = calculate_metric("pearson", &a, &a, &MetricConfig::default()).unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn test_flat_speaker_synchrony_is_zero() {
        let bounds = [(0.0, 4.0), (8.0, 12.0), (16.0, 24.0), (28.0, 32.0), (36.0, 40.0), (44.0, 52.0)];
        let flat = estimator(&bounds, &[5.0; 6], 4);
        let b = speaker_b(4);

        let value = calculate_metric("synchrony", &flat, &b, &MetricConfig::default()).unwrap();
        assert_eq!(value, 0.0);

        let outcome = evaluate(MetricKind::Synchrony, &flat, &b, &MetricConfig::default()).unwrap();
        assert_eq!(outcome.delta, None);
    }

    #[test]
    fn test_undefined_outcome_serializes_as_null() {
        let a = speaker_a(4);
        let outcome =
            evaluate(MetricKind::Convergence, &a, &a, &MetricConfig::default()).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json["value"].is_null());
        assert_eq!(json["kind"], "convergence");
        assert!(json["delta"].is_null());
    }

    #[test]
    fn test_opposite_phase_pair() {
        let a = speaker_a(4);
        let b = speaker_b(4);
        let config = MetricConfig::default();

        let proximity = calculate_metric("proximity", &a, &b, &config).unwrap();
        assert!((proximity + 0.011361).abs() < 1e-5, "got {proximity}");

        let convergence = calculate_metric("convergence", &a, &b, &config).unwrap();
        assert!((convergence - 0.000224).abs() < 1e-5, "got {convergence}");

        let outcome = evaluate(MetricKind::Synchrony, &a, &b, &config).unwrap();
        assert!((outcome.value + 0.92556).abs() < 1e-4, "got {}", outcome.value);
        assert_eq!(outcome.delta, Some(0.0));
    }

    #[test]
    fn test_integration_methods_agree() {
        let a = speaker_a(4);
        let b = speaker_b(4);
        let [(_, mc), (_, trapz)] = synchrony_by_method(&a, &b, &MetricConfig::default()).unwrap();
        assert!((mc - trapz).abs() < 1e-4, "montecarlo {mc} trapz {trapz}");

        let a = speaker_a(2);
        let b = speaker_b(2);
        let [(_, mc), (_, trapz)] = synchrony_by_method(&a, &b, &MetricConfig::default()).unwrap();
        assert!((mc - trapz).abs() < 1e-4, "montecarlo {mc} trapz {trapz}");
    }

    #[test]
    fn test_synchrony_profile_keeps_configured_order() {
        let a = speaker_a(4);
        let b = speaker_b(4);
        let deltas = vec![15.0, -15.0, 0.0, 5.0];
        let config = MetricConfig::default().with_deltas(deltas.clone());
        let profile = synchrony_profile(&a, &b, &config).unwrap();

        let tested: Vec<f64> = profile.lags.iter().map(|lag| lag.delta).collect();
        assert_eq!(tested, deltas);
        let best = profile
            .lags
            .iter()
            .map(|lag| lag.value.abs())
            .fold(0.0, f64::max);
        assert_eq!(profile.value().abs(), best);
        assert_eq!(profile.window, CommonSupport { start: 4.0, end: 48.0 });
    }

    #[test]
    fn test_invalid_delta_rejected() {
        let a = speaker_a(4);
        let b = speaker_b(4);
        // common support is [4, 48], 44 seconds
        let config = MetricConfig::default().with_deltas(vec![0.0, 45.0]);
        let err = calculate_metric("synchrony", &a, &b, &config).unwrap_err();
        assert!(matches!(err, EntrainmentError::InvalidDelta { delta, .. } if delta == 45.0));

        let config = MetricConfig::default().with_window(10.0, 20.0);
        let err = evaluate(MetricKind::Synchrony, &a, &b, &config).unwrap_err();
        assert!(matches!(err, EntrainmentError::InvalidDelta { delta, .. } if delta == -15.0));
    }

    #[test]
    fn test_deltas_ignored_for_other_metrics() {
        let a = speaker_a(4);
        let b = speaker_b(4);
        let config = MetricConfig::default().with_window(10.0, 20.0);
        assert!(evaluate(MetricKind::Proximity, &a, &b, &config).is_ok());
    }

    #[test]
    fn test_empty_deltas_rejected() {
        let a = speaker_a(4);
        let config = MetricConfig::default().with_deltas(vec![]);
        let err = evaluate(MetricKind::Synchrony, &a, &a, &config).unwrap_err();
        assert!(matches!(err, EntrainmentError::InvalidInput { .. }));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let a = speaker_a(4);
        let config = MetricConfig {
            granularity: 1e-300,
            ..Default::default()
        };
        let err = calculate_metric("proximity", &a, &a, &config).unwrap_err();
        assert!(matches!(err, EntrainmentError::InvalidInput { .. }));
    }

    #[test]
    fn test_unknown_metric() {
        let a = speaker_a(4);
        let err = calculate_metric("entropy", &a, &a, &MetricConfig::default()).unwrap_err();
        assert!(matches!(err, EntrainmentError::UnknownMetric { .. }));
    }

    #[test]
    fn test_empty_domain() {
        let early = estimator(&[(0.0, 2.0), (3.0, 5.0)], &[1.0, 2.0], 1);
        let late = estimator(&[(10.0, 12.0), (13.0, 15.0)], &[1.0, 2.0], 1);
        let err = evaluate(MetricKind::Proximity, &early, &late, &MetricConfig::default()).unwrap_err();
        assert!(matches!(err, EntrainmentError::EmptyDomain { .. }));
    }

    #[test]
    fn test_evaluate_all_matches_single() {
        let a = speaker_a(4);
        let b = speaker_b(4);
        let config = MetricConfig::default();
        let kinds = [MetricKind::Synchrony, MetricKind::Proximity];
        let all = evaluate_all(&kinds, &a, &b, &config).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, MetricKind::Synchrony);
        assert_eq!(all[1].kind, MetricKind::Proximity);
        let single = evaluate(MetricKind::Proximity, &a, &b, &config).unwrap();
        assert_eq!(all[1].value, single.value);
    }
}
