//! Continuous estimator
//!
//! k-nearest-neighbour regression of one speaker's feature over observation
//! midpoints. Built once from a filtered observation set and immutable after.

use contracts::{
    Advisory, DomainSide, EntrainmentError, EstimatorConfig, NeighborBackend, Observation,
    ObservationSet, Result, DEFAULT_GRANULARITY,
};
use tracing::instrument;

use crate::neighbors::knn_means;
use crate::outlier::filter_outliers;
use crate::sampling::sample;
use crate::Query;

/// Predicted values with the diagnostics raised while computing them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    /// Query times, caller's order
    pub times: Vec<f64>,
    /// One value per query time
    pub values: Vec<f64>,
    /// One `OutOfDomainQuery` per extrapolated point
    pub advisories: Vec<Advisory>,
}

impl Prediction {
    /// Number of query points outside the estimator domain
    pub fn boundary_queries(&self) -> usize {
        self.advisories
            .iter()
            .filter(|a| a.is_boundary_query())
            .count()
    }

    /// The value of a single-point query
    pub fn value(&self) -> Option<f64> {
        match self.values.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }
}

/// Fitted k-NN model for one (speaker, feature) pair
#[derive(Debug, Clone)]
pub struct Estimator {
    feature: String,
    observations: ObservationSet,
    midpoints: Vec<f64>,
    values: Vec<f64>,
    k: usize,
    backend: NeighborBackend,
    outlier_count: usize,
    discarded: Vec<Observation>,
    build_advisories: Vec<Advisory>,
}

impl Estimator {
    /// Filter `observations` and fit the model.
    ///
    /// # Errors
    /// - `InvalidK` if `k == 0` or `k` exceeds the number of input observations
    /// - `InsufficientData` if filtering leaves no observation or fewer than `k`
    /// - `InvalidInput` for a bad `max_deviations`
    #[instrument(
        name = "time_series_build_estimator",
        skip(observations, config),
        fields(observations = observations.len(), k = config.k)
    )]
    pub fn build(
        observations: &ObservationSet,
        feature: &str,
        config: &EstimatorConfig,
    ) -> Result<Self> {
        let k = config.k;
        if k == 0 {
            return Err(EntrainmentError::invalid_k(k, "k must be a positive integer"));
        }
        if k > observations.len() {
            return Err(EntrainmentError::invalid_k(
                k,
                format!(
                    "k cannot exceed the number of observations ({})",
                    observations.len()
                ),
            ));
        }

        let outcome = filter_outliers(observations, config.max_deviations)?;
        let retained = outcome.kept.len();
        if retained == 0 || k > retained {
            return Err(EntrainmentError::InsufficientData {
                required: k,
                available: retained,
            });
        }

        let midpoints = outcome.kept.midpoints();
        let values = outcome
            .kept
            .iter()
            .filter_map(Observation::present_value)
            .collect();

        tracing::debug!(
            retained,
            outliers = outcome.outlier_count,
            discarded = outcome.discarded_absent.len(),
            backend = ?config.backend,
            "estimator fitted"
        );

        Ok(Self {
            feature: feature.to_string(),
            observations: outcome.kept,
            midpoints,
            values,
            k,
            backend: config.backend,
            outlier_count: outcome.outlier_count,
            discarded: outcome.discarded_absent,
            build_advisories: outcome.advisories,
        })
    }

    /// Midpoint of the first retained observation
    pub fn start(&self) -> f64 {
        self.midpoints[0]
    }

    /// Midpoint of the last retained observation
    pub fn end(&self) -> f64 {
        self.midpoints[self.midpoints.len() - 1]
    }

    /// Evaluate the model at one or more times.
    ///
    /// Points outside `[start, end]` are extrapolated from the nearest
    /// neighbours and reported as `OutOfDomainQuery` advisories.
    ///
    /// # Errors
    /// `InvalidInput` if any query time is not finite.
    #[instrument(
        name = "time_series_predict",
        level = "trace",
        skip(self, query),
        fields(feature = %self.feature)
    )]
    pub fn predict(&self, query: impl Into<Query>) -> Result<Prediction> {
        let query = query.into();
        query.validate()?;

        let times = query.times();
        let values = knn_means(self.backend, &self.midpoints, &self.values, self.k, times);
        let (start, end) = (self.start(), self.end());

        let mut advisories = Vec::new();
        for &time in times {
            let side = if time < start {
                DomainSide::BeforeStart
            } else if time > end {
                DomainSide::AfterEnd
            } else {
                continue;
            };
            tracing::warn!(
                feature = %self.feature,
                time,
                domain_start = start,
                domain_end = end,
                side = ?side,
                "query outside estimator domain, extrapolating"
            );
            advisories.push(Advisory::OutOfDomainQuery {
                time,
                side,
                domain_start: start,
                domain_end: end,
            });
        }
        if !advisories.is_empty() {
            metrics::counter!("entrainment_boundary_queries_total")
                .increment(advisories.len() as u64);
        }

        Ok(Prediction {
            times: times.to_vec(),
            values,
            advisories,
        })
    }

    /// Sample the model on a regular grid.
    ///
    /// Bounds default to the estimator's own domain, `granularity` to 0.01 s.
    pub fn predict_interval(
        &self,
        start: Option<f64>,
        end: Option<f64>,
        granularity: Option<f64>,
    ) -> Result<Prediction> {
        sample(
            self,
            start.unwrap_or_else(|| self.start()),
            end.unwrap_or_else(|| self.end()),
            granularity.unwrap_or(DEFAULT_GRANULARITY),
        )
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn backend(&self) -> NeighborBackend {
        self.backend
    }

    /// Retained observations
    pub fn observations(&self) -> &ObservationSet {
        &self.observations
    }

    /// Present-valued observations removed as outliers
    pub fn outlier_count(&self) -> usize {
        self.outlier_count
    }

    /// Observations removed for absent values
    pub fn discarded(&self) -> &[Observation] {
        &self.discarded
    }

    pub fn discarded_count(&self) -> usize {
        self.discarded.len()
    }

    /// Diagnostics raised while filtering the input
    pub fn build_advisories(&self) -> &[Advisory] {
        &self.build_advisories
    }
}

/// Build an [`Estimator`] for `feature` from raw observations.
pub fn build_estimator(
    observations: &ObservationSet,
    feature: &str,
    config: &EstimatorConfig,
) -> Result<Estimator> {
    Estimator::build(observations, feature, config)
}
