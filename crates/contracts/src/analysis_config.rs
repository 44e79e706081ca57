//! Analysis configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EntrainmentError;

/// Default neighbour count
pub const DEFAULT_K: usize = 7;
/// Default outlier threshold (standard deviations)
pub const DEFAULT_MAX_DEVIATIONS: f64 = 3.0;
/// Default sampling step (seconds)
pub const DEFAULT_GRANULARITY: f64 = 0.01;
/// Default synchrony lags (seconds)
pub const DEFAULT_SYNCHRONY_DELTAS: [f64; 7] = [-15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0];

/// Full analysis configuration for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Feature name looked up on every IPU (e.g. `F0_MAX`)
    pub feature: String,

    /// Metrics to compute
    #[serde(default = "default_compute")]
    pub compute: Vec<MetricKind>,

    /// Estimator configuration
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// Metric engine configuration
    #[serde(default)]
    pub metrics: MetricConfig,
}

fn default_compute() -> Vec<MetricKind> {
    vec![
        MetricKind::Proximity,
        MetricKind::Convergence,
        MetricKind::Synchrony,
    ]
}

impl AnalysisConfig {
    pub fn for_feature(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            compute: default_compute(),
            estimator: EstimatorConfig::default(),
            metrics: MetricConfig::default(),
        }
    }
}

/// Continuous estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Neighbour count
    pub k: usize,
    /// Outlier threshold in population standard deviations
    pub max_deviations: f64,
    /// Neighbour search strategy
    pub backend: NeighborBackend,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_deviations: DEFAULT_MAX_DEVIATIONS,
            backend: NeighborBackend::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }
}

/// Neighbour search strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborBackend {
    /// Sliding window over ascending queries, O(n + q) amortized
    #[default]
    Incremental,
    /// Full neighbour ranking per query, reference implementation
    BruteForce,
}

/// Metric engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Window start override (defaults to the common support start)
    pub start: Option<f64>,
    /// Window end override (defaults to the common support end)
    pub end: Option<f64>,
    /// Sampling step in seconds
    pub granularity: f64,
    /// Candidate synchrony lags, tried in this order
    pub deltas: Vec<f64>,
    /// Synchrony integration strategy
    pub integration_method: IntegrationMethod,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            granularity: DEFAULT_GRANULARITY,
            deltas: DEFAULT_SYNCHRONY_DELTAS.to_vec(),
            integration_method: IntegrationMethod::default(),
        }
    }
}

impl MetricConfig {
    /// Restrict evaluation to an explicit window
    pub fn with_window(mut self, start: f64, end: f64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_deltas(mut self, deltas: Vec<f64>) -> Self {
        self.deltas = deltas;
        self
    }

    pub fn with_integration_method(mut self, method: IntegrationMethod) -> Self {
        self.integration_method = method;
        self
    }
}

/// Entrainment metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MetricKind {
    Proximity,
    /// Also accepted as `pearson`
    Convergence,
    Synchrony,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proximity => "proximity",
            Self::Convergence => "convergence",
            Self::Synchrony => "synchrony",
        }
    }
}

impl FromStr for MetricKind {
    type Err = EntrainmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proximity" => Ok(Self::Proximity),
            "convergence" | "pearson" => Ok(Self::Convergence),
            "synchrony" => Ok(Self::Synchrony),
            _ => Err(EntrainmentError::unknown_metric(s)),
        }
    }
}

impl TryFrom<String> for MetricKind {
    type Error = EntrainmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MetricKind> for String {
    fn from(kind: MetricKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numerical integration strategy used by synchrony
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IntegrationMethod {
    /// Arithmetic mean over samples
    #[default]
    MonteCarlo,
    /// Trapezoidal quadrature against the sample times
    Trapezoidal,
}

impl IntegrationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonteCarlo => "montecarlo",
            Self::Trapezoidal => "trapz",
        }
    }
}

impl FromStr for IntegrationMethod {
    type Err = EntrainmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "montecarlo" | "monte_carlo" => Ok(Self::MonteCarlo),
            "trapz" | "trapezoidal" => Ok(Self::Trapezoidal),
            _ => Err(EntrainmentError::UnknownIntegrationMethod {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for IntegrationMethod {
    type Error = EntrainmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IntegrationMethod> for String {
    fn from(method: IntegrationMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
