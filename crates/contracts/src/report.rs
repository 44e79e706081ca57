//! AnalysisReport - pipeline output
//!
//! Summary of one session's entrainment analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{MetricKind, SpeakerId};

/// Result of analysing one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Session label
    pub session: String,

    /// Feature analysed
    pub feature: String,

    /// Evaluation window `(start, end)` in seconds
    pub window: (f64, f64),

    /// Per-speaker input statistics, in session order
    pub speakers: Vec<SpeakerSummary>,

    /// Metric values. NaN is serialized as `null`.
    pub metrics: BTreeMap<MetricKind, f64>,

    /// Lag selected by synchrony, if computed
    pub synchrony_delta: Option<f64>,

    /// Number of prediction points that fell outside an estimator domain
    pub boundary_queries: usize,
}

/// Input statistics for one speaker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerSummary {
    /// Speaker label
    pub speaker: SpeakerId,

    /// IPUs read from the session
    pub ipus: usize,

    /// Observations kept after filtering
    pub retained: usize,

    /// Observations dropped for absent values
    pub discarded_absent: usize,

    /// Observations dropped as outliers
    pub outliers: usize,

    /// Estimator domain `(start, end)`
    pub domain: (f64, f64),
}
