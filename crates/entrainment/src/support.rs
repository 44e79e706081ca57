//! Domain reconciler

use contracts::{EntrainmentError, MetricConfig, Result};
use serde::{Deserialize, Serialize};
use time_series::Estimator;

/// Window on which both speakers are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommonSupport {
    pub start: f64,
    pub end: f64,
}

impl CommonSupport {
    /// Window with `start < end`, else `EmptyDomain`.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        // negated so NaN bounds are rejected too
        if !(start < end) {
            return Err(EntrainmentError::EmptyDomain { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window length in seconds
    #[inline]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Interval on which both estimators are defined.
///
/// # Errors
/// `EmptyDomain` if the estimator domains do not overlap.
pub fn common_support(a: &Estimator, b: &Estimator) -> Result<CommonSupport> {
    CommonSupport::new(a.start().max(b.start()), a.end().min(b.end()))
}

/// Explicit window bounds from `config`, missing ones taken from the common support.
pub fn evaluation_window(
    a: &Estimator,
    b: &Estimator,
    config: &MetricConfig,
) -> Result<CommonSupport> {
    match (config.start, config.end) {
        (Some(start), Some(end)) => CommonSupport::new(start, end),
        (start, end) => {
            let support = common_support(a, b)?;
            CommonSupport::new(
                start.unwrap_or(support.start),
                end.unwrap_or(support.end),
            )
        }
    }
}
