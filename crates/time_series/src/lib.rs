//! # Time Series
//!
//! Continuous estimation of one speaker's feature evolution.
//!
//! Responsibilities:
//! - Outlier filtering of the raw observations
//! - k-nearest-neighbour regression over observation midpoints
//! - Incremental O(n) neighbour window for ascending queries
//! - Shared sampling grid used by every metric
//!
//! ## Example
//!
//! ```ignore
//! use time_series::{build_estimator, sample, EstimatorConfig};
//!
//! let estimator = build_estimator(&observations, "F0_MAX", &EstimatorConfig::with_k(4))?;
//! let prediction = sample(&estimator, estimator.start(), estimator.end(), 0.01)?;
//! for advisory in &prediction.advisories {
//!     eprintln!("{advisory}");
//! }
//! ```

mod estimator;
mod neighbors;
mod outlier;
mod query;
mod sampling;

pub use estimator::{build_estimator, Estimator, Prediction};
pub use outlier::{filter_outliers, FilterOutcome};
pub use query::Query;
pub use sampling::{sample, sample_times};

// Re-export contracts types
pub use contracts::{
    Advisory, DomainSide, EntrainmentError, EstimatorConfig, NeighborBackend, Observation,
    ObservationSet, Result,
};
