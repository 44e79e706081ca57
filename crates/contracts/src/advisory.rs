//! Advisory - non-fatal diagnostics
//!
//! Returned alongside results so callers can inspect what was discarded or
//! extrapolated; the producing crate also logs each one through `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the estimator domain a query fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSide {
    BeforeStart,
    AfterEnd,
}

/// Non-fatal diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Observation dropped because its feature value was absent
    DiscardedAbsentValue { start: f64, end: f64 },

    /// Observations dropped as statistical outliers
    OutliersRemoved { count: usize },

    /// Prediction requested outside `[start, end]`; value was extrapolated
    OutOfDomainQuery {
        time: f64,
        side: DomainSide,
        domain_start: f64,
        domain_end: f64,
    },
}

impl Advisory {
    pub fn is_boundary_query(&self) -> bool {
        matches!(self, Self::OutOfDomainQuery { .. })
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscardedAbsentValue { start, end } => {
                write!(f, "discarded observation [{start}, {end}] with absent value")
            }
            Self::OutliersRemoved { count } => write!(f, "removed {count} outlier observation(s)"),
            Self::OutOfDomainQuery {
                time,
                side: DomainSide::BeforeStart,
                domain_start,
                ..
            } => write!(
                f,
                "query {time} is before estimator start {domain_start}; extrapolated"
            ),
            Self::OutOfDomainQuery {
                time,
                side: DomainSide::AfterEnd,
                domain_end,
                ..
            } => write!(
                f,
                "query {time} is after estimator end {domain_end}; extrapolated"
            ),
        }
    }
}
