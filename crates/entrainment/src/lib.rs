//! # Entrainment
//!
//! Compares the continuous feature evolution of two speakers.
//!
//! Responsibilities:
//! - Common support of two estimators
//! - Proximity, convergence and synchrony over a shared sampling grid
//! - Lag search with Monte Carlo or trapezoidal integration
//!
//! ## Example
//!
//! ```ignore
//! use entrainment::{calculate_metric, common_support, MetricConfig};
//!
//! let support = common_support(&speaker_a, &speaker_b)?;
//! let config = MetricConfig::default().with_window(support.start, support.end);
//! let synchrony = calculate_metric("synchrony", &speaker_a, &speaker_b, &config)?;
//! ```

mod convergence;
mod engine;
mod integration;
mod proximity;
mod support;
mod synchrony;

pub use convergence::convergence;
pub use engine::{
    calculate_metric, evaluate, evaluate_all, synchrony_by_method, synchrony_profile,
    MetricOutcome,
};
pub use integration::{integrator, Integrator, MonteCarlo, Trapezoidal};
pub use proximity::proximity;
pub use support::{common_support, evaluation_window, CommonSupport};
pub use synchrony::{LagCorrelation, SynchronyProfile};

// Re-export contracts types
pub use contracts::{EntrainmentError, IntegrationMethod, MetricConfig, MetricKind, Result};
