//! # Contracts
//!
//! Frozen interface contracts shared by every entrainment crate.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Times are seconds (f64) from the start of the conversation recording
//! - An observation is positioned on the time axis by its midpoint `(start + end) / 2`

mod advisory;
mod analysis_config;
mod error;
mod ipu;
mod observation;
mod report;
mod session;
mod speaker_id;

pub use advisory::*;
pub use analysis_config::*;
pub use error::*;
pub use ipu::{order_by_start, AnnotatedFeatures, FeatureSource, InterPausalUnit};
pub use observation::{Observation, ObservationSet};
pub use report::*;
pub use session::*;
pub use speaker_id::SpeakerId;
