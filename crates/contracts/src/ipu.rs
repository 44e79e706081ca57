//! InterPausalUnit - external collaborator input
//!
//! An IPU is a stretch of speech bounded by silences. Feature extraction is
//! done upstream; the unit only carries the values it produced.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EntrainmentError, Result};

/// Speech interval with pre-extracted feature values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterPausalUnit {
    /// Start time (seconds)
    pub start: f64,

    /// End time (seconds)
    pub end: f64,

    /// Feature name -> value. `None` marks a failed extraction.
    #[serde(default)]
    pub features: BTreeMap<String, Option<f64>>,
}

impl InterPausalUnit {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            features: BTreeMap::new(),
        }
    }

    /// Builder-style feature annotation
    pub fn with_feature(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Feature lookup collaborator.
///
/// Implementations return the scalar value of `feature` over the unit's
/// interval, or fail with `FeatureNotComputed`. A NaN return marks the value
/// as absent without aborting the pipeline.
pub trait FeatureSource {
    fn feature_value(&self, unit: &InterPausalUnit, feature: &str) -> Result<f64>;
}

/// Reads values already attached to each unit's feature map.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedFeatures;

impl FeatureSource for AnnotatedFeatures {
    fn feature_value(&self, unit: &InterPausalUnit, feature: &str) -> Result<f64> {
        match unit.features.get(feature) {
            Some(Some(value)) => Ok(*value),
            Some(None) => Ok(f64::NAN),
            None => Err(EntrainmentError::feature_not_computed(
                feature,
                unit.start,
                unit.end,
                "no value annotated for this unit",
            )),
        }
    }
}

/// Order units by start time (stable for equal starts).
pub fn order_by_start(mut units: Vec<InterPausalUnit>) -> Vec<InterPausalUnit> {
    units.sort_by(|a, b| a.start.total_cmp(&b.start));
    units
}
