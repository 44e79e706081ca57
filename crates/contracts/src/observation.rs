//! Observation - one speaker interval annotated with a feature value
//!
//! `ObservationSet` is the ordered, non-overlapping sequence of observations
//! for a single speaker. It is immutable once built; filtering produces a new set.

use serde::{Deserialize, Serialize};

use crate::{EntrainmentError, FeatureSource, InterPausalUnit, Result};

/// One inter-pausal unit with its measured feature value.
///
/// `value` is `None` (or NaN) when upstream extraction failed for the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Interval start (seconds)
    pub start: f64,
    /// Interval end (seconds)
    pub end: f64,
    /// Feature value, absent if extraction failed
    pub value: Option<f64>,
}

impl Observation {
    /// Create an observation, rejecting non-finite bounds and `start >= end`.
    pub fn new(start: f64, end: f64, value: Option<f64>) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(EntrainmentError::invalid_input(format!(
                "observation bounds must be finite, got [{start}, {end}]"
            )));
        }
        if start >= end {
            return Err(EntrainmentError::invalid_input(format!(
                "observation start must be < end, got [{start}, {end}]"
            )));
        }
        Ok(Self { start, end, value })
    }

    /// Midpoint in time, used as the regression abscissa
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Value if present and finite; NaN and infinities count as absent
    #[inline]
    pub fn present_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        self.present_value().is_none()
    }
}

/// Ordered observations for one speaker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    /// Wrap an already ordered sequence.
    ///
    /// # Errors
    /// `InvalidInput` if any observation is malformed, or if starts are not
    /// ascending or consecutive intervals overlap.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for obs in &observations {
            Observation::new(obs.start, obs.end, obs.value)?;
        }
        for (idx, pair) in observations.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start < prev.end {
                return Err(EntrainmentError::invalid_input(format!(
                    "observations {idx} [{}, {}] and {} [{}, {}] overlap or are out of order",
                    prev.start,
                    prev.end,
                    idx + 1,
                    next.start,
                    next.end
                )));
            }
        }
        Ok(Self { observations })
    }

    /// Order by start time, then validate.
    pub fn from_unordered(mut observations: Vec<Observation>) -> Result<Self> {
        observations.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self::new(observations)
    }

    /// Precompute one feature for every unit.
    ///
    /// Units are ordered by start time first. Every lookup goes through
    /// `source` exactly once; a `FeatureNotComputed` failure aborts the build.
    pub fn from_units<S>(units: &[InterPausalUnit], feature: &str, source: &S) -> Result<Self>
    where
        S: FeatureSource + ?Sized,
    {
        let ordered = crate::order_by_start(units.to_vec());
        let observations = ordered
            .iter()
            .map(|unit| {
                let value = source.feature_value(unit, feature)?;
                Observation::new(unit.start, unit.end, Some(value))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(observations)
    }

    /// New set with only the observations matching `keep`, order preserved.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Observation) -> bool,
    {
        Self {
            observations: self.observations.iter().copied().filter(|o| keep(o)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Midpoints of every observation, in order
    pub fn midpoints(&self) -> Vec<f64> {
        self.observations.iter().map(Observation::midpoint).collect()
    }
}

impl TryFrom<Vec<Observation>> for ObservationSet {
    type Error = EntrainmentError;

    fn try_from(observations: Vec<Observation>) -> Result<Self> {
        Self::new(observations)
    }
}

impl From<ObservationSet> for Vec<Observation> {
    fn from(set: ObservationSet) -> Self {
        set.observations
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
