//! Prediction query shapes

use contracts::{EntrainmentError, Result};
use serde_json::Value;

/// Times at which to evaluate an estimator
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// A single time
    Point(f64),
    /// A one-dimensional sequence of times, any order
    Series(Vec<f64>),
}

impl Query {
    /// Parse a JSON number or a flat array of numbers.
    ///
    /// # Errors
    /// `InvalidInput` for any other shape (nested arrays, strings, objects, null).
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(Query::Point)
                .ok_or_else(|| EntrainmentError::invalid_input(format!("unrepresentable time {n}"))),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_f64().ok_or_else(|| {
                        EntrainmentError::invalid_input(format!(
                            "query element {idx} must be a number, got {item}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Query::Series),
            other => Err(EntrainmentError::invalid_input(format!(
                "query must be a number or a flat array of numbers, got {other}"
            ))),
        }
    }

    /// Query times as a slice
    pub fn times(&self) -> &[f64] {
        match self {
            Self::Point(t) => std::slice::from_ref(t),
            Self::Series(ts) => ts,
        }
    }

    pub fn len(&self) -> usize {
        self.times().len()
    }

    pub fn is_empty(&self) -> bool {
        self.times().is_empty()
    }

    /// Reject non-finite times
    pub(crate) fn validate(&self) -> Result<()> {
        match self.times().iter().position(|t| !t.is_finite()) {
            Some(idx) => Err(EntrainmentError::invalid_input(format!(
                "query time at position {idx} is not finite"
            ))),
            None => Ok(()),
        }
    }
}

impl From<f64> for Query {
    fn from(t: f64) -> Self {
        Self::Point(t)
    }
}

impl From<Vec<f64>> for Query {
    fn from(ts: Vec<f64>) -> Self {
        Self::Series(ts)
    }
}

impl From<&[f64]> for Query {
    fn from(ts: &[f64]) -> Self {
        Self::Series(ts.to_vec())
    }
}
