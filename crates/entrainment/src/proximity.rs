//! Proximity

/// `-|mean(a) - mean(b)|`
pub fn proximity(a: &[f64], b: &[f64]) -> f64 {
    -(mean(a) - mean(b)).abs()
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
