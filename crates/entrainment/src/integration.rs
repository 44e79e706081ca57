//! Numerical integration strategies used by synchrony

use contracts::IntegrationMethod;

/// Integrates sampled values against their sample times.
///
/// Synchrony only ever uses ratios of integrals over windows of equal
/// length, so a strategy may drop the interval-length factor.
pub trait Integrator {
    fn integrate(&self, values: &[f64], times: &[f64]) -> f64;
}

/// Arithmetic mean of the samples
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarlo;

impl Integrator for MonteCarlo {
    fn integrate(&self, values: &[f64], _times: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Trapezoidal rule against the actual time axis
#[derive(Debug, Clone, Copy, Default)]
pub struct Trapezoidal;

impl Integrator for Trapezoidal {
    fn integrate(&self, values: &[f64], times: &[f64]) -> f64 {
        debug_assert_eq!(values.len(), times.len());
        values
            .windows(2)
            .zip(times.windows(2))
            .map(|(y, t)| 0.5 * (y[0] + y[1]) * (t[1] - t[0]))
            .sum()
    }
}

/// Strategy object for a configured method
pub fn integrator(method: IntegrationMethod) -> &'static dyn Integrator {
    match method {
        IntegrationMethod::MonteCarlo => &MonteCarlo,
        IntegrationMethod::Trapezoidal => &Trapezoidal,
    }
}
