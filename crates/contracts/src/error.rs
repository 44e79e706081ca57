//! Layered error definitions
//!
//! Categorized by source: configuration / data shape / collaborator / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum EntrainmentError {
    // ===== Data Shape Errors =====
    /// Not enough observations left to fit the estimator
    #[error("insufficient data: {available} observations available, {required} required")]
    InsufficientData { required: usize, available: usize },

    /// Evaluation window has no extent
    #[error("empty domain: window [{start}, {end}] has no overlap")]
    EmptyDomain { start: f64, end: f64 },

    /// Synchrony delta does not fit in the evaluation window
    #[error("invalid synchrony delta {delta}: window length is {span}")]
    InvalidDelta { delta: f64, span: f64 },

    // ===== Configuration Errors =====
    /// Neighbour count out of range
    #[error("invalid k={k}: {message}")]
    InvalidK { k: usize, message: String },

    /// Malformed query or observation
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Metric name not recognised
    #[error("unknown metric '{name}': expected proximity, convergence (pearson) or synchrony")]
    UnknownMetric { name: String },

    /// Integration strategy name not recognised
    #[error("unknown integration method '{name}': expected montecarlo or trapz")]
    UnknownIntegrationMethod { name: String },

    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Collaborator Errors =====
    /// Feature extractor has no value for an interval
    #[error("feature '{feature}' not computed for interval [{start}, {end}]: {message}")]
    FeatureNotComputed {
        feature: String,
        start: f64,
        end: f64,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category, used by callers to tell configuration mistakes
/// from data that simply cannot support the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    DataShape,
    Collaborator,
    Io,
}

impl ErrorClass {
    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::DataShape => "data_shape",
            Self::Collaborator => "collaborator",
            Self::Io => "io",
        }
    }
}

impl EntrainmentError {
    /// Category of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InsufficientData { .. } | Self::EmptyDomain { .. } | Self::InvalidDelta { .. } => {
                ErrorClass::DataShape
            }
            Self::InvalidK { .. }
            | Self::InvalidInput { .. }
            | Self::UnknownMetric { .. }
            | Self::UnknownIntegrationMethod { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. } => ErrorClass::Configuration,
            Self::FeatureNotComputed { .. } => ErrorClass::Collaborator,
            Self::Io(_) => ErrorClass::Io,
        }
    }

    /// Create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create invalid k error
    pub fn invalid_k(k: usize, message: impl Into<String>) -> Self {
        Self::InvalidK {
            k,
            message: message.into(),
        }
    }

    /// Create unknown metric error
    pub fn unknown_metric(name: impl Into<String>) -> Self {
        Self::UnknownMetric { name: name.into() }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create feature-not-computed error
    pub fn feature_not_computed(
        feature: impl Into<String>,
        start: f64,
        end: f64,
        message: impl Into<String>,
    ) -> Self {
        Self::FeatureNotComputed {
            feature: feature.into(),
            start,
            end,
            message: message.into(),
        }
    }
}

/// Result type alias used across the workspace
pub type Result<T> = std::result::Result<T, EntrainmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(
            EntrainmentError::invalid_k(0, "must be positive").class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            EntrainmentError::unknown_metric("entropy").class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            EntrainmentError::EmptyDomain {
                start: 3.0,
                end: 1.0
            }
            .class(),
            ErrorClass::DataShape
        );
        assert_eq!(
            EntrainmentError::InvalidDelta {
                delta: 20.0,
                span: 10.0
            }
            .class(),
            ErrorClass::DataShape
        );
        assert_eq!(
            EntrainmentError::feature_not_computed("F0_MAX", 0.0, 1.0, "missing").class(),
            ErrorClass::Collaborator
        );
    }

    #[test]
    fn test_error_messages() {
        let err = EntrainmentError::InsufficientData {
            required: 7,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 3 observations available, 7 required"
        );

        let err = EntrainmentError::unknown_metric("entropy");
        assert!(err.to_string().contains("'entropy'"));
    }
}
