//! # Config Loader
//!
//! Session file loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON session files
//! - Validate analysis settings and IPU tracks
//! - Generate `SessionBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::SessionLoader;
//! use std::path::Path;
//!
//! let blueprint = SessionLoader::load_from_path(Path::new("session.toml")).unwrap();
//! println!("Feature: {}", blueprint.analysis.feature);
//! ```

mod parser;
mod validator;

pub use contracts::SessionBlueprint;
pub use parser::ConfigFormat;
pub use validator::validate;

use contracts::EntrainmentError;
use std::path::Path;

/// Session file loader
///
/// Provides static methods to load sessions from files or strings.
pub struct SessionLoader;

impl SessionLoader {
    /// Load a session from a file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SessionBlueprint, EntrainmentError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a session from a string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SessionBlueprint, EntrainmentError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Serialize a session to a TOML string
    pub fn to_toml(blueprint: &SessionBlueprint) -> Result<String, EntrainmentError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| EntrainmentError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize a session to a JSON string
    pub fn to_json(blueprint: &SessionBlueprint) -> Result<String, EntrainmentError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| EntrainmentError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Infer the format from the file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, EntrainmentError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            EntrainmentError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            EntrainmentError::config_parse(format!("unsupported session format: .{ext}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ErrorClass, IntegrationMethod, MetricKind};
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
session = "dialogue-01"

[analysis]
feature = "F0_MAX"
compute = ["proximity", "synchrony"]

[analysis.estimator]
k = 4

[analysis.metrics]
granularity = 0.01
deltas = [-5.0, 0.0, 5.0]
integration_method = "trapz"

[[speakers]]
id = "A"
[[speakers.ipus]]
start = 8.0
end = 12.0
features = { F0_MAX = 200.002 }
[[speakers.ipus]]
start = 0.0
end = 4.0
features = { F0_MAX = 100.003 }

[[speakers]]
id = "B"
[[speakers.ipus]]
start = 0.0
end = 8.0
features = { F0_MAX = 300.002 }
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = SessionLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.session, "dialogue-01");
        assert_eq!(bp.analysis.estimator.k, 4);
        assert_eq!(
            bp.analysis.compute,
            vec![MetricKind::Proximity, MetricKind::Synchrony]
        );
        assert_eq!(
            bp.analysis.metrics.integration_method,
            IntegrationMethod::Trapezoidal
        );
        let (a, b) = bp.speaker_pair().unwrap();
        assert_eq!(a.ipus.len(), 2);
        assert_eq!(b.ipus.len(), 1);
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = SessionLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = SessionLoader::to_toml(&bp).unwrap();
        let bp2 = SessionLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.session, bp2.session);
        assert_eq!(bp.analysis.metrics.deltas, bp2.analysis.metrics.deltas);
        assert_eq!(bp.speakers[0].ipus, bp2.speakers[0].ipus);
    }

    #[test]
    fn test_round_trip_json() {
        let bp = SessionLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = SessionLoader::to_json(&bp).unwrap();
        let bp2 = SessionLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.analysis.feature, bp2.analysis.feature);
        assert_eq!(bp.speakers[1].id, bp2.speakers[1].id);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = MINIMAL_TOML.replace("id = \"B\"", "id = \"A\"");
        let err = SessionLoader::load_from_str(&content, ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let bp = SessionLoader::load_from_path(file.path()).unwrap();
        assert_eq!(bp.analysis.feature, "F0_MAX");
    }

    #[test]
    fn test_load_from_path_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = SessionLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported"), "got: {err}");
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = SessionLoader::load_from_path(Path::new("/nonexistent/session.toml")).unwrap_err();
        assert!(matches!(err, EntrainmentError::Io(_)));
    }
}
