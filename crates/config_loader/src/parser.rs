//! Session file parsing
//!
//! TOML (preferred) and JSON.

use contracts::{EntrainmentError, SessionBlueprint};

/// Session file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (preferred)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a TOML session file
pub fn parse_toml(content: &str) -> Result<SessionBlueprint, EntrainmentError> {
    toml::from_str(content).map_err(|e| EntrainmentError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a JSON session file
pub fn parse_json(content: &str) -> Result<SessionBlueprint, EntrainmentError> {
    serde_json::from_str(content).map_err(|e| EntrainmentError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

pub fn parse(content: &str, format: ConfigFormat) -> Result<SessionBlueprint, EntrainmentError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}
