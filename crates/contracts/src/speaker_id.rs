//! SpeakerId - speaker label shared by sessions and reports

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Speaker label as written in the session file (e.g. `"A"`, `"subject-12"`).
///
/// Reports and log fields clone it once per speaker, so the text is shared.
///
/// # Examples
/// ```
/// use contracts::SpeakerId;
///
/// let id: SpeakerId = "A".into();
/// assert_eq!(id.as_str(), "A");
/// assert_eq!(id.to_string(), "A");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SpeakerId(Arc<str>);

impl SpeakerId {
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank labels are rejected by session validation
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SpeakerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SpeakerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SpeakerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self(Arc::from(label)))
    }
}
