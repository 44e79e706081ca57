//! SessionBlueprint - Config Loader output
//!
//! One conversation: the analysis settings plus the IPUs of both speakers.

use serde::{Deserialize, Serialize};

use crate::{AnalysisConfig, InterPausalUnit, SpeakerId};

/// Session file format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete description of one analysed conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBlueprint {
    /// Format version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Session label used in logs and reports
    #[serde(default = "default_session_name")]
    pub session: String,

    /// Analysis settings
    pub analysis: AnalysisConfig,

    /// Exactly two speakers
    pub speakers: Vec<SpeakerTrack>,
}

fn default_session_name() -> String {
    "session".to_string()
}

/// One speaker's IPUs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerTrack {
    /// Speaker label
    pub id: SpeakerId,

    /// Speech intervals; need not be ordered in the file
    #[serde(default)]
    pub ipus: Vec<InterPausalUnit>,
}

impl SessionBlueprint {
    /// Both speaker tracks, if the session has exactly two
    pub fn speaker_pair(&self) -> Option<(&SpeakerTrack, &SpeakerTrack)> {
        match self.speakers.as_slice() {
            [a, b] => Some((a, b)),
            _ => None,
        }
    }
}
