use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// User-facing playback preferences: which fixed slots of weapon and
/// chamber-check sentences are voiced, the master volume, and the default
/// pre-cue delay.
///
/// The parser takes these as an explicit argument; nothing reads them from
/// ambient state. `say_model` and `say_name` cover the middle slot, which
/// is always voiced; they are carried for the host's settings surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoicePrefs {
    /// Voice the maker slot of a weapon sentence (ex: Colt).
    pub say_maker: bool,
    /// Voice the model slot of a weapon sentence (ex: M4A1).
    pub say_model: bool,
    /// Voice the caliber slot of a weapon sentence (ex: 5.56x45).
    pub say_type: bool,
    /// Voice the caliber slot of a chamber-check sentence.
    pub say_type_on_chamber_check: bool,
    /// Voice the name slot of a chamber-check sentence (ex: M855).
    pub say_name: bool,
    /// Voice the extended-name slot of a chamber-check sentence
    /// (ex: Tracer).
    pub say_extended: bool,
    /// Master volume multiplier folded into every parsed cue.
    pub global_volume: f32,
    /// Seconds of silence before a cue whose token carries no `delay:`
    /// parameter. Applies to the first cue of a sentence too.
    pub default_delay: f32,
}

impl Default for VoicePrefs {
    fn default() -> Self {
        Self {
            say_maker: true,
            say_model: true,
            say_type: false,
            say_type_on_chamber_check: false,
            say_name: false,
            say_extended: true,
            global_volume: 1.0,
            default_delay: 0.25,
        }
    }
}

impl VoicePrefs {
    /// Load preferences from a RON file. Missing fields take defaults.
    pub fn load_from_ron(path: &Path) -> Result<Self, PrefsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }
}
