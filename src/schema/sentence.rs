use serde::{Deserialize, Serialize};

use super::cue::ClipCue;

/// Parse mode for a block of script lines, set by a `$Name` directive.
///
/// The mode decides which directory each token position resolves against
/// and which fixed positions may be suppressed by user preferences:
/// `Events` lines are free-form, `Weapons` and `Types` lines are fixed
/// three-slot lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SentenceType {
    #[default]
    None,
    Events,
    Weapons,
    Types,
}

impl SentenceType {
    /// Parse the name of a `$` directive. Mode names are case-sensitive;
    /// anything unrecognized is `None` here and reported by the parser.
    pub fn from_directive(name: &str) -> Option<Self> {
        match name {
            "None" => Some(Self::None),
            "Events" => Some(Self::Events),
            "Weapons" => Some(Self::Weapons),
            "Types" => Some(Self::Types),
            _ => None,
        }
    }
}

/// An identified, ordered sequence of audio cues representing one
/// voice-line event.
///
/// Several sentences may share an identifier; lookup treats them as
/// alternative readings and picks one at random. An empty clip list is
/// legal and plays nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Lookup key. `None` for synthesized one-off sentences that are
    /// queued directly and never looked up.
    pub identifier: Option<String>,
    /// Cues in playback order.
    pub clips: Vec<ClipCue>,
}

impl Sentence {
    pub fn new(identifier: impl Into<String>, clips: Vec<ClipCue>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            clips,
        }
    }

    /// A sentence without an identifier, as produced by the number and
    /// compass synthesizers.
    pub fn anonymous(clips: Vec<ClipCue>) -> Self {
        Self {
            identifier: None,
            clips,
        }
    }
}
