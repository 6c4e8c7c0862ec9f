use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One playable audio trigger with its timing and mix parameters.
///
/// Cues are built by the script parser or by the number/compass
/// synthesizers and never mutated afterwards; the owning
/// [`Sentence`](super::sentence::Sentence) plays them in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipCue {
    /// Resolved clip path, e.g. `assets/sounds/fx/beep.wav`. Opaque to the
    /// scheduler; the audio backend resolves it.
    pub clip: String,
    /// Number of times the clip is triggered (at least 1).
    pub loops: u32,
    /// Silence between successive loops, in seconds.
    pub interval: f32,
    /// Playback rate multiplier.
    pub pitch: f32,
    /// Playback volume, with the global volume already folded in.
    pub volume: f32,
    /// Silence before this cue starts, relative to the previous cue's end,
    /// in seconds.
    pub delay: f32,
}

impl ClipCue {
    /// A cue with neutral parameters: one loop, no interval, pitch 1, the
    /// given volume, and no delay. Synthesized sentences are built from
    /// these so they start speaking immediately.
    pub fn immediate(clip: impl Into<String>, volume: f32) -> Self {
        Self {
            clip: clip.into(),
            loops: 1,
            interval: 0.0,
            pitch: 1.0,
            volume,
            delay: 0.0,
        }
    }

    /// Pre-cue silence as a [`Duration`]. Negative values read as zero;
    /// `Duration::from_secs_f32` panics on them.
    pub fn delay_duration(&self) -> Duration {
        Duration::from_secs_f32(self.delay.max(0.0))
    }

    /// Inter-loop silence as a [`Duration`]. Negative values read as zero.
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs_f32(self.interval.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_cue_defaults() {
        let cue = ClipCue::immediate("assets/sounds/numbers/five.wav", 0.8);
        assert_eq!(cue.loops, 1);
        assert_eq!(cue.interval, 0.0);
        assert_eq!(cue.pitch, 1.0);
        assert_eq!(cue.volume, 0.8);
        assert_eq!(cue.delay, 0.0);
    }

    #[test]
    fn durations_clamp_negative_values() {
        let mut cue = ClipCue::immediate("x.wav", 1.0);
        cue.delay = -0.5;
        cue.interval = -1.0;
        assert_eq!(cue.delay_duration(), Duration::ZERO);
        assert_eq!(cue.interval_duration(), Duration::ZERO);
    }

    #[test]
    fn durations_convert_seconds() {
        let mut cue = ClipCue::immediate("x.wav", 1.0);
        cue.delay = 0.25;
        cue.interval = 1.5;
        assert_eq!(cue.delay_duration(), Duration::from_millis(250));
        assert_eq!(cue.interval_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn ron_round_trip() {
        let cue = ClipCue {
            clip: "assets/sounds/fx/flatline.wav".to_string(),
            loops: 2,
            interval: 0.1,
            pitch: 1.2,
            volume: 0.5,
            delay: 0.25,
        };
        let serialized = ron::to_string(&cue).unwrap();
        let deserialized: ClipCue = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, cue);
    }
}
