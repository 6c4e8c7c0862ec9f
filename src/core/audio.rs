/// The external audio capability — clip resolution and triggering.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("clip not found: {0}")]
    NotFound(String),
    #[error("audio backend failure: {0}")]
    Backend(String),
}

/// What the scheduler needs from the host: resolve a clip reference to a
/// playable clip with a known duration, and trigger one playback with
/// pitch and volume applied.
///
/// Implementations are called from the playback task and should return
/// promptly; all timing (delay, duration, interval) is handled by the
/// scheduler itself.
pub trait AudioBackend: Send + Sync {
    /// Look up a clip and report its duration, or `None` when the clip
    /// cannot be resolved at play time.
    fn resolve(&self, clip: &str) -> Option<Duration>;

    /// Trigger one playback of a resolved clip.
    fn play(&self, clip: &str, pitch: f32, volume: f32) -> Result<(), AudioError>;
}

/// A backend that resolves every clip to zero duration and plays nothing.
/// Useful for tools and tests that exercise scheduling without audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn resolve(&self, _clip: &str) -> Option<Duration> {
        Some(Duration::ZERO)
    }

    fn play(&self, _clip: &str, _pitch: f32, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_backend_resolves_everything() {
        let backend = NullBackend;
        assert_eq!(backend.resolve("anything.wav"), Some(Duration::ZERO));
        assert!(backend.play("anything.wav", 1.0, 1.0).is_ok());
    }
}
