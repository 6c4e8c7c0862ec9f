//! Voiceline Engine — scripted voice-line playback for games.
//!
//! Turns small human-authored sentence scripts into catalogs of timed audio
//! cues and plays them back strictly one sentence at a time through an
//! abstract audio capability, honoring per-cue delay, loop count, inter-loop
//! interval, pitch, and volume. Number and compass-direction sentences are
//! synthesized on the fly without touching the script.

pub mod core;
pub mod schema;
