/// Playback scheduling — the sentence catalog, the FIFO pending queue, and
/// the single cooperative drain task.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::audio::AudioBackend;
use crate::core::parser::{self, ParseError, ParseReport};
use crate::schema::prefs::VoicePrefs;
use crate::schema::sentence::Sentence;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup identifier is empty")]
    EmptyIdentifier,
    #[error("no sentence found for identifier '{0}'")]
    NotFound(String),
    #[error("the sentence catalog is empty")]
    EmptyCatalog,
}

struct Shared {
    catalog: Vec<Sentence>,
    pending: VecDeque<Sentence>,
    task: Option<JoinHandle<()>>,
    rng: StdRng,
}

/// Owns the sentence catalog and plays queued sentences strictly one at a
/// time through an [`AudioBackend`].
///
/// Every method is non-blocking: playback happens on a background tokio
/// task whose only suspension points are the delay/duration/interval
/// waits, so the scheduler must live inside a tokio runtime. Clones are
/// cheap and share the same catalog and queue.
#[derive(Clone)]
pub struct PlaybackScheduler {
    shared: Arc<Mutex<Shared>>,
    audio: Arc<dyn AudioBackend>,
}

impl PlaybackScheduler {
    pub fn new(audio: Arc<dyn AudioBackend>) -> Self {
        Self::build(audio, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) but with a fixed RNG seed, so selection
    /// among duplicate identifiers is reproducible.
    pub fn with_seed(audio: Arc<dyn AudioBackend>, seed: u64) -> Self {
        Self::build(audio, StdRng::seed_from_u64(seed))
    }

    fn build(audio: Arc<dyn AudioBackend>, rng: StdRng) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                catalog: Vec::new(),
                pending: VecDeque::new(),
                task: None,
                rng,
            })),
            audio,
        }
    }

    /// Append a sentence to the catalog. Duplicate identifiers are kept as
    /// alternative readings.
    pub fn add_to_catalog(&self, sentence: Sentence) {
        self.shared.lock().catalog.push(sentence);
    }

    /// Cancel any active playback and drop both the queue and the catalog.
    /// Called before a reparse; also the recovery hatch for a wedged task.
    pub fn purge(&self) {
        let mut shared = self.shared.lock();
        if let Some(task) = shared.task.take() {
            task.abort();
        }
        shared.pending.clear();
        shared.catalog.clear();
        info!("purged sentence catalog and pending queue");
    }

    /// Queue a sentence for playback, starting the drain task if none is
    /// running. The check-and-spawn happens under the state lock, so a
    /// task that is finishing cannot race a fresh enqueue.
    pub fn enqueue(&self, sentence: Sentence) {
        let mut shared = self.shared.lock();
        shared.pending.push_back(sentence);
        if shared.task.is_none() {
            let state = Arc::clone(&self.shared);
            let audio = Arc::clone(&self.audio);
            shared.task = Some(tokio::spawn(drain(state, audio)));
        }
    }

    /// Look up `identifier` and queue the match for playback.
    pub fn play_by_id(&self, identifier: &str) -> Result<(), LookupError> {
        let sentence = self.get_by_id(identifier)?;
        debug!(identifier, "queueing sentence");
        self.enqueue(sentence);
        Ok(())
    }

    /// Queue a uniformly random catalog sentence. Diagnostic aid.
    pub fn play_random(&self) -> Result<(), LookupError> {
        let sentence = {
            let mut shared = self.shared.lock();
            let Shared { catalog, rng, .. } = &mut *shared;
            catalog.choose(rng).cloned().ok_or(LookupError::EmptyCatalog)?
        };
        debug!(identifier = ?sentence.identifier, "queueing random sentence");
        self.enqueue(sentence);
        Ok(())
    }

    /// Fetch a sentence by identifier. When several sentences share the
    /// identifier, one of them is chosen uniformly at random.
    pub fn get_by_id(&self, identifier: &str) -> Result<Sentence, LookupError> {
        if identifier.is_empty() {
            return Err(LookupError::EmptyIdentifier);
        }

        let mut shared = self.shared.lock();
        let Shared { catalog, rng, .. } = &mut *shared;
        let matches: Vec<&Sentence> = catalog
            .iter()
            .filter(|s| s.identifier.as_deref() == Some(identifier))
            .collect();
        matches
            .choose(rng)
            .map(|s| (*s).clone())
            .ok_or_else(|| LookupError::NotFound(identifier.to_string()))
    }

    /// Purge, reparse, and refill the catalog from a new script source.
    /// Purging first means the old drain task can never race sentences
    /// from the new catalog.
    pub fn reload_from_script(
        &self,
        script: &str,
        prefs: &VoicePrefs,
        asset_exists: impl Fn(&str) -> bool,
    ) -> Result<ParseReport, ParseError> {
        warn!("reparsing sentences");
        self.purge();
        let outcome = parser::parse_script(script, prefs, asset_exists)?;

        let count = outcome.sentences.len();
        self.shared.lock().catalog = outcome.sentences;

        info!(sentences = count, "reloaded sentence catalog");
        if !outcome.report.missing_assets.is_empty() {
            warn!(
                count = outcome.report.missing_assets.len(),
                "missing clips:\n{}",
                outcome.report.missing_asset_tree()
            );
        }
        Ok(outcome.report)
    }

    /// Distinct identifiers currently in the catalog, in insertion order.
    pub fn identifiers(&self) -> Vec<String> {
        let shared = self.shared.lock();
        let mut seen = FxHashSet::default();
        let mut ids = Vec::new();
        for sentence in &shared.catalog {
            if let Some(id) = sentence.identifier.as_deref() {
                if seen.insert(id.to_string()) {
                    ids.push(id.to_string());
                }
            }
        }
        ids
    }

    pub fn catalog_len(&self) -> usize {
        self.shared.lock().catalog.len()
    }

    pub fn pending_len(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Whether a drain task is currently active.
    pub fn is_playing(&self) -> bool {
        self.shared.lock().task.is_some()
    }
}

/// The playback task: pops pending sentences in FIFO order and plays each
/// one to completion. Exits when the queue drains; clearing its own handle
/// and popping happen under the same lock `enqueue` uses, so exactly one
/// task is ever active. Cancellation (purge) lands on a sleep point.
async fn drain(shared: Arc<Mutex<Shared>>, audio: Arc<dyn AudioBackend>) {
    loop {
        let sentence = {
            let mut guard = shared.lock();
            match guard.pending.pop_front() {
                Some(sentence) => sentence,
                None => {
                    guard.task = None;
                    return;
                }
            }
        };
        play_sentence(&sentence, audio.as_ref()).await;
    }
}

/// Play one sentence cue by cue: wait out the pre-cue delay, then trigger
/// each loop and wait for the clip duration plus the inter-loop interval.
/// A cue that fails to resolve or play is skipped; the rest of the
/// sentence still plays.
async fn play_sentence(sentence: &Sentence, audio: &dyn AudioBackend) {
    for cue in &sentence.clips {
        let Some(duration) = audio.resolve(&cue.clip) else {
            warn!(clip = %cue.clip, "missing clip");
            continue;
        };

        sleep(cue.delay_duration()).await;
        for _ in 0..cue.loops {
            if let Err(error) = audio.play(&cue.clip, cue.pitch, cue.volume) {
                warn!(clip = %cue.clip, %error, "clip failed to play");
                break;
            }
            sleep(duration + cue.interval_duration()).await;
        }
    }
}
