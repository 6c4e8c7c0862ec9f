/// Sentence-script parsing — parse modes, per-token parameter blocks,
/// position-based suppression, clip path resolution, and asset filtering.

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::schema::cue::ClipCue;
use crate::schema::prefs::VoicePrefs;
use crate::schema::sentence::{Sentence, SentenceType};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("script source is empty")]
    EmptySource,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Directory prefixes baked into the script format. A clip name resolves
// against the directory implied by its position and the active parse mode.
const SOUNDS_DIR: &str = "assets/sounds/";
const MAKER_DIR: &str = "assets/sounds/weapons/maker/";
const MODEL_DIR: &str = "assets/sounds/weapons/model/";
const TYPES_DIR: &str = "assets/sounds/weapons/types/";
const CLIP_EXT: &str = ".wav";

// Fixed slot positions in Weapons and Types lines.
const WEAPON_MAKER_POS: usize = 1;
const WEAPON_MODEL_POS: usize = 2;
const WEAPON_CALIBER_POS: usize = 3;
const TYPE_CALIBER_POS: usize = 1;
const TYPE_EXTENDED_POS: usize = 3;

/// Placeholder token that keeps fixed-width lines aligned without
/// producing a cue.
const NULL_TOKEN: &str = "NULL";

/// An unrecognized `$mode` directive. Parsing continues with the mode that
/// was active before the directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode {
    /// 1-based line number in the script source.
    pub line: usize,
    pub name: String,
}

/// A cue token that could not be turned into a cue (unclosed parameter
/// block, or a Weapons-mode position with no directory). The token is
/// dropped; the rest of its line still parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedToken {
    /// 1-based line number in the script source.
    pub line: usize,
    pub token: String,
}

/// Non-fatal diagnostics collected over one parse pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Resolved clip paths that failed the asset-existence check, in first
    /// encounter order, deduplicated.
    pub missing_assets: Vec<String>,
    pub unknown_modes: Vec<UnknownMode>,
    pub malformed_tokens: Vec<MalformedToken>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.missing_assets.is_empty()
            && self.unknown_modes.is_empty()
            && self.malformed_tokens.is_empty()
    }

    /// Render the missing-asset set as a `tree /F` style listing.
    pub fn missing_asset_tree(&self) -> String {
        file_tree(&self.missing_assets)
    }
}

/// The result of one parse pass: the sentence catalog in file order plus
/// its diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub sentences: Vec<Sentence>,
    pub report: ParseReport,
}

/// Fold state while scanning lines: the active parse mode plus everything
/// collected so far.
struct Accumulator {
    mode: SentenceType,
    sentences: Vec<Sentence>,
    report: ParseReport,
    seen_missing: FxHashSet<String>,
}

/// Parse a sentence script into a catalog.
///
/// Lines starting with `//` are comments, `$Name` lines switch the parse
/// mode, every other non-empty line becomes one [`Sentence`]. `prefs`
/// supplies the global volume, the default delay, and the slot-suppression
/// toggles; `asset_exists` is the host's manifest oracle, and cues whose
/// resolved path it rejects are dropped and reported.
///
/// An empty or whitespace-only script is fatal to the parse attempt; every
/// other problem is a [`ParseReport`] diagnostic.
pub fn parse_script(
    script: &str,
    prefs: &VoicePrefs,
    asset_exists: impl Fn(&str) -> bool,
) -> Result<ParseOutcome, ParseError> {
    if script.trim().is_empty() {
        return Err(ParseError::EmptySource);
    }

    let acc = script.lines().enumerate().fold(
        Accumulator {
            mode: SentenceType::None,
            sentences: Vec::new(),
            report: ParseReport::default(),
            seen_missing: FxHashSet::default(),
        },
        |mut acc, (idx, raw)| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                return acc;
            }

            if let Some(rest) = line.strip_prefix('$') {
                let name = rest.trim();
                match SentenceType::from_directive(name) {
                    Some(mode) => {
                        debug!(?mode, "switching parse mode");
                        acc.mode = mode;
                    }
                    None => {
                        warn!(line = idx + 1, name, "unknown parse mode");
                        acc.report.unknown_modes.push(UnknownMode {
                            line: idx + 1,
                            name: name.to_string(),
                        });
                    }
                }
                return acc;
            }

            let sentence = parse_data_line(
                line,
                idx + 1,
                acc.mode,
                prefs,
                &asset_exists,
                &mut acc.report,
                &mut acc.seen_missing,
            );
            acc.sentences.push(sentence);
            acc
        },
    );

    info!(
        sentences = acc.sentences.len(),
        missing = acc.report.missing_assets.len(),
        "parsed sentence script"
    );
    Ok(ParseOutcome {
        sentences: acc.sentences,
        report: acc.report,
    })
}

/// Read a script file and parse it. See [`parse_script`].
pub fn parse_script_file(
    path: &Path,
    prefs: &VoicePrefs,
    asset_exists: impl Fn(&str) -> bool,
) -> Result<ParseOutcome, ParseError> {
    let contents = std::fs::read_to_string(path)?;
    parse_script(&contents, prefs, asset_exists)
}

fn parse_data_line(
    line: &str,
    line_no: usize,
    mode: SentenceType,
    prefs: &VoicePrefs,
    asset_exists: &impl Fn(&str) -> bool,
    report: &mut ParseReport,
    seen_missing: &mut FxHashSet<String>,
) -> Sentence {
    let tokens: Vec<&str> = line.split(' ').collect();
    let identifier = tokens[0].to_string();
    let mut clips = Vec::new();

    for (position, token) in tokens.iter().enumerate().skip(1) {
        if token.is_empty() {
            continue;
        }
        if suppressed(position, mode, prefs) {
            continue;
        }
        if *token == NULL_TOKEN {
            continue;
        }

        let (block, name) = match split_param_block(token) {
            Some(parts) => parts,
            None => {
                warn!(line = line_no, token, "malformed cue token");
                report.malformed_tokens.push(MalformedToken {
                    line: line_no,
                    token: token.to_string(),
                });
                continue;
            }
        };

        let Some(dir) = clip_directory(position, mode) else {
            warn!(line = line_no, position, token, "no clip directory for position");
            report.malformed_tokens.push(MalformedToken {
                line: line_no,
                token: token.to_string(),
            });
            continue;
        };

        let mut params = CueParams::new(prefs);
        if let Some(block) = block {
            params.apply(block);
        }

        let path = format!("{dir}{name}{CLIP_EXT}").to_lowercase();
        if !asset_exists(&path) {
            if seen_missing.insert(path.clone()) {
                report.missing_assets.push(path);
            }
            continue;
        }

        clips.push(ClipCue {
            clip: path,
            loops: params.loops,
            interval: params.interval,
            pitch: params.pitch,
            volume: params.volume,
            delay: params.delay,
        });
    }

    Sentence {
        identifier: Some(identifier),
        clips,
    }
}

/// Whether a token position is dropped outright by the slot toggles.
/// Only the fixed-width Weapons and Types lines have suppressible slots.
fn suppressed(position: usize, mode: SentenceType, prefs: &VoicePrefs) -> bool {
    match mode {
        SentenceType::Weapons => {
            (position == WEAPON_MAKER_POS && !prefs.say_maker)
                || (position == WEAPON_CALIBER_POS && !prefs.say_type)
        }
        SentenceType::Types => {
            (position == TYPE_CALIBER_POS && !prefs.say_type_on_chamber_check)
                || (position == TYPE_EXTENDED_POS && !prefs.say_extended)
        }
        SentenceType::Events | SentenceType::None => false,
    }
}

/// Split a cue token into its optional `[key:value,...]` block and the
/// clip name. `None` means the block never closes.
fn split_param_block(token: &str) -> Option<(Option<&str>, &str)> {
    match token.strip_prefix('[') {
        Some(rest) => {
            let end = rest.find(']')?;
            Some((Some(&rest[..end]), &rest[end + 1..]))
        }
        None => Some((None, token)),
    }
}

/// The directory a clip name at `position` resolves against. Types lines
/// share one directory for every slot; Events (and mode-less) lines name
/// paths relative to the sounds root; Weapons lines map slots to the
/// maker/model/caliber directories.
fn clip_directory(position: usize, mode: SentenceType) -> Option<&'static str> {
    match mode {
        SentenceType::Types => Some(TYPES_DIR),
        SentenceType::Events | SentenceType::None => Some(SOUNDS_DIR),
        SentenceType::Weapons => match position {
            WEAPON_MAKER_POS => Some(MAKER_DIR),
            WEAPON_MODEL_POS => Some(MODEL_DIR),
            WEAPON_CALIBER_POS => Some(TYPES_DIR),
            _ => None,
        },
    }
}

/// Cue parameters accumulated from a token's bracket block, starting from
/// the preference-driven defaults.
struct CueParams {
    loops: u32,
    interval: f32,
    pitch: f32,
    volume: f32,
    delay: f32,
}

impl CueParams {
    fn new(prefs: &VoicePrefs) -> Self {
        Self {
            loops: 1,
            interval: 0.0,
            pitch: 1.0,
            volume: prefs.global_volume,
            delay: prefs.default_delay,
        }
    }

    /// Apply a `key:value,key:value` block. Unrecognized keys and
    /// unparsable values are ignored; `volume` multiplies into the global
    /// volume rather than replacing it.
    fn apply(&mut self, block: &str) {
        for param in block.split(',').filter(|p| !p.is_empty()) {
            let Some((key, value)) = param.split_once(':') else {
                continue;
            };
            match key {
                "loops" => {
                    if let Ok(v) = value.parse::<u32>() {
                        self.loops = v.max(1);
                    }
                }
                "interval" => {
                    if let Ok(v) = value.parse::<f32>() {
                        self.interval = v.max(0.0);
                    }
                }
                "pitch" => {
                    if let Ok(v) = value.parse::<f32>() {
                        self.pitch = v;
                    }
                }
                "volume" => {
                    if let Ok(v) = value.parse::<f32>() {
                        self.volume *= v;
                    }
                }
                "delay" => {
                    if let Ok(v) = value.parse::<f32>() {
                        self.delay = v.max(0.0);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Render slash-separated paths as a `tree /F` style listing, children
/// sorted by name. Used for missing-asset diagnostics.
pub fn file_tree(paths: &[String]) -> String {
    #[derive(Default)]
    struct Node {
        children: BTreeMap<String, Node>,
    }

    let mut root = Node::default();
    for path in paths {
        let mut current = &mut root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current = current.children.entry(part.to_string()).or_default();
        }
    }

    fn walk(name: &str, node: &Node, prefix: &str, is_last: bool, out: &mut String) {
        out.push_str(prefix);
        if !prefix.is_empty() {
            out.push_str(if is_last { "└── " } else { "├── " });
        }
        out.push_str(name);
        out.push('\n');
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let count = node.children.len();
        for (i, (child_name, child)) in node.children.iter().enumerate() {
            walk(child_name, child, &child_prefix, i + 1 == count, out);
        }
    }

    let mut out = String::new();
    let count = root.children.len();
    for (i, (name, node)) in root.children.iter().enumerate() {
        walk(name, node, "", i + 1 == count, &mut out);
    }
    out
}
