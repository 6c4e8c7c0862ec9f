/// Preview — interactive playback shell for testing sentence scripts.
///
/// Usage: preview <script_file> [--prefs <prefs_ron>] [--seed <n>]
///
/// Commands:
///   play <id>        — queue the sentence with this identifier
///   random           — queue a random catalog sentence
///   number <n>       — queue a synthesized number sentence
///   direction <deg>  — queue a synthesized direction sentence
///   list             — list catalog identifiers
///   reload           — reparse the script file
///   purge            — cancel playback and clear the queue
///   help             — list commands
///   quit             — exit
///
/// Clips are "played" by printing their trigger to stdout with a fixed
/// stand-in duration, so timing can be observed without audio hardware.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use voiceline_engine::core::audio::{AudioBackend, AudioError};
use voiceline_engine::core::compass;
use voiceline_engine::core::scheduler::PlaybackScheduler;
use voiceline_engine::core::speller;
use voiceline_engine::schema::prefs::VoicePrefs;

/// Stand-in duration for every clip, long enough to hear the pacing.
const CLIP_MILLIS: u64 = 400;

struct StdoutBackend;

impl AudioBackend for StdoutBackend {
    fn resolve(&self, _clip: &str) -> Option<Duration> {
        Some(Duration::from_millis(CLIP_MILLIS))
    }

    fn play(&self, clip: &str, pitch: f32, volume: f32) -> Result<(), AudioError> {
        println!("[play] {} (pitch {:.2}, volume {:.2})", clip, pitch, volume);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let script_path = args[1].clone();
    let mut prefs_path = None;
    let mut seed: u64 = 42;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--prefs" if i + 1 < args.len() => {
                i += 1;
                prefs_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let prefs = match prefs_path {
        Some(ref path) => match VoicePrefs::load_from_ron(Path::new(path)) {
            Ok(prefs) => prefs,
            Err(e) => {
                eprintln!("ERROR: Failed to load prefs: {}", e);
                std::process::exit(1);
            }
        },
        None => VoicePrefs::default(),
    };

    let scheduler = PlaybackScheduler::with_seed(Arc::new(StdoutBackend), seed);
    if !reload(&scheduler, &script_path, &prefs) {
        std::process::exit(1);
    }

    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let parts: Vec<&str> = line.trim().split_whitespace().collect();

        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => print_commands(),
            ["list"] => {
                for id in scheduler.identifiers() {
                    println!("  {}", id);
                }
            }
            ["play", id] => {
                if let Err(e) = scheduler.play_by_id(id) {
                    println!("ERROR: {}", e);
                }
            }
            ["random"] => {
                if let Err(e) = scheduler.play_random() {
                    println!("ERROR: {}", e);
                }
            }
            ["number", n] => match n.parse::<i32>() {
                Ok(n) => scheduler.enqueue(speller::number_sentence(n, &prefs)),
                Err(_) => println!("ERROR: '{}' is not an integer", n),
            },
            ["direction", deg] => match deg.parse::<i32>() {
                Ok(deg) => {
                    println!("  {}", compass::direction_word(deg));
                    scheduler.enqueue(compass::direction_sentence(deg, &prefs));
                }
                Err(_) => println!("ERROR: '{}' is not an integer", deg),
            },
            ["purge"] => scheduler.purge(),
            ["reload"] => {
                let _ = reload(&scheduler, &script_path, &prefs);
            }
            other => println!("Unknown command: {:?} (try 'help')", other),
        }
    }
}

/// Reparse the script file into the scheduler. Every clip is assumed
/// present — the preview has no manifest.
fn reload(scheduler: &PlaybackScheduler, script_path: &str, prefs: &VoicePrefs) -> bool {
    let script = match std::fs::read_to_string(script_path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("ERROR: Failed to read {}: {}", script_path, e);
            return false;
        }
    };

    match scheduler.reload_from_script(&script, prefs, |_| true) {
        Ok(report) => {
            println!("Loaded {} sentences from {}", scheduler.catalog_len(), script_path);
            if !report.is_clean() {
                println!(
                    "  ({} unknown modes, {} malformed tokens)",
                    report.unknown_modes.len(),
                    report.malformed_tokens.len()
                );
            }
            true
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            false
        }
    }
}

fn print_usage() {
    println!("Usage: preview <script_file> [--prefs <prefs_ron>] [--seed <n>]");
}

fn print_commands() {
    println!("  play <id>        — queue the sentence with this identifier");
    println!("  random           — queue a random catalog sentence");
    println!("  number <n>       — queue a synthesized number sentence");
    println!("  direction <deg>  — queue a synthesized direction sentence");
    println!("  list             — list catalog identifiers");
    println!("  reload           — reparse the script file");
    println!("  purge            — cancel playback and clear the queue");
    println!("  quit             — exit");
}
