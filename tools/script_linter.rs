/// Script Linter — validates a sentence script against an asset manifest.
///
/// Usage: script_linter <script_file> [--assets <manifest_file>] [--prefs <prefs_ron>]
///
/// The manifest is a newline-separated list of clip paths. Without one,
/// every clip is assumed present and only structural problems are
/// reported. Exits nonzero when the script has structural errors.

use rustc_hash::FxHashSet;
use std::path::Path;
use std::process;

use voiceline_engine::core::parser;
use voiceline_engine::schema::prefs::VoicePrefs;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: script_linter <script_file> [--assets <manifest_file>] [--prefs <prefs_ron>]");
        process::exit(0);
    }

    let script_path = &args[1];
    let mut manifest_path = None;
    let mut prefs_path = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--assets" if i + 1 < args.len() => {
                i += 1;
                manifest_path = Some(args[i].clone());
            }
            "--prefs" if i + 1 < args.len() => {
                i += 1;
                prefs_path = Some(args[i].clone());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let prefs = match prefs_path {
        Some(ref path) => match VoicePrefs::load_from_ron(Path::new(path)) {
            Ok(prefs) => prefs,
            Err(e) => {
                eprintln!("ERROR: Failed to load prefs: {}", e);
                process::exit(1);
            }
        },
        None => VoicePrefs::default(),
    };

    let manifest = manifest_path.map(|path| match load_manifest(&path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("ERROR: Failed to load manifest: {}", e);
            process::exit(1);
        }
    });

    let exists = |path: &str| manifest.as_ref().map_or(true, |m| m.contains(path));
    let outcome = match parser::parse_script_file(Path::new(script_path), &prefs, exists) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    println!("Parsed {} sentences", outcome.sentences.len());
    println!("\n=== Script Lint Report ===\n");

    let report = &outcome.report;
    if report.is_clean() {
        println!("All checks passed!");
    }

    for missing in &report.missing_assets {
        println!("WARNING: missing clip {}", missing);
    }
    if !report.missing_assets.is_empty() {
        println!("\nMissing clip tree:\n{}", report.missing_asset_tree());
    }

    for unknown in &report.unknown_modes {
        println!(
            "ERROR: line {}: unknown parse mode '{}'",
            unknown.line, unknown.name
        );
    }
    for malformed in &report.malformed_tokens {
        println!(
            "ERROR: line {}: malformed token '{}'",
            malformed.line, malformed.token
        );
    }

    let errors = report.unknown_modes.len() + report.malformed_tokens.len();
    println!(
        "\nSummary: {} errors, {} missing clips",
        errors,
        report.missing_assets.len()
    );

    if errors == 0 {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

/// Load a newline-separated clip manifest, lower-cased to match the
/// parser's resolved paths.
fn load_manifest(path: &str) -> Result<FxHashSet<String>, std::io::Error> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}
