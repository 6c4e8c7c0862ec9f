/// Parser integration tests — fixture script end-to-end, suppression
/// toggles, diagnostics, and catalog handoff to the scheduler.

use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::Arc;

use voiceline_engine::core::audio::NullBackend;
use voiceline_engine::core::parser;
use voiceline_engine::core::scheduler::PlaybackScheduler;
use voiceline_engine::schema::prefs::VoicePrefs;

const FIXTURE: &str = "tests/fixtures/test_sentences.txt";

fn fixture_assets() -> FxHashSet<String> {
    [
        "assets/sounds/fx/beep.wav",
        "assets/sounds/fx/flatline.wav",
        "assets/sounds/hud/health_low.wav",
        "assets/sounds/hud/seek_medical.wav",
        "assets/sounds/weapons/maker/colt.wav",
        "assets/sounds/weapons/model/m4a1.wav",
        "assets/sounds/weapons/types/556.wav",
        "assets/sounds/weapons/types/m855.wav",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Preferences with every slot voiced, so the fixture parses without
/// suppression.
fn say_everything() -> VoicePrefs {
    VoicePrefs {
        say_type: true,
        say_type_on_chamber_check: true,
        ..VoicePrefs::default()
    }
}

#[test]
fn fixture_parses_cleanly_with_all_slots_voiced() {
    let assets = fixture_assets();
    let outcome = parser::parse_script_file(Path::new(FIXTURE), &say_everything(), |path| {
        assets.contains(path)
    })
    .unwrap();

    assert!(outcome.report.is_clean(), "report: {:?}", outcome.report);
    assert_eq!(outcome.sentences.len(), 5);

    let death = &outcome.sentences[0];
    assert_eq!(death.identifier.as_deref(), Some("Death"));
    assert_eq!(death.clips.len(), 4);
    assert_eq!(death.clips[0].loops, 2);
    assert_eq!(death.clips[3].pitch, 1.2);

    let weapon = &outcome.sentences[3];
    assert_eq!(weapon.clips.len(), 3);
    assert_eq!(weapon.clips[0].clip, "assets/sounds/weapons/maker/colt.wav");
    assert_eq!(weapon.clips[1].clip, "assets/sounds/weapons/model/m4a1.wav");
    assert_eq!(weapon.clips[2].clip, "assets/sounds/weapons/types/556.wav");

    // The trailing NULL holds the extended-name slot without a cue.
    let ammo = &outcome.sentences[4];
    assert_eq!(ammo.clips.len(), 2);
    assert_eq!(ammo.clips[0].clip, "assets/sounds/weapons/types/556.wav");
    assert_eq!(ammo.clips[1].clip, "assets/sounds/weapons/types/m855.wav");
}

#[test]
fn default_prefs_suppress_caliber_slots() {
    let assets = fixture_assets();
    let outcome = parser::parse_script_file(Path::new(FIXTURE), &VoicePrefs::default(), |path| {
        assets.contains(path)
    })
    .unwrap();

    // say_type defaults off: weapon caliber slot dropped.
    let weapon = &outcome.sentences[3];
    assert_eq!(weapon.clips.len(), 2);
    assert_eq!(weapon.clips[1].clip, "assets/sounds/weapons/model/m4a1.wav");

    // say_type_on_chamber_check defaults off: ammo caliber slot dropped.
    let ammo = &outcome.sentences[4];
    assert_eq!(ammo.clips.len(), 1);
    assert_eq!(ammo.clips[0].clip, "assets/sounds/weapons/types/m855.wav");
}

#[test]
fn duplicate_identifiers_are_kept_as_alternatives() {
    let assets = fixture_assets();
    let outcome = parser::parse_script_file(Path::new(FIXTURE), &say_everything(), |path| {
        assets.contains(path)
    })
    .unwrap();

    let low_health: Vec<_> = outcome
        .sentences
        .iter()
        .filter(|s| s.identifier.as_deref() == Some("LowHealth"))
        .collect();
    assert_eq!(low_health.len(), 2);
    assert_ne!(low_health[0].clips[0].clip, low_health[1].clips[0].clip);
}

#[test]
fn missing_assets_are_reported_once() {
    let mut assets = fixture_assets();
    assets.remove("assets/sounds/fx/beep.wav");

    let outcome = parser::parse_script_file(Path::new(FIXTURE), &say_everything(), |path| {
        assets.contains(path)
    })
    .unwrap();

    // All three beep cues dropped, flatline kept.
    let death = &outcome.sentences[0];
    assert_eq!(death.clips.len(), 1);
    assert_eq!(death.clips[0].clip, "assets/sounds/fx/flatline.wav");

    // One deduplicated report entry despite three occurrences.
    assert_eq!(
        outcome.report.missing_assets,
        vec!["assets/sounds/fx/beep.wav"]
    );
    assert!(outcome.report.missing_asset_tree().contains("beep.wav"));
}

#[test]
fn parse_is_idempotent_over_the_fixture() {
    let assets = fixture_assets();
    let prefs = say_everything();
    let first =
        parser::parse_script_file(Path::new(FIXTURE), &prefs, |p| assets.contains(p)).unwrap();
    let second =
        parser::parse_script_file(Path::new(FIXTURE), &prefs, |p| assets.contains(p)).unwrap();
    assert_eq!(first.sentences, second.sentences);
    assert_eq!(first.report, second.report);
}

#[tokio::test]
async fn reload_hands_the_catalog_to_the_scheduler() {
    let assets = fixture_assets();
    let script = std::fs::read_to_string(FIXTURE).unwrap();
    let scheduler = PlaybackScheduler::with_seed(Arc::new(NullBackend), 3);

    let report = scheduler
        .reload_from_script(&script, &say_everything(), |p| assets.contains(p))
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(scheduler.catalog_len(), 5);

    let death = scheduler.get_by_id("Death").unwrap();
    assert_eq!(death.clips.len(), 4);
    assert_eq!(
        scheduler.identifiers(),
        vec![
            "Death",
            "LowHealth",
            "5926bb2186f7744b1c6c6e60",
            "59e6920f86f7744b1c6c6e61"
        ]
    );
}
