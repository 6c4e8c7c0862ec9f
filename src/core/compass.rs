/// Compass mapping — bearings to direction words and sentences.

use crate::schema::cue::ClipCue;
use crate::schema::prefs::VoicePrefs;
use crate::schema::sentence::Sentence;

const COMPASS_DIR: &str = "assets/sounds/compass/";
const CLIP_EXT: &str = ".wav";

/// The eight compass sectors, clockwise from north.
pub const DIRECTIONS: [&str; 8] = [
    "North", "Northeast", "East", "Southeast",
    "South", "Southwest", "West", "Northwest",
];

/// Map a compass bearing in degrees to its direction word. Each word owns
/// a 45° sector centered on its heading, so 0 and 359 are both "North"
/// while 46 is already "Northeast". Bearings outside [0, 360) wrap.
pub fn direction_word(bearing: i32) -> &'static str {
    let bearing = bearing.rem_euclid(360);
    let index = (((bearing as f32 + 22.5) / 45.0).floor() as usize) % 8;
    DIRECTIONS[index]
}

/// The clip path for a bearing's direction word. Compass clips are named
/// after the capitalized direction words; they are synthesized, not parser
/// output, so the parser's lower-casing rule does not apply.
pub fn direction_clip(bearing: i32) -> String {
    format!("{COMPASS_DIR}{}{CLIP_EXT}", direction_word(bearing))
}

/// Build a one-off sentence that reads a bearing's direction aloud.
pub fn direction_sentence(bearing: i32, prefs: &VoicePrefs) -> Sentence {
    Sentence::anonymous(vec![ClipCue::immediate(
        direction_clip(bearing),
        prefs.global_volume,
    )])
}

/// Convert a forward-facing vector into a compass bearing in [0, 360).
///
/// The convention comes from the host: the forward vector is negated, its
/// vertical component discarded, and the horizontal angle rotated by 270°
/// to line up with compass north. A zero horizontal vector maps to 0.
pub fn bearing_from_direction(direction: [f32; 3]) -> i32 {
    let x = -direction[0];
    let z = -direction[2];
    if x == 0.0 && z == 0.0 {
        return 0;
    }

    let mut angle = x.atan2(z).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }

    (angle as i32 + 270) % 360
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_sector_wraps_the_origin() {
        assert_eq!(direction_word(0), "North");
        assert_eq!(direction_word(22), "North");
        assert_eq!(direction_word(44), "North");
        assert_eq!(direction_word(338), "North");
        assert_eq!(direction_word(359), "North");
    }

    #[test]
    fn sectors_advance_clockwise() {
        assert_eq!(direction_word(46), "Northeast");
        assert_eq!(direction_word(90), "East");
        assert_eq!(direction_word(135), "Southeast");
        assert_eq!(direction_word(180), "South");
        assert_eq!(direction_word(225), "Southwest");
        assert_eq!(direction_word(270), "West");
        assert_eq!(direction_word(315), "Northwest");
    }

    #[test]
    fn out_of_range_bearings_wrap() {
        assert_eq!(direction_word(360), "North");
        assert_eq!(direction_word(450), "East");
        assert_eq!(direction_word(-45), "Northwest");
    }

    #[test]
    fn clip_path_keeps_capitalization() {
        assert_eq!(direction_clip(0), "assets/sounds/compass/North.wav");
        assert_eq!(direction_clip(90), "assets/sounds/compass/East.wav");
    }

    #[test]
    fn direction_sentence_is_single_cue() {
        let sentence = direction_sentence(180, &VoicePrefs::default());
        assert!(sentence.identifier.is_none());
        assert_eq!(sentence.clips.len(), 1);
        assert_eq!(sentence.clips[0].clip, "assets/sounds/compass/South.wav");
        assert_eq!(sentence.clips[0].delay, 0.0);
    }

    #[test]
    fn bearing_from_cardinal_vectors() {
        assert_eq!(bearing_from_direction([0.0, 0.0, -1.0]), 270);
        assert_eq!(bearing_from_direction([-1.0, 0.0, 0.0]), 0);
        assert_eq!(bearing_from_direction([0.0, 0.0, 1.0]), 90);
        assert_eq!(bearing_from_direction([1.0, 0.0, 0.0]), 180);
    }

    #[test]
    fn vertical_component_is_ignored() {
        assert_eq!(
            bearing_from_direction([0.0, 5.0, -1.0]),
            bearing_from_direction([0.0, 0.0, -1.0])
        );
    }

    #[test]
    fn zero_vector_is_north() {
        assert_eq!(bearing_from_direction([0.0, 0.0, 0.0]), 0);
        assert_eq!(bearing_from_direction([0.0, 3.0, 0.0]), 0);
    }
}
