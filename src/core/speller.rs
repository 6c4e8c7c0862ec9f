/// Number speller — integer to spoken-English word decomposition.

use crate::schema::cue::ClipCue;
use crate::schema::prefs::VoicePrefs;
use crate::schema::sentence::Sentence;

const NUMBERS_DIR: &str = "assets/sounds/numbers/";
const CLIP_EXT: &str = ".wav";

const TENS: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const ONES: [&str; 19] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
    "eighteen", "nineteen",
];

/// Decompose an integer into its spoken-English word sequence.
///
/// `0` is `["zero"]`; negatives are prefixed with `"negative"`; a zero
/// remainder inside a larger number contributes no word, so 105 reads
/// "one hundred five".
pub fn spell(number: i32) -> Vec<&'static str> {
    if number == 0 {
        return vec!["zero"];
    }

    let mut words = Vec::new();
    if number < 0 {
        words.push("negative");
    }
    push_words(number.unsigned_abs(), &mut words);
    words
}

fn push_words(mut number: u32, words: &mut Vec<&'static str>) {
    if number >= 1000 {
        push_words(number / 1000, words);
        words.push("thousand");
        number %= 1000;
    }

    if number >= 100 {
        push_words(number / 100, words);
        words.push("hundred");
        number %= 100;
    }

    if number >= 20 {
        words.push(TENS[(number / 10) as usize - 2]);
        number %= 10;
    }

    if number >= 1 {
        words.push(ONES[number as usize - 1]);
    }
}

/// Build a one-off sentence that reads `number` aloud from the numbers
/// clip set. Synthesized sentences carry no identifier and no pre-cue
/// delay, so they start speaking immediately.
pub fn number_sentence(number: i32, prefs: &VoicePrefs) -> Sentence {
    let clips = spell(number)
        .into_iter()
        .map(|word| {
            ClipCue::immediate(format!("{NUMBERS_DIR}{word}{CLIP_EXT}"), prefs.global_volume)
        })
        .collect();
    Sentence::anonymous(clips)
}
