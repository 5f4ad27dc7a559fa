//! Time-to-words encoding
//!
//! Turns a timestamp into the sentence lit on the mask, in reading order:
//!
//! ```text
//! hello [oclock] it is [<minutes> (minute|minutes) (past|to)] <hour> [in the <part of day>]
//! ```
//!
//! The minute clause comes from a 60-entry table built at compile time.
//! Minutes 1-30 count up and end in `past`; 31-59 count down to the next
//! hour and end in `to`. Quarter and half use a single word and drop the
//! `minutes` unit.

use core::fmt;

use heapless::Vec;

use crate::error::CoreError;
use crate::layout::Word;
use crate::time::Timestamp;

/// Maximum words in one lit sentence
///
/// The longest sentence has 12 words: `hello oclock it is twenty three
/// minutes to five in the afternoon`.
pub const MAX_WORDS: usize = 16;

/// Ordered word list for one timestamp
pub type TimeWords = Vec<Word, MAX_WORDS>;

/// Relation of the minute clause to the hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Past,
    To,
}

impl Relation {
    const fn word(self) -> Word {
        match self {
            Relation::Past => Word::Past,
            Relation::To => Word::To,
        }
    }
}

/// Precomputed minute clause
#[derive(Debug, Clone, Copy)]
struct MinuteClause {
    /// Numeral words (or `quarter`/`half`)
    count: &'static [Word],
    /// `minute` / `minutes`, absent for quarter and half
    unit: Option<Word>,
    /// `past` / `to`, absent at the full hour
    relation: Option<Relation>,
}

impl MinuteClause {
    const NONE: Self = Self {
        count: &[],
        unit: None,
        relation: None,
    };

    const fn single(word: &'static [Word], relation: Relation) -> Self {
        Self {
            count: word,
            unit: None,
            relation: Some(relation),
        }
    }

    const fn counted(count: u8, relation: Relation) -> Self {
        Self {
            count: NUMERALS[count as usize],
            unit: Some(if count == 1 { Word::Minute } else { Word::Minutes }),
            relation: Some(relation),
        }
    }
}

/// Minute numerals by count (index 0, 15 and 30 unused)
const NUMERALS: [&[Word]; 30] = [
    &[],
    &[Word::One1],
    &[Word::Two1],
    &[Word::Three1],
    &[Word::Four1],
    &[Word::Five1],
    &[Word::Six1],
    &[Word::Seven1],
    &[Word::Eight1],
    &[Word::Nine1],
    &[Word::Ten1],
    &[Word::Eleven1],
    &[Word::Twelve1],
    &[Word::Thirteen],
    &[Word::Fourteen],
    &[],
    &[Word::Sixteen],
    &[Word::Seventeen],
    &[Word::Eighteen],
    &[Word::Nineteen],
    &[Word::Twenty],
    &[Word::Twenty, Word::One1],
    &[Word::Twenty, Word::Two1],
    &[Word::Twenty, Word::Three1],
    &[Word::Twenty, Word::Four1],
    &[Word::Twenty, Word::Five1],
    &[Word::Twenty, Word::Six1],
    &[Word::Twenty, Word::Seven1],
    &[Word::Twenty, Word::Eight1],
    &[Word::Twenty, Word::Nine1],
];

const fn minute_clause(minute: u8) -> MinuteClause {
    match minute {
        0 => MinuteClause::NONE,
        15 => MinuteClause::single(&[Word::Quarter], Relation::Past),
        30 => MinuteClause::single(&[Word::Half], Relation::Past),
        45 => MinuteClause::single(&[Word::Quarter], Relation::To),
        1..=29 => MinuteClause::counted(minute, Relation::Past),
        _ => MinuteClause::counted(60 - minute, Relation::To),
    }
}

static MINUTE_TABLE: [MinuteClause; 60] = {
    let mut table = [MinuteClause::NONE; 60];
    let mut minute = 0;
    while minute < 60 {
        table[minute] = minute_clause(minute as u8);
        minute += 1;
    }
    table
};

/// Hour words by displayed hour modulo 12 (noon is matched before lookup)
const HOURS: [Word; 12] = [
    Word::Twelve2,
    Word::One2,
    Word::Two2,
    Word::Three2,
    Word::Four2,
    Word::Five2,
    Word::Six2,
    Word::Seven2,
    Word::Eight2,
    Word::Nine2,
    Word::Ten2,
    Word::Eleven2,
];

/// Hour word for the spoken hour
///
/// The hour rounds forward once past the half hour. 0 and 24 are
/// midnight, 12 is noon.
fn hour_word(hour: u8, minute: u8) -> Word {
    let displayed = if minute > 30 { hour + 1 } else { hour };
    match displayed {
        12 => Word::Noon,
        h => HOURS[(h % 12) as usize],
    }
}

/// Part-of-day qualifier, from the literal hour
fn part_of_day(hour: u8) -> Option<Word> {
    match hour {
        0..=11 => Some(Word::Morning),
        13..=16 => Some(Word::Afternoon),
        17..=23 => Some(Word::Evening),
        _ => None,
    }
}

/// Push words that always fit within [`MAX_WORDS`]
fn append(words: &mut TimeWords, more: &[Word]) {
    let fits = words.extend_from_slice(more).is_ok();
    debug_assert!(fits, "sentence longer than MAX_WORDS");
}

/// Encode a timestamp into the words to light, in reading order
pub fn encode(timestamp: &Timestamp) -> TimeWords {
    let hour = timestamp.hour();
    let minute = timestamp.minute();
    let mut words = TimeWords::new();

    append(&mut words, &[Word::Hello]);

    // Tests the literal hour, so 11:45 still shows it next to "noon"
    if hour != 12 {
        append(&mut words, &[Word::Oclock]);
    }

    append(&mut words, &[Word::It, Word::Is]);

    let clause = &MINUTE_TABLE[minute as usize];
    append(&mut words, clause.count);
    if let Some(unit) = clause.unit {
        append(&mut words, &[unit]);
    }
    if let Some(relation) = clause.relation {
        append(&mut words, &[relation.word()]);
    }

    append(&mut words, &[hour_word(hour, minute)]);

    if let Some(part) = part_of_day(hour) {
        append(&mut words, &[Word::In, Word::The, part]);
    }

    words
}

/// Encode an hour and minute, validating the range first
pub fn encode_hm(hour: u8, minute: u8) -> Result<TimeWords, CoreError> {
    Timestamp::from_hm(hour, minute).map(|ts| encode(&ts))
}

/// Words rendered as the spoken sentence
///
/// Used for logging: `hello o'clock it is twelve in the morning`.
pub struct Phrase<'a>(pub &'a [Word]);

impl fmt::Display for Phrase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(word.spoken())?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Phrase<'_> {
    fn format(&self, f: defmt::Formatter) {
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " ");
            }
            defmt::write!(f, "{=str}", word.spoken());
        }
    }
}
