//! Word layout of the letter mask
//!
//! The panel sits behind a 16x16 grid of cut-out letters. Each word is a
//! rectangle on that grid, addressed with 1-based row/column numbers from
//! the top-left corner.
//!
//! Several words share letters (`six1`/`sixteen`, `past`/`to`, the vertical
//! `ten1` crossing `twenty`). The encoder never lights two overlapping words
//! at the same time.
//!
//! Number words appear twice: the `*1` instances count minutes, the `*2`
//! instances name the hour. They are separate lit regions, so they are
//! separate variants.

use core::str::FromStr;

use crate::error::CoreError;

/// Logical grid rows
pub const GRID_ROWS: u8 = 16;

/// Logical grid columns
pub const GRID_COLS: u8 = 16;

/// Rectangular region of one word on the logical grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordEntry {
    /// Top row (1-based)
    pub row: u8,
    /// Leftmost column (1-based)
    pub column: u8,
    /// Columns spanned
    pub width: u8,
    /// Rows spanned
    pub height: u8,
}

impl WordEntry {
    const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a layout entry
    pub const fn new(row: u8, column: u8, width: u8, height: u8) -> Self {
        Self {
            row,
            column,
            width,
            height,
        }
    }

    /// Check that the region is non-empty and inside the grid
    pub const fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.row >= 1
            && self.column >= 1
            && self.row as u16 + self.height as u16 - 1 <= GRID_ROWS as u16
            && self.column as u16 + self.width as u16 - 1 <= GRID_COLS as u16
    }

    /// Iterate the covered cells as zero-based `(x, y)` grid coordinates
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> {
        let x0 = self.column.saturating_sub(1);
        let y0 = self.row.saturating_sub(1);
        let (width, height) = (self.width, self.height);
        (y0..y0 + height).flat_map(move |y| (x0..x0 + width).map(move |x| (x, y)))
    }
}

macro_rules! word_table {
    ($($variant:ident => $name:literal, $spoken:literal, ($row:literal, $col:literal, $w:literal, $h:literal);)*) => {
        /// Every word on the letter mask, in reading order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(rename_all = "lowercase")
        )]
        pub enum Word {
            $($variant,)*
        }

        impl Word {
            /// All words in layout order
            pub const ALL: &'static [Word] = &[$(Word::$variant,)*];

            /// Number of words in the layout
            pub const COUNT: usize = Word::ALL.len();

            /// Canonical token name (`"one1"`, `"oclock"`, ...)
            pub const fn name(self) -> &'static str {
                match self {
                    $(Word::$variant => $name,)*
                }
            }

            /// The word as printed on the mask
            pub const fn spoken(self) -> &'static str {
                match self {
                    $(Word::$variant => $spoken,)*
                }
            }

            const fn layout_entry(self) -> WordEntry {
                match self {
                    $(Word::$variant => WordEntry::new($row, $col, $w, $h),)*
                }
            }
        }
    };
}

word_table! {
    Hello     => "hello",     "hello",     (1, 1, 5, 1);
    Happy     => "happy",     "happy",     (1, 6, 5, 1);
    New       => "new",       "new",       (1, 12, 3, 1);
    Snowflake => "snowflake", "*",         (1, 16, 1, 1);
    It        => "it",        "it",        (2, 1, 2, 1);
    Is        => "is",        "is",        (2, 4, 2, 1);
    Twenty    => "twenty",    "twenty",    (2, 7, 6, 1);
    Year      => "year",      "year!",     (2, 12, 5, 1);
    Two1      => "two1",      "two",       (3, 1, 3, 1);
    One1      => "one1",      "one",       (3, 3, 3, 1);
    Eleven1   => "eleven1",   "eleven",    (3, 5, 6, 1);
    Twelve1   => "twelve1",   "twelve",    (3, 11, 6, 1);
    Six1      => "six1",      "six",       (4, 1, 3, 1);
    Sixteen   => "sixteen",   "sixteen",   (4, 1, 7, 1);
    Three1    => "three1",    "three",     (4, 8, 5, 1);
    Five1     => "five1",     "five",      (4, 13, 4, 1);
    Ten1      => "ten1",      "ten",       (2, 7, 1, 3);
    Eddie     => "eddie",     "eddie",     (5, 1, 5, 1);
    Quarter   => "quarter",   "quarter",   (5, 6, 7, 1);
    Half      => "half",      "half",      (5, 13, 4, 1);
    Seven1    => "seven1",    "seven",     (6, 1, 5, 1);
    Seventeen => "seventeen", "seventeen", (6, 1, 9, 1);
    Nine1     => "nine1",     "nine",      (6, 9, 4, 1);
    Nineteen  => "nineteen",  "nineteen",  (6, 9, 8, 1);
    Thirteen  => "thirteen",  "thirteen",  (7, 1, 8, 1);
    Eight1    => "eight1",    "eight",     (7, 9, 5, 1);
    Eighteen  => "eighteen",  "eighteen",  (7, 9, 8, 1);
    Four1     => "four1",     "four",      (8, 1, 4, 1);
    Fourteen  => "fourteen",  "fourteen",  (8, 1, 8, 1);
    Minutes   => "minutes",   "minutes",   (8, 10, 7, 1);
    Minute    => "minute",    "minute",    (8, 10, 6, 1);
    Past      => "past",      "past",      (9, 1, 4, 1);
    To        => "to",        "to",        (9, 4, 2, 1);
    Heart     => "heart",     "<3",        (9, 6, 1, 1);
    Two2      => "two2",      "two",       (9, 7, 3, 1);
    One2      => "one2",      "one",       (9, 9, 3, 1);
    Three2    => "three2",    "three",     (9, 12, 5, 1);
    Twelve2   => "twelve2",   "twelve",    (10, 1, 6, 1);
    Seven2    => "seven2",    "seven",     (10, 8, 5, 1);
    Nine2     => "nine2",     "nine",      (10, 13, 4, 1);
    Five2     => "five2",     "five",      (11, 1, 4, 1);
    Six2      => "six2",      "six",       (11, 5, 3, 1);
    Eleven2   => "eleven2",   "eleven",    (11, 8, 6, 1);
    Ten2      => "ten2",      "ten",       (11, 14, 3, 1);
    Eight2    => "eight2",    "eight",     (12, 1, 5, 1);
    Four2     => "four2",     "four",      (12, 6, 4, 1);
    Oclock    => "oclock",    "o'clock",   (12, 11, 6, 1);
    In        => "in",        "in",        (13, 1, 2, 1);
    The       => "the",       "the",       (13, 4, 3, 1);
    Afternoon => "afternoon", "afternoon", (13, 8, 9, 1);
    Noon      => "noon",      "noon",      (13, 13, 4, 1);
    Christmas => "christmas", "christmas", (14, 1, 9, 1);
    Morning   => "morning",   "morning",   (14, 10, 7, 1);
    Evening   => "evening",   "evening",   (15, 1, 7, 1);
    Birthday  => "birthday",  "birthday!", (15, 8, 9, 1);
    Have      => "have",      "have",      (16, 1, 4, 1);
    A         => "a",         "a",         (16, 6, 1, 1);
    Nice      => "nice",      "nice",      (16, 8, 4, 1);
    Day       => "day",       "day!",      (16, 13, 4, 1);
}

impl Word {
    /// Parse a canonical token name
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Word::ALL
            .iter()
            .copied()
            .find(|w| w.name() == name)
            .ok_or(CoreError::UnknownToken)
    }
}

impl FromStr for Word {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::from_name(s)
    }
}

/// Read-only word lookup table
pub struct WordGrid {
    entries: [WordEntry; Word::COUNT],
}

/// The layout of the reference 16x16 letter mask
pub static WORD_GRID: WordGrid = WordGrid::reference();

impl WordGrid {
    /// Build the reference layout
    pub const fn reference() -> Self {
        let mut entries = [WordEntry::EMPTY; Word::COUNT];
        let mut i = 0;
        while i < Word::COUNT {
            entries[i] = Word::ALL[i].layout_entry();
            i += 1;
        }
        Self { entries }
    }

    /// Region of a word
    pub fn entry(&self, word: Word) -> &WordEntry {
        &self.entries[word as usize]
    }

    /// Region of a word given by its token name
    pub fn lookup(&self, name: &str) -> Result<&WordEntry, CoreError> {
        Word::from_name(name).map(|word| self.entry(word))
    }

    /// Check every entry is non-empty and inside the grid
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.entries.iter().all(WordEntry::is_valid) {
            Ok(())
        } else {
            Err(CoreError::InvalidParameter)
        }
    }

    /// Iterate all words with their regions
    pub fn iter(&self) -> impl Iterator<Item = (Word, &WordEntry)> {
        Word::ALL.iter().copied().zip(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layout_is_valid() {
        assert_eq!(WORD_GRID.validate(), Ok(()));
        assert_eq!(Word::COUNT, 59);
    }

    #[test]
    fn test_discriminants_match_table_order() {
        for (i, word) in Word::ALL.iter().enumerate() {
            assert_eq!(*word as usize, i);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let entry = WORD_GRID.lookup("oclock").unwrap();
        assert_eq!(*entry, WordEntry::new(12, 11, 6, 1));

        let ten = WORD_GRID.lookup("ten1").unwrap();
        assert_eq!((ten.width, ten.height), (1, 3));
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(WORD_GRID.lookup("thirty"), Err(CoreError::UnknownToken));
        assert_eq!("one".parse::<Word>(), Err(CoreError::UnknownToken));
        assert_eq!("one2".parse::<Word>(), Ok(Word::One2));
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in Word::ALL.iter().enumerate() {
            for b in &Word::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_cells_cover_rectangle() {
        let entry = WordEntry::new(2, 7, 1, 3);
        let mut cells = entry.cells();
        assert_eq!(cells.next(), Some((6, 1)));
        assert_eq!(cells.next(), Some((6, 2)));
        assert_eq!(cells.next(), Some((6, 3)));
        assert_eq!(cells.next(), None);

        assert_eq!(WORD_GRID.entry(Word::Afternoon).cells().count(), 9);
    }

    #[test]
    fn test_invalid_entries() {
        assert!(!WordEntry::new(1, 1, 0, 1).is_valid());
        assert!(!WordEntry::new(16, 1, 1, 2).is_valid());
        assert!(!WordEntry::new(1, 12, 6, 1).is_valid());
        assert!(!WordEntry::new(0, 1, 1, 1).is_valid());
        assert!(WordEntry::new(16, 16, 1, 1).is_valid());
    }
}
