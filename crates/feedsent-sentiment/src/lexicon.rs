//! Emoji sentiment lexicon built from aggregate usage counts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::LexiconError;

/// Per-emoji occurrence totals by the sentiment of the surrounding text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmojiCounts {
    pub emoji: String,
    pub negative: u64,
    pub neutral: u64,
    pub positive: u64,
}

impl EmojiCounts {
    fn new(emoji: &str, negative: u64, neutral: u64, positive: u64) -> Self {
        Self {
            emoji: emoji.to_string(),
            negative,
            neutral,
            positive,
        }
    }

    /// `(positive - negative) / total`, or `None` when nothing was observed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self) -> Option<f64> {
        let total = self.negative + self.neutral + self.positive;
        if total == 0 {
            return None;
        }
        Some((self.positive as f64 - self.negative as f64) / total as f64)
    }
}

/// Built-in counts: (emoji, negative, neutral, positive).
const BUILTIN_COUNTS: &[(&str, u64, u64, u64)] = &[
    ("😂", 3614, 4163, 6845),
    ("❤", 355, 1334, 6361),
    ("♥", 252, 1942, 4950),
    ("😍", 329, 1390, 4640),
    ("😭", 2412, 1218, 1896),
    ("😘", 193, 702, 2753),
    ("😊", 189, 754, 2243),
    ("👌", 274, 728, 1923),
    ("💕", 99, 683, 1618),
    ("👏", 243, 634, 1459),
    ("😁", 278, 648, 1263),
    ("☺", 85, 462, 1153),
    ("♡", 64, 340, 947),
    ("👍", 102, 306, 900),
    ("😩", 558, 244, 316),
    ("🙏", 111, 386, 619),
    ("✌", 45, 322, 716),
    ("😏", 175, 356, 507),
    ("😉", 73, 306, 636),
    ("🙌", 105, 296, 693),
    ("🙈", 140, 315, 581),
    ("💪", 58, 266, 618),
    ("😄", 94, 179, 629),
    ("😒", 417, 262, 217),
    ("💃", 26, 158, 546),
    ("💖", 39, 189, 507),
    ("😃", 67, 183, 467),
    ("😔", 366, 146, 193),
    ("😱", 224, 268, 207),
    ("🎉", 24, 137, 471),
    ("😜", 87, 215, 395),
    ("🌸", 21, 180, 399),
    ("💜", 28, 141, 430),
    ("💙", 31, 170, 384),
    ("✨", 46, 213, 332),
    ("😳", 189, 196, 189),
    ("💗", 22, 121, 443),
    ("★", 36, 323, 182),
    ("█", 186, 191, 138),
    ("☀", 28, 216, 279),
    ("😡", 206, 126, 102),
    ("😎", 47, 138, 355),
    ("😢", 257, 99, 163),
    ("💋", 25, 124, 340),
    ("😋", 49, 151, 330),
    ("🙊", 72, 191, 259),
    ("😴", 152, 152, 175),
    ("🎶", 29, 194, 284),
    ("💞", 20, 103, 365),
    ("😌", 42, 120, 276),
    ("🔥", 75, 169, 192),
    ("💯", 22, 109, 293),
    ("🔫", 152, 121, 92),
    ("💛", 29, 110, 274),
    ("💁", 64, 148, 211),
    ("⚽", 41, 190, 188),
    ("🎵", 35, 186, 196),
    ("😞", 217, 58, 99),
    ("😆", 55, 111, 248),
    ("😤", 178, 117, 108),
    ("😠", 172, 68, 64),
    ("😪", 124, 88, 109),
    ("💔", 180, 79, 111),
    ("😕", 166, 85, 67),
    ("😫", 171, 70, 88),
    ("😣", 115, 61, 80),
    ("😖", 97, 47, 62),
    ("😰", 72, 71, 51),
    ("👎", 86, 49, 27),
    ("😑", 93, 94, 60),
    ("😐", 86, 112, 58),
    ("🤔", 44, 152, 59),
    ("🙂", 21, 98, 163),
    ("🙁", 71, 29, 20),
];

/// Immutable emoji -> weight mapping, weights in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Default)]
pub struct EmojiLexicon {
    weights: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct EmojiTableFile {
    emojis: Vec<EmojiCounts>,
}

impl EmojiLexicon {
    /// Build a lexicon from count rows.
    ///
    /// Rows with zero observations are skipped. When the same emoji appears
    /// more than once, the last row wins.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = EmojiCounts>,
    {
        let mut weights = BTreeMap::new();
        for row in rows {
            if let Some(score) = row.score() {
                weights.insert(row.emoji, score);
            }
        }
        Self { weights }
    }

    /// Lexicon over the built-in count table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_rows(
            BUILTIN_COUNTS
                .iter()
                .map(|&(emoji, neg, neu, pos)| EmojiCounts::new(emoji, neg, neu, pos)),
        )
    }

    /// Load count rows from a YAML file of the form
    /// `emojis: [{emoji, negative, neutral, positive}, ...]`.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError`] if the file cannot be read or parsed, or a row
    /// has an empty emoji.
    pub fn from_yaml_file(path: &Path) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path).map_err(|e| LexiconError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML count table held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError`] on malformed YAML or an empty emoji key.
    pub fn from_yaml_str(content: &str) -> Result<Self, LexiconError> {
        let table: EmojiTableFile = serde_yaml::from_str(content)?;
        if let Some(pos) = table.emojis.iter().position(|r| r.emoji.is_empty()) {
            return Err(LexiconError::Invalid(format!(
                "row {pos} has an empty emoji"
            )));
        }
        Ok(Self::from_rows(table.emojis))
    }

    /// Weight of an exact lexicon key.
    #[must_use]
    pub fn weight(&self, emoji: &str) -> Option<f64> {
        self.weights.get(emoji).copied()
    }

    /// Weight of a single character, if that character is itself a key.
    #[must_use]
    pub fn char_weight(&self, c: char) -> Option<f64> {
        let mut buf = [0u8; 4];
        self.weight(c.encode_utf8(&mut buf))
    }

    /// Lexicon keys in a stable order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
