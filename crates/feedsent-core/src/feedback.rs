use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Three-way sentiment label. Every classifying stage produces one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }

    /// Map a signed score onto a label using a symmetric band.
    ///
    /// Both comparisons are strict: a score exactly on `threshold` or
    /// `-threshold` is neutral.
    #[must_use]
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            SentimentLabel::Positive
        } else if score < -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sentiment label '{0}'")]
pub struct ParseLabelError(pub String);

impl FromStr for SentimentLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            "positive" => Ok(SentimentLabel::Positive),
            _ => Err(ParseLabelError(s.to_string())),
        }
    }
}

/// One row of the upstream `feedback` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub rating: f64,
    /// `None` when the row has not been labeled or holds an unknown value.
    pub sentiment: Option<SentimentLabel>,
    pub timestamp: DateTime<Utc>,
    pub language: Option<String>,
    pub unique_code: Option<String>,
    pub comment: Option<String>,
}

/// Dashboard filters. Every field is optional and filters combine with AND.
///
/// Empty lists mean "no filter"; ranges are inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilters {
    pub languages: Vec<String>,
    pub sentiments: Vec<SentimentLabel>,
    pub rating_range: Option<(f64, f64)>,
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl FeedbackFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
            && self.sentiments.is_empty()
            && self.rating_range.is_none()
            && self.date_range.is_none()
    }
}
