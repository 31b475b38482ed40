//! Merge the lexical, emoji and model signals into one label.

use feedsent_core::{SentimentLabel, TieBreak};

use SentimentLabel::{Negative, Neutral, Positive};

/// Combine lexical and emoji sentiment.
///
/// Opposite polar signals cancel to neutral, a neutral signal defers to the
/// other one, and agreement keeps the shared label.
#[must_use]
pub fn combine(text: SentimentLabel, emoji: SentimentLabel) -> SentimentLabel {
    match (text, emoji) {
        (Neutral, Neutral) | (Negative, Positive) | (Positive, Negative) => Neutral,
        (Negative, Neutral) | (Neutral, Negative) | (Negative, Negative) => Negative,
        (Positive, Neutral) | (Neutral, Positive) | (Positive, Positive) => Positive,
    }
}

/// Settle the combined label against the model prediction.
///
/// [`TieBreak::Literal`] returns `combined` when the two differ and `model`
/// when they are equal, so the output always equals `combined`.
/// [`TieBreak::PreferModel`] swaps the branches and defers to the model on
/// disagreement.
#[must_use]
pub fn tie_break(combined: SentimentLabel, model: SentimentLabel, mode: TieBreak) -> SentimentLabel {
    match mode {
        TieBreak::Literal => {
            if combined != model {
                combined
            } else {
                model
            }
        }
        TieBreak::PreferModel => {
            if combined != model {
                model
            } else {
                combined
            }
        }
    }
}
