//! Emoji-derived sentiment over the raw, unnormalized comment.

use feedsent_core::SentimentLabel;

use crate::lexicon::EmojiLexicon;

/// Band shared by the emoji and lexical signals; scores strictly outside
/// `(-0.1, 0.1)` are polar.
pub const SENTIMENT_THRESHOLD: f64 = 0.1;

/// Lexicon weights of every character in `raw` that is a lexicon key, in order.
///
/// Repeated emoji are kept once per occurrence.
#[must_use]
pub fn extract_emoji_weights(raw: &str, lexicon: &EmojiLexicon) -> Vec<f64> {
    raw.chars().filter_map(|c| lexicon.char_weight(c)).collect()
}

/// Mean lexicon weight of the emoji in `raw`, `0.0` when there are none.
#[must_use]
pub fn emoji_score(raw: &str, lexicon: &EmojiLexicon) -> f64 {
    let weights = extract_emoji_weights(raw, lexicon);
    if weights.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = weights.len() as f64;
    weights.iter().sum::<f64>() / denom
}

#[must_use]
pub fn emoji_sentiment(score: f64) -> SentimentLabel {
    SentimentLabel::from_score(score, SENTIMENT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::EmojiCounts;

    fn counts(emoji: &str, negative: u64, neutral: u64, positive: u64) -> EmojiCounts {
        EmojiCounts {
            emoji: emoji.to_string(),
            negative,
            neutral,
            positive,
        }
    }

    #[test]
    fn no_emoji_scores_zero_and_neutral() {
        let lexicon = EmojiLexicon::builtin();
        for text in ["", "plain text", "<b>10/10</b>", "très bien"] {
            let score = emoji_score(text, &lexicon);
            assert_eq!(score, 0.0, "input {text:?}");
            assert_eq!(emoji_sentiment(score), SentimentLabel::Neutral);
        }
    }

    #[test]
    fn repeated_emoji_count_per_occurrence() {
        let lexicon = EmojiLexicon::from_rows(vec![counts("😊", 0, 0, 4), counts("😡", 2, 0, 0)]);
        // weights: +1.0, +1.0, -1.0
        let score = emoji_score("😊😊😡", &lexicon);
        assert!((score - 1.0 / 3.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn unknown_emoji_are_ignored() {
        let lexicon = EmojiLexicon::from_rows(vec![counts("😊", 0, 1, 1)]);
        assert_eq!(extract_emoji_weights("🦀 😊 🦀", &lexicon), vec![0.5]);
    }

    #[test]
    fn mixed_opposite_emoji_average() {
        let lexicon = EmojiLexicon::builtin();
        let angry = lexicon.weight("😡").unwrap();
        let smile = lexicon.weight("😊").unwrap();
        let score = emoji_score("😡😊", &lexicon);
        assert!((score - (angry + smile) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_boundaries_are_neutral() {
        assert_eq!(emoji_sentiment(0.1), SentimentLabel::Neutral);
        assert_eq!(emoji_sentiment(-0.1), SentimentLabel::Neutral);
        assert_eq!(emoji_sentiment(0.0), SentimentLabel::Neutral);
        assert_eq!(emoji_sentiment(0.11), SentimentLabel::Positive);
        assert_eq!(emoji_sentiment(-0.11), SentimentLabel::Negative);
    }

    #[test]
    fn mean_landing_on_boundary_is_neutral() {
        // 0.2 and 0.0 average to exactly 0.1.
        let lexicon = EmojiLexicon::from_rows(vec![
            counts("🅰", 0, 4, 1), // 0.2
            counts("🅱", 0, 10, 0), // 0.0
        ]);
        let score = emoji_score("🅰🅱", &lexicon);
        assert_eq!(score, 0.1);
        assert_eq!(emoji_sentiment(score), SentimentLabel::Neutral);
    }
}
