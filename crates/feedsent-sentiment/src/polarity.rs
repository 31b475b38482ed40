//! Lexical polarity heuristic for English text.

use feedsent_core::SentimentLabel;

use crate::emoji::SENTIMENT_THRESHOLD;

/// Word polarities in `[-1.0, 1.0]`. Keys are lowercase single words.
pub(crate) const POLARITY: &[(&str, f64)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("like", 0.2),
    ("liked", 0.3),
    ("happy", 0.8),
    ("glad", 0.5),
    ("pleased", 0.5),
    ("satisfied", 0.5),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("fun", 0.3),
    ("beautiful", 0.85),
    ("pleasant", 0.73),
    ("friendly", 0.375),
    ("helpful", 0.5),
    ("kind", 0.6),
    ("polite", 0.4),
    ("fast", 0.2),
    ("quick", 0.33),
    ("easy", 0.43),
    ("simple", 0.2),
    ("clean", 0.37),
    ("fresh", 0.3),
    ("delicious", 1.0),
    ("tasty", 0.5),
    ("recommend", 0.4),
    ("recommended", 0.4),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("well", 0.2),
    ("fine", 0.42),
    ("ok", 0.5),
    ("okay", 0.5),
    ("correct", 0.3),
    ("efficient", 0.5),
    ("reliable", 0.5),
    ("impressive", 1.0),
    ("super", 0.33),
    ("top", 0.5),
    ("cool", 0.35),
    ("comfortable", 0.4),
    ("professional", 0.1),
    // Negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("poor", -0.4),
    ("hate", -0.8),
    ("hated", -0.9),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("sad", -0.5),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("annoyed", -0.4),
    ("rude", -0.3),
    ("slow", -0.3),
    ("late", -0.3),
    ("dirty", -0.6),
    ("cold", -0.6),
    ("broken", -0.4),
    ("useless", -0.5),
    ("expensive", -0.5),
    ("boring", -1.0),
    ("wrong", -0.5),
    ("difficult", -0.5),
    ("hard", -0.29),
    ("problem", -0.3),
    ("unacceptable", -0.8),
    ("unhappy", -0.6),
    ("mediocre", -0.5),
    ("nasty", -1.0),
    ("disgusting", -1.0),
    ("stupid", -0.8),
    ("ugly", -0.7),
    ("fail", -0.5),
    ("failed", -0.5),
];

/// Words that flip and dampen the next polar word.
const NEGATIONS: &[&str] = &["not", "no", "never", "nothing", "hardly", "without"];

/// Words that scale the next polar word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("extremely", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.4),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("barely", 0.5),
];

/// Multiplier applied to a polar word preceded by a negation.
const NEGATION_FACTOR: f64 = -0.5;

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], word: &str) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| *key == word)
        .map(|&(_, value)| value)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Score English text in `[-1.0, 1.0]`.
///
/// Averages the polarity of every dictionary word, after applying any
/// intensifier and negation that precede it within the same sentence.
/// Returns `0.0` when no dictionary word occurs.
#[must_use]
pub fn polarity(text: &str) -> f64 {
    let mut scores: Vec<f64> = Vec::new();
    let mut intensity = 1.0_f64;
    let mut negated = false;

    for raw in text.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();
        let ends_sentence = raw.ends_with(['.', '!', '?']);

        if let Some(weight) = lookup(POLARITY, &word) {
            let mut value = weight * intensity;
            if negated {
                value *= NEGATION_FACTOR;
            }
            scores.push(value.clamp(-1.0, 1.0));
            intensity = 1.0;
            negated = false;
        } else if is_negation(&word) {
            negated = true;
        } else if let Some(factor) = lookup(INTENSIFIERS, &word) {
            intensity *= factor;
        }

        if ends_sentence {
            intensity = 1.0;
            negated = false;
        }
    }

    if scores.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = scores.len() as f64;
    (scores.iter().sum::<f64>() / denom).clamp(-1.0, 1.0)
}

/// Lexical sentiment of translated text; blank text is neutral.
#[must_use]
pub fn lexical_sentiment(text: &str) -> SentimentLabel {
    if text.trim().is_empty() {
        return SentimentLabel::Neutral;
    }
    SentimentLabel::from_score(polarity(text), SENTIMENT_THRESHOLD)
}
