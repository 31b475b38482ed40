//! Pipeline outputs.

use feedsent_core::SentimentLabel;
use serde::Serialize;

/// Scored comment as returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub comment: String,
    pub sentiment: SentimentLabel,
}

/// Every intermediate signal computed for one comment.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTrace {
    /// Mean emoji weight over the raw comment, `0.0` without emoji.
    pub emoji_score: f64,
    pub emoji_sentiment: SentimentLabel,
    /// Normalized comment fed to the language bridge.
    pub normalized: String,
    /// English text; empty when translation failed or was rejected.
    pub translated: String,
    pub text_sentiment: SentimentLabel,
    pub combined: SentimentLabel,
    pub model_sentiment: SentimentLabel,
    pub sentiment: SentimentLabel,
}
