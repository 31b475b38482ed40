//! Feedback comment sentiment scoring.
//!
//! Combines an emoji lexicon, a lexical polarity heuristic and a pretrained
//! bag-of-words classifier. Non-English comments are bridged into English
//! through a pluggable [`LanguageService`] before scoring.

pub mod classifier;
pub mod emoji;
pub mod error;
pub mod language;
pub mod lexicon;
pub mod libretranslate;
pub mod normalize;
pub mod pipeline;
pub mod polarity;
pub mod reconcile;
pub mod types;

pub use classifier::{ClassifierArtifact, Model, Vectorizer, EMOJI_FEATURE_WEIGHT};
pub use emoji::{emoji_score, emoji_sentiment, SENTIMENT_THRESHOLD};
pub use error::{ArtifactError, LanguageError, LexiconError, SetupError};
pub use language::{bridge, LanguageService, WORKING_LANGUAGE};
pub use lexicon::{EmojiCounts, EmojiLexicon};
pub use libretranslate::LibreTranslateClient;
pub use normalize::normalize;
pub use pipeline::SentimentPipeline;
pub use polarity::lexical_sentiment;
pub use reconcile::{combine, tie_break};
pub use types::{PipelineResult, StageTrace};
