//! Sentiment pipeline orchestration.

use std::sync::Arc;

use feedsent_core::{AppConfig, SentimentLabel, TieBreak};

use crate::classifier::ClassifierArtifact;
use crate::emoji::{emoji_score, emoji_sentiment};
use crate::error::SetupError;
use crate::language::{bridge, LanguageService};
use crate::lexicon::EmojiLexicon;
use crate::libretranslate::LibreTranslateClient;
use crate::normalize::normalize;
use crate::polarity::lexical_sentiment;
use crate::reconcile::{combine, tie_break};
use crate::types::{PipelineResult, StageTrace};

/// Scores single comments. Every field is read-only after construction and
/// one instance serves all concurrent requests.
#[derive(Clone)]
pub struct SentimentPipeline {
    lexicon: Arc<EmojiLexicon>,
    classifier: Arc<ClassifierArtifact>,
    language: Arc<dyn LanguageService>,
    tie_break: TieBreak,
}

impl std::fmt::Debug for SentimentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentPipeline")
            .field("lexicon_size", &self.lexicon.len())
            .field("classifier", &self.classifier)
            .field("tie_break", &self.tie_break)
            .finish_non_exhaustive()
    }
}

impl SentimentPipeline {
    #[must_use]
    pub fn new(
        lexicon: Arc<EmojiLexicon>,
        classifier: Arc<ClassifierArtifact>,
        language: Arc<dyn LanguageService>,
    ) -> Self {
        Self {
            lexicon,
            classifier,
            language,
            tie_break: TieBreak::default(),
        }
    }

    /// Load the lexicon and classifier named by `config` and connect the
    /// LibreTranslate client.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the emoji table or classifier artifact cannot
    /// be loaded, or the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let lexicon = match &config.emoji_table_path {
            Some(path) => EmojiLexicon::from_yaml_file(path)?,
            None => EmojiLexicon::builtin(),
        };
        let classifier = ClassifierArtifact::load(&config.model_path)?;
        let language = LibreTranslateClient::new(
            &config.translate_url,
            config.translate_api_key.clone(),
            config.translate_timeout_secs,
        )?;

        tracing::info!(
            lexicon_size = lexicon.len(),
            artifact_version = classifier.version(),
            feature_width = classifier.feature_width(),
            tie_break = %config.tie_break,
            "sentiment pipeline ready"
        );

        Ok(Self::new(
            Arc::new(lexicon),
            Arc::new(classifier),
            Arc::new(language),
        )
        .with_tie_break(config.tie_break))
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    #[must_use]
    pub fn lexicon(&self) -> &EmojiLexicon {
        &self.lexicon
    }

    #[must_use]
    pub fn classifier(&self) -> &ClassifierArtifact {
        &self.classifier
    }

    /// Run every stage for one comment.
    ///
    /// 1. Score emoji on the raw comment.
    /// 2. Normalize the comment.
    /// 3. Bridge it into English.
    /// 4. Lexical sentiment of the English text.
    /// 5. Combine lexical and emoji sentiment.
    /// 6. Statistical model over the English text plus the emoji score.
    /// 7. Tie-break the combined label against the model.
    ///
    /// Never fails: provider errors degrade to empty text inside the bridge.
    pub async fn trace(&self, comment: &str) -> StageTrace {
        let emoji_score = emoji_score(comment, &self.lexicon);
        let emoji_sentiment = emoji_sentiment(emoji_score);

        let normalized = normalize(comment, &self.lexicon);
        let translated = bridge(self.language.as_ref(), &normalized).await;

        let text_sentiment = lexical_sentiment(&translated);
        let combined = combine(text_sentiment, emoji_sentiment);
        let model_sentiment = self.classifier.predict(&translated, emoji_score);
        let sentiment = tie_break(combined, model_sentiment, self.tie_break);

        tracing::debug!(
            emoji_score,
            %emoji_sentiment,
            %text_sentiment,
            %combined,
            %model_sentiment,
            %sentiment,
            tie_break = %self.tie_break,
            "scored comment"
        );

        StageTrace {
            emoji_score,
            emoji_sentiment,
            normalized,
            translated,
            text_sentiment,
            combined,
            model_sentiment,
            sentiment,
        }
    }

    /// Final label for one comment.
    pub async fn predict(&self, comment: &str) -> SentimentLabel {
        self.trace(comment).await.sentiment
    }

    /// Final label paired with the comment it was computed for.
    pub async fn score(&self, comment: &str) -> PipelineResult {
        PipelineResult {
            comment: comment.to_string(),
            sentiment: self.predict(comment).await,
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
