//! Language detection and translation into the working language.

use async_trait::async_trait;

use crate::error::LanguageError;

/// Every comment is scored in English.
pub const WORKING_LANGUAGE: &str = "en";

/// Pluggable language detection and translation provider.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Detect the language of `text`, returning an ISO 639-1 code.
    ///
    /// Implementations must return the same code for the same input.
    async fn detect(&self, text: &str) -> Result<String, LanguageError>;

    /// Translate `text` from `source` into `target`.
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, LanguageError>;
}

/// Bring normalized text into the working language.
///
/// Returns `text` unchanged when it is already English, the translation
/// otherwise, and an empty string when the text is empty, the provider fails
/// in any way, or the translation looks like garbage.
pub async fn bridge(service: &dyn LanguageService, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    match try_bridge(service, text).await {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!(error = %e, "language bridge failed; continuing with empty text");
            String::new()
        }
    }
}

async fn try_bridge(service: &dyn LanguageService, text: &str) -> Result<String, LanguageError> {
    let language = service.detect(text).await?;
    if language == WORKING_LANGUAGE {
        return Ok(text.to_string());
    }

    let translated = service
        .translate(text, &language, WORKING_LANGUAGE)
        .await?;

    if is_degenerate(&translated) {
        tracing::warn!(
            source_language = %language,
            translated = %translated,
            "discarding degenerate translation"
        );
        return Ok(String::new());
    }

    tracing::debug!(source_language = %language, "translated comment");
    Ok(translated)
}

/// A translation with fewer than two words that is not purely alphabetic.
fn is_degenerate(translated: &str) -> bool {
    let words = translated.split_whitespace().count();
    let alphabetic = !translated.is_empty() && translated.chars().all(char::is_alphabetic);
    words < 2 && !alphabetic
}
