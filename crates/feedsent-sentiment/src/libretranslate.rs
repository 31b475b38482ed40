//! HTTP client for LibreTranslate-compatible detection and translation APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::LanguageError;
use crate::language::LanguageService;

/// LibreTranslate HTTP client.
///
/// One attempt per call; the pipeline treats any error as untranslatable text.
pub struct LibreTranslateClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
    confidence: f64,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl LibreTranslateClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, LanguageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("feedsent/0.1 (feedback-sentiment)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, LanguageError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // LibreTranslate reports unsupported languages and bad input as
            // 4xx with an `{"error": ...}` body.
            return match response.json::<ErrorResponse>().await {
                Ok(err) => Err(LanguageError::Service(err.error)),
                Err(_) => Err(LanguageError::Status(status)),
            };
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LanguageService for LibreTranslateClient {
    async fn detect(&self, text: &str) -> Result<String, LanguageError> {
        let request = DetectRequest {
            q: text,
            api_key: self.api_key.as_deref(),
        };
        let candidates: Vec<Detection> = self.post("/detect", &request).await?;
        pick_detection(candidates).ok_or(LanguageError::NoDetection)
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, LanguageError> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response: TranslateResponse = self.post("/translate", &request).await?;
        Ok(response.translated_text)
    }
}

/// Highest-confidence candidate; equal confidences resolve to the smallest
/// language code.
fn pick_detection(candidates: Vec<Detection>) -> Option<String> {
    candidates
        .into_iter()
        .filter(|c| !c.language.is_empty())
        .max_by(|a, b| {
            a.confidence
                .total_cmp(&b.confidence)
                .then_with(|| b.language.cmp(&a.language))
        })
        .map(|c| c.language)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(language: &str, confidence: f64) -> Detection {
        Detection {
            language: language.to_string(),
            confidence,
        }
    }

    #[test]
    fn pick_detection_prefers_confidence() {
        let picked = pick_detection(vec![detection("es", 40.0), detection("fr", 92.0)]);
        assert_eq!(picked.as_deref(), Some("fr"));
    }

    #[test]
    fn pick_detection_breaks_ties_by_code() {
        let picked = pick_detection(vec![detection("it", 50.0), detection("es", 50.0)]);
        assert_eq!(picked.as_deref(), Some("es"));
    }

    #[test]
    fn pick_detection_empty_is_none() {
        assert!(pick_detection(Vec::new()).is_none());
        assert!(pick_detection(vec![detection("", 99.0)]).is_none());
    }
}
