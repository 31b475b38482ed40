//! Pretrained statistical classifier: bag-of-words vectorizer plus linear model.
//!
//! Weights are fit offline and shipped as a JSON artifact. The pipeline only
//! sees the [`Vectorizer`] and [`Model`] traits, so another artifact format
//! can be plugged in without touching the orchestration.

use std::collections::HashMap;
use std::path::Path;

use feedsent_core::SentimentLabel;
use regex::Regex;
use serde::Deserialize;

use crate::error::ArtifactError;

/// Damping applied to the emoji score before it is appended as a feature.
pub const EMOJI_FEATURE_WEIGHT: f64 = 0.5;

/// Same token pattern as the offline fit: runs of two or more word characters.
const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Text -> fixed-width numeric vector.
pub trait Vectorizer: Send + Sync {
    fn width(&self) -> usize;
    fn vectorize(&self, text: &str) -> Vec<f64>;
}

/// Feature vector -> label.
pub trait Model: Send + Sync {
    fn input_width(&self) -> usize;
    fn predict(&self, features: &[f64]) -> SentimentLabel;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

#[derive(Debug, Deserialize)]
pub struct TfidfSpec {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_true() -> bool {
    true
}

/// TF-IDF bag-of-words vectorizer over a fixed vocabulary.
#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    sublinear_tf: bool,
    norm: Norm,
    token: Regex,
}

impl TfidfVectorizer {
    /// # Errors
    ///
    /// Returns [`ArtifactError::Invalid`] if the vocabulary and IDF table
    /// disagree in size or an index is out of range.
    pub fn new(spec: TfidfSpec) -> Result<Self, ArtifactError> {
        let width = spec.idf.len();
        if spec.vocabulary.len() != width {
            return Err(ArtifactError::Invalid(format!(
                "vocabulary has {} terms but idf has {width} entries",
                spec.vocabulary.len()
            )));
        }
        let mut seen = vec![false; width];
        for (term, &idx) in &spec.vocabulary {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(ArtifactError::Invalid(format!(
                        "vocabulary index {idx} is assigned twice (at '{term}')"
                    )))
                }
                None => {
                    return Err(ArtifactError::Invalid(format!(
                        "vocabulary index {idx} for '{term}' exceeds width {width}"
                    )))
                }
            }
        }

        let token = Regex::new(TOKEN_PATTERN)
            .map_err(|e| ArtifactError::Invalid(format!("token pattern: {e}")))?;

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            lowercase: spec.lowercase,
            sublinear_tf: spec.sublinear_tf,
            norm: spec.norm,
            token,
        })
    }
}

impl Vectorizer for TfidfVectorizer {
    fn width(&self) -> usize {
        self.idf.len()
    }

    fn vectorize(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0_f64; self.width()];
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        for token in self.token.find_iter(&text) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                features[idx] += 1.0;
            }
        }

        for (value, idf) in features.iter_mut().zip(&self.idf) {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * idf;
            }
        }

        let scale = match self.norm {
            Norm::L2 => features.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::L1 => features.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if scale > 0.0 {
            for value in &mut features {
                *value /= scale;
            }
        }

        features
    }
}

#[derive(Debug, Deserialize)]
pub struct LinearSpec {
    pub classes: Vec<SentimentLabel>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// Linear classifier: one weight row per class, argmax of `w . x + b`.
///
/// A single row with two classes is the binary form: a positive decision
/// picks the second class.
#[derive(Debug)]
pub struct LinearModel {
    classes: Vec<SentimentLabel>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    input_width: usize,
}

impl LinearModel {
    /// # Errors
    ///
    /// Returns [`ArtifactError::Invalid`] if the class, coefficient and
    /// intercept shapes are inconsistent.
    pub fn new(spec: LinearSpec) -> Result<Self, ArtifactError> {
        let LinearSpec {
            classes,
            coef,
            intercept,
        } = spec;

        if classes.len() < 2 {
            return Err(ArtifactError::Invalid(
                "model needs at least two classes".to_string(),
            ));
        }
        let binary = coef.len() == 1 && classes.len() == 2;
        if !binary && coef.len() != classes.len() {
            return Err(ArtifactError::Invalid(format!(
                "{} coefficient rows for {} classes",
                coef.len(),
                classes.len()
            )));
        }
        if intercept.len() != coef.len() {
            return Err(ArtifactError::Invalid(format!(
                "{} intercepts for {} coefficient rows",
                intercept.len(),
                coef.len()
            )));
        }
        let input_width = coef[0].len();
        if coef.iter().any(|row| row.len() != input_width) {
            return Err(ArtifactError::Invalid(
                "coefficient rows differ in width".to_string(),
            ));
        }

        Ok(Self {
            classes,
            coef,
            intercept,
            input_width,
        })
    }

    fn decision(&self, row: usize, features: &[f64]) -> f64 {
        self.coef[row]
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept[row]
    }
}

impl Model for LinearModel {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn predict(&self, features: &[f64]) -> SentimentLabel {
        if self.coef.len() == 1 {
            let idx = usize::from(self.decision(0, features) > 0.0);
            return self.classes[idx];
        }

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for row in 0..self.coef.len() {
            let score = self.decision(row, features);
            if score > best_score {
                best = row;
                best_score = score;
            }
        }
        self.classes[best]
    }
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    version: String,
    vectorizer: TfidfSpec,
    model: LinearSpec,
}

/// Versioned (vectorizer, model) pair, read-only after load.
pub struct ClassifierArtifact {
    version: String,
    vectorizer: Box<dyn Vectorizer>,
    model: Box<dyn Model>,
}

impl std::fmt::Debug for ClassifierArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierArtifact")
            .field("version", &self.version)
            .field("text_width", &self.vectorizer.width())
            .field("input_width", &self.model.input_width())
            .finish_non_exhaustive()
    }
}

impl ClassifierArtifact {
    /// Pair a vectorizer with a model that takes its output plus the emoji feature.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Invalid`] if the model input width is not the
    /// vectorizer width plus one.
    pub fn new(
        version: impl Into<String>,
        vectorizer: Box<dyn Vectorizer>,
        model: Box<dyn Model>,
    ) -> Result<Self, ArtifactError> {
        let expected = vectorizer.width() + 1;
        if model.input_width() != expected {
            return Err(ArtifactError::Invalid(format!(
                "model expects {} features, vectorizer produces {} (+1 emoji feature)",
                model.input_width(),
                vectorizer.width()
            )));
        }
        Ok(Self {
            version: version.into(),
            vectorizer,
            model,
        })
    }

    /// Load a JSON artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] if the file is missing, unparsable or
    /// internally inconsistent.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a JSON artifact held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] on malformed JSON or inconsistent shapes.
    pub fn from_json_str(content: &str) -> Result<Self, ArtifactError> {
        let file: ArtifactFile = serde_json::from_str(content)?;
        let vectorizer = TfidfVectorizer::new(file.vectorizer)?;
        let model = LinearModel::new(file.model)?;
        Self::new(file.version, Box::new(vectorizer), Box::new(model))
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of features fed to the model, emoji feature included.
    #[must_use]
    pub fn feature_width(&self) -> usize {
        self.model.input_width()
    }

    /// Feature vector for `text`: text features followed by the damped emoji score.
    #[must_use]
    pub fn features(&self, text: &str, emoji_score: f64) -> Vec<f64> {
        let mut features = self.vectorizer.vectorize(text);
        features.push(emoji_score * EMOJI_FEATURE_WEIGHT);
        features
    }

    #[must_use]
    pub fn predict(&self, text: &str, emoji_score: f64) -> SentimentLabel {
        self.model.predict(&self.features(text, emoji_score))
    }
}
