use thiserror::Error;

/// Failures from a language detection/translation provider.
///
/// These never leave the pipeline: the language bridge turns every variant
/// into empty text.
#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("language detection returned no candidates")]
    NoDetection,

    #[error("unsupported language '{0}'")]
    Unsupported(String),

    #[error("translation service error: {0}")]
    Service(String),
}

/// Failures loading the pretrained classifier artifact. Fatal at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read classifier artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse classifier artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid classifier artifact: {0}")]
    Invalid(String),
}

/// Failures loading an emoji count table from disk.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read emoji table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse emoji table: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid emoji table: {0}")]
    Invalid(String),
}

/// Failures assembling a pipeline from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("failed to build language client: {0}")]
    Language(#[from] LanguageError),
}
