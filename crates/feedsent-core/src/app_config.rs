use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the rule-based combined label is reconciled with the model prediction.
///
/// `Literal` keeps the combined label in both branches of the equality check,
/// so the model never changes the output. `PreferModel` returns the model
/// label whenever the two disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    #[default]
    Literal,
    PreferModel,
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::Literal => write!(f, "literal"),
            TieBreak::PreferModel => write!(f, "prefer_model"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub model_path: PathBuf,
    pub emoji_table_path: Option<PathBuf>,
    pub translate_url: String,
    pub translate_api_key: Option<String>,
    pub translate_timeout_secs: u64,
    pub tie_break: TieBreak,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("model_path", &self.model_path)
            .field("emoji_table_path", &self.emoji_table_path)
            .field("translate_url", &self.translate_url)
            .field(
                "translate_api_key",
                &self.translate_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("translate_timeout_secs", &self.translate_timeout_secs)
            .field("tie_break", &self.tie_break)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
