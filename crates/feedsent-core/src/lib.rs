//! Shared types and configuration for the feedsent workspace.

pub mod app_config;
pub mod config;
pub mod feedback;
pub mod report;

pub use app_config::{AppConfig, Environment, TieBreak};
pub use config::{load_app_config, load_app_config_from_env};
pub use feedback::{FeedbackFilters, FeedbackRecord, ParseLabelError, SentimentLabel};
pub use report::{summarize, FeedbackSummary};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
