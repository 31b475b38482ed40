use crate::app_config::{AppConfig, Environment, TieBreak};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = optional("DATABASE_URL");
    let env = parse_environment(&or_default("FEEDSENT_ENV", "development"))?;
    let bind_addr = parse_addr("FEEDSENT_BIND_ADDR", "0.0.0.0:8001")?;
    let log_level = or_default("FEEDSENT_LOG_LEVEL", "info");

    let model_path = PathBuf::from(or_default(
        "FEEDSENT_MODEL_PATH",
        "./models/sentiment_model.json",
    ));
    let emoji_table_path = optional("FEEDSENT_EMOJI_TABLE_PATH").map(PathBuf::from);

    let translate_url = or_default("FEEDSENT_TRANSLATE_URL", "http://localhost:5000");
    let translate_api_key = optional("FEEDSENT_TRANSLATE_API_KEY");
    let translate_timeout_secs = parse_u64("FEEDSENT_TRANSLATE_TIMEOUT_SECS", "10")?;
    if translate_timeout_secs == 0 {
        return Err(invalid(
            "FEEDSENT_TRANSLATE_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let tie_break = parse_tie_break(&or_default("FEEDSENT_TIE_BREAK", "literal"))?;

    let db_max_connections = parse_u32("FEEDSENT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FEEDSENT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FEEDSENT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        model_path,
        emoji_table_path,
        translate_url,
        translate_api_key,
        translate_timeout_secs,
        tie_break,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDSENT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_tie_break(s: &str) -> Result<TieBreak, ConfigError> {
    match s {
        "literal" => Ok(TieBreak::Literal),
        "prefer_model" => Ok(TieBreak::PreferModel),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDSENT_TIE_BREAK".to_string(),
            reason: format!("expected 'literal' or 'prefer_model', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
