mod predict;
mod report;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use feedsent_core::SentimentLabel;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "feedsent-cli")]
#[command(about = "Feedback sentiment command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a single comment and print its sentiment label
    Predict {
        /// Comment text, emoji included
        comment: String,
        /// Print every intermediate signal, not just the final label
        #[arg(long)]
        trace: bool,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Print a markdown KPI report over stored feedback
    Report(report::ReportArgs),
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = feedsent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Predict { comment, trace }) => {
            predict::run_predict(&config, &comment, trace).await?;
        }
        Some(Commands::Db { command }) => {
            let pool = feedsent_db::connect_pool_from_config(&config).await?;
            match command {
                DbCommands::Ping => {
                    feedsent_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = feedsent_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Some(Commands::Report(args)) => {
            let pool = feedsent_db::connect_pool_from_config(&config).await?;
            report::run_report(&pool, &args).await?;
        }
        None => println!("feedsent-cli: pass --help for available commands"),
    }

    Ok(())
}

/// Parse a `--sentiment` value.
fn parse_label(raw: &str) -> Result<SentimentLabel, String> {
    raw.parse().map_err(|e: feedsent_core::ParseLabelError| e.to_string())
}

/// Parse a `--from`/`--to` value.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests;
