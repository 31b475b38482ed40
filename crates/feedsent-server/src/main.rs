mod api;
mod middleware;

use std::sync::Arc;

use feedsent_sentiment::SentimentPipeline;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = feedsent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting feedsent-server");

    // A missing or corrupt classifier artifact is fatal.
    let pipeline = Arc::new(SentimentPipeline::from_config(&config)?);

    let pool = match &config.database_url {
        Some(_) => {
            let pool = feedsent_db::connect_pool_from_config(&config).await?;
            let applied = feedsent_db::run_migrations(&pool).await?;
            tracing::info!(applied, "database ready");
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; dashboard endpoints disabled");
            None
        }
    };

    let app = build_app(AppState { pipeline, pool });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
