//! Nexus Engine - Action lifecycle and resource reconciliation backend
//!
//! The Engine:
//! - Records the actions players declare and the projects they run
//! - Charges and refunds Character effort as actions come and go
//! - Marks Assets used while an action holds them
//! - Announces every collection change on a broadcast channel
//!
//! Commands arrive as newline-delimited JSON on stdin; each reply is written
//! as one JSON line on stdout.

mod application;
mod domain;
mod infrastructure;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::notifications::run_notification_logger;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries replies
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexus_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Nexus Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Store backend: {}", config.store_backend);
    tracing::info!(
        "  Effort: max {}, clamp on delete {}, allow negative {}",
        config.effort.max_effort,
        config.effort.clamp_on_delete,
        config.effort.allow_negative_effort
    );

    // Initialize application state
    let state = AppState::new(config).await?;
    tracing::info!("Application state initialized");

    let notification_logger = {
        let rx = state.notifier.subscribe();
        tokio::spawn(async move {
            tracing::info!("Starting notification logger");
            run_notification_logger(rx).await;
        })
    };

    let handler = state.command_handler();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = handler.handle_json(&line).await;
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    notification_logger.abort();
    tracing::info!("Nexus Engine stopped");
    Ok(())
}
