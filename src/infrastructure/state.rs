//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::application::ports::outbound::{NotificationPort, RepositoryProvider};
use crate::application::services::{
    ActionService, ActionServiceImpl, RosterService, RosterServiceImpl,
};
use crate::domain::value_objects::EffortPolicy;
use crate::infrastructure::command_handler::CommandHandler;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::notifications::BroadcastNotifier;
use crate::infrastructure::persistence::{InMemoryStore, SqliteStore};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub notifier: BroadcastNotifier,
    // Application services
    pub action_service: Arc<dyn ActionService>,
    pub roster_service: Arc<dyn RosterService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let notifier = BroadcastNotifier::new(config.notify_capacity);

        let (action_service, roster_service) = match config.store_backend.as_str() {
            "memory" => {
                tracing::info!("Using in-memory entity store");
                build_services(InMemoryStore::new(), &notifier, config.effort)
            }
            "sqlite" => {
                // Ensure data directory exists
                if let Some(parent) = std::path::Path::new(&config.sqlite_path).parent() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create entity database directory")?;
                }

                let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.sqlite_path))
                    .await
                    .context("Failed to connect to SQLite entity database")?;
                let store = SqliteStore::new(pool)
                    .await
                    .context("Failed to initialize entity schema")?;
                tracing::info!("Connected to SQLite entity database: {}", config.sqlite_path);
                build_services(store, &notifier, config.effort)
            }
            backend => anyhow::bail!("Unsupported store backend: {}", backend),
        };

        Ok(Self {
            config,
            notifier,
            action_service,
            roster_service,
        })
    }

    pub fn command_handler(&self) -> CommandHandler {
        CommandHandler::new(self.action_service.clone(), self.roster_service.clone())
    }
}

fn build_services<R>(
    store: R,
    notifier: &BroadcastNotifier,
    policy: EffortPolicy,
) -> (Arc<dyn ActionService>, Arc<dyn RosterService>)
where
    R: RepositoryProvider + Clone + 'static,
{
    let notifier: Arc<dyn NotificationPort> = Arc::new(notifier.clone());
    let action_service: Arc<dyn ActionService> =
        Arc::new(ActionServiceImpl::new(store.clone(), notifier.clone(), policy));
    let roster_service: Arc<dyn RosterService> =
        Arc::new(RosterServiceImpl::new(store, notifier));
    (action_service, roster_service)
}
