//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use bffhang_core::{PollService, PollStore};
use bffhang_domain::{Config, Result};
use bffhang_infra::{build_store, config};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn PollStore>,
    pub polls: Arc<PollService>,
}

impl AppContext {
    /// Load configuration from the environment and files, then build.
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Build the configured store and wire the services around it.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let store = build_store(&config.storage)?;
        Ok(Self::with_store(config, store))
    }

    /// Wire services around an already constructed store.
    pub fn with_store(config: Config, store: Arc<dyn PollStore>) -> Self {
        let timeout = Duration::from_millis(config.storage.operation_timeout_ms);
        let polls = Arc::new(PollService::new(Arc::clone(&store)).with_operation_timeout(timeout));

        info!(
            transient_store = config.storage.use_transient_store,
            operation_timeout_ms = config.storage.operation_timeout_ms,
            "application context ready"
        );

        Self { config, store, polls }
    }

    /// Verify the store answers.
    pub async fn health_check(&self) -> Result<()> {
        self.polls.stats().await.map(|_| ())
    }
}
