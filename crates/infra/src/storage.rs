//! Backend selection.

use std::sync::Arc;

use bffhang_core::PollStore;
use bffhang_domain::{Result, StorageConfig};
use tracing::info;

use crate::database::{DbManager, SqlitePollStore};
use crate::memory::MemoryPollStore;

/// Build the store selected by `config`.
///
/// The durable backend is opened and migrated before it is returned.
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn PollStore>> {
    if config.use_transient_store {
        info!(backend = "memory", "poll store ready");
        return Ok(Arc::new(MemoryPollStore::new()));
    }

    let db = DbManager::new(&config.store_identifier, config.pool_size)?;
    db.run_migrations()?;
    db.health_check()?;
    info!(backend = "sqlite", path = %db.path().display(), "poll store ready");
    Ok(Arc::new(SqlitePollStore::new(Arc::new(db))))
}
