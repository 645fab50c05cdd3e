//! Shared fixtures for `bffhang-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bffhang_core::PollStore;
use bffhang_domain::{Poll, Response};
use bffhang_infra::database::{DbManager, SqlitePollStore};
use bffhang_infra::memory::MemoryPollStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

/// A store under test plus whatever must outlive it.
pub struct TestStore {
    pub store: Arc<dyn PollStore>,
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    pub fn memory() -> Self {
        Self { store: Arc::new(MemoryPollStore::new()), _temp_dir: None }
    }

    /// Fresh SQLite database in a temporary directory, migrated.
    pub fn sqlite() -> Self {
        let temp_dir = TempDir::new().expect("temporary directory should be created");
        let manager = DbManager::new(temp_dir.path().join("contract.db"), 4)
            .expect("database manager should initialise");
        manager.run_migrations().expect("schema migrations should apply");

        Self {
            store: Arc::new(SqlitePollStore::new(Arc::new(manager))),
            _temp_dir: Some(temp_dir),
        }
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().expect("base timestamp should be valid")
}

pub fn days(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

pub fn make_poll(id: &str, title: &str) -> Poll {
    Poll {
        id: id.to_string(),
        title: title.to_string(),
        days: days(&["2024-01-01", "2024-01-02"]),
        creator_token: format!("creator-{id}"),
        created_at: base_time(),
    }
}

/// Response created `offset_secs` after [`base_time`].
pub fn make_response(id: &str, token: &str, picked: &[&str], offset_secs: i64) -> Response {
    Response {
        id: id.to_string(),
        name: format!("Name {id}"),
        days: days(picked),
        user_token: token.to_string(),
        created_at: base_time() + Duration::seconds(offset_secs),
    }
}
