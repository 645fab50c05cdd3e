//! SQLite-backed poll store.
//!
//! Implements the `PollStore` port over the `poll_items` table. All database
//! operations run in `spawn_blocking` to avoid blocking the async runtime.
//! Multi-row writes run in one `BEGIN IMMEDIATE` transaction.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bffhang_core::{plan_day_edit, with_deadline, PollStore};
use bffhang_domain::utils::filter_days;
use bffhang_domain::{HangError, Poll, PollSnapshot, Response, Result, StoreStats};
use rusqlite::{params, Connection};
use tokio::task;
use tracing::{debug, warn};

use super::manager::DbManager;
use super::poll_items::{
    insert_poll_if_absent, load_partition, partition_key, poll_days, response_sort_key,
    update_days_row, upsert_response_row, PollItem,
};
use crate::errors::{map_join_error, InfraError};

/// Durable keyed store.
pub struct SqlitePollStore {
    db: Arc<DbManager>,
}

impl SqlitePollStore {
    /// Create a new store with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Run `op` on a pooled connection on the blocking pool.
    ///
    /// Dropping the returned future does not stop `op`: a transaction that
    /// was already running still commits or rolls back on its own.
    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, InfraError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<T> {
            let conn = db.get_connection()?;
            op(&*conn).map_err(HangError::from)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl PollStore for SqlitePollStore {
    async fn create_poll(&self, poll: Poll) -> Result<()> {
        self.with_connection(move |conn| {
            if insert_poll_if_absent(conn, &poll)? == 0 {
                return Err(InfraError(HangError::AlreadyExists(format!("poll {}", poll.id))));
            }
            Ok(())
        })
        .await
    }

    async fn create_poll_with_response(&self, poll: Poll, response: Response) -> Result<()> {
        self.with_connection(move |conn| {
            in_transaction(conn, |conn| {
                if insert_poll_if_absent(conn, &poll)? == 0 {
                    return Err(InfraError(HangError::AlreadyExists(format!("poll {}", poll.id))));
                }
                upsert_response_row(conn, &poll.id, &response)
            })
        })
        .await
    }

    async fn get_poll(&self, poll_id: &str) -> Result<PollSnapshot> {
        let poll_id = poll_id.to_string();
        self.with_connection(move |conn| read_snapshot(conn, &poll_id)).await
    }

    async fn upsert_response(&self, poll_id: &str, mut response: Response) -> Result<Response> {
        let poll_id = poll_id.to_string();
        self.with_connection(move |conn| {
            in_transaction(conn, |conn| {
                let allowed = require_poll_days(conn, &poll_id)?;
                response.days = filter_days(&response.days, &allowed);
                upsert_response_row(conn, &poll_id, &response)?;
                Ok(response)
            })
        })
        .await
    }

    async fn update_poll_days(&self, poll_id: &str, days: Vec<String>) -> Result<()> {
        let poll_id = poll_id.to_string();
        self.with_connection(move |conn| {
            if update_days_row(conn, &poll_id, &days)? == 0 {
                return Err(InfraError(HangError::NotFound(format!("poll {poll_id}"))));
            }
            Ok(())
        })
        .await
    }

    async fn delete_response(&self, poll_id: &str, response_id: &str) -> Result<()> {
        let pk = partition_key(poll_id);
        let sk = response_sort_key(response_id);
        self.with_connection(move |conn| {
            let removed =
                conn.execute("DELETE FROM poll_items WHERE pk = ?1 AND sk = ?2", params![pk, sk])?;
            debug!(pk = %pk, sk = %sk, removed, "response row delete");
            Ok(())
        })
        .await
    }

    async fn stats(&self) -> Result<StoreStats> {
        self.with_connection(|conn| {
            let (polls, responses) = conn.query_row(
                "SELECT COALESCE(SUM(kind = 'poll'), 0), COALESCE(SUM(kind = 'response'), 0)
                 FROM poll_items",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )?;
            Ok(StoreStats {
                poll_count: u64::try_from(polls).unwrap_or_default(),
                response_count: u64::try_from(responses).unwrap_or_default(),
            })
        })
        .await
    }

    async fn commit_day_edit(
        &self,
        poll_id: &str,
        days: Vec<String>,
        limit: Option<Duration>,
    ) -> Result<PollSnapshot> {
        let poll_id = poll_id.to_string();
        let commit = self.with_connection(move |conn| {
            in_transaction(conn, |conn| {
                let current = read_snapshot(conn, &poll_id)?;
                let edit = plan_day_edit(&current, days);
                update_days_row(conn, &poll_id, &edit.days)?;
                for response in &edit.changed {
                    upsert_response_row(conn, &poll_id, response)?;
                }
                Ok(edit.apply(current))
            })
        });
        with_deadline("commit_day_edit", limit, commit).await
    }
}

// ============================================================================
// Synchronous helpers (called inside spawn_blocking)
// ============================================================================

fn read_snapshot(conn: &Connection, poll_id: &str) -> std::result::Result<PollSnapshot, InfraError> {
    let mut poll = None;
    let mut responses = Vec::new();
    for item in load_partition(conn, poll_id)? {
        match item {
            PollItem::Poll(found) => poll = Some(found),
            PollItem::Response(response) => responses.push(response),
        }
    }

    let poll = poll.ok_or_else(|| InfraError(HangError::NotFound(format!("poll {poll_id}"))))?;
    responses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(PollSnapshot::new(poll, responses))
}

fn require_poll_days(
    conn: &Connection,
    poll_id: &str,
) -> std::result::Result<Vec<String>, InfraError> {
    poll_days(conn, poll_id)?
        .ok_or_else(|| InfraError(HangError::NotFound(format!("poll {poll_id}"))))
}

/// Run `op` between `BEGIN IMMEDIATE` and `COMMIT`, rolling back on error.
fn in_transaction<T>(
    conn: &Connection,
    op: impl FnOnce(&Connection) -> std::result::Result<T, InfraError>,
) -> std::result::Result<T, InfraError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match op(conn) {
        Ok(value) => {
            if let Err(err) = conn.execute_batch("COMMIT") {
                rollback(conn);
                return Err(err.into());
            }
            Ok(value)
        }
        Err(err) => {
            rollback(conn);
            Err(err)
        }
    }
}

fn rollback(conn: &Connection) {
    if let Err(err) = conn.execute_batch("ROLLBACK") {
        warn!(error = %err, "transaction rollback failed");
    }
}
