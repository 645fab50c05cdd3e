//! Storage port for polls and their responses.
//!
//! Implementations must produce identical observable results. The store has
//! no notion of tokens as identity keys: callers decide which response id to
//! write, the store only inserts or replaces by id.

use std::time::Duration;

use async_trait::async_trait;
use bffhang_domain::{Poll, PollSnapshot, Response, Result, StoreStats};
use tracing::{error, warn};

use super::deadline::with_deadline;
use crate::polls::plan_day_edit;

/// Persistence contract satisfied by every backend.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Insert a poll if its id is unused.
    ///
    /// Must be a conditional write: a second create with the same id returns
    /// `AlreadyExists` and leaves the first poll untouched.
    async fn create_poll(&self, poll: Poll) -> Result<()>;

    /// Insert a poll together with its creator's response.
    ///
    /// Same conditional semantics as [`PollStore::create_poll`]. Either both
    /// rows are stored or neither is.
    async fn create_poll_with_response(&self, poll: Poll, response: Response) -> Result<()>;

    /// Poll plus responses ordered by `created_at` ascending.
    ///
    /// `NotFound` whenever the poll row is absent, even if stray response
    /// rows exist under the same key.
    async fn get_poll(&self, poll_id: &str) -> Result<PollSnapshot>;

    /// Insert a response by id, or fully replace the row with that id.
    ///
    /// Days outside the poll's day set at write time are dropped; the row as
    /// stored is returned. `NotFound` if the owning poll does not exist.
    async fn upsert_response(&self, poll_id: &str, response: Response) -> Result<Response>;

    /// Replace the poll's day list. `NotFound` if the poll does not exist.
    async fn update_poll_days(&self, poll_id: &str, days: Vec<String>) -> Result<()>;

    /// Remove a response. Succeeds when the row is already gone.
    async fn delete_response(&self, poll_id: &str, response_id: &str) -> Result<()>;

    /// Best-effort aggregate counts.
    async fn stats(&self) -> Result<StoreStats>;

    /// Replace the day list and cascade it into every response as one unit
    /// of work, returning the committed snapshot.
    ///
    /// The cascade is planned with [`plan_day_edit`] against the state read
    /// at commit time, so responses written after the caller last loaded the
    /// poll are pruned too. `limit` bounds each storage call.
    ///
    /// The default implementation runs the steps one at a time. When a step
    /// fails or runs out of time it restores the previous day list and every
    /// response it touched, then returns the error. It cannot see writes
    /// racing with it; backends with native transactions should override it.
    async fn commit_day_edit(
        &self,
        poll_id: &str,
        days: Vec<String>,
        limit: Option<Duration>,
    ) -> Result<PollSnapshot> {
        let previous = with_deadline("get_poll", limit, self.get_poll(poll_id)).await?;
        let edit = plan_day_edit(&previous, days);

        let replaced =
            with_deadline("update_poll_days", limit, self.update_poll_days(poll_id, edit.days.clone()))
                .await;
        if let Err(err) = replaced {
            warn!(poll_id, error = %err, "day edit failed, rolling back");
            rollback_day_edit(self, &previous, &[], limit).await;
            return Err(err);
        }

        let mut touched: Vec<&Response> = Vec::with_capacity(edit.changed.len());
        for response in &edit.changed {
            if let Some(original) = previous.response_by_id(&response.id) {
                touched.push(original);
            }
            let written =
                with_deadline("upsert_response", limit, self.upsert_response(poll_id, response.clone()))
                    .await;
            if let Err(err) = written {
                warn!(poll_id, response_id = %response.id, error = %err, "day edit failed, rolling back");
                rollback_day_edit(self, &previous, &touched, limit).await;
                return Err(err);
            }
        }

        Ok(edit.apply(previous))
    }
}

/// Restore the day list first so restored responses are not pruned again.
async fn rollback_day_edit<S: PollStore + ?Sized>(
    store: &S,
    previous: &PollSnapshot,
    touched: &[&Response],
    limit: Option<Duration>,
) {
    let poll_id = previous.poll.id.as_str();
    let restored = with_deadline(
        "update_poll_days",
        limit,
        store.update_poll_days(poll_id, previous.poll.days.clone()),
    )
    .await;
    if let Err(err) = restored {
        error!(poll_id, error = %err, "failed to restore poll days");
    }

    for original in touched {
        let restored =
            with_deadline("upsert_response", limit, store.upsert_response(poll_id, (*original).clone()))
                .await;
        if let Err(err) = restored {
            error!(poll_id, response_id = %original.id, error = %err, "failed to restore response");
        }
    }
}
