//! Poll mutation service - core business logic
//!
//! Every operation loads the poll, resolves the caller's role, validates, and
//! only then writes. Authorization and validation failures leave storage
//! untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bffhang_domain::utils::{diff_days, filter_days, merge_days, normalize_days, parse_days};
use bffhang_domain::{
    CreatedPoll, HangError, NewPoll, Poll, PollSnapshot, PollView, Response, Result, StoreStats,
};
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::availability::summarize_availability;
use crate::calendar::edit_window;
use crate::identity::{is_creator, resolve_response_slot, TokenMinter, TokenSource};
use crate::storage::{with_deadline, PollStore};

/// Planned effect of a creator editing the day set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEdit {
    pub days: Vec<String>,
    /// Responses whose day list differs from what is stored.
    pub changed: Vec<Response>,
    /// Days not present before the edit.
    pub added: Vec<String>,
}

/// Compute the cascade of replacing `snapshot`'s days with `days`.
///
/// Every response is pruned to the new set. Newly added days are merged into
/// the creator's own response only.
pub fn plan_day_edit(snapshot: &PollSnapshot, days: Vec<String>) -> DayEdit {
    let added = diff_days(&snapshot.poll.days, &days);

    let changed = snapshot
        .responses
        .iter()
        .filter_map(|response| {
            let mut next = filter_days(&response.days, &days);
            if !added.is_empty() && is_creator(&snapshot.poll, Some(response.user_token.as_str()))
            {
                next = merge_days(&next, &added);
            }
            (next != response.days).then(|| Response { days: next, ..response.clone() })
        })
        .collect();

    let edit = DayEdit { days, changed, added };
    debug!(
        poll_id = %snapshot.poll.id,
        added = edit.added.len(),
        changed = edit.changed.len(),
        "planned day edit"
    );
    edit
}

impl DayEdit {
    /// `snapshot` as it reads once this edit is committed.
    pub fn apply(self, snapshot: PollSnapshot) -> PollSnapshot {
        let PollSnapshot { mut poll, mut responses } = snapshot;
        poll.days = self.days;
        for updated in self.changed {
            if let Some(slot) = responses.iter_mut().find(|r| r.id == updated.id) {
                *slot = updated;
            }
        }
        PollSnapshot { poll, responses }
    }
}

/// Current time at the microsecond precision every backend persists.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Poll operations gated by possession-based identity.
pub struct PollService {
    store: Arc<dyn PollStore>,
    minter: TokenMinter,
    operation_timeout: Option<Duration>,
}

impl PollService {
    /// Create a service over the given store using the OS random source.
    pub fn new(store: Arc<dyn PollStore>) -> Self {
        Self { store, minter: TokenMinter::default(), operation_timeout: None }
    }

    /// Replace the random source used for tokens and identifiers.
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.minter = TokenMinter::new(source);
        self
    }

    /// Bound every storage call. A zero duration disables the deadline.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Mint a credential for a visitor arriving without one.
    pub fn issue_token(&self) -> Result<String> {
        self.minter.token()
    }

    /// Create a poll together with the creator's own response.
    pub async fn create_poll(&self, input: NewPoll) -> Result<CreatedPoll> {
        let title = input.title.trim();
        let creator_name = input.creator_name.trim();
        if title.is_empty() || creator_name.is_empty() {
            return Err(HangError::Validation("title and name are required".into()));
        }
        let days = parse_days(&input.days)?;

        let creator_token = self.minter.token()?;
        let now = now();
        let poll = Poll {
            id: self.minter.id()?,
            title: title.to_string(),
            days: days.clone(),
            creator_token: creator_token.clone(),
            created_at: now,
        };
        let creator_response = Response {
            id: self.minter.id()?,
            name: creator_name.to_string(),
            days,
            user_token: creator_token.clone(),
            created_at: now,
        };

        self.guarded(
            "create_poll_with_response",
            self.store.create_poll_with_response(poll.clone(), creator_response.clone()),
        )
        .await?;

        info!(poll_id = %poll.id, days = poll.days.len(), "poll created");
        Ok(CreatedPoll { poll, creator_response, creator_token })
    }

    /// Read model for the given caller.
    pub async fn load_poll(&self, poll_id: &str, caller: Option<&str>) -> Result<PollView> {
        let snapshot = self.snapshot(poll_id).await?;
        let is_creator = is_creator(&snapshot.poll, caller);

        let (viewer_name, selected_days) = caller
            .and_then(|token| snapshot.response_for_token(token))
            .map(|response| {
                (Some(response.name.clone()), filter_days(&response.days, &snapshot.poll.days))
            })
            .unwrap_or_default();

        let edit_days = if is_creator {
            edit_window(&snapshot.poll.days, Utc::now().date_naive())
        } else {
            Vec::new()
        };

        let PollSnapshot { poll, responses } = snapshot;
        Ok(PollView {
            summaries: summarize_availability(&poll.days, &responses),
            total_responses: responses.len(),
            poll,
            responses,
            is_creator,
            viewer_name,
            selected_days,
            edit_days,
        })
    }

    /// Create or replace the caller's response.
    ///
    /// Days outside the poll's set are dropped. Resubmitting under the same
    /// token keeps the original response id and creation time.
    pub async fn submit_response(
        &self,
        poll_id: &str,
        caller: &str,
        name: &str,
        days: &[String],
    ) -> Result<Response> {
        let caller = caller.trim();
        if caller.is_empty() {
            return Err(HangError::Validation("a caller token is required".into()));
        }
        let name = name.trim();

        let snapshot = self.snapshot(poll_id).await?;
        let selected = filter_days(&normalize_days(days), &snapshot.poll.days);
        if name.is_empty() || selected.is_empty() {
            return Err(HangError::Validation(
                "please enter your name and at least one available day".into(),
            ));
        }

        let slot = resolve_response_slot(&snapshot, caller, &self.minter, now())?;
        let response = Response {
            id: slot.id,
            name: name.to_string(),
            days: selected,
            user_token: caller.to_string(),
            created_at: slot.created_at,
        };

        // The store trims days removed by a concurrent edit.
        let response =
            self.guarded("upsert_response", self.store.upsert_response(poll_id, response)).await?;

        info!(poll_id, response_id = %response.id, replaced = slot.existing, "response saved");
        Ok(response)
    }

    /// Replace the poll's day set and cascade into every response.
    ///
    /// The store plans and commits the cascade as one unit of work. The
    /// operation deadline is applied to each storage step inside it.
    pub async fn update_dates(
        &self,
        poll_id: &str,
        caller: Option<&str>,
        days: &[String],
    ) -> Result<PollSnapshot> {
        let snapshot = self.snapshot(poll_id).await?;
        Self::require_creator(&snapshot, caller, "update dates")?;
        let days = parse_days(days)?;

        let committed =
            self.store.commit_day_edit(poll_id, days, self.operation_timeout).await?;

        info!(
            poll_id,
            days = committed.poll.days.len(),
            added = diff_days(&snapshot.poll.days, &committed.poll.days).len(),
            "poll days updated"
        );
        Ok(committed)
    }

    /// Remove a response. Creator only; absent ids succeed.
    pub async fn delete_response(
        &self,
        poll_id: &str,
        caller: Option<&str>,
        response_id: &str,
    ) -> Result<()> {
        let response_id = response_id.trim();
        if response_id.is_empty() {
            return Err(HangError::Validation("missing response".into()));
        }

        let snapshot = self.snapshot(poll_id).await?;
        Self::require_creator(&snapshot, caller, "delete responses")?;

        self.guarded("delete_response", self.store.delete_response(poll_id, response_id)).await?;
        info!(poll_id, response_id, "response deleted");
        Ok(())
    }

    /// Aggregate counts across the store.
    pub async fn stats(&self) -> Result<StoreStats> {
        self.guarded("stats", self.store.stats()).await
    }

    async fn snapshot(&self, poll_id: &str) -> Result<PollSnapshot> {
        if poll_id.trim().is_empty() {
            return Err(HangError::NotFound("poll".into()));
        }
        self.guarded("get_poll", self.store.get_poll(poll_id)).await
    }

    fn require_creator(snapshot: &PollSnapshot, caller: Option<&str>, action: &str) -> Result<()> {
        if is_creator(&snapshot.poll, caller) {
            return Ok(());
        }
        warn!(poll_id = %snapshot.poll.id, action, "creator-only operation rejected");
        Err(HangError::Forbidden(format!("only the poll creator can {action}")))
    }

    async fn guarded<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        with_deadline(operation, self.operation_timeout, fut).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn response(id: &str, token: &str, selected: &[&str]) -> Response {
        Response {
            id: id.into(),
            name: id.to_uppercase(),
            days: days(selected),
            user_token: token.into(),
            created_at: Utc::now(),
        }
    }

    fn snapshot() -> PollSnapshot {
        PollSnapshot::new(
            Poll {
                id: "poll".into(),
                title: "Board games".into(),
                days: days(&["2024-01-01", "2024-01-02"]),
                creator_token: "creator".into(),
                created_at: Utc::now(),
            },
            vec![
                response("c", "creator", &["2024-01-01", "2024-01-02"]),
                response("r", "guest", &["2024-01-02"]),
            ],
        )
    }

    #[test]
    fn added_days_only_reach_the_creator() {
        let edit = plan_day_edit(&snapshot(), days(&["2024-01-02", "2024-01-05"]));

        assert_eq!(edit.added, days(&["2024-01-05"]));
        assert_eq!(edit.changed.len(), 1);
        assert_eq!(edit.changed[0].id, "c");
        assert_eq!(edit.changed[0].days, days(&["2024-01-02", "2024-01-05"]));
    }

    #[test]
    fn removed_days_are_pruned_everywhere() {
        let edit = plan_day_edit(&snapshot(), days(&["2024-01-01"]));

        assert!(edit.added.is_empty());
        let by_id = |id: &str| edit.changed.iter().find(|r| r.id == id).cloned();
        assert_eq!(by_id("c").map(|r| r.days), Some(days(&["2024-01-01"])));
        assert_eq!(by_id("r").map(|r| r.days), Some(Vec::new()));
    }

    #[test]
    fn applied_edit_matches_plan() {
        let before = snapshot();
        let edit = plan_day_edit(&before, days(&["2024-01-02", "2024-01-05"]));
        let after = edit.clone().apply(before);

        assert_eq!(after.poll.days, edit.days);
        assert_eq!(after.responses[0].days, days(&["2024-01-02", "2024-01-05"]));
        assert_eq!(after.responses[1].days, days(&["2024-01-02"]));
    }

    #[test]
    fn unchanged_responses_are_not_rewritten() {
        let edit = plan_day_edit(&snapshot(), days(&["2024-01-01", "2024-01-02"]));
        assert!(edit.changed.is_empty());
    }

    #[test]
    fn zero_timeout_disables_the_deadline() {
        struct Never;

        #[async_trait::async_trait]
        impl PollStore for Never {
            async fn create_poll(&self, _poll: Poll) -> Result<()> {
                Ok(())
            }
            async fn create_poll_with_response(&self, _poll: Poll, _response: Response) -> Result<()> {
                Ok(())
            }
            async fn get_poll(&self, _poll_id: &str) -> Result<PollSnapshot> {
                Err(HangError::NotFound("poll".into()))
            }
            async fn upsert_response(&self, _poll_id: &str, response: Response) -> Result<Response> {
                Ok(response)
            }
            async fn update_poll_days(&self, _poll_id: &str, _days: Vec<String>) -> Result<()> {
                Ok(())
            }
            async fn delete_response(&self, _poll_id: &str, _response_id: &str) -> Result<()> {
                Ok(())
            }
            async fn stats(&self) -> Result<StoreStats> {
                Ok(StoreStats::default())
            }
        }

        let service = PollService::new(Arc::new(Never)).with_operation_timeout(Duration::ZERO);
        assert!(service.operation_timeout.is_none());
        let service = service.with_operation_timeout(Duration::from_millis(50));
        assert_eq!(service.operation_timeout, Some(Duration::from_millis(50)));
    }
}
