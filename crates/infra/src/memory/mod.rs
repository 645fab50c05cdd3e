//! Transient in-process poll store.
//!
//! All state lives behind a single mutex, so every call is serialized and
//! the multi-row writes are atomic by construction. No lock is held across
//! an await. Contents vanish with the process.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bffhang_core::{plan_day_edit, PollStore};
use bffhang_domain::utils::filter_days;
use bffhang_domain::{HangError, Poll, PollSnapshot, Response, Result, StoreStats};
use parking_lot::Mutex;

#[derive(Debug)]
struct PollEntry {
    poll: Poll,
    responses: HashMap<String, Response>,
}

impl PollEntry {
    fn snapshot(&self) -> PollSnapshot {
        let mut responses: Vec<Response> = self.responses.values().cloned().collect();
        responses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        PollSnapshot::new(self.poll.clone(), responses)
    }
}

/// In-memory `PollStore`. Owned by whoever constructs it.
#[derive(Debug, Default)]
pub struct MemoryPollStore {
    polls: Mutex<HashMap<String, PollEntry>>,
}

impl MemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(poll_id: &str) -> HangError {
    HangError::NotFound(format!("poll {poll_id}"))
}

#[async_trait]
impl PollStore for MemoryPollStore {
    async fn create_poll(&self, poll: Poll) -> Result<()> {
        let mut polls = self.polls.lock();
        if polls.contains_key(&poll.id) {
            return Err(HangError::AlreadyExists(format!("poll {}", poll.id)));
        }
        polls.insert(poll.id.clone(), PollEntry { poll, responses: HashMap::new() });
        Ok(())
    }

    async fn create_poll_with_response(&self, poll: Poll, response: Response) -> Result<()> {
        let mut polls = self.polls.lock();
        if polls.contains_key(&poll.id) {
            return Err(HangError::AlreadyExists(format!("poll {}", poll.id)));
        }
        let responses = HashMap::from([(response.id.clone(), response)]);
        polls.insert(poll.id.clone(), PollEntry { poll, responses });
        Ok(())
    }

    async fn get_poll(&self, poll_id: &str) -> Result<PollSnapshot> {
        let polls = self.polls.lock();
        polls.get(poll_id).map(PollEntry::snapshot).ok_or_else(|| missing(poll_id))
    }

    async fn upsert_response(&self, poll_id: &str, mut response: Response) -> Result<Response> {
        let mut polls = self.polls.lock();
        let entry = polls.get_mut(poll_id).ok_or_else(|| missing(poll_id))?;
        response.days = filter_days(&response.days, &entry.poll.days);
        entry.responses.insert(response.id.clone(), response.clone());
        Ok(response)
    }

    async fn update_poll_days(&self, poll_id: &str, days: Vec<String>) -> Result<()> {
        let mut polls = self.polls.lock();
        let entry = polls.get_mut(poll_id).ok_or_else(|| missing(poll_id))?;
        entry.poll.days = days;
        Ok(())
    }

    async fn delete_response(&self, poll_id: &str, response_id: &str) -> Result<()> {
        if let Some(entry) = self.polls.lock().get_mut(poll_id) {
            entry.responses.remove(response_id);
        }
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let polls = self.polls.lock();
        Ok(StoreStats {
            poll_count: polls.len() as u64,
            response_count: polls.values().map(|entry| entry.responses.len() as u64).sum(),
        })
    }

    async fn commit_day_edit(
        &self,
        poll_id: &str,
        days: Vec<String>,
        _limit: Option<Duration>,
    ) -> Result<PollSnapshot> {
        let mut polls = self.polls.lock();
        let entry = polls.get_mut(poll_id).ok_or_else(|| missing(poll_id))?;

        let current = entry.snapshot();
        let edit = plan_day_edit(&current, days);
        entry.poll.days = edit.days.clone();
        for response in &edit.changed {
            entry.responses.insert(response.id.clone(), response.clone());
        }
        Ok(edit.apply(current))
    }
}
