//! In-memory `PollStore` mock with failure injection.
//!
//! Only the required port methods are implemented, so `commit_day_edit`
//! exercises the trait's default compensating implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bffhang_core::PollStore;
use bffhang_domain::utils::filter_days;
use bffhang_domain::{HangError, Poll, PollSnapshot, Response, Result, StoreStats};
use parking_lot::Mutex;

#[derive(Default)]
pub struct RecordingStore {
    polls: Mutex<HashMap<String, Poll>>,
    responses: Mutex<HashMap<String, Vec<Response>>>,
    fail_upsert_of: Mutex<Option<String>>,
    stall_upsert_of: Mutex<Option<(String, Duration)>>,
    fail_next_create: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next upsert of the given response id once.
    pub fn fail_upsert_of(&self, response_id: &str) {
        *self.fail_upsert_of.lock() = Some(response_id.to_string());
    }

    /// Hold the next upsert of the given response id for `delay`, once.
    pub fn stall_upsert_of(&self, response_id: &str, delay: Duration) {
        *self.stall_upsert_of.lock() = Some((response_id.to_string(), delay));
    }

    /// Fail the next poll creation once, before anything is stored.
    pub fn fail_next_create(&self) {
        *self.fail_next_create.lock() = true;
    }

    /// Delay every call by `delay`.
    pub fn slow_down(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of successful mutating calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PollStore for RecordingStore {
    async fn create_poll(&self, poll: Poll) -> Result<()> {
        self.pause().await;
        let mut polls = self.polls.lock();
        if polls.contains_key(&poll.id) {
            return Err(HangError::AlreadyExists(format!("poll {}", poll.id)));
        }
        polls.insert(poll.id.clone(), poll);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_poll_with_response(&self, poll: Poll, response: Response) -> Result<()> {
        self.pause().await;
        if std::mem::take(&mut *self.fail_next_create.lock()) {
            return Err(HangError::StorageUnavailable("injected failure".into()));
        }
        let mut polls = self.polls.lock();
        if polls.contains_key(&poll.id) {
            return Err(HangError::AlreadyExists(format!("poll {}", poll.id)));
        }
        self.responses.lock().insert(poll.id.clone(), vec![response]);
        polls.insert(poll.id.clone(), poll);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_poll(&self, poll_id: &str) -> Result<PollSnapshot> {
        self.pause().await;
        let poll = self
            .polls
            .lock()
            .get(poll_id)
            .cloned()
            .ok_or_else(|| HangError::NotFound(format!("poll {poll_id}")))?;
        let mut responses = self.responses.lock().get(poll_id).cloned().unwrap_or_default();
        responses.sort_by_key(|r| r.created_at);
        Ok(PollSnapshot::new(poll, responses))
    }

    async fn upsert_response(&self, poll_id: &str, mut response: Response) -> Result<Response> {
        self.pause().await;
        let stall = {
            let mut stalled = self.stall_upsert_of.lock();
            if stalled.as_ref().is_some_and(|(id, _)| *id == response.id) {
                stalled.take().map(|(_, delay)| delay)
            } else {
                None
            }
        };
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        {
            let mut failing = self.fail_upsert_of.lock();
            if failing.as_deref() == Some(response.id.as_str()) {
                *failing = None;
                return Err(HangError::StorageUnavailable("injected failure".into()));
            }
        }
        let allowed = self
            .polls
            .lock()
            .get(poll_id)
            .map(|poll| poll.days.clone())
            .ok_or_else(|| HangError::NotFound(format!("poll {poll_id}")))?;
        response.days = filter_days(&response.days, &allowed);

        let mut responses = self.responses.lock();
        let rows = responses.entry(poll_id.to_string()).or_default();
        match rows.iter_mut().find(|r| r.id == response.id) {
            Some(row) => *row = response.clone(),
            None => rows.push(response.clone()),
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(response)
    }

    async fn update_poll_days(&self, poll_id: &str, days: Vec<String>) -> Result<()> {
        self.pause().await;
        let mut polls = self.polls.lock();
        let poll =
            polls.get_mut(poll_id).ok_or_else(|| HangError::NotFound(format!("poll {poll_id}")))?;
        poll.days = days;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_response(&self, poll_id: &str, response_id: &str) -> Result<()> {
        self.pause().await;
        if let Some(rows) = self.responses.lock().get_mut(poll_id) {
            rows.retain(|r| r.id != response_id);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats> {
        self.pause().await;
        let poll_count = self.polls.lock().len() as u64;
        let response_count = self.responses.lock().values().map(|rows| rows.len() as u64).sum();
        Ok(StoreStats { poll_count, response_count })
    }
}
