//! Poll and response types
//!
//! A poll owns its responses. Day lists are canonical `YYYY-MM-DD` strings,
//! deduplicated and sorted ascending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shareable poll: a title and a candidate day set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub title: String,
    pub days: Vec<String>,
    /// Credential that unlocks creator authority for this poll.
    #[serde(skip_serializing, default)]
    pub creator_token: String,
    pub created_at: DateTime<Utc>,
}

/// One respondent's day selections, owned by one credential within a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    pub name: String,
    pub days: Vec<String>,
    #[serde(skip_serializing, default)]
    pub user_token: String,
    /// Set on first submission and preserved across updates.
    pub created_at: DateTime<Utc>,
}

/// Full poll state as returned by a single storage read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollSnapshot {
    pub poll: Poll,
    /// Ordered by `created_at` ascending.
    pub responses: Vec<Response>,
}

impl PollSnapshot {
    pub fn new(poll: Poll, responses: Vec<Response>) -> Self {
        Self { poll, responses }
    }

    /// Response owned by the given credential, if any.
    pub fn response_for_token(&self, token: &str) -> Option<&Response> {
        let target = token.trim();
        if target.is_empty() {
            return None;
        }
        self.responses.iter().find(|response| response.user_token.trim() == target)
    }

    pub fn response_by_id(&self, response_id: &str) -> Option<&Response> {
        self.responses.iter().find(|response| response.id == response_id)
    }
}

/// Caller role for a single request. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Creator,
    Respondent,
}

/// Per-day availability summary for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String,
    pub label: String,
    /// Names of respondents who selected the day, sorted.
    pub names: Vec<String>,
    /// True iff at least one response exists and every response includes the day.
    pub all_available: bool,
}

/// A selectable calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOption {
    pub date: String,
    pub label: String,
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct PollView {
    pub poll: Poll,
    pub responses: Vec<Response>,
    pub summaries: Vec<DaySummary>,
    pub total_responses: usize,
    pub is_creator: bool,
    pub viewer_name: Option<String>,
    /// Days the viewer has selected, restricted to the poll's day set.
    pub selected_days: Vec<String>,
    /// Creator's edit calendar. Empty for respondents.
    pub edit_days: Vec<DayOption>,
}

/// Input for poll creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewPoll {
    pub title: String,
    pub creator_name: String,
    pub days: Vec<String>,
}

/// Result of poll creation: the stored poll and the creator's credential.
#[derive(Debug, Clone)]
pub struct CreatedPoll {
    pub poll: Poll,
    pub creator_response: Response,
    pub creator_token: String,
}
