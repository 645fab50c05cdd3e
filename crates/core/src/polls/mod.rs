//! Poll lifecycle: creation, responses, creator edits.

pub mod service;

pub use service::{plan_day_edit, DayEdit, PollService};
