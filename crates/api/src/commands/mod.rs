//! Transport-agnostic commands.
//!
//! Each command times its execution and logs the outcome before returning.

pub mod calendar;
pub mod health;
pub mod polls;
pub mod stats;

pub use calendar::get_calendar;
pub use health::{get_health, HealthStatus};
pub use polls::{
    create_poll, delete_response, load_poll, submit_response, update_days, CreatePollOutput,
    PollPage, SubmitResponseInput, SubmitResponseOutput, UpdateDaysInput,
};
pub use stats::get_stats;
