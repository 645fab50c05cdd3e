//! Domain types and models

pub mod poll;
pub mod stats;

pub use poll::{
    CreatedPoll, DayOption, DaySummary, NewPoll, Poll, PollSnapshot, PollView, Response, Role,
};
pub use stats::StoreStats;
