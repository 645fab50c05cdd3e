//! # bffhang Core
//!
//! Business rules for account-less availability polls.
//!
//! This crate contains:
//! - The storage port every backend implements
//! - Possession-based identity and credential minting
//! - The poll service and its pure helpers
//!
//! ## Architecture Principles
//! - Only depends on `bffhang-domain`
//! - No database, HTTP, or platform code
//! - All persistence via the [`PollStore`] trait

pub mod availability;
pub mod calendar;
pub mod identity;
pub mod polls;
pub mod storage;

pub use availability::summarize_availability;
pub use calendar::{edit_window, upcoming_days};
pub use identity::{is_creator, resolve_role, OsTokenSource, TokenMinter, TokenSource};
pub use polls::{plan_day_edit, DayEdit, PollService};
pub use storage::{with_deadline, PollStore};
