//! Database implementations

pub mod manager;
pub mod poll_items;
pub mod poll_repository;

pub use manager::{DbConnection, DbManager};
pub use poll_items::PollItem;
pub use poll_repository::SqlitePollStore;
