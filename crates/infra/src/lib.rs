//! # bffhang Infrastructure
//!
//! Implementations of the `bffhang-core` storage port.
//!
//! This crate contains:
//! - The durable SQLite store (r2d2 pool, `poll_items` table)
//! - The transient in-process store
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `bffhang-core`
//! - Contains all "impure" code (I/O, SQLite)

pub mod config;
pub mod database;
pub mod errors;
pub mod memory;
pub mod storage;

// Re-export commonly used items
pub use database::{DbManager, SqlitePollStore};
pub use errors::InfraError;
pub use memory::MemoryPollStore;
pub use storage::build_store;
