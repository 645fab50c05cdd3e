//! # bffhang Domain
//!
//! Business domain types and models for bffhang.
//!
//! This crate contains:
//! - Poll and response data types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Day-string helpers and constants
//!
//! ## Architecture
//! - No dependencies on other bffhang crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
