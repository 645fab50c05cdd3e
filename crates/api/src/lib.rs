//! # bffhang API
//!
//! Application layer - commands, HTTP surface and process wiring.
//!
//! This crate contains:
//! - Transport-agnostic commands over the poll service
//! - Application context (dependency injection)
//! - axum router, handlers and error mapping
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The `bffhang` binary serves the router

pub mod commands;
pub mod context;
pub mod http;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use http::{router, serve, ApiError, TOKEN_HEADER};
