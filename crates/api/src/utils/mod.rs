//! Shared helpers for the command layer.

pub mod links;
pub mod logging;

pub use links::share_url;
pub use logging::{log_command_execution, log_command_result};
