//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Storage defaults
pub const DEFAULT_STORE_IDENTIFIER: &str = "bff-hang.db";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;

// Server defaults
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

// Day strings
pub const DAY_FORMAT: &str = "%Y-%m-%d";
pub const DAY_LABEL_FORMAT: &str = "%a, %b %-d";

// Calendar shown to creators
pub const DEFAULT_CALENDAR_DAYS: usize = 14;

// Credentials
pub const TOKEN_BYTES: usize = 16;
