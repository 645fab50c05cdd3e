//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for bffhang
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum HangError {
    /// Malformed or empty required input (days, name, date format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Poll or referenced response absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identifier collision on creation. Callers may retry with a new id.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Non-creator attempting a creator-only operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Backend call failed for infrastructure reasons.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Secure random source could not produce a credential.
    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HangError {
    /// Stable label suitable for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Forbidden(_) => "forbidden",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Security(_) => "security",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the caller can reasonably retry the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

/// Result type alias for bffhang operations
pub type Result<T> = std::result::Result<T, HangError>;
