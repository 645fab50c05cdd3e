//! Conversions from external infrastructure errors into domain errors.

use bffhang_domain::HangError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HangError);

impl From<InfraError> for HangError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HangError> for InfraError {
    fn from(value: HangError) -> Self {
        InfraError(value)
    }
}

trait IntoHangError {
    fn into_hang(self) -> HangError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → HangError */
/* -------------------------------------------------------------------------- */

impl IntoHangError for SqlError {
    fn into_hang(self) -> HangError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => {
                        HangError::StorageUnavailable("database is busy".into())
                    }
                    ErrorCode::DatabaseLocked => {
                        HangError::StorageUnavailable("database is locked".into())
                    }
                    ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase => {
                        HangError::Internal(format!("database file is unusable: {message}"))
                    }
                    ErrorCode::ConstraintViolation => {
                        HangError::Internal(format!("constraint violation: {message}"))
                    }
                    _ => HangError::StorageUnavailable(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => HangError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                HangError::Internal(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                HangError::Internal(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => HangError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => HangError::Internal(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_hang())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → HangError */
/* -------------------------------------------------------------------------- */

impl IntoHangError for PoolError {
    fn into_hang(self) -> HangError {
        HangError::StorageUnavailable(format!("no database connection available: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_hang())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → HangError */
/* -------------------------------------------------------------------------- */

impl IntoHangError for JsonError {
    fn into_hang(self) -> HangError {
        HangError::Internal(format!("corrupt stored record: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_hang())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → HangError */
/* -------------------------------------------------------------------------- */

/// Map a failed `spawn_blocking` join into a domain error.
pub fn map_join_error(err: JoinError) -> HangError {
    if err.is_cancelled() {
        HangError::Internal("blocking task cancelled".into())
    } else {
        HangError::Internal(format!("blocking task failed: {err}"))
    }
}
