//! Per-call storage deadlines.

use std::future::Future;
use std::time::Duration;

use bffhang_domain::{HangError, Result};
use tracing::warn;

/// Await `fut`, failing with `StorageUnavailable` once `limit` elapses.
///
/// Elapsing only stops the wait. Backends that hand work to another thread
/// (the SQLite store runs on the blocking pool) may still finish and commit
/// the write afterwards, so this error does not mean nothing was written.
/// Every multi-row write is a single unit of work, so state stays
/// consistent either way.
pub async fn with_deadline<T, F>(
    operation: &'static str,
    limit: Option<Duration>,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(limit) = limit else {
        return fut.await;
    };
    tokio::time::timeout(limit, fut).await.unwrap_or_else(|_| {
        warn!(operation, timeout_ms = limit.as_millis() as u64, "storage call timed out");
        Err(HangError::StorageUnavailable(format!(
            "{operation} timed out after {}ms",
            limit.as_millis()
        )))
    })
}
