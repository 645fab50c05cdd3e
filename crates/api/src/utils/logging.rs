use std::time::{Duration, Instant};

use bffhang_domain::{HangError, Result};
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding credentials in `command`.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    success: bool,
    error: Option<&HangError>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        let error_type = error.map(HangError::label).unwrap_or("unknown");
        warn!(command, duration_ms, error_type, "command_execution_failure");
    }
}

/// Log a finished command from its start time and result, passing the result
/// through.
pub fn log_command_result<T>(command: &str, start: Instant, result: Result<T>) -> Result<T> {
    log_command_execution(command, start.elapsed(), result.is_ok(), result.as_ref().err());
    result
}
