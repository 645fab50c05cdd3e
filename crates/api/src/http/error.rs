//! HTTP mapping of domain errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bffhang_domain::HangError;
use serde::Serialize;
use tracing::error;

/// Domain error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub HangError);

impl From<HangError> for ApiError {
    fn from(value: HangError) -> Self {
        Self(value)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

pub fn status_for(err: &HangError) -> StatusCode {
    match err {
        HangError::Validation(_) => StatusCode::BAD_REQUEST,
        HangError::NotFound(_) => StatusCode::NOT_FOUND,
        HangError::AlreadyExists(_) => StatusCode::CONFLICT,
        HangError::Forbidden(_) => StatusCode::FORBIDDEN,
        HangError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        HangError::Security(_) | HangError::Config(_) | HangError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        // Server-side details stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
            "something went wrong".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ErrorBody { error: self.0.label(), message })).into_response()
    }
}
