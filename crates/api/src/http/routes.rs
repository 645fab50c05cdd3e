//! Route handlers. Thin adapters from HTTP to commands.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use bffhang_domain::{DayOption, NewPoll, PollSnapshot, StoreStats};

use super::error::ApiError;
use crate::commands::{
    self, CreatePollOutput, HealthStatus, PollPage, SubmitResponseInput, SubmitResponseOutput,
    UpdateDaysInput,
};
use crate::AppContext;

/// Request header carrying the caller's credential.
pub const TOKEN_HEADER: &str = "x-bffhang-token";

type ApiResult<T> = Result<T, ApiError>;

/// Non-blank credential from the request, if any.
pub fn caller_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Configured public base URL, or one derived from the request.
pub fn base_url(ctx: &AppContext, headers: &HeaderMap) -> String {
    if let Some(base) = ctx.config.server.public_base_url.as_deref().filter(|b| !b.is_empty()) {
        return base.to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

pub async fn create_poll(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(input): Json<NewPoll>,
) -> ApiResult<(StatusCode, Json<CreatePollOutput>)> {
    let base = base_url(&ctx, &headers);
    let created = commands::create_poll(&ctx, input, &base).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_poll(
    State(ctx): State<Arc<AppContext>>,
    Path(poll_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<PollPage>> {
    let base = base_url(&ctx, &headers);
    let page = commands::load_poll(&ctx, &poll_id, caller_token(&headers), &base).await?;
    Ok(Json(page))
}

pub async fn submit_response(
    State(ctx): State<Arc<AppContext>>,
    Path(poll_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<SubmitResponseInput>,
) -> ApiResult<Json<SubmitResponseOutput>> {
    let saved = commands::submit_response(&ctx, &poll_id, caller_token(&headers), input).await?;
    Ok(Json(saved))
}

pub async fn update_days(
    State(ctx): State<Arc<AppContext>>,
    Path(poll_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<UpdateDaysInput>,
) -> ApiResult<Json<PollSnapshot>> {
    let snapshot = commands::update_days(&ctx, &poll_id, caller_token(&headers), input).await?;
    Ok(Json(snapshot))
}

pub async fn delete_response(
    State(ctx): State<Arc<AppContext>>,
    Path((poll_id, response_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    commands::delete_response(&ctx, &poll_id, caller_token(&headers), &response_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<StoreStats>> {
    Ok(Json(commands::get_stats(&ctx).await?))
}

pub async fn calendar() -> Json<Vec<DayOption>> {
    Json(commands::get_calendar())
}

pub async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthStatus>) {
    let status = commands::get_health(&ctx).await;
    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}
