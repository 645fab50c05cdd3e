//! Poll commands

use std::time::Instant;

use bffhang_domain::{NewPoll, Poll, PollSnapshot, PollView, Response, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::{log_command_result, share_url};
use crate::AppContext;

/// Returned once to the creator; the token is never shown again.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePollOutput {
    pub poll: Poll,
    pub creator_response: Response,
    pub creator_token: String,
    pub share_url: String,
}

/// Poll view plus the link and, for first-time visitors, a fresh credential.
#[derive(Debug, Clone, Serialize)]
pub struct PollPage {
    #[serde(flatten)]
    pub view: PollView,
    pub share_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponseInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub days: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponseOutput {
    pub response: Response,
    /// Credential the response is stored under. Keep it to edit later.
    pub viewer_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDaysInput {
    #[serde(default)]
    pub days: Vec<String>,
}

pub async fn create_poll(
    ctx: &AppContext,
    input: NewPoll,
    base_url: &str,
) -> Result<CreatePollOutput> {
    let start = Instant::now();

    let result = ctx.polls.create_poll(input).await.map(|created| CreatePollOutput {
        share_url: share_url(base_url, &created.poll.id),
        poll: created.poll,
        creator_response: created.creator_response,
        creator_token: created.creator_token,
    });

    log_command_result("polls::create_poll", start, result)
}

pub async fn load_poll(
    ctx: &AppContext,
    poll_id: &str,
    caller: Option<String>,
    base_url: &str,
) -> Result<PollPage> {
    let start = Instant::now();
    let result = view_poll(ctx, poll_id, caller, base_url).await;
    log_command_result("polls::load_poll", start, result)
}

async fn view_poll(
    ctx: &AppContext,
    poll_id: &str,
    caller: Option<String>,
    base_url: &str,
) -> Result<PollPage> {
    let issued = match caller {
        Some(_) => None,
        None => Some(ctx.polls.issue_token()?),
    };
    let token = caller.as_deref().or(issued.as_deref());
    let view = ctx.polls.load_poll(poll_id, token).await?;
    debug!(poll_id, is_creator = view.is_creator, issued = issued.is_some(), "poll viewed");

    Ok(PollPage { share_url: share_url(base_url, &view.poll.id), view, viewer_token: issued })
}

pub async fn submit_response(
    ctx: &AppContext,
    poll_id: &str,
    caller: Option<String>,
    input: SubmitResponseInput,
) -> Result<SubmitResponseOutput> {
    let start = Instant::now();
    let result = submit(ctx, poll_id, caller, input).await;
    log_command_result("polls::submit_response", start, result)
}

async fn submit(
    ctx: &AppContext,
    poll_id: &str,
    caller: Option<String>,
    input: SubmitResponseInput,
) -> Result<SubmitResponseOutput> {
    let token = match caller {
        Some(token) => token,
        None => ctx.polls.issue_token()?,
    };
    let response = ctx.polls.submit_response(poll_id, &token, &input.name, &input.days).await?;
    Ok(SubmitResponseOutput { response, viewer_token: token })
}

pub async fn update_days(
    ctx: &AppContext,
    poll_id: &str,
    caller: Option<String>,
    input: UpdateDaysInput,
) -> Result<PollSnapshot> {
    let start = Instant::now();
    let result = ctx.polls.update_dates(poll_id, caller.as_deref(), &input.days).await;
    log_command_result("polls::update_days", start, result)
}

pub async fn delete_response(
    ctx: &AppContext,
    poll_id: &str,
    caller: Option<String>,
    response_id: &str,
) -> Result<()> {
    let start = Instant::now();
    let result = ctx.polls.delete_response(poll_id, caller.as_deref(), response_id).await;
    log_command_result("polls::delete_response", start, result)
}
