//! Store statistics command

use std::time::Instant;

use bffhang_domain::{Result, StoreStats};

use crate::utils::log_command_result;
use crate::AppContext;

pub async fn get_stats(ctx: &AppContext) -> Result<StoreStats> {
    let start = Instant::now();
    let result = ctx.polls.stats().await;
    log_command_result("stats::get_stats", start, result)
}
