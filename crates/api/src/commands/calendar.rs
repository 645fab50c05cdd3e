//! Calendar offered on the create form

use std::time::Instant;

use bffhang_core::upcoming_days;
use bffhang_domain::constants::DEFAULT_CALENDAR_DAYS;
use bffhang_domain::DayOption;
use chrono::Utc;

use crate::utils::log_command_execution;

/// The next two weeks, starting today (UTC).
pub fn get_calendar() -> Vec<DayOption> {
    let start = Instant::now();
    let days = upcoming_days(Utc::now().date_naive(), DEFAULT_CALENDAR_DAYS);
    log_command_execution("calendar::get_calendar", start.elapsed(), true, None);
    days
}
