//! Calendar windows offered to poll creators.

use bffhang_domain::constants::{DAY_FORMAT, DEFAULT_CALENDAR_DAYS};
use bffhang_domain::utils::format_day_label;
use bffhang_domain::DayOption;
use chrono::{Duration, NaiveDate};

/// `count` consecutive days starting at `start`.
pub fn upcoming_days(start: NaiveDate, count: usize) -> Vec<DayOption> {
    start
        .iter_days()
        .take(count)
        .map(|day| {
            let date = day.format(DAY_FORMAT).to_string();
            DayOption { label: format_day_label(&date), date }
        })
        .collect()
}

/// Edit calendar for a poll: at least the default window from `today`,
/// stretched so the latest poll day is still selectable.
pub fn edit_window(poll_days: &[String], today: NaiveDate) -> Vec<DayOption> {
    let latest = poll_days
        .iter()
        .filter_map(|day| NaiveDate::parse_from_str(day, DAY_FORMAT).ok())
        .max()
        .unwrap_or(today);

    let window_end = today + Duration::days(DEFAULT_CALENDAR_DAYS as i64 - 1);
    let count = if latest > window_end {
        usize::try_from((latest - today).num_days() + 1).unwrap_or(DEFAULT_CALENDAR_DAYS)
    } else {
        DEFAULT_CALENDAR_DAYS
    };

    upcoming_days(today, count)
}
