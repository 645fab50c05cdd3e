//! Day-string utilities
//!
//! Days travel through the system as canonical `YYYY-MM-DD` strings. Sorting
//! those strings lexicographically is the same as sorting them by date, so
//! every list here stays a plain `Vec<String>`.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::constants::{DAY_FORMAT, DAY_LABEL_FORMAT};
use crate::errors::{HangError, Result};

/// Trim, drop blanks, dedupe and sort. No format validation.
pub fn normalize_days<S: AsRef<str>>(input: &[S]) -> Vec<String> {
    input
        .iter()
        .map(|day| day.as_ref().trim())
        .filter(|day| !day.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Normalize and require every entry to be a canonical `YYYY-MM-DD` date.
///
/// Returns `Validation` on the first malformed entry or when nothing is left.
pub fn parse_days<S: AsRef<str>>(input: &[S]) -> Result<Vec<String>> {
    let days = normalize_days(input);
    if let Some(bad) = days.iter().find(|day| !is_canonical_day(day)) {
        return Err(HangError::Validation(format!("invalid date '{bad}', expected YYYY-MM-DD")));
    }
    if days.is_empty() {
        return Err(HangError::Validation("at least one day is required".into()));
    }
    Ok(days)
}

/// True for real calendar dates written exactly as `YYYY-MM-DD`.
pub fn is_canonical_day(day: &str) -> bool {
    NaiveDate::parse_from_str(day, DAY_FORMAT)
        .map(|date| date.format(DAY_FORMAT).to_string() == day)
        .unwrap_or(false)
}

/// Keep the entries of `selected` present in `allowed`, preserving order.
pub fn filter_days(selected: &[String], allowed: &[String]) -> Vec<String> {
    let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();
    selected.iter().filter(|day| allowed.contains(day.as_str())).cloned().collect()
}

/// Entries of `next` missing from `previous`.
pub fn diff_days(previous: &[String], next: &[String]) -> Vec<String> {
    let previous: HashSet<&str> = previous.iter().map(String::as_str).collect();
    next.iter().filter(|day| !previous.contains(day.as_str())).cloned().collect()
}

/// Sorted, deduplicated union.
pub fn merge_days(left: &[String], right: &[String]) -> Vec<String> {
    left.iter().chain(right.iter()).cloned().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Human label such as `Mon, Jan 2`; unparsable input is returned as-is.
pub fn format_day_label(day: &str) -> String {
    NaiveDate::parse_from_str(day, DAY_FORMAT)
        .map(|date| date.format(DAY_LABEL_FORMAT).to_string())
        .unwrap_or_else(|_| day.to_string())
}
