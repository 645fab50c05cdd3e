//! Pure helpers shared by every layer

pub mod days;

pub use days::{
    diff_days, filter_days, format_day_label, is_canonical_day, merge_days, normalize_days,
    parse_days,
};
