//! Display labels for dates, date ranges, and pushes

use chrono::{Datelike, NaiveDate};
use pd_models::Push;

use crate::range::YearRange;

/// `Jan 15, 2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Compact label for an inclusive date range.
///
/// Shared components are printed once: `Jan 1 – 26, 2025`,
/// `Jan 1 – Feb 26, 2025`, `Dec 1, 2025 – Feb 1, 2026`.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    if start == end {
        format_date(start)
    } else if start.year() != end.year() {
        format!("{} – {}", format_date(start), format_date(end))
    } else if start.month() != end.month() {
        format!(
            "{} – {}, {}",
            start.format("%b %-d"),
            end.format("%b %-d"),
            end.year()
        )
    } else {
        format!("{} – {}, {}", start.format("%b %-d"), end.day(), end.year())
    }
}

/// `2025` or `2025–2026`
pub fn format_year_range(range: &YearRange) -> String {
    if range.start_year() == range.end_year() {
        range.start_year().to_string()
    } else {
        format!("{}–{}", range.start_year(), range.end_year())
    }
}

/// The push's own name, or `Push <n>`
pub fn push_label(push: &Push) -> String {
    match push.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Push {}", push.sequence_index),
    }
}
