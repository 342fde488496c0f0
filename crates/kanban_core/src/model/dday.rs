//! Signed day-count labels relative to a due date.

use chrono::{Local, NaiveDate};

/// Formats the D-day label of `due_date` as seen from `today`.
///
/// - same day: `D-Day`
/// - `n` days ahead: `D-n`
/// - `n` days overdue: `D+n`
/// - no due date: `None`
pub fn format_dday(due_date: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
    let due_date = due_date?;
    let diff = due_date.signed_duration_since(today).num_days();
    let label = match diff {
        0 => "D-Day".to_string(),
        days if days > 0 => format!("D-{days}"),
        days => format!("D+{}", days.unsigned_abs()),
    };
    Some(label)
}

/// Formats the D-day label against the local calendar date.
pub fn dday_label(due_date: Option<NaiveDate>) -> Option<String> {
    format_dday(due_date, Local::now().date_naive())
}
