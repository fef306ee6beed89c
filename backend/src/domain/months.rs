//! Month arithmetic and date formatting.
//!
//! Billing months are identified by [`MonthId`] ("YYYY-MM"). Everything that
//! depends on "now" takes a [`Clock`]. The formatting helpers are display
//! only: they never fail, and input they cannot parse is returned unchanged.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shared::{MonthId, MonthOption};

use super::clock::Clock;

/// Number of months offered when picking the month a payment is for
pub const DEFAULT_MONTH_OPTIONS: usize = 12;

/// The month containing the clock's current date
pub fn current_month(clock: &dyn Clock) -> MonthId {
    MonthId::from_date(clock.today())
}

/// The calendar month before [`current_month`], rolling January back to the
/// previous year's December
pub fn previous_month(clock: &dyn Clock) -> MonthId {
    current_month(clock).pred()
}

/// The `count` most recent months, newest first, starting at the current month
pub fn month_window(clock: &dyn Clock, count: usize) -> Vec<MonthId> {
    std::iter::successors(Some(current_month(clock)), |month| Some(month.pred()))
        .take(count)
        .collect()
}

/// Month window paired with display labels, for month pickers
pub fn month_options(clock: &dyn Clock, count: usize) -> Vec<MonthOption> {
    month_window(clock, count)
        .into_iter()
        .map(|id| MonthOption {
            label: display_name(&id),
            id,
        })
        .collect()
}

/// Get the human-readable name for a month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "Invalid Month",
    }
}

/// Long display form of a month, e.g. "March 2024"
pub fn display_name(month: &MonthId) -> String {
    format!("{} {:04}", month_name(month.month()), month.year())
}

/// Like [`display_name`] but for a raw stored value; malformed values are
/// shown as-is
pub fn display_name_str(month: &str) -> String {
    match month.parse::<MonthId>() {
        Ok(id) => display_name(&id),
        Err(_) => month.to_string(),
    }
}

/// Short date, e.g. "Mar 5, 2024"
pub fn format_date(date: &str) -> String {
    match parse_wall_clock(date) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Twelve hour time, e.g. "02:30 PM"
pub fn format_time(date: &str) -> String {
    match parse_wall_clock(date) {
        Some(dt) => dt.format("%I:%M %p").to_string(),
        None => date.to_string(),
    }
}

/// Date followed by time, e.g. "Mar 5, 2024 02:30 PM"
pub fn format_date_time(date: &str) -> String {
    match parse_wall_clock(date) {
        Some(dt) => dt.format("%b %-d, %Y %I:%M %p").to_string(),
        None => date.to_string(),
    }
}

/// Parse a stored timestamp as the wall-clock time it was written in.
///
/// RFC 3339 values keep their own offset's local time.
fn parse_wall_clock(date: &str) -> Option<NaiveDateTime> {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => Some(dt.naive_local()),
        Err(_) => parse_naive(date),
    }
}

/// Parse a stored timestamp into a comparable instant.
///
/// RFC 3339 values are normalised to UTC; values without an offset are taken
/// as they are.
pub fn parse_instant(date: &str) -> Option<NaiveDateTime> {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => Some(dt.naive_utc()),
        Err(_) => parse_naive(date),
    }
}

fn parse_naive(date: &str) -> Option<NaiveDateTime> {
    const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
