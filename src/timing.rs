//! Countdown helpers for call records.
//!
//! A pending call has a 90-minute window from its `callTime`. The helpers
//! here compute the seconds left in that window and format them for display.
//! Every formatter accepts `None`/NaN and returns a zero value instead of
//! failing.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::CallStatus;

/// Length of the call window in seconds.
pub const CALL_WINDOW_SECS: u64 = 90 * 60;

/// Parse a `callTime` string. Accepts RFC 3339 and naive ISO timestamps
/// (taken as UTC).
pub fn parse_call_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Seconds left for a call:
/// `max(0, 5400 - floor((now - call_time) / 1s))` while pending, else 0.
/// A missing or unparsable call time counts as no time left.
pub fn remaining_time(status: &CallStatus, call_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    if !status.is_pending() {
        return 0;
    }
    let Some(call_time) = call_time else {
        return 0;
    };
    let elapsed_secs = (now - call_time).num_milliseconds().div_euclid(1000);
    let remaining = CALL_WINDOW_SECS as i64 - elapsed_secs;
    remaining.max(0) as u64
}

fn whole_seconds(seconds: Option<f64>) -> Option<u64> {
    let s = seconds?;
    if !s.is_finite() {
        return None;
    }
    Some(s.max(0.0).floor() as u64)
}

/// `M:SS`, e.g. `125` → `"2:05"`.
pub fn format_time(seconds: Option<f64>) -> String {
    match whole_seconds(seconds) {
        Some(s) => format!("{}:{:02}", s / 60, s % 60),
        None => "0:00".to_string(),
    }
}

/// `HH:MM:SS`, e.g. `3661` → `"01:01:01"`.
pub fn format_time_with_hours(seconds: Option<f64>) -> String {
    match whole_seconds(seconds) {
        Some(s) => format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60),
        None => "00:00:00".to_string(),
    }
}

/// Share of the 90-minute window still left, as a percentage in `[0, 100]`.
pub fn calculate_progress(remaining_time: Option<f64>) -> f64 {
    match remaining_time {
        Some(r) if !r.is_nan() => (r / CALL_WINDOW_SECS as f64 * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}
