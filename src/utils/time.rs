//! `eventTime` / `eventTimeZoneOffset` parsing.
//!
//! The engine never reads the wall clock — these functions only parse
//! caller-supplied strings into a comparable instant.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::OnceLock;

use regex::Regex;

/// Parses `eventTime` against `YYYY-MM-DDTHH:MM:SS.ffffffZ`, falling back
/// to `YYYY-MM-DDTHH:MM:SSZ`.
pub fn parse_event_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
    }
    None
}

/// Validates `^[+-]\d{2}:\d{2}$` with hours 0..14 and minutes in
/// {00,15,30,45}.
pub fn is_valid_timezone_offset(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[+-]\d{2}:\d{2}$").unwrap());
    let Some(caps) = re.captures(value) else {
        return false;
    };
    let hours: u32 = caps[0][1..3].parse().unwrap_or(99);
    let minutes: u32 = caps[0][4..6].parse().unwrap_or(99);
    hours <= 14 && matches!(minutes, 0 | 15 | 30 | 45)
}

/// Parses `YYYY-MM-DD` for `ilmd.itemExpirationDate`.
pub fn parse_date(value: &str) -> bool {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
