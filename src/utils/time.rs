//! Time utilities: parsing HH:MM and full instants, minute arithmetic,
//! work-duration strings such as "8h" or "7h30m".

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

/// Parse `--at` values: `HH:MM` (on `day`), `YYYY-MM-DD HH:MM` or
/// `YYYY-MM-DDTHH:MM`.
pub fn parse_instant(s: &str, day: NaiveDate) -> AppResult<NaiveDateTime> {
    let s = s.trim();

    if let Some(t) = parse_time(s) {
        return Ok(day.and_time(t));
    }

    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    Err(AppError::InvalidTime(s.to_string()))
}

/// `--at` if given, the current local time otherwise.
pub fn resolve_instant(at: Option<&String>) -> AppResult<NaiveDateTime> {
    let now = now();
    match at {
        Some(s) => parse_instant(s, now.date()),
        None => Ok(now),
    }
}

/// Whole minutes from `start` to `end`, floored; 0 when `end` precedes `start`.
pub fn floor_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds().max(0) / 60
}

/// "8h", "7h30m", "7h 30m", "450m" or a bare number of minutes.
pub fn parse_work_duration_to_minutes(s: &str) -> Option<i64> {
    let s = s.trim().to_lowercase();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }

    let re = Regex::new(r"^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?$").ok()?;
    let caps = re.captures(&s)?;
    let hours = caps.get(1).map(|m| m.as_str().parse::<i64>());
    let minutes = caps.get(2).map(|m| m.as_str().parse::<i64>());

    if hours.is_none() && minutes.is_none() {
        return None;
    }

    let h = hours.transpose().ok()?.unwrap_or(0);
    let m = minutes.transpose().ok()?.unwrap_or(0);
    Some(h * 60 + m)
}
