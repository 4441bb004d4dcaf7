//! Work-session timing: active minutes, progress against the expected day.

use crate::models::break_record::BreakRecord;
use crate::models::session::AttendanceSession;
use crate::models::status::ProximityStatus;
use crate::models::work_mode::WorkMode;
use chrono::NaiveDateTime;

/// Expected daily work time when the config does not say otherwise (8h).
pub const DEFAULT_EXPECTED_MINUTES: i64 = 480;

/// Open a new session checked in at `now`.
pub fn start(employee_id: &str, mode: WorkMode, now: NaiveDateTime) -> AttendanceSession {
    AttendanceSession {
        id: 0,
        employee_id: employee_id.to_string(),
        date: now.date(),
        check_in_time: Some(now),
        check_out_time: None,
        work_mode: mode,
        is_checked_in: true,
        is_on_break: false,
        verification: if mode.requires_verification() {
            ProximityStatus::Unverified
        } else {
            ProximityStatus::NotRequired
        },
        site_id: None,
    }
}

/// Upper bound of the session's accounting window: `now`, or the check-out
/// time once the session is closed.
pub fn window_end(session: &AttendanceSession, now: NaiveDateTime) -> NaiveDateTime {
    match session.check_out_time {
        Some(out) if out < now => out,
        _ => now,
    }
}

/// Break seconds that fall inside `[check_in, end]`.
pub fn break_seconds_within(
    check_in: NaiveDateTime,
    end: NaiveDateTime,
    breaks: &[BreakRecord],
) -> i64 {
    breaks
        .iter()
        .map(|b| {
            let from = b.start_time.max(check_in);
            let to = b.end_time.unwrap_or(end).min(end);
            (to - from).num_seconds().max(0)
        })
        .sum()
}

/// Active work minutes: wall-clock since check-in minus overlapping breaks.
/// Never negative, also when `now` precedes the check-in (clock skew).
///
/// The subtraction is done in seconds and floored once, so the result does
/// not move while a break is open.
pub fn elapsed_minutes(
    session: &AttendanceSession,
    breaks: &[BreakRecord],
    now: NaiveDateTime,
) -> i64 {
    let Some(check_in) = session.check_in_time else {
        return 0;
    };

    let end = window_end(session, now);
    let wall = (end - check_in).num_seconds().max(0);
    let paused = break_seconds_within(check_in, end, breaks);

    (wall - paused).max(0) / 60
}

/// Share of the expected day already worked, clamped to `[0, 1]`.
pub fn progress_fraction(elapsed: i64, expected_minutes: i64) -> f64 {
    if expected_minutes <= 0 {
        return 0.0;
    }
    (elapsed as f64 / expected_minutes as f64).clamp(0.0, 1.0)
}
