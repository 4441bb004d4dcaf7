//! Per-day totals used by `list` and `export`.

use crate::core::calculator::break_ledger::total_break_minutes;
use crate::core::calculator::session_timer::{elapsed_minutes, window_end};
use crate::models::break_record::BreakRecord;
use crate::models::session::AttendanceSession;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySummary {
    pub worked_minutes: i64,
    pub break_minutes: i64,
    pub break_count: usize,
    pub open: bool,
}

/// Totals for one stored session. Still-open sessions are measured up to `now`.
pub fn summarize(
    session: &AttendanceSession,
    breaks: &[BreakRecord],
    now: NaiveDateTime,
) -> DaySummary {
    let end = window_end(session, now);
    DaySummary {
        worked_minutes: elapsed_minutes(session, breaks, now),
        break_minutes: total_break_minutes(breaks, end),
        break_count: breaks.len(),
        open: !session.is_closed(),
    }
}
