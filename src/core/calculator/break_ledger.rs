//! Break bookkeeping for a single session.

use crate::errors::{AppError, AppResult};
use crate::models::break_record::{BreakRecord, BreakType};
use crate::models::session::AttendanceSession;
use crate::models::status::BreakBudget;
use crate::utils::time::floor_minutes;
use chrono::NaiveDateTime;

/// Soft daily break allowance. Going over is flagged, never blocked.
pub const DEFAULT_BREAK_BUDGET_MINUTES: i64 = 120;

/// Open a break for `session` at `now`.
pub fn start_break(
    session: &AttendanceSession,
    kind: BreakType,
    now: NaiveDateTime,
) -> AppResult<BreakRecord> {
    if !session.is_checked_in || session.is_closed() {
        return Err(AppError::InvalidTransition(
            "cannot start a break while not checked in.".into(),
        ));
    }
    if session.is_on_break {
        return Err(AppError::InvalidTransition(
            "a break is already in progress.".into(),
        ));
    }
    if let Some(check_in) = session.check_in_time
        && now < check_in
    {
        return Err(AppError::InvalidTransition(format!(
            "break cannot start before check-in ({}).",
            check_in.format("%H:%M")
        )));
    }

    Ok(BreakRecord::open(kind, now))
}

/// Close `open` at `now`. Duration is floored to whole minutes, minimum 0.
pub fn end_break(open: &BreakRecord, now: NaiveDateTime) -> AppResult<BreakRecord> {
    if !open.is_open() {
        return Err(AppError::InvalidTransition(format!(
            "break started at {} has already ended.",
            open.start_str()
        )));
    }

    let end = now.max(open.start_time);
    Ok(BreakRecord {
        end_time: Some(end),
        duration_minutes: Some(floor_minutes(open.start_time, end)),
        ..open.clone()
    })
}

/// Closed durations plus the live time of an open break at `now`.
pub fn total_break_minutes(records: &[BreakRecord], now: NaiveDateTime) -> i64 {
    records
        .iter()
        .map(|r| match r.duration_minutes {
            Some(d) if !r.is_open() => d.max(0),
            _ => floor_minutes(r.start_time, now),
        })
        .sum()
}

/// Ordered list of the session's breaks, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakLedger {
    records: Vec<BreakRecord>,
}

impl BreakLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored records, restoring start-time order.
    pub fn from_records(mut records: Vec<BreakRecord>) -> Self {
        records.sort_by_key(|r| r.start_time);
        Self { records }
    }

    pub fn records(&self) -> &[BreakRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn open_record(&self) -> Option<&BreakRecord> {
        self.records.iter().rev().find(|r| r.is_open())
    }

    pub fn open_record_mut(&mut self) -> Option<&mut BreakRecord> {
        self.records.iter_mut().rev().find(|r| r.is_open())
    }

    pub fn is_on_break(&self) -> bool {
        self.open_record().is_some()
    }

    /// Append a freshly opened break.
    pub fn push(&mut self, record: BreakRecord) -> AppResult<()> {
        if record.is_open() && self.is_on_break() {
            return Err(AppError::InvalidTransition(
                "a break is already in progress.".into(),
            ));
        }
        let pos = self
            .records
            .partition_point(|r| r.start_time <= record.start_time);
        self.records.insert(pos, record);
        Ok(())
    }

    /// Close the open break at `now` and return the finalized record.
    pub fn close_open(&mut self, now: NaiveDateTime) -> AppResult<BreakRecord> {
        let open = self.open_record_mut().ok_or_else(|| {
            AppError::InvalidTransition("no break in progress to end.".into())
        })?;
        let closed = end_break(open, now)?;
        *open = closed.clone();
        Ok(closed)
    }

    pub fn total_minutes(&self, now: NaiveDateTime) -> i64 {
        total_break_minutes(&self.records, now)
    }

    pub fn budget(&self, now: NaiveDateTime, budget_minutes: i64) -> BreakBudget {
        BreakBudget {
            used_minutes: self.total_minutes(now),
            budget_minutes,
        }
    }

    /// Display order for the break history.
    pub fn most_recent_first(&self) -> Vec<&BreakRecord> {
        self.records.iter().rev().collect()
    }
}
