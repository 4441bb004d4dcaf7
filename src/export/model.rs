// src/export/model.rs

use crate::core::summary::summarize;
use crate::models::break_record::BreakRecord;
use crate::models::session::AttendanceSession;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Flat session row for CSV / JSON.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub id: i64,
    pub employee_id: String,
    pub date: String,
    pub work_mode: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub verification: String,
    pub site_id: Option<String>,
    pub worked_minutes: i64,
    pub break_minutes: i64,
    pub breaks: usize,
}

/// Flat break row for CSV / JSON.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BreakExport {
    pub id: i64,
    pub session_id: i64,
    pub date: String,
    pub kind: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i64>,
}

fn hhmm(t: Option<NaiveDateTime>) -> Option<String> {
    t.map(|t| t.format("%H:%M").to_string())
}

impl SessionExport {
    pub fn from_session(s: &AttendanceSession, breaks: &[BreakRecord], now: NaiveDateTime) -> Self {
        let summary = summarize(s, breaks, now);
        Self {
            id: s.id,
            employee_id: s.employee_id.clone(),
            date: s.date_str(),
            work_mode: s.work_mode.to_db_str().to_string(),
            check_in: hhmm(s.check_in_time),
            check_out: hhmm(s.check_out_time),
            verification: s.verification.to_db_str().to_string(),
            site_id: s.site_id.clone(),
            worked_minutes: summary.worked_minutes,
            break_minutes: summary.break_minutes,
            breaks: summary.break_count,
        }
    }
}

impl BreakExport {
    pub fn from_record(s: &AttendanceSession, b: &BreakRecord) -> Self {
        Self {
            id: b.id,
            session_id: s.id,
            date: s.date_str(),
            kind: b.kind.to_db_str().to_string(),
            start_time: b.start_str(),
            end_time: hhmm(b.end_time),
            duration_minutes: b.duration_minutes,
        }
    }
}
