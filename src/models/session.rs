use super::status::ProximityStatus;
use super::work_mode::WorkMode;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One check-in-to-check-out work period. At most one per employee and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSession {
    pub id: i64,
    pub employee_id: String,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub work_mode: WorkMode,
    pub is_checked_in: bool,
    pub is_on_break: bool,
    /// Location status captured at check-in.
    pub verification: ProximityStatus,
    pub site_id: Option<String>,
}

impl AttendanceSession {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn check_in_str(&self) -> String {
        fmt_hhmm(self.check_in_time)
    }

    pub fn check_out_str(&self) -> String {
        fmt_hhmm(self.check_out_time)
    }

    pub fn is_closed(&self) -> bool {
        self.check_out_time.is_some()
    }
}

fn fmt_hhmm(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
