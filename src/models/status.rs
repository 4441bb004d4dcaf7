use super::geo::{LocationReading, OfficeSite};
use super::work_mode::WorkMode;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Location verification status shown next to the check-in button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityStatus {
    NotRequired,
    Unverified,
    Verified,
    OutsideRange,
}

impl ProximityStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProximityStatus::NotRequired => "not_required",
            ProximityStatus::Unverified => "unverified",
            ProximityStatus::Verified => "verified",
            ProximityStatus::OutsideRange => "outside_range",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "not_required" => Some(ProximityStatus::NotRequired),
            "unverified" => Some(ProximityStatus::Unverified),
            "verified" => Some(ProximityStatus::Verified),
            "outside_range" => Some(ProximityStatus::OutsideRange),
            _ => None,
        }
    }
}

/// Outcome of proximity resolution for the current reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult {
    pub status: ProximityStatus,
    pub site: Option<OfficeSite>,
    pub distance_meters: Option<f64>,
}

/// Used vs. allowed break minutes for the day. Exceeding is only flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakBudget {
    pub used_minutes: i64,
    pub budget_minutes: i64,
}

impl BreakBudget {
    pub fn exceeded(&self) -> bool {
        self.used_minutes > self.budget_minutes
    }

    pub fn fraction(&self) -> f64 {
        if self.budget_minutes <= 0 {
            return 0.0;
        }
        (self.used_minutes as f64 / self.budget_minutes as f64).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot the UI renders. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceStatus {
    pub is_checked_in: bool,
    pub is_on_break: bool,
    pub work_mode: WorkMode,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub current_session_duration: String,
    pub current_session_minutes: i64,
    pub total_work_today: String,
    pub total_work_minutes: i64,
    pub break_time: String,
    pub break_minutes: i64,
    pub progress: f64,
    pub break_budget: BreakBudget,
    pub location: Option<LocationReading>,
    pub proximity: ProximityResult,
}
