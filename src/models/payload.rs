use super::session::AttendanceSession;
use serde::Serialize;

/// Body of the attendance endpoint: the shape each check-in/out is persisted in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePayload {
    pub employee_id: String,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub date: String,
}

impl AttendancePayload {
    pub fn from_session(session: &AttendanceSession) -> Self {
        let status = if session.is_closed() {
            "checked_out"
        } else if session.is_on_break {
            "on_break"
        } else {
            "checked_in"
        };

        Self {
            employee_id: session.employee_id.clone(),
            status: status.to_string(),
            check_in_time: session
                .check_in_time
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            check_out_time: session
                .check_out_time
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            date: session.date_str(),
        }
    }
}
