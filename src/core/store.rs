//! Persistence seam for accepted attendance transitions.

use crate::errors::AppResult;
use crate::models::break_record::BreakRecord;
use crate::models::session::AttendanceSession;
use chrono::NaiveDate;

/// A stored day: the session and its breaks in start-time order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub session: AttendanceSession,
    pub breaks: Vec<BreakRecord>,
}

/// System of record for check-ins, check-outs and breaks.
///
/// Every method either saves the whole change or returns an error; the
/// view model only commits a transition after a successful save.
pub trait AttendanceStore {
    fn load_day(&mut self, employee_id: &str, date: NaiveDate) -> AppResult<Option<DayRecord>>;

    /// Latest session of the employee that has not been checked out yet,
    /// whatever its date.
    fn load_open_day(&mut self, employee_id: &str) -> AppResult<Option<DayRecord>>;

    /// Returns the id assigned to the new session.
    fn save_check_in(&mut self, session: &AttendanceSession) -> AppResult<i64>;

    /// Close the session, together with the break it closed, if any. Both
    /// are saved or neither is.
    fn save_check_out(
        &mut self,
        session: &AttendanceSession,
        closed_break: Option<&BreakRecord>,
    ) -> AppResult<()>;

    /// Returns the id assigned to the new break.
    fn save_break_start(&mut self, session_id: i64, record: &BreakRecord) -> AppResult<i64>;

    fn save_break_end(&mut self, record: &BreakRecord) -> AppResult<()>;
}
