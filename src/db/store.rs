//! SQLite-backed system of record for attendance transitions.

use crate::core::store::{AttendanceStore, DayRecord};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::break_record::BreakRecord;
use crate::models::payload::AttendancePayload;
use crate::models::session::AttendanceSession;
use chrono::NaiveDate;

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::new(DbPool::new(path)?))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn audit_session(&self, operation: &str, session: &AttendanceSession) {
        let payload = AttendancePayload::from_session(session);
        let message = serde_json::to_string(&payload).unwrap_or_else(|e| e.to_string());
        audit(&self.pool.conn, operation, &session.date_str(), &message);
    }
}

impl SqliteStore {
    fn day_for(&self, session: Option<AttendanceSession>) -> AppResult<Option<DayRecord>> {
        let Some(session) = session else {
            return Ok(None);
        };
        let breaks = queries::load_breaks_for_session(&self.pool.conn, session.id)?;
        Ok(Some(DayRecord { session, breaks }))
    }

    fn audit_break_end(&self, record: &BreakRecord) {
        audit(
            &self.pool.conn,
            "break_end",
            record.kind.to_db_str(),
            &format!(
                "Break {}–{} ({} min)",
                record.start_str(),
                record.end_str(),
                record.duration_minutes.unwrap_or(0)
            ),
        );
    }
}

impl AttendanceStore for SqliteStore {
    fn load_day(&mut self, employee_id: &str, date: NaiveDate) -> AppResult<Option<DayRecord>> {
        let session = queries::load_session_by_date(&self.pool.conn, employee_id, &date)?;
        self.day_for(session)
    }

    fn load_open_day(&mut self, employee_id: &str) -> AppResult<Option<DayRecord>> {
        let session = queries::load_open_session(&self.pool.conn, employee_id)?;
        self.day_for(session)
    }

    fn save_check_in(&mut self, session: &AttendanceSession) -> AppResult<i64> {
        let id = queries::insert_session(&self.pool.conn, session)?;
        self.audit_session("checkin", session);
        Ok(id)
    }

    fn save_check_out(
        &mut self,
        session: &AttendanceSession,
        closed_break: Option<&BreakRecord>,
    ) -> AppResult<()> {
        let tx = self.pool.conn.transaction()?;
        if let Some(record) = closed_break {
            queries::update_break_end(&tx, record)?;
        }
        queries::update_session_checkout(&tx, session)?;
        tx.commit()?;

        if let Some(record) = closed_break {
            self.audit_break_end(record);
        }
        self.audit_session("checkout", session);
        Ok(())
    }

    fn save_break_start(&mut self, session_id: i64, record: &BreakRecord) -> AppResult<i64> {
        let id = queries::insert_break(&self.pool.conn, session_id, record)?;
        audit(
            &self.pool.conn,
            "break_start",
            record.kind.to_db_str(),
            &format!("Break started at {}", record.start_time.format("%Y-%m-%d %H:%M")),
        );
        Ok(id)
    }

    fn save_break_end(&mut self, record: &BreakRecord) -> AppResult<()> {
        queries::update_break_end(&self.pool.conn, record)?;
        self.audit_break_end(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view_model::{Action, AttendanceViewModel, ViewSettings};
    use crate::db::initialize::init_db;
    use crate::errors::AppError;
    use crate::models::break_record::BreakType;
    use crate::models::work_mode::WorkMode;
    use chrono::NaiveDateTime;

    fn t(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn store() -> SqliteStore {
        let store = SqliteStore::new(DbPool::in_memory().unwrap());
        init_db(&store.pool().conn).unwrap();
        store
    }

    fn vm() -> AttendanceViewModel {
        AttendanceViewModel::new("EMP1", Vec::new(), ViewSettings::default())
    }

    #[test]
    fn failed_check_out_keeps_break_open() {
        let mut store = store();
        let mut vm = vm();
        vm.submit(Action::CheckIn { mode: WorkMode::Wfh }, t(1, 9, 0), &mut store)
            .unwrap();
        vm.submit(
            Action::StartBreak {
                kind: BreakType::Tea,
            },
            t(1, 16, 45),
            &mut store,
        )
        .unwrap();

        store
            .pool()
            .conn
            .execute_batch(
                "CREATE TRIGGER refuse_checkout BEFORE UPDATE OF check_out ON sessions
                 BEGIN SELECT RAISE(ABORT, 'backend unavailable'); END;",
            )
            .unwrap();

        let err = vm.submit(Action::CheckOut, t(1, 17, 0), &mut store).unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert!(vm.ledger().is_on_break());

        let end: Option<String> = store
            .pool()
            .conn
            .query_row("SELECT end_time FROM breaks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(end, None);

        let day = store.load_open_day("EMP1").unwrap().unwrap();
        assert!(day.breaks[0].is_open());
    }

    #[test]
    fn check_out_after_midnight_closes_the_open_session() {
        let mut store = store();
        let mut vm = vm();
        vm.submit(Action::CheckIn { mode: WorkMode::Wfh }, t(1, 22, 0), &mut store)
            .unwrap();

        assert!(store.load_day("EMP1", t(2, 1, 0).date()).unwrap().is_none());
        let day = store.load_open_day("EMP1").unwrap();
        let mut reloaded =
            AttendanceViewModel::from_day("EMP1", Vec::new(), ViewSettings::default(), day);

        reloaded
            .submit(Action::CheckOut, t(2, 1, 0), &mut store)
            .unwrap();
        assert_eq!(reloaded.snapshot(t(2, 2, 0)).total_work_minutes, 180);
        assert!(store.load_open_day("EMP1").unwrap().is_none());
    }
}
