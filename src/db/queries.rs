use crate::errors::{AppError, AppResult};
use crate::models::break_record::{BreakRecord, BreakType};
use crate::models::session::AttendanceSession;
use crate::models::status::ProximityStatus;
use crate::models::work_mode::WorkMode;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn ts(dt: &NaiveDateTime) -> String {
    dt.format(TS_FORMAT).to_string()
}

/// Date as stored, clamped to the four-digit years SQLite text compares.
fn date_key(d: &NaiveDate) -> String {
    if d.year() < 0 {
        "0000-01-01".to_string()
    } else if d.year() > 9999 {
        "9999-12-31".to_string()
    } else {
        d.format("%Y-%m-%d").to_string()
    }
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_ts(idx: usize, s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .map_err(|_| conversion_error(idx, AppError::InvalidTime(s.to_string())))
}

fn parse_opt_ts(idx: usize, s: Option<String>) -> Result<Option<NaiveDateTime>> {
    s.map(|v| parse_ts(idx, &v)).transpose()
}

pub fn map_session_row(row: &Row) -> Result<AttendanceSession> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(2, AppError::InvalidDate(date_str.clone())))?;

    let mode_str: String = row.get("work_mode")?;
    let work_mode = WorkMode::from_db_str(&mode_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidWorkMode(mode_str.clone())))?;

    let check_in_time = parse_opt_ts(4, row.get("check_in")?)?;
    let check_out_time = parse_opt_ts(5, row.get("check_out")?)?;

    let ver_str: String = row.get("verification")?;
    let verification =
        ProximityStatus::from_db_str(&ver_str).unwrap_or(ProximityStatus::Unverified);

    Ok(AttendanceSession {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date,
        check_in_time,
        check_out_time,
        work_mode,
        is_checked_in: check_in_time.is_some() && check_out_time.is_none(),
        is_on_break: false,
        verification,
        site_id: row.get("site_id")?,
    })
}

pub fn map_break_row(row: &Row) -> Result<BreakRecord> {
    let kind_str: String = row.get("kind")?;
    let kind = BreakType::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(2, AppError::InvalidBreakType(kind_str.clone())))?;

    let start: String = row.get("start_time")?;

    Ok(BreakRecord {
        id: row.get("id")?,
        kind,
        start_time: parse_ts(3, &start)?,
        end_time: parse_opt_ts(4, row.get("end_time")?)?,
        duration_minutes: row.get("duration_minutes")?,
    })
}

pub fn insert_session(conn: &Connection, s: &AttendanceSession) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sessions (employee_id, date, work_mode, check_in, check_out,
                               verification, site_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            s.employee_id,
            s.date_str(),
            s.work_mode.to_db_str(),
            s.check_in_time.as_ref().map(ts),
            s.check_out_time.as_ref().map(ts),
            s.verification.to_db_str(),
            s.site_id,
            Local::now().to_rfc3339(),
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::InvalidTransition(format!(
                "a session for {} on {} already exists.",
                s.employee_id,
                s.date_str()
            ))
        }
        other => AppError::Db(other),
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn update_session_checkout(conn: &Connection, s: &AttendanceSession) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE sessions SET check_out = ?1 WHERE id = ?2",
        params![s.check_out_time.as_ref().map(ts), s.id],
    )?;
    if changed == 0 {
        return Err(AppError::Other(format!("session {} not found", s.id)));
    }
    Ok(())
}

pub fn insert_break(conn: &Connection, session_id: i64, b: &BreakRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO breaks (session_id, kind, start_time, end_time, duration_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            session_id,
            b.kind.to_db_str(),
            ts(&b.start_time),
            b.end_time.as_ref().map(ts),
            b.duration_minutes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_break_end(conn: &Connection, b: &BreakRecord) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE breaks SET end_time = ?1, duration_minutes = ?2 WHERE id = ?3",
        params![b.end_time.as_ref().map(ts), b.duration_minutes, b.id],
    )?;
    if changed == 0 {
        return Err(AppError::Other(format!("break {} not found", b.id)));
    }
    Ok(())
}

pub fn load_session_by_date(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceSession>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM sessions WHERE employee_id = ?1 AND date = ?2")?;
    let session = stmt
        .query_row(params![employee_id, date_key(date)], map_session_row)
        .optional()?;
    Ok(session)
}

/// Most recent session of `employee_id` still missing its check-out.
pub fn load_open_session(
    conn: &Connection,
    employee_id: &str,
) -> AppResult<Option<AttendanceSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM sessions
         WHERE employee_id = ?1 AND check_out IS NULL
         ORDER BY date DESC, id DESC
         LIMIT 1",
    )?;
    let session = stmt
        .query_row(params![employee_id], map_session_row)
        .optional()?;
    Ok(session)
}

pub fn load_breaks_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<BreakRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM breaks WHERE session_id = ?1 ORDER BY start_time ASC, id ASC",
    )?;
    let rows = stmt.query_map([session_id], map_break_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sessions between `from` and `to` (inclusive), oldest first.
pub fn load_sessions_in_range(
    conn: &Connection,
    employee_id: Option<&str>,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<AttendanceSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM sessions
         WHERE date >= ?1 AND date <= ?2
           AND (?3 IS NULL OR employee_id = ?3)
         ORDER BY date ASC, employee_id ASC",
    )?;
    let rows = stmt.query_map(
        params![date_key(from), date_key(to), employee_id],
        map_session_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_sessions(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?)
}
