use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Prepare a connection for the attendance journal: foreign keys on, so
/// breaks go away with their session, and every migration applied.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    run_pending_migrations(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent_and_cascades() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();

        conn.execute(
            "INSERT INTO sessions (employee_id, date, check_in, created_at)
             VALUES ('e', '2025-09-01', '2025-09-01 09:00:00', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO breaks (session_id, kind, start_time) VALUES (1, 'tea', '2025-09-01 10:00:00')",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM sessions", []).unwrap();

        let left: i64 = conn
            .query_row("SELECT COUNT(*) FROM breaks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(left, 0);
    }
}
