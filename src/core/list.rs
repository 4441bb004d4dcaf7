use crate::core::summary::summarize;
use crate::db::pool::DbPool;
use crate::db::queries::{load_breaks_for_session, load_sessions_in_range};
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::date::resolve_range;
use crate::utils::formatting::format_duration;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub struct ListLogic;

impl ListLogic {
    /// Table of stored sessions in `period` with per-day totals.
    pub fn render(
        pool: &DbPool,
        employee_id: Option<&str>,
        period: Option<&str>,
        now: NaiveDateTime,
    ) -> AppResult<Option<String>> {
        let (from, to) = resolve_range(period)?;
        let sessions = load_sessions_in_range(&pool.conn, employee_id, &from, &to)?;
        if sessions.is_empty() {
            return Ok(None);
        }

        let mut table = Table::new(vec![
            "Date", "Employee", "Mode", "In", "Out", "Worked", "Breaks", "Location",
        ]);
        let mut total_worked = 0;
        let mut total_breaks = 0;

        for s in &sessions {
            let breaks = load_breaks_for_session(&pool.conn, s.id)?;
            let d = summarize(s, &breaks, now);
            total_worked += d.worked_minutes;
            total_breaks += d.break_minutes;

            table.add_row(vec![
                s.date_str(),
                s.employee_id.clone(),
                s.work_mode.to_db_str().to_string(),
                s.check_in_str(),
                if d.open {
                    "open".to_string()
                } else {
                    s.check_out_str()
                },
                format_duration(d.worked_minutes),
                format!("{} ({})", format_duration(d.break_minutes), d.break_count),
                s.verification.to_db_str().to_string(),
            ]);
        }

        let mut out = table.render();
        out.push_str(&format!(
            "\n{} session(s) | worked {} | breaks {}\n",
            sessions.len(),
            format_duration(total_worked),
            format_duration(total_breaks)
        ));
        Ok(Some(out))
    }

    pub fn print(
        pool: &DbPool,
        employee_id: Option<&str>,
        period: Option<&str>,
        now: NaiveDateTime,
    ) -> AppResult<()> {
        match Self::render(pool, employee_id, period, now)? {
            Some(out) => print!("{}", out),
            None => info("No sessions in the selected period."),
        }
        Ok(())
    }
}
