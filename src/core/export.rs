use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{load_breaks_for_session, load_sessions_in_range};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::{BreakExport, ExportFormat, SessionExport, csv, json, notify_export_success};
use crate::ui::messages::warning;
use crate::utils::date::resolve_range;
use chrono::NaiveDateTime;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export sessions (or their breaks with `breaks`) in `range`.
    ///
    /// `range`: `None` (current month), `"all"`, `YYYY`, `YYYY-MM`,
    /// `YYYY-MM-DD`, or `start:end` of those.
    #[allow(clippy::too_many_arguments)]
    pub fn export(
        pool: &DbPool,
        employee_id: Option<&str>,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        breaks: bool,
        force: bool,
        now: NaiveDateTime,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output path must be absolute: {}",
                file
            )));
        }
        ensure_writable(path, force)?;

        let (from, to) = resolve_range(range)?;
        let sessions = load_sessions_in_range(&pool.conn, employee_id, &from, &to)?;
        if sessions.is_empty() {
            warning("No sessions in the selected range; writing an empty export.");
        }

        let count = if breaks {
            let mut rows = Vec::new();
            for s in &sessions {
                for b in load_breaks_for_session(&pool.conn, s.id)? {
                    rows.push(BreakExport::from_record(s, &b));
                }
            }
            Self::write(format, path, &rows)?;
            rows.len()
        } else {
            let mut rows = Vec::with_capacity(sessions.len());
            for s in &sessions {
                let b = load_breaks_for_session(&pool.conn, s.id)?;
                rows.push(SessionExport::from_session(s, &b, now));
            }
            Self::write(format, path, &rows)?;
            rows.len()
        };

        let label = if breaks { "Breaks" } else { "Sessions" };
        notify_export_success(&format!("{} {}", label, format.as_str().to_uppercase()), path);
        audit(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} {} row(s) to {}", label, count, path.display()),
        );

        Ok(count)
    }

    fn write<T: serde::Serialize>(format: ExportFormat, path: &Path, rows: &[T]) -> AppResult<()> {
        match format {
            ExportFormat::Csv => csv::write_csv(path, rows),
            ExportFormat::Json => json::write_json(path, rows),
        }
    }
}
