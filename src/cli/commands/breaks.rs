use crate::cli::commands::open_store;
use crate::cli::parser::{BreakCommand, Commands};
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::errors::{AppError, AppResult};
use crate::models::break_record::BreakType;
use crate::utils::time::resolve_instant;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Break { action } = cmd {
        let mut store = open_store(cfg)?;

        match action {
            BreakCommand::Start { kind, at } => {
                let kind = BreakType::from_db_str(&kind.to_ascii_lowercase())
                    .ok_or_else(|| AppError::InvalidBreakType(kind.clone()))?;
                let now = resolve_instant(at.as_ref())?;
                AttendanceLogic::start_break(&mut store, cfg, kind, now)?;
            }
            BreakCommand::End { at } => {
                let now = resolve_instant(at.as_ref())?;
                AttendanceLogic::end_break(&mut store, cfg, now)?;
            }
        }
    }
    Ok(())
}
