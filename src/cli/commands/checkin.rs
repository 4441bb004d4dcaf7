use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, provider_from_args};
use crate::errors::{AppError, AppResult};
use crate::models::work_mode::WorkMode;
use crate::utils::time::resolve_instant;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { mode, lat, lon, at } = cmd {
        let mode = mode
            .as_deref()
            .map(|m| WorkMode::from_code(m).ok_or_else(|| AppError::InvalidWorkMode(m.to_string())))
            .transpose()?;
        let provider = provider_from_args(*lat, *lon)?;
        let now = resolve_instant(at.as_ref())?;

        let mut store = open_store(cfg)?;
        AttendanceLogic::check_in(&mut store, cfg, mode, provider, now)?;
    }
    Ok(())
}
