use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::errors::AppResult;
use crate::utils::time::resolve_instant;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkout { at } = cmd {
        let now = resolve_instant(at.as_ref())?;
        let mut store = open_store(cfg)?;
        AttendanceLogic::check_out(&mut store, cfg, now)?;
    }
    Ok(())
}
