use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::list::ListLogic;
use crate::errors::AppResult;
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period } = cmd {
        let store = open_store(cfg)?;
        ListLogic::print(
            store.pool(),
            Some(cfg.employee_id.as_str()),
            period.as_deref(),
            time::now(),
        )?;
    }
    Ok(())
}
