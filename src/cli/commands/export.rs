use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::errors::AppResult;
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        breaks,
        force,
    } = cmd
    {
        let store = open_store(cfg)?;
        ExportLogic::export(
            store.pool(),
            Some(cfg.employee_id.as_str()),
            *format,
            file,
            range.as_deref(),
            *breaks,
            *force,
            time::now(),
        )?;
    }
    Ok(())
}
