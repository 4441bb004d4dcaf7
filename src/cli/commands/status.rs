use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, provider_from_args};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::ui::status::render_status;
use crate::utils::time::resolve_instant;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status {
        lat,
        lon,
        at,
        json,
        watch,
        interval,
        count,
    } = cmd
    {
        let provider = provider_from_args(*lat, *lon)?;
        let now = resolve_instant(at.as_ref())?;

        let mut store = open_store(cfg)?;
        let (vm, status) = AttendanceLogic::status(&mut store, cfg, provider, now)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        if *watch {
            let secs = interval.unwrap_or(cfg.tick_interval_secs);
            return AttendanceLogic::watch(vm, secs, *count);
        }

        header(format!("Attendance for {} on {}", cfg.employee_id, now.date()));
        print!("{}", render_status(&status, vm.ledger()));
    }
    Ok(())
}
