//! High-level attendance operations behind the CLI commands.

use crate::config::Config;
use crate::core::location::{
    FixedLocation, LocationError, LocationProvider, NoLocation, acquire_reading,
};
use crate::core::store::AttendanceStore;
use crate::core::ticker::Ticker;
use crate::core::view_model::{Action, AttendanceViewModel, Effect};
use crate::errors::{AppError, AppResult};
use crate::models::break_record::BreakType;
use crate::models::geo::GeoPoint;
use crate::models::status::{AttendanceStatus, ProximityStatus};
use crate::models::work_mode::WorkMode;
use crate::ui::messages::{info, success, warning};
use crate::ui::status::{proximity_line, render_status};
use crate::utils::formatting::format_distance;
use crate::utils::time;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Location source for the `--lat/--lon` pair of a command.
pub fn provider_from_args(
    lat: Option<f64>,
    lon: Option<f64>,
) -> AppResult<Option<Arc<dyn LocationProvider>>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let p = GeoPoint::new(lat, lon);
            if !p.is_valid() {
                return Err(AppError::InvalidCoordinates(format!("{lat}, {lon}")));
            }
            let provider: Arc<dyn LocationProvider> = Arc::new(FixedLocation(p));
            Ok(Some(provider))
        }
        (None, None) => Ok(None),
        _ => Err(AppError::InvalidCoordinates(
            "--lat and --lon must be given together".into(),
        )),
    }
}

pub struct AttendanceLogic;

impl AttendanceLogic {
    /// View model restored from the store: the session still open, even
    /// when it started on an earlier day, otherwise the one of `date`.
    pub fn open_view_model(
        store: &mut dyn AttendanceStore,
        cfg: &Config,
        date: NaiveDate,
    ) -> AppResult<AttendanceViewModel> {
        let day = match store.load_open_day(&cfg.employee_id)? {
            Some(open) => Some(open),
            None => store.load_day(&cfg.employee_id, date)?,
        };
        Ok(AttendanceViewModel::from_day(
            &cfg.employee_id,
            cfg.offices.clone(),
            cfg.view_settings()?,
            day,
        ))
    }

    /// Query the provider and feed the outcome to the view model. A failed
    /// query is reported and leaves the status `unverified`.
    pub fn refresh_location(
        vm: &mut AttendanceViewModel,
        provider: Arc<dyn LocationProvider>,
        cfg: &Config,
        now: NaiveDateTime,
    ) -> AppResult<()> {
        match acquire_reading(provider, vm.offices(), cfg.location_timeout(), now) {
            Ok(reading) => vm.dispatch(Action::LocationRefreshed(reading), now),
            Err((e, _)) => {
                warning(format!("Location unavailable: {}", e));
                vm.dispatch(Action::LocationFailed(e), now)
            }
        }
    }

    fn refresh_or_mark_missing(
        vm: &mut AttendanceViewModel,
        provider: Option<Arc<dyn LocationProvider>>,
        cfg: &Config,
        now: NaiveDateTime,
        mode: WorkMode,
    ) -> AppResult<()> {
        match provider {
            Some(p) => Self::refresh_location(vm, p, cfg, now),
            // no position source at all: only worth a warning when it matters
            None if mode.requires_verification() => {
                let missing = Arc::new(NoLocation(LocationError::Unavailable(
                    "no position source".into(),
                )));
                Self::refresh_location(vm, missing, cfg, now)
            }
            None => Ok(()),
        }
    }

    pub fn check_in(
        store: &mut dyn AttendanceStore,
        cfg: &Config,
        mode: Option<WorkMode>,
        provider: Option<Arc<dyn LocationProvider>>,
        now: NaiveDateTime,
    ) -> AppResult<AttendanceStatus> {
        let mode = match mode {
            Some(m) => m,
            None => cfg.work_mode()?,
        };

        let mut vm = Self::open_view_model(store, cfg, now.date())?;
        Self::refresh_or_mark_missing(&mut vm, provider, cfg, now, mode)?;

        vm.submit(Action::CheckIn { mode }, now, store)?;
        let status = vm.snapshot(now);

        success(format!(
            "Checked in at {} on {} ({}).",
            now.format("%H:%M"),
            now.date(),
            mode.label()
        ));
        Self::report_proximity(&status);

        Ok(status)
    }

    pub fn check_out(
        store: &mut dyn AttendanceStore,
        cfg: &Config,
        now: NaiveDateTime,
    ) -> AppResult<AttendanceStatus> {
        let mut vm = Self::open_view_model(store, cfg, now.date())?;
        let effect = vm.submit(Action::CheckOut, now, store)?;

        if let Effect::CheckedOut {
            closed_break: Some(_),
        } = effect
        {
            info("Open break closed at check-out.");
        }

        let status = vm.snapshot(now);
        success(format!(
            "Checked out at {}. Worked {} today, breaks {}.",
            now.format("%H:%M"),
            status.total_work_today,
            status.break_time
        ));
        Ok(status)
    }

    pub fn start_break(
        store: &mut dyn AttendanceStore,
        cfg: &Config,
        kind: BreakType,
        now: NaiveDateTime,
    ) -> AppResult<AttendanceStatus> {
        let mut vm = Self::open_view_model(store, cfg, now.date())?;
        vm.submit(Action::StartBreak { kind }, now, store)?;

        let status = vm.snapshot(now);
        success(format!(
            "{} {} break started at {}.",
            kind.icon(),
            kind.to_db_str(),
            now.format("%H:%M")
        ));
        if status.break_budget.exceeded() {
            warning(format!(
                "Daily break budget of {} minutes already used up.",
                status.break_budget.budget_minutes
            ));
        }
        Ok(status)
    }

    pub fn end_break(
        store: &mut dyn AttendanceStore,
        cfg: &Config,
        now: NaiveDateTime,
    ) -> AppResult<AttendanceStatus> {
        let mut vm = Self::open_view_model(store, cfg, now.date())?;
        vm.submit(Action::EndBreak, now, store)?;

        let status = vm.snapshot(now);
        let last = vm.ledger().records().iter().rev().find(|r| !r.is_open());
        if let Some(b) = last {
            success(format!(
                "Break ended at {} ({} min). Breaks today: {}.",
                now.format("%H:%M"),
                b.duration_minutes.unwrap_or(0),
                status.break_time
            ));
        }
        if status.break_budget.exceeded() {
            warning(format!(
                "Break budget exceeded: {} of {} minutes.",
                status.break_budget.used_minutes, status.break_budget.budget_minutes
            ));
        }
        Ok(status)
    }

    /// Snapshot for `now`, optionally after a location refresh.
    pub fn status(
        store: &mut dyn AttendanceStore,
        cfg: &Config,
        provider: Option<Arc<dyn LocationProvider>>,
        now: NaiveDateTime,
    ) -> AppResult<(AttendanceViewModel, AttendanceStatus)> {
        let mut vm = Self::open_view_model(store, cfg, now.date())?;
        if let Some(p) = provider {
            Self::refresh_location(&mut vm, p, cfg, now)?;
        }
        let status = vm.snapshot(now);
        Ok((vm, status))
    }

    /// Re-render the status on every tick until `count` renders are done or
    /// the session is closed.
    pub fn watch(
        mut vm: AttendanceViewModel,
        interval_secs: u64,
        count: Option<u32>,
    ) -> AppResult<()> {
        let mut ticker = Ticker::new(
            chrono::Duration::seconds(interval_secs.max(1) as i64),
            time::now(),
        );
        let mut rendered = 0u32;

        loop {
            let now = time::now();
            if ticker.advance(now) {
                vm.dispatch(Action::Tick, now)?;
                let status = vm.snapshot(now);
                println!("── {} ──", now.format("%H:%M:%S"));
                print!("{}", render_status(&status, vm.ledger()));
                rendered += 1;

                if count.is_some_and(|c| rendered >= c) || !status.is_checked_in {
                    break;
                }
            }

            match ticker.until_next(time::now()).and_then(|d| d.to_std().ok()) {
                Some(wait) => std::thread::sleep(wait),
                None => break,
            }
        }

        ticker.cancel();
        Ok(())
    }

    fn report_proximity(status: &AttendanceStatus) {
        match status.proximity.status {
            ProximityStatus::Verified => success(format!("Location {}", proximity_line(status))),
            ProximityStatus::OutsideRange => warning(format!(
                "Location outside every office radius{}",
                status
                    .proximity
                    .distance_meters
                    .map(|d| format!(" (nearest {})", format_distance(d)))
                    .unwrap_or_default()
            )),
            ProximityStatus::Unverified => warning(
                "Location unverified. Pass --lat/--lon to enter your position manually.",
            ),
            ProximityStatus::NotRequired => {}
        }
    }
}
