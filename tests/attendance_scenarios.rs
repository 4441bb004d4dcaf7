//! End-to-end attendance flows through the view model and the SQLite store.

use chrono::{NaiveDate, NaiveDateTime};
use rattendance::core::calculator::distance::distance;
use rattendance::core::location::{FixedLocation, LocationProvider, acquire_reading};
use rattendance::core::store::AttendanceStore;
use rattendance::core::view_model::{Action, AttendanceViewModel, Effect, ViewSettings};
use rattendance::db::initialize::init_db;
use rattendance::db::pool::DbPool;
use rattendance::db::store::SqliteStore;
use rattendance::errors::AppError;
use rattendance::models::break_record::BreakType;
use rattendance::models::geo::{GeoPoint, OfficeSite};
use rattendance::models::status::ProximityStatus;
use rattendance::models::work_mode::WorkMode;
use std::sync::Arc;
use std::time::Duration;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn store() -> SqliteStore {
    let store = SqliteStore::new(DbPool::in_memory().unwrap());
    init_db(&store.pool().conn).unwrap();
    store
}

fn hq() -> OfficeSite {
    OfficeSite {
        id: "hq".into(),
        name: "Headquarters".into(),
        address: "Via Roma 1".into(),
        location: GeoPoint::new(45.0, 9.0),
        radius_meters: 100,
    }
}

fn vm() -> AttendanceViewModel {
    AttendanceViewModel::new("EMP001", vec![hq()], ViewSettings::default())
}

#[test]
fn working_day_survives_reload() {
    let mut store = store();
    let mut vm = vm();

    vm.submit(Action::CheckIn { mode: WorkMode::Wfh }, at(9, 0), &mut store)
        .unwrap();
    vm.submit(
        Action::StartBreak {
            kind: BreakType::Lunch,
        },
        at(12, 30),
        &mut store,
    )
    .unwrap();
    vm.submit(Action::EndBreak, at(13, 0), &mut store).unwrap();

    let status = vm.snapshot(at(14, 0));
    assert_eq!(status.total_work_today, "4h 30m");
    assert_eq!(status.break_time, "0h 30m");

    // a fresh view model restored from the store sees the same day
    let day = store.load_day("EMP001", at(9, 0).date()).unwrap();
    let restored = AttendanceViewModel::from_day("EMP001", vec![hq()], ViewSettings::default(), day);
    assert_eq!(restored.snapshot(at(14, 0)), status);
    assert!(restored.session().unwrap().id > 0);
    assert_eq!(restored.ledger().len(), 1);
}

#[test]
fn check_in_twice_on_same_day_is_rejected() {
    let mut store = store();
    let mut first = vm();
    first
        .submit(Action::CheckIn { mode: WorkMode::Wfh }, at(9, 0), &mut store)
        .unwrap();

    // a second, stale view model that never loaded the day
    let mut stale = vm();
    let err = stale
        .submit(Action::CheckIn { mode: WorkMode::Wfh }, at(9, 5), &mut store)
        .unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));
    assert!(stale.session().is_none());
    assert!(stale.submitting().is_none());
}

#[test]
fn office_check_in_outside_radius() {
    let mut store = store();
    let mut vm = vm();

    // 120 m north of the office
    let here = GeoPoint::new(45.0 + (120.0_f64 / 6_371_000.0).to_degrees(), 9.0);
    let d = distance(here, hq().location);
    assert!((d - 120.0).abs() < 1.0, "distance was {d}");

    let provider: Arc<dyn LocationProvider> = Arc::new(FixedLocation(here));
    let reading = acquire_reading(provider, vm.offices(), Duration::from_secs(2), at(9, 0)).unwrap();
    vm.dispatch(Action::LocationRefreshed(reading), at(9, 0)).unwrap();

    let effect = vm
        .submit(Action::CheckIn { mode: WorkMode::Office }, at(9, 0), &mut store)
        .unwrap();
    assert_eq!(effect, Effect::CheckedIn);

    let status = vm.snapshot(at(9, 30));
    assert_eq!(status.proximity.status, ProximityStatus::OutsideRange);
    assert_eq!(status.proximity.site.as_ref().map(|s| s.id.as_str()), Some("hq"));
    assert_eq!(
        vm.session().map(|s| s.verification),
        Some(ProximityStatus::OutsideRange)
    );
}
