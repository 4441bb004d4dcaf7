use predicates::str::contains;
use rusqlite::Connection;

mod common;
use common::{base_args, init_db_with_day, rti, setup_test_config, setup_test_db};

/// 120 m north of the test office (45.0, 9.0).
const LAT_120M: &str = "45.00107920";
/// 55 m north of the test office.
const LAT_55M: &str = "45.00049463";

fn cmd_args<'a>(db: &'a str, cfg: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = base_args(db, cfg);
    args.extend_from_slice(extra);
    args
}

fn status_json(db: &str, cfg: &str, extra: &[&str]) -> serde_json::Value {
    let mut args = cmd_args(db, cfg, &["status", "--json"]);
    args.extend_from_slice(extra);
    let out = rti().args(&args).output().expect("run status");
    assert!(out.status.success(), "status failed: {:?}", out);
    serde_json::from_slice(&out.stdout).expect("status json")
}

#[test]
fn test_init_creates_schema() {
    let db = setup_test_db("init_creates_schema");
    let cfg = setup_test_config("init_creates_schema");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    let conn = Connection::open(&db).expect("open db");
    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap()
        .query_map([], |r| r.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();

    assert!(tables.contains(&"sessions".to_string()));
    assert!(tables.contains(&"breaks".to_string()));
    assert!(tables.contains(&"log".to_string()));
}

#[test]
fn test_status_after_four_and_a_half_hours() {
    let db = setup_test_db("status_four_half");
    let cfg = setup_test_config("status_four_half");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--mode", "wfh", "--at", "2025-09-01 09:00"],
        ))
        .assert()
        .success()
        .stdout(contains("Checked in at 09:00"));

    let status = status_json(&db, &cfg, &["--at", "2025-09-01 13:30"]);
    assert_eq!(status["is_checked_in"], true);
    assert_eq!(status["current_session_duration"], "4h 30m");
    assert_eq!(status["progress"], 0.5625);
    assert_eq!(status["work_mode"], "wfh");
    assert_eq!(status["proximity"]["status"], "not_required");
}

#[test]
fn test_lunch_break_is_subtracted() {
    let db = setup_test_db("lunch_subtracted");
    let cfg = setup_test_config("lunch_subtracted");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--mode", "wfh", "--at", "2025-09-01 09:00"],
        ))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["break", "start", "--type", "lunch", "--at", "2025-09-01 12:30"],
        ))
        .assert()
        .success()
        .stdout(contains("lunch break started at 12:30"));

    let on_break = status_json(&db, &cfg, &["--at", "2025-09-01 12:45"]);
    assert_eq!(on_break["is_on_break"], true);

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["break", "end", "--at", "2025-09-01 13:00"],
        ))
        .assert()
        .success()
        .stdout(contains("30 min"));

    let status = status_json(&db, &cfg, &["--at", "2025-09-01 14:00"]);
    assert_eq!(status["is_on_break"], false);
    assert_eq!(status["total_work_today"], "4h 30m");
    assert_eq!(status["break_time"], "0h 30m");
}

#[test]
fn test_full_day_is_persisted() {
    let db = setup_test_db("full_day_persisted");
    let cfg = setup_test_config("full_day_persisted");
    init_db_with_day(&db, &cfg);

    let conn = Connection::open(&db).expect("open db");
    let (mode, check_in, check_out, verification): (String, String, String, String) = conn
        .query_row(
            "SELECT work_mode, check_in, check_out, verification FROM sessions
             WHERE employee_id = 'EMP001' AND date = '2025-09-01'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .expect("session row");
    assert_eq!(mode, "wfh");
    assert_eq!(check_in, "2025-09-01 09:00:00");
    assert_eq!(check_out, "2025-09-01 17:30:00");
    assert_eq!(verification, "not_required");

    let (kind, duration): (String, i64) = conn
        .query_row(
            "SELECT kind, duration_minutes FROM breaks",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .expect("break row");
    assert_eq!(kind, "lunch");
    assert_eq!(duration, 30);

    let status = status_json(&db, &cfg, &["--at", "2025-09-01 20:00"]);
    assert_eq!(status["is_checked_in"], false);
    assert_eq!(status["total_work_today"], "8h 0m");
}

#[test]
fn test_checkout_closes_open_break() {
    let db = setup_test_db("checkout_closes_break");
    let cfg = setup_test_config("checkout_closes_break");

    for extra in [
        vec!["--test", "init"],
        vec!["checkin", "--mode", "wfh", "--at", "2025-09-03 09:00"],
        vec!["break", "start", "--type", "tea", "--at", "2025-09-03 16:45"],
    ] {
        rti().args(cmd_args(&db, &cfg, &extra)).assert().success();
    }

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkout", "--at", "2025-09-03 17:00"],
        ))
        .assert()
        .success()
        .stdout(contains("Open break closed at check-out"));

    let conn = Connection::open(&db).expect("open db");
    let (end, duration): (String, i64) = conn
        .query_row("SELECT end_time, duration_minutes FROM breaks", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .expect("break row");
    assert_eq!(end, "2025-09-03 17:00:00");
    assert_eq!(duration, 15);
}

#[test]
fn test_office_checkin_outside_range() {
    let db = setup_test_db("office_outside_range");
    let cfg = setup_test_config("office_outside_range");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &[
                "checkin", "--mode", "office", "--lat", LAT_120M, "--lon", "9.0", "--at",
                "2025-09-02 09:00",
            ],
        ))
        .assert()
        .success()
        .stdout(contains("outside every office radius"))
        .stdout(contains("120 m"));

    let status = status_json(
        &db,
        &cfg,
        &["--at", "2025-09-02 10:00", "--lat", LAT_120M, "--lon", "9.0"],
    );
    assert_eq!(status["proximity"]["status"], "outside_range");
    assert_eq!(status["proximity"]["site"]["id"], "hq");
    let d = status["proximity"]["distance_meters"].as_f64().unwrap();
    assert!((d - 120.0).abs() < 0.5, "distance was {d}");

    let conn = Connection::open(&db).expect("open db");
    let verification: String = conn
        .query_row("SELECT verification FROM sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(verification, "outside_range");
}

#[test]
fn test_office_checkin_verified() {
    let db = setup_test_db("office_verified");
    let cfg = setup_test_config("office_verified");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &[
                "checkin", "--lat", LAT_55M, "--lon", "9.0", "--at", "2025-09-04 08:45",
            ],
        ))
        .assert()
        .success()
        .stdout(contains("verified"))
        .stdout(contains("Headquarters"));

    let conn = Connection::open(&db).expect("open db");
    let (verification, site): (String, String) = conn
        .query_row("SELECT verification, site_id FROM sessions", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(verification, "verified");
    assert_eq!(site, "hq");
}

#[test]
fn test_office_checkin_without_position_is_unverified() {
    let db = setup_test_db("office_unverified");
    let cfg = setup_test_config("office_unverified");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--at", "2025-09-05 09:00"],
        ))
        .assert()
        .success()
        .stdout(contains("Location unverified"));

    let conn = Connection::open(&db).expect("open db");
    let verification: String = conn
        .query_row("SELECT verification FROM sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(verification, "unverified");
}

#[test]
fn test_duplicate_checkin_fails() {
    let db = setup_test_db("duplicate_checkin");
    let cfg = setup_test_config("duplicate_checkin");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--mode", "wfh", "--at", "2025-09-01 09:00"],
        ))
        .assert()
        .success();

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--mode", "wfh", "--at", "2025-09-01 09:05"],
        ))
        .assert()
        .failure()
        .stderr(contains("already checked in since 09:00"));

    let conn = Connection::open(&db).expect("open db");
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn test_invalid_transitions_fail() {
    let db = setup_test_db("invalid_transitions");
    let cfg = setup_test_config("invalid_transitions");

    rti()
        .args(cmd_args(&db, &cfg, &["--test", "init"]))
        .assert()
        .success();

    rti()
        .args(cmd_args(&db, &cfg, &["checkout", "--at", "2025-09-01 17:00"]))
        .assert()
        .failure()
        .stderr(contains("not checked in"));

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["break", "start", "--at", "2025-09-01 10:00"],
        ))
        .assert()
        .failure()
        .stderr(contains("not checked in"));

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--mode", "wfh", "--at", "2025-09-01 09:00"],
        ))
        .assert()
        .success();

    rti()
        .args(cmd_args(&db, &cfg, &["break", "end", "--at", "2025-09-01 10:00"]))
        .assert()
        .failure()
        .stderr(contains("no break in progress"));

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["break", "start", "--type", "nap", "--at", "2025-09-01 10:00"],
        ))
        .assert()
        .failure()
        .stderr(contains("Invalid break type"));
}

#[test]
fn test_invalid_mode_and_coordinates() {
    let db = setup_test_db("invalid_mode_coords");
    let cfg = setup_test_config("invalid_mode_coords");

    rti()
        .args(cmd_args(&db, &cfg, &["checkin", "--mode", "beach"]))
        .assert()
        .failure()
        .stderr(contains("Invalid work mode"));

    rti()
        .args(cmd_args(&db, &cfg, &["checkin", "--lat", "95.0", "--lon", "9.0"]))
        .assert()
        .failure()
        .stderr(contains("Invalid coordinates"));

    rti()
        .args(cmd_args(&db, &cfg, &["checkin", "--lat", "45.0"]))
        .assert()
        .failure()
        .stderr(contains("--lat and --lon must be given together"));
}

#[test]
fn test_list_period() {
    let db = setup_test_db("list_period");
    let cfg = setup_test_config("list_period");
    init_db_with_day(&db, &cfg);

    rti()
        .args(cmd_args(&db, &cfg, &["list", "--period", "2025-09"]))
        .assert()
        .success()
        .stdout(contains("2025-09-01"))
        .stdout(contains("8h 0m"))
        .stdout(contains("0h 30m (1)"))
        .stdout(contains("1 session(s)"));

    rti()
        .args(cmd_args(&db, &cfg, &["list", "--period", "2024"]))
        .assert()
        .success()
        .stdout(contains("No sessions"));
}

#[test]
fn test_log_print_shows_operations() {
    let db = setup_test_db("log_print");
    let cfg = setup_test_config("log_print");
    init_db_with_day(&db, &cfg);

    rti()
        .args(cmd_args(&db, &cfg, &["log", "--print"]))
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("checkin"))
        .stdout(contains("break_start"))
        .stdout(contains("checkout"));
}

#[test]
fn test_offices_with_distance() {
    let db = setup_test_db("offices_distance");
    let cfg = setup_test_config("offices_distance");

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["offices", "--lat", LAT_120M, "--lon", "9.0"],
        ))
        .assert()
        .success()
        .stdout(contains("Headquarters"))
        .stdout(contains("120 m (nearest)"))
        .stdout(contains("no"));
}

#[test]
fn test_config_check_reports_missing_fields() {
    let db = setup_test_db("config_check");
    let mut path = std::env::temp_dir();
    path.push("config_check_partial_rattendance.conf");
    std::fs::write(&path, "employee_id: EMP009\n").unwrap();
    let cfg = path.to_string_lossy().to_string();

    rti()
        .args(cmd_args(&db, &cfg, &["config", "--check"]))
        .assert()
        .success()
        .stdout(contains("Missing fields"))
        .stdout(contains("offices"));

    rti()
        .args(cmd_args(&db, &cfg, &["config", "--migrate"]))
        .assert()
        .success();

    let migrated = std::fs::read_to_string(&path).unwrap();
    assert!(migrated.contains("employee_id: EMP009"));
    assert!(migrated.contains("break_budget_minutes"));
}

#[test]
fn test_overnight_session_checks_out_next_day() {
    let db = setup_test_db("overnight_checkout");
    let cfg = setup_test_config("overnight_checkout");

    for extra in [
        vec!["--test", "init"],
        vec!["checkin", "--mode", "wfh", "--at", "2025-09-01 22:00"],
        vec!["break", "start", "--type", "tea", "--at", "2025-09-01 23:30"],
    ] {
        rti().args(cmd_args(&db, &cfg, &extra)).assert().success();
    }

    let status = status_json(&db, &cfg, &["--at", "2025-09-02 00:10"]);
    assert_eq!(status["is_on_break"], true);
    assert_eq!(status["total_work_today"], "1h 30m");

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["break", "end", "--at", "2025-09-02 00:15"],
        ))
        .assert()
        .success()
        .stdout(contains("45 min"));

    // a new day's check-in is refused while the night session is open
    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkin", "--mode", "wfh", "--at", "2025-09-02 00:30"],
        ))
        .assert()
        .failure()
        .stderr(contains("still open"));

    rti()
        .args(cmd_args(
            &db,
            &cfg,
            &["checkout", "--at", "2025-09-02 01:00"],
        ))
        .assert()
        .success()
        .stdout(contains("Worked 2h 15m today"));

    let conn = Connection::open(&db).expect("open db");
    let (date, check_out): (String, String) = conn
        .query_row("SELECT date, check_out FROM sessions", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(date, "2025-09-01");
    assert_eq!(check_out, "2025-09-02 01:00:00");
}
