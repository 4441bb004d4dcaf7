#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("rattendance")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write a config file for `name` with one 100 m office at 45.0, 9.0
pub fn setup_test_config(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.conf", name));
    let yaml = r#"employee_id: EMP001
default_work_mode: office
min_work_duration: 8h
break_budget_minutes: 120
location_timeout_secs: 2
offices:
  - id: hq
    name: Headquarters
    address: Via Roma 1, Milano
    location:
      latitude: 45.0
      longitude: 9.0
    radius_meters: 100
"#;
    fs::write(&path, yaml).expect("write config");
    path.to_string_lossy().to_string()
}

/// Base args shared by every command of a test
pub fn base_args<'a>(db: &'a str, cfg: &'a str) -> Vec<&'a str> {
    vec!["--db", db, "--config", cfg]
}

/// Initialize DB and record a full WFH day on 2025-09-01:
/// 09:00 in, lunch 12:30-13:00, 17:30 out
pub fn init_db_with_day(db: &str, cfg: &str) {
    let run = |extra: &[&str]| {
        let mut args = base_args(db, cfg);
        args.extend_from_slice(extra);
        rti().args(&args).assert().success();
    };

    run(&["--test", "init"]);
    run(&["checkin", "--mode", "wfh", "--at", "2025-09-01 09:00"]);
    run(&["break", "start", "--type", "lunch", "--at", "2025-09-01 12:30"]);
    run(&["break", "end", "--at", "2025-09-01 13:00"]);
    run(&["checkout", "--at", "2025-09-01 17:30"]);
}
