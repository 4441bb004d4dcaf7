//! Config file maintenance: report and fill in fields added by newer versions.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Top-level keys every config file should carry.
const EXPECTED_KEYS: &[&str] = &[
    "database",
    "employee_id",
    "default_work_mode",
    "min_work_duration",
    "break_budget_minutes",
    "location_timeout_secs",
    "tick_interval_secs",
    "offices",
];

fn read_mapping(content: &str) -> AppResult<Mapping> {
    let value: Value = serde_yaml::from_str(content)?;
    match value {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config("configuration root is not a mapping".into())),
    }
}

/// Keys missing from the YAML text.
pub fn missing_fields(content: &str) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(content)?;
    Ok(EXPECTED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add missing keys with their default values, keeping everything else.
/// Returns the keys that were added.
pub fn fill_missing_fields(content: &str) -> AppResult<(String, Vec<&'static str>)> {
    let mut map = read_mapping(content)?;
    let defaults = match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => m,
        _ => return Err(AppError::Config("default configuration is not a mapping".into())),
    };

    let mut added = Vec::new();
    for key in EXPECTED_KEYS {
        let k = Value::String((*key).to_string());
        if !map.contains_key(&k)
            && let Some(v) = defaults.get(&k)
        {
            map.insert(k, v.clone());
            added.push(*key);
        }
    }

    Ok((serde_yaml::to_string(&Value::Mapping(map))?, added))
}

/// Rewrite the config file at `path` when fields are missing.
pub fn migrate_file(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = fs::read_to_string(path)?;
    let (updated, added) = fill_missing_fields(&content)?;
    if !added.is_empty() {
        // make sure the result still loads before replacing the file
        Config::from_yaml(&updated)?;
        fs::write(path, updated)?;
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_and_fills_missing_keys() {
        let content = "employee_id: EMP7\nbreak_budget_minutes: 90\n";
        let missing = missing_fields(content).unwrap();
        assert!(missing.contains(&"offices"));
        assert!(!missing.contains(&"employee_id"));

        let (updated, added) = fill_missing_fields(content).unwrap();
        assert_eq!(added.len(), missing.len());
        let cfg = Config::from_yaml(&updated).unwrap();
        assert_eq!(cfg.employee_id, "EMP7");
        assert_eq!(cfg.break_budget_minutes, 90);
        assert!(missing_fields(&updated).unwrap().is_empty());
    }
}
