use crate::core::calculator::break_ledger::DEFAULT_BREAK_BUDGET_MINUTES;
use crate::core::calculator::session_timer::DEFAULT_EXPECTED_MINUTES;
use crate::core::view_model::ViewSettings;
use crate::errors::{AppError, AppResult};
use crate::models::geo::OfficeSite;
use crate::models::work_mode::WorkMode;
use crate::ui::messages::success;
use crate::utils::time::parse_work_duration_to_minutes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_employee_id")]
    pub employee_id: String,
    #[serde(default = "default_work_mode")]
    pub default_work_mode: String,
    #[serde(default = "default_min_work_duration")]
    pub min_work_duration: String,
    #[serde(default = "default_break_budget")]
    pub break_budget_minutes: i64,
    #[serde(default = "default_location_timeout")]
    pub location_timeout_secs: u64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    #[serde(default)]
    pub offices: Vec<OfficeSite>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_employee_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "employee".to_string())
}
fn default_work_mode() -> String {
    WorkMode::Office.to_db_str().to_string()
}
fn default_min_work_duration() -> String {
    "8h".to_string()
}
fn default_break_budget() -> i64 {
    DEFAULT_BREAK_BUDGET_MINUTES
}
fn default_location_timeout() -> u64 {
    10
}
fn default_tick_interval() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            employee_id: default_employee_id(),
            default_work_mode: default_work_mode(),
            min_work_duration: default_min_work_duration(),
            break_budget_minutes: default_break_budget(),
            location_timeout_secs: default_location_timeout(),
            tick_interval_secs: default_tick_interval(),
            offices: Vec::new(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rattendance")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Load the standard config file, or defaults when it does not exist.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the attendance core cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        self.work_mode()?;
        self.expected_minutes()?;

        if self.break_budget_minutes < 0 {
            return Err(AppError::Config(
                "break_budget_minutes must not be negative".into(),
            ));
        }

        for site in &self.offices {
            if !site.location.is_valid() {
                return Err(AppError::Config(format!(
                    "office '{}' has invalid coordinates {}",
                    site.id,
                    site.location.short()
                )));
            }
        }

        let mut ids: Vec<&str> = self.offices.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(dup) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(AppError::Config(format!("duplicate office id '{}'", dup[0])));
        }

        Ok(())
    }

    pub fn work_mode(&self) -> AppResult<WorkMode> {
        WorkMode::from_code(&self.default_work_mode)
            .ok_or_else(|| AppError::InvalidWorkMode(self.default_work_mode.clone()))
    }

    pub fn expected_minutes(&self) -> AppResult<i64> {
        parse_work_duration_to_minutes(&self.min_work_duration).ok_or_else(|| {
            AppError::Config(format!(
                "invalid min_work_duration '{}'",
                self.min_work_duration
            ))
        })
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs.max(1))
    }

    pub fn view_settings(&self) -> AppResult<ViewSettings> {
        Ok(ViewSettings {
            expected_minutes: self.expected_minutes()?,
            break_budget_minutes: self.break_budget_minutes,
            default_mode: self.work_mode()?,
        })
    }

    /// Write the config file (unless `is_test`) and create the DB file.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            fs::write(Self::config_file(), config.to_yaml()?)?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
