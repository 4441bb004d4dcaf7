use serde::{Deserialize, Serialize};

/// Declared work location category for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    Office,
    Wfh,
    ClientSite,
    FieldWork,
}

impl WorkMode {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            WorkMode::Office => "office",
            WorkMode::Wfh => "wfh",
            WorkMode::ClientSite => "client_site",
            WorkMode::FieldWork => "field_work",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "office" => Some(WorkMode::Office),
            "wfh" => Some(WorkMode::Wfh),
            "client_site" => Some(WorkMode::ClientSite),
            "field_work" => Some(WorkMode::FieldWork),
            _ => None,
        }
    }

    /// Helper: accept CLI input in any case, with `-` or `_`, plus short codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "o" => Some(WorkMode::Office),
            "h" | "home" | "remote" => Some(WorkMode::Wfh),
            "c" | "client" => Some(WorkMode::ClientSite),
            "f" | "field" => Some(WorkMode::FieldWork),
            other => Self::from_db_str(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::Office => "Office",
            WorkMode::Wfh => "Work from home",
            WorkMode::ClientSite => "Client site",
            WorkMode::FieldWork => "Field work",
        }
    }

    /// Only office sessions are checked against the office roster.
    pub fn requires_verification(&self) -> bool {
        matches!(self, WorkMode::Office)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_db_strings() {
        assert_eq!(WorkMode::from_code("WFH"), Some(WorkMode::Wfh));
        assert_eq!(WorkMode::from_code("client-site"), Some(WorkMode::ClientSite));
        assert_eq!(WorkMode::from_code("o"), Some(WorkMode::Office));
        assert_eq!(WorkMode::from_code("beach"), None);
        assert_eq!(
            WorkMode::from_db_str(WorkMode::FieldWork.to_db_str()),
            Some(WorkMode::FieldWork)
        );
    }
}
