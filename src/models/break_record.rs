use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    Lunch,
    Tea,
    Meeting,
    Personal,
    General,
}

impl BreakType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BreakType::Lunch => "lunch",
            BreakType::Tea => "tea",
            BreakType::Meeting => "meeting",
            BreakType::Personal => "personal",
            BreakType::General => "general",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lunch" => Some(BreakType::Lunch),
            "tea" | "coffee" => Some(BreakType::Tea),
            "meeting" => Some(BreakType::Meeting),
            "personal" => Some(BreakType::Personal),
            "general" => Some(BreakType::General),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BreakType::Lunch => "🍽️",
            BreakType::Tea => "☕",
            BreakType::Meeting => "👥",
            BreakType::Personal => "🚶",
            BreakType::General => "⏸️",
        }
    }
}

/// One break inside a session. Open while `end_time` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakRecord {
    pub id: i64,
    pub kind: BreakType,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
}

impl BreakRecord {
    pub fn open(kind: BreakType, start_time: NaiveDateTime) -> Self {
        Self {
            id: 0,
            kind,
            start_time,
            end_time: None,
            duration_minutes: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn start_str(&self) -> String {
        self.start_time.format("%H:%M").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }
}
