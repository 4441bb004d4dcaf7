/// ANSI color helper utilities for terminal output.
use crate::models::status::ProximityStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

pub fn color_for_proximity(status: ProximityStatus) -> &'static str {
    match status {
        ProximityStatus::Verified => GREEN,
        ProximityStatus::OutsideRange => RED,
        ProximityStatus::Unverified => YELLOW,
        ProximityStatus::NotRequired => GREY,
    }
}

/// Break bar turns to warning colour once the soft budget is exceeded.
pub fn color_for_budget(exceeded: bool) -> &'static str {
    if exceeded { YELLOW } else { GREEN }
}

/// Returns formatted grey text when the value is empty or a placeholder.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--:--" || v == "0h 0m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
