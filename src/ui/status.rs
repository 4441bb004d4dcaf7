//! Terminal rendering of the attendance status snapshot.

use crate::core::calculator::break_ledger::BreakLedger;
use crate::models::status::{AttendanceStatus, ProximityStatus};
use crate::utils::colors::{
    CYAN, GREY, RESET, color_for_budget, color_for_proximity, colorize_optional,
};
use crate::utils::formatting::{format_distance, progress_bar};

const BAR_WIDTH: usize = 24;

fn hhmm(t: Option<chrono::NaiveDateTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn proximity_line(status: &AttendanceStatus) -> String {
    let p = &status.proximity;
    let color = color_for_proximity(p.status);
    let label = p.status.to_db_str();

    let detail = match (p.status, &p.site, p.distance_meters) {
        (ProximityStatus::Verified, Some(site), Some(d)) => {
            format!(" at {} ({} from site)", site.name, format_distance(d))
        }
        (ProximityStatus::OutsideRange, Some(site), Some(d)) => format!(
            " nearest {} is {} away (radius {} m)",
            site.name,
            format_distance(d),
            site.radius_meters
        ),
        (ProximityStatus::Unverified, _, _) => {
            " (no usable position; pass --lat/--lon to enter it)".to_string()
        }
        _ => String::new(),
    };

    format!("{color}{label}{RESET}{detail}")
}

/// Multi-line status block, the CLI counterpart of the attendance card.
pub fn render_status(status: &AttendanceStatus, ledger: &BreakLedger) -> String {
    let mut out = String::new();

    let state = if status.is_on_break {
        "on break"
    } else if status.is_checked_in {
        "checked in"
    } else if status.check_out_time.is_some() {
        "checked out"
    } else {
        "not checked in"
    };

    out.push_str(&format!("{CYAN}• Status:{RESET}    {state}\n"));
    out.push_str(&format!(
        "{CYAN}• Work mode:{RESET} {}\n",
        status.work_mode.label()
    ));
    out.push_str(&format!(
        "{CYAN}• In / Out:{RESET}  {} → {}\n",
        colorize_optional(&hhmm(status.check_in_time)),
        colorize_optional(&hhmm(status.check_out_time))
    ));
    out.push_str(&format!(
        "{CYAN}• Session:{RESET}   {}\n",
        colorize_optional(&status.current_session_duration)
    ));
    out.push_str(&format!(
        "{CYAN}• Worked:{RESET}    {} {}\n",
        status.total_work_today,
        progress_bar(status.progress, BAR_WIDTH)
    ));

    let budget = &status.break_budget;
    let bcolor = color_for_budget(budget.exceeded());
    out.push_str(&format!(
        "{CYAN}• Breaks:{RESET}    {} of {}m {bcolor}{}{RESET}{}\n",
        status.break_time,
        budget.budget_minutes,
        progress_bar(budget.fraction(), BAR_WIDTH),
        if budget.exceeded() {
            " over budget"
        } else {
            ""
        }
    ));

    if let Some(loc) = &status.location {
        let addr = if loc.address.is_empty() {
            format!("{GREY}unknown{RESET}")
        } else {
            loc.address.clone()
        };
        out.push_str(&format!(
            "{CYAN}• Location:{RESET}  {} (at {})\n",
            addr,
            loc.captured_at.format("%H:%M")
        ));
    }
    out.push_str(&format!(
        "{CYAN}• Verified:{RESET}  {}\n",
        proximity_line(status)
    ));

    if !ledger.is_empty() {
        out.push_str(&format!("{CYAN}• Break history:{RESET}\n"));
        for b in ledger.most_recent_first() {
            let dur = match b.duration_minutes {
                Some(d) if !b.is_open() => format!("{d} min"),
                _ => "ongoing".to_string(),
            };
            out.push_str(&format!(
                "    {} {:<9} {} → {}  {}\n",
                b.kind.icon(),
                b.kind.to_db_str(),
                b.start_str(),
                b.end_str(),
                dur
            ));
        }
    }

    out
}
