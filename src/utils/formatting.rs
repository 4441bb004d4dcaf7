//! Formatting utilities used for CLI and export outputs.

/// Whole hours and minutes, e.g. "4h 30m". Negative values render as zero.
pub fn format_duration(minutes: i64) -> String {
    let m = minutes.max(0);
    format!("{}h {}m", m / 60, m % 60)
}

/// Fixed-width text progress bar, e.g. `[██████░░░░] 56%`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let f = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (f * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        (f * 100.0).round() as i64
    )
}

/// Human distance: meters below 1 km, kilometers with one decimal above.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() {
        return "n/a".to_string();
    }
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
