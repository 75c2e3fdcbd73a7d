/// Readout as shown above the keypad, e.g. `1h 02m 03s`.
pub fn format_entry(hours: u32, minutes: u32, seconds: Option<u32>) -> String {
    match seconds {
        Some(secs) => format!("{}h {:02}m {:02}s", hours, minutes, secs),
        None => format!("{}h {:02}m", hours, minutes),
    }
}

/// Compact rendering of a total, dropping leading zero units.
pub fn format_total(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
