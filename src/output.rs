use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if is_json_output() {
        print_json(items);
    } else {
        println!("{}", table(items.iter().map(to_row)));
    }
}

pub fn table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn print_json<T: Serialize + ?Sized>(item: &T) {
    println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
}

/// Print a message (skipped when quiet, wrapped in an object in JSON mode)
pub fn print_message(message: &str) {
    if QUIET.load(Ordering::Relaxed) {
        return;
    }
    if is_json_output() {
        print_json(&serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

/// Format status with color based on its hex color or state group
pub fn status_colored(status: &str, color: Option<&str>, group: Option<&str>) -> String {
    if let Some(hex) = color {
        if let Ok((r, g, b)) = parse_hex_color(hex) {
            return status.truecolor(r, g, b).to_string();
        }
    }

    match group {
        Some("completed") => status.green().to_string(),
        Some("started") => status.blue().to_string(),
        Some("cancelled") => status.red().to_string(),
        Some("backlog") => status.bright_black().to_string(),
        _ => status.to_string(),
    }
}

fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8), ()> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(());
    }
    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ())?;
    Ok((r, g, b))
}

/// Format a date string as date only
pub fn format_date_only(date: &str) -> String {
    use chrono::{DateTime, NaiveDate, Utc};

    if let Ok(dt) = date.parse::<DateTime<Utc>>() {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(day) = date.parse::<NaiveDate>() {
        day.format("%b %d, %Y").to_string()
    } else {
        date.split('T').next().unwrap_or(date).to_string()
    }
}

/// Date window of a cycle, with placeholders for open ends
pub fn format_window(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.map(format_date_only).unwrap_or_else(|| "?".to_string());
    let end = end.map(format_date_only).unwrap_or_else(|| "?".to_string());
    format!("{start} → {end}")
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Ok((255, 128, 0)));
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
    }

    #[test]
    fn test_format_date_only() {
        assert_eq!(format_date_only("2026-10-01"), "Oct 01, 2026");
        assert_eq!(format_date_only("2026-10-01T08:00:00Z"), "Oct 01, 2026");
        assert_eq!(format_date_only("soon"), "soon");
    }

    #[test]
    fn test_format_window_open_end() {
        assert_eq!(format_window(Some("2026-10-01"), None), "Oct 01, 2026 → ?");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long title", 10), "a rathe...");
    }
}
