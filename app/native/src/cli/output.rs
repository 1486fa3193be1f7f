//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - Tables for structured data display
//! - Pretty JSON for `--json`

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::tiling::WindowReport;

/// Longest title shown in the window table.
const MAX_TITLE_CHARS: usize = 48;

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Tiled")]
    tiled: String,
}

/// Renders the window listing as a table.
#[must_use]
pub fn window_table(reports: &[WindowReport]) -> String {
    let rows: Vec<WindowRow> = reports
        .iter()
        .map(|report| WindowRow {
            id: format!("0x{:08x}", report.window),
            title: truncate(&report.title, MAX_TITLE_CHARS),
            zone: if report.tiled {
                report.zone.green().to_string()
            } else {
                report.zone.yellow().to_string()
            },
            position: format!("{}, {}", report.rect.x, report.rect.y),
            size: format!("{}x{}", report.rect.width, report.rect.height),
            tiled: format_bool(report.tiled),
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
        .with(Modify::new(Columns::new(5..6)).with(Alignment::center()))
        .to_string()
}

/// Prints the window listing, or a placeholder when it is empty.
pub fn print_window_table(reports: &[WindowReport]) {
    if reports.is_empty() {
        println!("{}", "No windows on this desktop.".dimmed());
        return;
    }

    println!("{}", format!("Windows ({})", reports.len()).bold());
    println!("{}", window_table(reports));
}

/// Prints a value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// This function correctly handles multi-byte UTF-8 characters by counting
/// characters rather than bytes.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        // Find the byte index of the (max_chars - 1)th character
        let truncate_at = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..truncate_at])
    }
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
