//! Module for handling date parsing and formatting.

use chrono::{Duration, NaiveDate};

use crate::config::DateFormatConfig;
use crate::models::table::CellValue;

/// Serial day numbers beyond this are not plausible spreadsheet dates (9999-12-31)
const MAX_SERIAL_DATE: f64 = 2_958_465.0;

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    // Exporters often append a midnight time component
    let s = s.split_whitespace().next().filter(|first| first.len() >= 8).unwrap_or(s);

    // Try all the provided formats
    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // If enabled, try to detect the format based on string patterns
    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // Check for ISO-like format with dashes (YYYY-MM-DD)
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d");
    }

    // Check for slashes
    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                if let Ok(first_num) = parts[0].parse::<u8>() {
                    if first_num > 12 {
                        return Some("%d/%m/%Y");
                    }
                    return Some("%m/%d/%Y");
                }
            }
        }
    }

    // Check for dots (DD.MM.YYYY)
    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    // Check for compact format (YYYYMMDD)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d");
    }

    None
}

/// Convert a spreadsheet serial day number (1900 date system) to a date
#[must_use]
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_SERIAL_DATE).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Interpret a cell as a date
///
/// Date cells are taken as-is, text is parsed with the configured formats, and
/// numbers are read as compact `YYYYMMDD` or spreadsheet serial dates.
#[must_use]
pub fn cell_to_date(cell: &CellValue, config: &DateFormatConfig) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Text(text) => parse_date_string(text, config),
        CellValue::Number(n) if config.accept_serial_dates && n.fract() == 0.0 => {
            if *n >= 10_000_101.0 {
                NaiveDate::parse_from_str(&format!("{n:.0}"), "%Y%m%d").ok()
            } else {
                serial_to_date(*n)
            }
        }
        _ => None,
    }
}

/// Format the date carried by a cell for keys and display
///
/// Cells that are not dates fall back to their trimmed text so that rows keyed
/// by free-text periods still align across sheets.
#[must_use]
pub fn cell_to_date_string(cell: &CellValue, config: &DateFormatConfig) -> Option<String> {
    match cell_to_date(cell, config) {
        Some(date) => Some(date.format(&config.default_format).to_string()),
        None => cell.as_text(),
    }
}
