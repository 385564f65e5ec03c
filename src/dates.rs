// src/dates.rs
//! Lenient date coercion. Anything that does not read as a calendar date becomes
//! `None`; parsing never fails.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::data_types::CellValue;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

// 9999-12-31 in the 1900 date system
const MAX_SERIAL: f64 = 2_958_465.0;

#[derive(Debug, Clone)]
pub struct DateParser {
    extra_formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        DateParser::new(Vec::new())
    }
}

impl DateParser {
    /// `extra_formats` are tried after the built-in ones, as datetime then as date.
    pub fn new(extra_formats: Vec<String>) -> Self {
        DateParser { extra_formats }
    }

    pub fn parse_cell(&self, cell: &CellValue) -> Option<NaiveDateTime> {
        match cell {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Number(serial) => from_excel_serial(*serial),
            CellValue::Text(text) => self.parse_str(text),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }

    pub fn parse_str(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        // Keep the wall-clock time as written; the offset is dropped
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.naive_local());
        }

        let builtin = DATETIME_FORMATS.iter().copied();
        for format in builtin.chain(self.extra_formats.iter().map(String::as_str)) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(dt);
            }
        }

        let builtin = DATE_FORMATS.iter().copied();
        for format in builtin.chain(self.extra_formats.iter().map(String::as_str)) {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Some(date.and_time(NaiveTime::MIN));
            }
        }

        None
    }

    /// Calendar day of `text`, for date pickers and filters.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        self.parse_str(text).map(|dt| dt.date())
    }
}

/// Converts a spreadsheet serial (days since 1899-12-30, fraction = time of day).
///
/// Serials below 61 are shifted one day to skip the phantom 1900-02-29.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
        return None;
    }

    let days = serial.trunc() as i64;
    let days = if days < 61 { days + 1 } else { days };
    let seconds = ((serial.fract() * 86_400.0).round()) as i64;

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}
