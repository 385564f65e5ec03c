// src/data_types.rs
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Csv,
    Workbook,
}

impl DataSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(DataSource::Csv),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(DataSource::Workbook),
            _ => Err(Error::UnsupportedFile(path.to_path_buf())),
        }
    }
}

/// An untyped spreadsheet cell as it arrives from a reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // Whole numbers come out of workbooks as floats
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

/// One sheet exactly as read: header row plus data rows, nothing derived yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        RawSheet {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding it to the header width. Rows with no content at all
    /// are dropped; whitespace counts as content.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        if row.iter().all(CellValue::is_blank) {
            return;
        }
        if row.len() < self.headers.len() {
            row.resize(self.headers.len(), CellValue::Empty);
        }
        self.rows.push(row);
    }
}

/// A loaded file: where it came from and which sheets it offers.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub path: PathBuf,
    pub source: DataSource,
    pub sheet_names: Vec<String>,
}

/// The file and sheet a load was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub path: PathBuf,
    pub sheet: String,
}

impl SheetRequest {
    pub fn new(workbook: &Workbook, sheet: impl Into<String>) -> Self {
        SheetRequest {
            path: workbook.path.clone(),
            sheet: sheet.into(),
        }
    }

    /// Loads finish in any order; only the answer to the latest selection counts.
    pub fn is_current(&self, workbook: Option<&Workbook>, selected: Option<&str>) -> bool {
        workbook.is_some_and(|wb| wb.path == self.path) && selected == Some(self.sheet.as_str())
    }
}

/// Display-ready rows of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn with_headers(headers: &[&str]) -> Self {
        TableData {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_source_from_extension() {
        assert_eq!(DataSource::from_path(Path::new("a/list.CSV")).unwrap(), DataSource::Csv);
        assert_eq!(
            DataSource::from_path(Path::new("outreach.xlsx")).unwrap(),
            DataSource::Workbook
        );
        assert!(matches!(
            DataSource::from_path(Path::new("notes.txt")),
            Err(Error::UnsupportedFile(_))
        ));
    }

    #[test]
    fn push_row_pads_and_skips_empty_rows() {
        let mut sheet = RawSheet::new("Sheet1", vec!["a".into(), "b".into(), "c".into()]);
        sheet.push_row(vec![CellValue::Text(String::new()), CellValue::Empty]);
        sheet.push_row(vec![CellValue::Text("x".into())]);

        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].len(), 3);
        assert_eq!(sheet.rows[0][2], CellValue::Empty);
    }

    #[test]
    fn whitespace_only_rows_are_kept() {
        let mut sheet = RawSheet::new("Sheet1", vec!["a".into(), "b".into()]);
        sheet.push_row(vec![CellValue::Text("  ".into()), CellValue::Empty]);
        assert_eq!(sheet.rows.len(), 1);
    }

    fn workbook(path: &str, sheets: &[&str]) -> Workbook {
        Workbook {
            path: PathBuf::from(path),
            source: DataSource::Workbook,
            sheet_names: sheets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn late_answer_for_previous_sheet_is_stale() {
        let wb = workbook("leads.xlsx", &["A", "B"]);
        let for_a = SheetRequest::new(&wb, "A");
        let for_b = SheetRequest::new(&wb, "B");

        // user picked A, then B
        assert!(!for_a.is_current(Some(&wb), Some("B")));
        assert!(for_b.is_current(Some(&wb), Some("B")));
    }

    #[test]
    fn answer_for_previous_file_is_stale() {
        let old = workbook("old.xlsx", &["A"]);
        let new = workbook("new.xlsx", &["A"]);
        let request = SheetRequest::new(&old, "A");

        assert!(!request.is_current(Some(&new), Some("A")));
        assert!(!request.is_current(None, Some("A")));
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
