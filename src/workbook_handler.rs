// src/workbook_handler.rs
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use crate::data_types::{CellValue, RawSheet};
use crate::dates::DateParser;
use crate::error::{Error, Result};

pub struct WorkbookHandler {}

impl WorkbookHandler {
    pub fn new() -> Self {
        WorkbookHandler {}
    }

    pub async fn sheet_names(&self, path: PathBuf) -> Result<Vec<String>> {
        task::spawn_blocking(move || Self::sheet_names_blocking(&path))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }

    pub async fn read_sheet(&self, path: PathBuf, sheet: String) -> Result<RawSheet> {
        task::spawn_blocking(move || Self::read_sheet_blocking(&path, &sheet))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }

    pub fn sheet_names_blocking(path: &Path) -> Result<Vec<String>> {
        let workbook = open_workbook_auto(path)?;
        Ok(workbook.sheet_names().to_vec())
    }

    /// First row is the header row; everything below it is data.
    pub fn read_sheet_blocking(path: &Path, sheet: &str) -> Result<RawSheet> {
        let mut workbook = open_workbook_auto(path)?;
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(Error::SheetNotFound(sheet.to_string()));
        }

        let range = workbook.worksheet_range(sheet)?;
        let mut rows = range.rows();

        let headers = match rows.next() {
            Some(header) => header.iter().map(|cell| to_cell(cell).to_string()).collect(),
            None => Vec::new(),
        };
        let mut raw = RawSheet::new(sheet, headers);
        for row in rows {
            raw.push_row(row.iter().map(to_cell).collect());
        }

        debug!(path = %path.display(), sheet, rows = raw.rows.len(), "read worksheet");
        Ok(raw)
    }
}

impl Default for WorkbookHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        // calamine knows the workbook's epoch (1900 or 1904)
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Empty,
        },
        Data::DateTime(_) => CellValue::Empty,
        Data::DateTimeIso(s) => match DateParser::default().parse_str(s) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
