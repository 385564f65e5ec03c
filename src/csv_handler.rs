// src/csv_handler.rs
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use crate::data_types::{CellValue, RawSheet};
use crate::error::{Error, Result};

pub struct CSVHandler {}

impl CSVHandler {
    pub fn new() -> Self {
        CSVHandler {}
    }

    pub async fn read_csv(&self, path: PathBuf) -> Result<RawSheet> {
        task::spawn_blocking(move || Self::read_csv_blocking(&path))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }

    /// A CSV file is a single sheet named after the file stem.
    pub fn sheet_name(path: &Path) -> String {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Sheet1")
            .to_string()
    }

    pub fn read_csv_blocking(path: &Path) -> Result<RawSheet> {
        // First check if file uses comma or semicolon as delimiter
        let delimiter = Self::detect_delimiter(path)?;
        let file = File::open(path)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut sheet = RawSheet::new(Self::sheet_name(path), headers);

        for result in reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            sheet.push_row(row);
        }

        debug!(path = %path.display(), rows = sheet.rows.len(), "read csv");
        Ok(sheet)
    }

    fn detect_delimiter(path: &Path) -> Result<char> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut first_line = String::new();
        reader.read_line(&mut first_line)?;

        if first_line.contains(';') {
            return Ok(';');
        }
        Ok(',')
    }
}

impl Default for CSVHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_semicolon_files_and_skips_empty_rows() {
        let file = write_csv("Website;Email\na.com;x@a.com\n;\nb.com;\n");
        let sheet = CSVHandler::read_csv_blocking(file.path()).unwrap();

        assert_eq!(sheet.headers, vec!["Website", "Email"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1], vec![CellValue::Text("b.com".into()), CellValue::Empty]);
    }

    #[test]
    fn whitespace_rows_still_count_as_contacts() {
        let file = write_csv("Website,Email\na.com,x@a.com\n  , \n");
        let sheet = CSVHandler::read_csv_blocking(file.path()).unwrap();

        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1][0], CellValue::Text("  ".into()));
    }

    #[test]
    fn short_rows_are_padded() {
        let file = write_csv("a,b,c\n1\n");
        let sheet = CSVHandler::read_csv_blocking(file.path()).unwrap();
        assert_eq!(sheet.rows[0].len(), 3);
    }

    #[test]
    fn sheet_is_named_after_file() {
        assert_eq!(CSVHandler::sheet_name(Path::new("/tmp/march_leads.csv")), "march_leads");
    }
}
