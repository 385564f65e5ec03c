// src/loader.rs
use std::path::PathBuf;

use crate::csv_handler::CSVHandler;
use crate::data_types::{DataSource, RawSheet, Workbook};
use crate::error::{Error, Result};
use crate::workbook_handler::WorkbookHandler;

/// Opens a file and lists the sheets it offers.
pub async fn open_workbook(path: PathBuf) -> Result<Workbook> {
    let source = DataSource::from_path(&path)?;
    let sheet_names = match source {
        DataSource::Csv => vec![CSVHandler::sheet_name(&path)],
        DataSource::Workbook => WorkbookHandler::new().sheet_names(path.clone()).await?,
    };

    Ok(Workbook {
        path,
        source,
        sheet_names,
    })
}

pub async fn load_sheet(workbook: &Workbook, sheet: &str) -> Result<RawSheet> {
    match workbook.source {
        DataSource::Csv => {
            if !workbook.sheet_names.iter().any(|name| name == sheet) {
                return Err(Error::SheetNotFound(sheet.to_string()));
            }
            CSVHandler::new().read_csv(workbook.path.clone()).await
        }
        DataSource::Workbook => {
            WorkbookHandler::new()
                .read_sheet(workbook.path.clone(), sheet.to_string())
                .await
        }
    }
}
