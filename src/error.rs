// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::schema::Field;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// One or more canonical fields have no matching column. The sheet is rejected as a whole.
    #[error("Missing required columns in sheet '{sheet}': {}", field_list(.missing))]
    SchemaMismatch { sheet: String, missing: Vec<Field> },

    #[error("Columns {columns:?} in sheet '{sheet}' all map to '{field}'")]
    DuplicateColumn {
        sheet: String,
        field: Field,
        columns: Vec<String>,
    },

    #[error("Unknown date field: {0}")]
    UnknownDateField(String),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn field_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Workbook(err.to_string())
    }
}
