// src/lib.rs
//! Outreach status reporting over contact spreadsheets.
//!
//! A sheet is read into a [`RawSheet`], its headers are matched against the
//! six-column outreach schema, and every row is turned into an
//! [`OutreachRecord`] carrying its last interaction and reminder count. Views
//! and the summary are recomputed from that table on demand.

pub mod config;
pub mod csv_handler;
pub mod data_types;
pub mod dates;
pub mod error;
pub mod filters;
pub mod interaction;
pub mod loader;
pub mod report;
pub mod schema;
pub mod summary;
pub mod table;
pub mod workbook_handler;

pub use config::Settings;
pub use data_types::{CellValue, DataSource, RawSheet, SheetRequest, TableData, Workbook};
pub use error::{Error, Result};
pub use filters::{by_exact_date, by_reminder_presence, FilterResult};
pub use schema::{DateField, Field};
pub use summary::Summary;
pub use table::{process_sheet, process_sheet_with, OutreachRecord, OutreachTable};
