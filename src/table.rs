// src/table.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::data_types::{CellValue, RawSheet};
use crate::dates::DateParser;
use crate::error::Result;
use crate::interaction::{count_reminders, resolve_last_interaction, OutreachDates};
use crate::schema::{map_headers, DateField, Field, HeaderMap};

/// One contact with its derived outreach status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutreachRecord {
    pub website: String,
    pub email: String,
    pub first_email_date: Option<NaiveDateTime>,
    pub reminder1: Option<NaiveDateTime>,
    pub reminder2: Option<NaiveDateTime>,
    pub reminder3: Option<NaiveDateTime>,
    pub last_interaction_type: DateField,
    pub last_interaction_date: Option<NaiveDateTime>,
    pub total_reminders_sent: u8,
}

impl OutreachRecord {
    pub fn from_dates(website: String, email: String, dates: OutreachDates) -> Self {
        let (last_interaction_type, last_interaction_date) = resolve_last_interaction(&dates);
        OutreachRecord {
            website,
            email,
            first_email_date: dates.first_email,
            reminder1: dates.reminder1,
            reminder2: dates.reminder2,
            reminder3: dates.reminder3,
            last_interaction_type,
            last_interaction_date,
            total_reminders_sent: count_reminders(&dates),
        }
    }

    pub fn date(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::FirstEmailDate => self.first_email_date,
            DateField::Reminder1 => self.reminder1,
            DateField::Reminder2 => self.reminder2,
            DateField::Reminder3 => self.reminder3,
        }
    }

    pub fn has_no_reminders(&self) -> bool {
        self.total_reminders_sent == 0
    }
}

/// Every contact of one sheet, in sheet row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutreachTable {
    pub records: Vec<OutreachRecord>,
}

impl OutreachTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutreachRecord> {
        self.records.iter()
    }

    /// Contacts that never got a reminder.
    pub fn without_reminders(&self) -> OutreachTable {
        self.iter()
            .filter(|record| record.has_no_reminders())
            .cloned()
            .collect()
    }
}

impl FromIterator<OutreachRecord> for OutreachTable {
    fn from_iter<I: IntoIterator<Item = OutreachRecord>>(iter: I) -> Self {
        OutreachTable {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OutreachTable {
    type Item = &'a OutreachRecord;
    type IntoIter = std::slice::Iter<'a, OutreachRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub fn process_sheet(sheet: &RawSheet) -> Result<OutreachTable> {
    process_sheet_with(sheet, &DateParser::default())
}

/// Builds the full table for a sheet, or nothing if its headers do not fit the schema.
pub fn process_sheet_with(sheet: &RawSheet, parser: &DateParser) -> Result<OutreachTable> {
    let map = map_headers(&sheet.name, &sheet.headers).inspect_err(|err| {
        warn!(sheet = %sheet.name, error = %err, "sheet rejected");
    })?;

    let table: OutreachTable = sheet
        .rows
        .iter()
        .map(|row| derive_record(row, &map, parser))
        .collect();

    info!(
        sheet = %sheet.name,
        contacts = table.len(),
        without_reminders = table.iter().filter(|r| r.has_no_reminders()).count(),
        "processed sheet"
    );
    Ok(table)
}

fn derive_record(row: &[CellValue], map: &HeaderMap, parser: &DateParser) -> OutreachRecord {
    let cell = |field: Field| row.get(map.index_of(field)).unwrap_or(&CellValue::Empty);
    let date = |field: DateField| parser.parse_cell(cell(field.field()));

    let dates = OutreachDates {
        first_email: date(DateField::FirstEmailDate),
        reminder1: date(DateField::Reminder1),
        reminder2: date(DateField::Reminder2),
        reminder3: date(DateField::Reminder3),
    };

    OutreachRecord::from_dates(
        cell(Field::Website).to_string().trim().to_string(),
        cell(Field::Email).to_string().trim().to_string(),
        dates,
    )
}
