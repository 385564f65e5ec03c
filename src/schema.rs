// src/schema.rs
//! The fixed six-column schema every outreach sheet is normalized into, and the
//! header matching that maps arbitrary spellings onto it.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Website,
    Email,
    FirstEmailDate,
    Reminder1,
    Reminder2,
    Reminder3,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Website,
        Field::Email,
        Field::FirstEmailDate,
        Field::Reminder1,
        Field::Reminder2,
        Field::Reminder3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Website => "Website",
            Field::Email => "Email",
            Field::FirstEmailDate => "First Email Date",
            Field::Reminder1 => "Reminder1",
            Field::Reminder2 => "Reminder2",
            Field::Reminder3 => "Reminder3",
        }
    }

    fn position(self) -> usize {
        match self {
            Field::Website => 0,
            Field::Email => 1,
            Field::FirstEmailDate => 2,
            Field::Reminder1 => 3,
            Field::Reminder2 => 4,
            Field::Reminder3 => 5,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four date-bearing fields. Also the set of valid "last interaction" types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateField {
    FirstEmailDate,
    Reminder1,
    Reminder2,
    Reminder3,
}

impl DateField {
    pub const ALL: [DateField; 4] = [
        DateField::FirstEmailDate,
        DateField::Reminder1,
        DateField::Reminder2,
        DateField::Reminder3,
    ];

    pub const REMINDERS: [DateField; 3] =
        [DateField::Reminder1, DateField::Reminder2, DateField::Reminder3];

    pub fn field(self) -> Field {
        match self {
            DateField::FirstEmailDate => Field::FirstEmailDate,
            DateField::Reminder1 => Field::Reminder1,
            DateField::Reminder2 => Field::Reminder2,
            DateField::Reminder3 => Field::Reminder3,
        }
    }

    pub fn label(self) -> &'static str {
        self.field().label()
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        DateField::ALL
            .into_iter()
            .find(|field| normalize(field.label()) == wanted)
            .ok_or_else(|| Error::UnknownDateField(s.to_string()))
    }
}

/// Trim, lower-case, and drop spaces and underscores.
pub fn normalize(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect()
}

static NORMALIZED_FIELDS: Lazy<Vec<(String, Field)>> = Lazy::new(|| {
    Field::ALL
        .iter()
        .map(|field| (normalize(field.label()), *field))
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedColumn {
    pub field: Field,
    pub index: usize,
    pub source: String,
}

/// Resolved location of every canonical field within a sheet's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<MappedColumn>,
}

impl HeaderMap {
    pub fn index_of(&self, field: Field) -> usize {
        self.columns[field.position()].index
    }

    pub fn source_of(&self, field: Field) -> &str {
        &self.columns[field.position()].source
    }

    pub fn columns(&self) -> &[MappedColumn] {
        &self.columns
    }
}

/// Maps raw column names onto the canonical schema.
///
/// Fails with `SchemaMismatch` listing every field that has no column, or with
/// `DuplicateColumn` when two columns normalize to the same field.
pub fn map_headers(sheet: &str, headers: &[String]) -> Result<HeaderMap> {
    let mut found: Vec<Vec<(usize, &String)>> = vec![Vec::new(); Field::ALL.len()];

    for (index, header) in headers.iter().enumerate() {
        let normalized = normalize(header);
        if let Some((_, field)) = NORMALIZED_FIELDS.iter().find(|(key, _)| *key == normalized) {
            found[field.position()].push((index, header));
        }
    }

    let missing: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| found[field.position()].is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(Error::SchemaMismatch {
            sheet: sheet.to_string(),
            missing,
        });
    }

    let mut columns = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let matches = &found[field.position()];
        if matches.len() > 1 {
            return Err(Error::DuplicateColumn {
                sheet: sheet.to_string(),
                field,
                columns: matches.iter().map(|(_, h)| h.to_string()).collect(),
            });
        }
        let (index, source) = matches[0];
        debug!(sheet, field = field.label(), column = %source, index, "mapped column");
        columns.push(MappedColumn {
            field,
            index,
            source: source.clone(),
        });
    }

    Ok(HeaderMap { columns })
}
