// src/interaction.rs
use chrono::NaiveDateTime;

use crate::schema::DateField;

/// The four outreach dates of one contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutreachDates {
    pub first_email: Option<NaiveDateTime>,
    pub reminder1: Option<NaiveDateTime>,
    pub reminder2: Option<NaiveDateTime>,
    pub reminder3: Option<NaiveDateTime>,
}

impl OutreachDates {
    pub fn get(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::FirstEmailDate => self.first_email,
            DateField::Reminder1 => self.reminder1,
            DateField::Reminder2 => self.reminder2,
            DateField::Reminder3 => self.reminder3,
        }
    }
}

/// Latest known touch, picked by field order rather than by comparing dates:
/// a later reminder column wins whenever it is filled in.
pub fn resolve_last_interaction(dates: &OutreachDates) -> (DateField, Option<NaiveDateTime>) {
    const PRIORITY: [DateField; 3] = [DateField::Reminder3, DateField::Reminder2, DateField::Reminder1];

    PRIORITY
        .into_iter()
        .find_map(|field| dates.get(field).map(|date| (field, Some(date))))
        .unwrap_or((DateField::FirstEmailDate, dates.first_email))
}

pub fn count_reminders(dates: &OutreachDates) -> u8 {
    DateField::REMINDERS
        .into_iter()
        .filter(|field| dates.get(*field).is_some())
        .count() as u8
}
