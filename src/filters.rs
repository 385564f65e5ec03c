// src/filters.rs
use chrono::NaiveDate;

use crate::schema::DateField;
use crate::table::{OutreachRecord, OutreachTable};

/// Result of a view query. An empty match set is its own outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult {
    Matches(OutreachTable),
    NoMatches,
}

impl FilterResult {
    fn from_table(table: OutreachTable) -> Self {
        if table.is_empty() {
            FilterResult::NoMatches
        } else {
            FilterResult::Matches(table)
        }
    }

    pub fn matches(&self) -> Option<&OutreachTable> {
        match self {
            FilterResult::Matches(table) => Some(table),
            FilterResult::NoMatches => None,
        }
    }

    pub fn len(&self) -> usize {
        self.matches().map_or(0, OutreachTable::len)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FilterResult::NoMatches)
    }
}

fn select(table: &OutreachTable, keep: impl Fn(&OutreachRecord) -> bool) -> FilterResult {
    FilterResult::from_table(table.iter().filter(|r| keep(r)).cloned().collect())
}

/// Contacts touched on `target`: any outreach date or the last interaction
/// date falls on that calendar day.
pub fn by_exact_date(table: &OutreachTable, target: NaiveDate) -> FilterResult {
    select(table, |record| {
        DateField::ALL
            .into_iter()
            .map(|field| record.date(field))
            .chain(std::iter::once(record.last_interaction_date))
            .flatten()
            .any(|dt| dt.date() == target)
    })
}

/// Contacts where `field` has a date.
pub fn by_reminder_presence(table: &OutreachTable, field: DateField) -> FilterResult {
    select(table, |record| record.date(field).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::OutreachDates;
    use chrono::{NaiveDateTime, NaiveTime};

    fn at(y: i32, m: u32, d: u32, h: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(h, 0, 0))
    }

    fn record(site: &str, dates: OutreachDates) -> OutreachRecord {
        OutreachRecord::from_dates(site.to_string(), format!("info@{}", site), dates)
    }

    fn table() -> OutreachTable {
        vec![
            record("a.com", OutreachDates { first_email: at(2024, 2, 15, 0), ..Default::default() }),
            record(
                "b.com",
                OutreachDates {
                    first_email: at(2024, 2, 1, 0),
                    reminder2: at(2024, 2, 15, 17),
                    ..Default::default()
                },
            ),
            record(
                "c.com",
                OutreachDates {
                    first_email: at(2024, 2, 1, 0),
                    reminder1: at(2024, 2, 8, 0),
                    ..Default::default()
                },
            ),
            record("d.com", OutreachDates::default()),
        ]
        .into_iter()
        .collect()
    }

    fn sites(result: &FilterResult) -> Vec<String> {
        result
            .matches()
            .map(|t| t.iter().map(|r| r.website.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn exact_date_ignores_time_of_day() {
        let target = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let result = by_exact_date(&table(), target);
        assert_eq!(sites(&result), vec!["a.com", "b.com"]);
    }

    #[test]
    fn exact_date_without_matches_is_explicit() {
        let target = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        let result = by_exact_date(&table(), target);
        assert_eq!(result, FilterResult::NoMatches);
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn presence_keeps_row_order() {
        let t = table();
        assert_eq!(sites(&by_reminder_presence(&t, DateField::Reminder2)), vec!["b.com"]);
        assert_eq!(
            sites(&by_reminder_presence(&t, DateField::FirstEmailDate)),
            vec!["a.com", "b.com", "c.com"]
        );
        assert!(by_reminder_presence(&t, DateField::Reminder3).is_empty());
    }

    #[test]
    fn filters_leave_the_table_untouched() {
        let t = table();
        let before = t.clone();
        let _ = by_exact_date(&t, NaiveDate::from_ymd_opt(2024, 2, 8).unwrap());
        let _ = by_reminder_presence(&t, DateField::Reminder1);
        assert_eq!(t, before);
    }
}
