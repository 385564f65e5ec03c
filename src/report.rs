// src/report.rs
use chrono::{NaiveDateTime, NaiveTime};

use crate::data_types::TableData;
use crate::table::{OutreachRecord, OutreachTable};

pub const REPORT_COLUMNS: [&str; 9] = [
    "Website",
    "Email",
    "First Email Date",
    "Reminder1",
    "Reminder2",
    "Reminder3",
    "Last Interaction Type",
    "Last Interaction Date",
    "Total Reminders Sent",
];

pub const NO_REMINDER_COLUMNS: [&str; 3] = ["Website", "Email", "First Email Date"];

pub fn format_date(value: Option<NaiveDateTime>) -> String {
    match value {
        None => String::new(),
        Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn report_row(record: &OutreachRecord) -> Vec<String> {
    vec![
        record.website.clone(),
        record.email.clone(),
        format_date(record.first_email_date),
        format_date(record.reminder1),
        format_date(record.reminder2),
        format_date(record.reminder3),
        record.last_interaction_type.label().to_string(),
        format_date(record.last_interaction_date),
        record.total_reminders_sent.to_string(),
    ]
}

pub fn full_report(table: &OutreachTable) -> TableData {
    let mut data = TableData::with_headers(&REPORT_COLUMNS);
    data.rows = table.iter().map(report_row).collect();
    data
}

pub fn no_reminders_report(table: &OutreachTable) -> TableData {
    let mut data = TableData::with_headers(&NO_REMINDER_COLUMNS);
    data.rows = table
        .iter()
        .filter(|record| record.has_no_reminders())
        .map(|record| {
            vec![
                record.website.clone(),
                record.email.clone(),
                format_date(record.first_email_date),
            ]
        })
        .collect();
    data
}
