use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Write;
use std::path::Path;

use outreach_report::loader::{load_sheet, open_workbook};
use outreach_report::report::full_report;
use outreach_report::{
    by_exact_date, by_reminder_presence, process_sheet, DataSource, DateField, Error, Field,
    FilterResult, Summary,
};

const CONTACTS: &str = "\
 Website ,E-mail Address,first_email_date,Reminder 1,REMINDER_2,Reminder3,Notes
alpha.com,hi@alpha.com,2024-01-01,,,,cold
beta.com,hi@beta.com,2024-01-01,2024-01-01,,2024-01-05,
gamma.com,hi@gamma.com,2024-02-01,2024-03-10,2024-03-01,,warm
delta.com,hi@delta.com,,,,,
epsilon.com,hi@epsilon.com,2024-02-10,2024-02-15 16:45:00,2024-02-20,,
";

fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).map(|d| d.and_time(NaiveTime::MIN))
}

fn valid_contacts() -> String {
    CONTACTS.replace("E-mail Address", "Email")
}

#[tokio::test]
async fn csv_with_missing_email_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "contacts.csv", CONTACTS);

    let workbook = open_workbook(path).await.unwrap();
    assert_eq!(workbook.source, DataSource::Csv);
    assert_eq!(workbook.sheet_names, vec!["contacts"]);

    let raw = load_sheet(&workbook, "contacts").await.unwrap();
    match process_sheet(&raw) {
        Err(Error::SchemaMismatch { sheet, missing }) => {
            assert_eq!(sheet, "contacts");
            assert_eq!(missing, vec![Field::Email]);
        }
        other => panic!("expected schema mismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn full_pipeline_over_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "march.csv", &valid_contacts());

    let workbook = open_workbook(path).await.unwrap();
    let raw = load_sheet(&workbook, "march").await.unwrap();
    let table = process_sheet(&raw).unwrap();

    assert_eq!(table.len(), 5);
    let sites: Vec<_> = table.iter().map(|r| r.website.as_str()).collect();
    assert_eq!(sites, vec!["alpha.com", "beta.com", "gamma.com", "delta.com", "epsilon.com"]);

    for record in &table {
        let filled = [record.reminder1, record.reminder2, record.reminder3]
            .iter()
            .filter(|d| d.is_some())
            .count();
        assert_eq!(record.total_reminders_sent as usize, filled);
        assert!(record.total_reminders_sent <= 3);
    }

    let alpha = &table.records[0];
    assert_eq!(alpha.total_reminders_sent, 0);
    assert_eq!(alpha.last_interaction_type, DateField::FirstEmailDate);
    assert_eq!(alpha.last_interaction_date, day(2024, 1, 1));

    let beta = &table.records[1];
    assert_eq!(beta.last_interaction_type, DateField::Reminder3);
    assert_eq!(beta.last_interaction_date, day(2024, 1, 5));

    let gamma = &table.records[2];
    assert_eq!(gamma.last_interaction_type, DateField::Reminder2);
    assert_eq!(gamma.last_interaction_date, day(2024, 3, 1));

    let delta = &table.records[3];
    assert_eq!(delta.last_interaction_type, DateField::FirstEmailDate);
    assert_eq!(delta.last_interaction_date, None);

    let summary = Summary::of(&table);
    assert_eq!(summary.total_contacts, 5);
    assert_eq!(summary.without_reminders, 2);
    assert_eq!(summary.latest_activity, day(2024, 3, 1));
}

#[tokio::test]
async fn filters_over_loaded_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "leads.csv", &valid_contacts());
    let workbook = open_workbook(path).await.unwrap();
    let table = process_sheet(&load_sheet(&workbook, "leads").await.unwrap()).unwrap();

    let feb15 = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
    let on_day = by_exact_date(&table, feb15);
    let hits: Vec<_> = on_day
        .matches()
        .unwrap()
        .iter()
        .map(|r| r.website.clone())
        .collect();
    assert_eq!(hits, vec!["epsilon.com"]);

    let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(by_exact_date(&table, jan1).len(), 2);

    let nothing = by_exact_date(&table, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    assert_eq!(nothing, FilterResult::NoMatches);

    let second: Vec<_> = by_reminder_presence(&table, "Reminder2".parse().unwrap())
        .matches()
        .unwrap()
        .iter()
        .map(|r| r.website.clone())
        .collect();
    assert_eq!(second, vec!["gamma.com", "epsilon.com"]);
}

#[tokio::test]
async fn processing_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "leads.csv", &valid_contacts());
    let workbook = open_workbook(path).await.unwrap();
    let raw = load_sheet(&workbook, "leads").await.unwrap();

    let first = serde_json::to_string(&process_sheet(&raw).unwrap()).unwrap();
    let second = serde_json::to_string(&process_sheet(&raw).unwrap()).unwrap();
    assert_eq!(first, second);

    let report = full_report(&process_sheet(&raw).unwrap());
    assert_eq!(report.rows[4][3], "2024-02-15 16:45:00");
}

#[tokio::test]
async fn unknown_sheet_and_file_types_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "leads.csv", &valid_contacts());
    let workbook = open_workbook(path).await.unwrap();

    assert!(matches!(
        load_sheet(&workbook, "Sheet2").await,
        Err(Error::SheetNotFound(_))
    ));

    let notes = write_csv(dir.path(), "notes.txt", "hello");
    assert!(matches!(open_workbook(notes).await, Err(Error::UnsupportedFile(_))));
}
