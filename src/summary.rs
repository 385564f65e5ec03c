// src/summary.rs
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::table::OutreachTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_contacts: usize,
    pub without_reminders: usize,
    /// `None` when no contact has any resolvable date.
    pub latest_activity: Option<NaiveDateTime>,
}

impl Summary {
    pub fn of(table: &OutreachTable) -> Self {
        Summary {
            total_contacts: table.len(),
            without_reminders: table.iter().filter(|r| r.has_no_reminders()).count(),
            latest_activity: table.iter().filter_map(|r| r.last_interaction_date).max(),
        }
    }

    pub fn latest_activity_label(&self) -> String {
        self.latest_activity
            .map(|dt| dt.date().to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}
