//! Table row types
//!
//! Display rows for sessions and log entries.

use daylog_core::{LogEntry, WorkSession};
use serde::Serialize;
use tabled::Tabled;

/// Session row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct SessionRow {
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "End")]
    pub end: String,
    #[tabled(rename = "Min")]
    pub minutes: i64,
    #[tabled(rename = "Branch")]
    pub branch: String,
    #[tabled(rename = "Task")]
    pub task: String,
    #[tabled(rename = "From")]
    pub source: String,
    #[tabled(rename = "Commits")]
    pub commits: usize,
    #[tabled(rename = "Off-hours")]
    pub flags: String,
}

impl From<&WorkSession> for SessionRow {
    fn from(session: &WorkSession) -> Self {
        let flags = match (session.starts_before_work_hours, session.ends_after_work_hours) {
            (true, true) => "early+late",
            (true, false) => "early",
            (false, true) => "late",
            (false, false) => "",
        };
        Self {
            start: session.start_time.format("%H:%M").to_string(),
            end: session.end_time.format("%H:%M").to_string(),
            minutes: session.duration_minutes,
            branch: session.branch.clone(),
            task: session.task_id.clone().unwrap_or_else(|| "-".to_string()),
            source: session
                .task_id_source
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
            commits: session.commits.len(),
            flags: flags.to_string(),
        }
    }
}

/// Log entry row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Task")]
    pub task: String,
    #[tabled(rename = "Hours")]
    pub hours: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&LogEntry> for EntryRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            date: entry.date.to_string(),
            task: entry.task_id.clone(),
            hours: format!("{:.2}", entry.duration),
            description: entry.description.clone(),
        }
    }
}

/// Total hours across entries
pub fn total_hours(entries: &[LogEntry]) -> f64 {
    entries.iter().map(|e| e.duration).sum()
}
