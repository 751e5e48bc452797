//! Session to log entry reduction
//!
//! Folds a day's sessions into one billable entry per task id. Sessions
//! without a task id are not billable and are dropped.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::models::{LogEntry, WorkSession};

/// Round minutes up to hours in quarter-hour steps
pub fn round_up_to_quarter_hours(minutes: i64) -> f64 {
    if minutes <= 0 {
        return 0.0;
    }
    (minutes as f64 / 15.0).ceil() * 0.25
}

/// Reduce sessions into log entries, one per distinct task id.
///
/// Entries come out in first-encounter order of their task id.
pub fn reduce_sessions(sessions: &[WorkSession], date: NaiveDate) -> Vec<LogEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&WorkSession>> = HashMap::new();

    for session in sessions {
        let Some(task_id) = session.task_id.as_deref() else {
            continue;
        };
        groups
            .entry(task_id)
            .or_insert_with(|| {
                order.push(task_id);
                Vec::new()
            })
            .push(session);
    }

    order
        .into_iter()
        .map(|task_id| {
            let group = &groups[task_id];
            let total_minutes: i64 = group.iter().map(|s| s.duration_minutes).sum();
            LogEntry {
                date,
                task_id: task_id.to_string(),
                duration: round_up_to_quarter_hours(total_minutes),
                description: describe(task_id, group),
            }
        })
        .collect()
}

/// Entry description: the first PR title, else the single branch, else a
/// branch count.
fn describe(task_id: &str, group: &[&WorkSession]) -> String {
    if let Some(title) = group.iter().find_map(|s| s.pr_title.as_deref()) {
        return format!("{}: {}", task_id, title);
    }

    let branches: BTreeSet<&str> = group.iter().map(|s| s.branch.as_str()).collect();
    match branches.iter().next() {
        Some(branch) if branches.len() == 1 => format!("{}: Work on {}", task_id, branch),
        _ => format!("{}: Work on {} branches", task_id, branches.len()),
    }
}
