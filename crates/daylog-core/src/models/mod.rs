//! Data models for the Daylog engine
//!
//! `Commit` is the record supplied by the source-control collaborator,
//! `WorkSession` is the derived per-branch time block and `LogEntry` is
//! the billable record handed to the work-tracking collaborator.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::TimeZoneSetting;
use crate::error::Result;
use crate::utils::parse_timestamp;

/// Branch name used when the source-control host did not report one
pub const FALLBACK_BRANCH: &str = "unknown";

fn fallback_branch() -> String {
    FALLBACK_BRANCH.to_string()
}

/// Repository a commit belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub full_name: String,
}

/// Commit author as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub date: String,
}

/// Pull request associated with a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub branch_deleted: bool,
    pub url: String,
}

/// A single commit with branch and pull request metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: String,
    pub short_sha: String,
    pub message: String,
    /// ISO-8601 timestamp; offset-less values are wall-clock in the workday zone
    #[serde(alias = "timestamp")]
    pub date: String,
    pub url: String,
    pub repository: Repository,
    pub author: CommitAuthor,
    #[serde(default = "fallback_branch")]
    pub branch: String,
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

impl Commit {
    /// Resolve the commit timestamp to an instant expressed in `zone`
    pub fn instant(&self, zone: &TimeZoneSetting) -> Result<DateTime<FixedOffset>> {
        parse_timestamp(&self.date, zone)
    }
}

/// Where a session's task identifier was attributed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskIdSource {
    Branch,
    Pr,
}

impl TaskIdSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskIdSource::Branch => "branch",
            TaskIdSource::Pr => "pr",
        }
    }
}

/// A contiguous block of time spent on one branch run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub task_id: Option<String>,
    pub task_id_source: Option<TaskIdSource>,
    pub branch: String,
    pub pr_title: Option<String>,
    pub pr_number: Option<u64>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub commits: Vec<Commit>,
    pub duration_minutes: i64,
    pub starts_before_work_hours: bool,
    pub ends_after_work_hours: bool,
}

/// Billable worklog entry, one per task identifier per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: NaiveDate,
    pub task_id: String,
    /// Hours, in quarter-hour steps
    pub duration: f64,
    pub description: String,
}
