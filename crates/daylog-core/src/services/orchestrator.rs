//! Date range orchestration
//!
//! Drives fetch -> segment -> reduce for each date of a range, one date
//! at a time. A date whose commits cannot be fetched (or read) is logged
//! and skipped; it never aborts the run.
//!
//! ```text
//! for date in range {
//!     commits  = source.fetch_commits(date).await   // only await point
//!     sessions = segment_sessions(commits, date, config)
//!     entries  = reduce_sessions(sessions, date)
//!     entries.for_each(on_entry)
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::WorkdayConfig;
use crate::error::{Error, Result};
use crate::models::{Commit, LogEntry, WorkSession};
use crate::services::reducer::reduce_sessions;
use crate::services::segmenter::segment_sessions;

/// Supplies a date's commits, typically from a source-control host
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Fetch every commit made on `date`
    async fn fetch_commits(&self, date: NaiveDate) -> Result<Vec<Commit>>;
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::validation(format!(
                "Range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Dates in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Sessions and entries produced for one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayResult {
    pub date: NaiveDate,
    pub sessions: Vec<WorkSession>,
    pub entries: Vec<LogEntry>,
}

/// Segment and reduce one date's commits
pub fn process_day(
    commits: &[Commit],
    date: NaiveDate,
    config: &WorkdayConfig,
) -> Result<DayResult> {
    let sessions = segment_sessions(commits, date, config)?;
    let entries = reduce_sessions(&sessions, date);
    Ok(DayResult {
        date,
        sessions,
        entries,
    })
}

/// Totals for a range run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeSummary {
    /// Commits processed across the range
    pub processed: usize,
    /// Log entries handed to the sink
    pub added: usize,
    /// Dates visited
    pub dates: usize,
    /// Dates skipped because their commits could not be fetched or read
    pub failed_dates: Vec<NaiveDate>,
    pub cancelled: bool,
}

/// Run every date in `range`, passing each log entry to `on_entry`.
pub async fn run_range<S, F>(
    range: &DateRange,
    source: &S,
    config: &WorkdayConfig,
    on_entry: F,
) -> RangeSummary
where
    S: CommitSource + ?Sized,
    F: FnMut(LogEntry),
{
    let never = AtomicBool::new(false);
    run_range_cancellable(range, source, config, &never, on_entry).await
}

/// Like [`run_range`], stopping before the next fetch once `cancel` is set.
pub async fn run_range_cancellable<S, F>(
    range: &DateRange,
    source: &S,
    config: &WorkdayConfig,
    cancel: &AtomicBool,
    mut on_entry: F,
) -> RangeSummary
where
    S: CommitSource + ?Sized,
    F: FnMut(LogEntry),
{
    let mut summary = RangeSummary::default();

    for date in range.days() {
        if cancel.load(Ordering::Relaxed) {
            log::info!("[range] Cancelled before {}", date);
            summary.cancelled = true;
            break;
        }
        summary.dates += 1;

        let commits = match source.fetch_commits(date).await {
            Ok(commits) => commits,
            Err(e) => {
                log::warn!("[range] Failed to fetch commits for {}: {}", date, e);
                summary.failed_dates.push(date);
                continue;
            }
        };

        let day = match process_day(&commits, date, config) {
            Ok(day) => day,
            Err(e) => {
                log::warn!("[range] Skipping {}: {}", date, e);
                summary.failed_dates.push(date);
                continue;
            }
        };

        log::info!(
            "[range] {}: {} commits, {} sessions, {} entries",
            date,
            commits.len(),
            day.sessions.len(),
            day.entries.len()
        );

        summary.processed += commits.len();
        for entry in day.entries {
            on_entry(entry);
            summary.added += 1;
        }
    }

    log::info!(
        "[range] {} ~ {}: processed {} commits, added {} entries, {} failed dates",
        range.start,
        range.end,
        summary.processed,
        summary.added,
        summary.failed_dates.len()
    );

    summary
}
