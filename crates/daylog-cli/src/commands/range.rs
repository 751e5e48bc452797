//! Range command
//!
//! Runs the orchestrator over a date range, reading commits from a JSON
//! export: either one file holding every commit, or a directory with one
//! `<YYYY-MM-DD>.json` file per day.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Args;
use daylog_core::{Commit, CommitSource, DateRange, Error, LogEntry, WorkdayConfig};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::helpers::{
    expand_path, parse_commits, parse_date, read_commits_file, warn_if_pattern_invalid,
};
use super::types::EntryRow;
use super::Context;
use crate::output::{print_rows, print_success, print_warning, OutputFormat};

#[derive(Args)]
pub struct RangeArgs {
    /// First date (YYYY-MM-DD, today, yesterday)
    #[arg(short, long)]
    pub from: String,

    /// Last date, inclusive (defaults to --from)
    #[arg(short, long)]
    pub to: Option<String>,

    /// JSON commits file, or a directory of <YYYY-MM-DD>.json files
    #[arg(short, long)]
    pub commits: String,
}

/// Commit source backed by exported JSON
pub enum JsonCommitSource {
    /// Every commit pre-grouped by date in the workday zone
    File(HashMap<NaiveDate, Vec<Commit>>),
    /// One file per date, read on demand
    Directory(PathBuf),
}

impl JsonCommitSource {
    pub fn open(path: PathBuf, config: &WorkdayConfig) -> Result<Self> {
        if path.is_dir() {
            return Ok(JsonCommitSource::Directory(path));
        }

        let mut by_date: HashMap<NaiveDate, Vec<Commit>> = HashMap::new();
        for commit in read_commits_file(&path)? {
            match commit.instant(&config.time_zone) {
                Ok(at) => by_date.entry(config.local_date(&at)).or_default().push(commit),
                Err(e) => log::warn!("Skipping commit {}: {}", commit.short_sha, e),
            }
        }
        Ok(JsonCommitSource::File(by_date))
    }
}

#[async_trait]
impl CommitSource for JsonCommitSource {
    async fn fetch_commits(&self, date: NaiveDate) -> daylog_core::Result<Vec<Commit>> {
        match self {
            JsonCommitSource::File(by_date) => Ok(by_date.get(&date).cloned().unwrap_or_default()),
            JsonCommitSource::Directory(dir) => {
                let path = dir.join(format!("{}.json", date));
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| Error::fetch(format!("{}: {}", path.display(), e)))?;
                parse_commits(&content, &path).map_err(|e| Error::fetch(format!("{:#}", e)))
            }
        }
    }
}

#[derive(Serialize)]
struct RangeOutput<'a> {
    entries: &'a [LogEntry],
    summary: &'a daylog_core::RangeSummary,
}

pub async fn execute(ctx: &Context, args: RangeArgs) -> Result<()> {
    let from = parse_date(&args.from)?;
    let to = match &args.to {
        Some(t) => parse_date(t)?,
        None => from,
    };
    let range = DateRange::new(from, to)?;
    let source = JsonCommitSource::open(expand_path(&args.commits), &ctx.workday)?;
    warn_if_pattern_invalid(&ctx.workday);

    let mut entries = Vec::new();
    let summary =
        daylog_core::run_range(&range, &source, &ctx.workday, |entry| entries.push(entry)).await;

    if ctx.format == OutputFormat::Json {
        return crate::output::print_json(&RangeOutput {
            entries: &entries,
            summary: &summary,
        });
    }

    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    print_rows(&rows, &entries, ctx.format, "No billable entries.")?;

    if !summary.failed_dates.is_empty() {
        let dates: Vec<String> = summary.failed_dates.iter().map(|d| d.to_string()).collect();
        print_warning(&format!("Skipped dates: {}", dates.join(", ")));
    }
    print_success(
        &format!(
            "Processed {} commits, added {} entries",
            summary.processed, summary.added
        ),
        ctx.quiet,
    );

    Ok(())
}
