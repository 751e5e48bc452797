//! Day command
//!
//! Segments one date's commits and shows the sessions and the log
//! entries they reduce to.

use anyhow::Result;
use clap::Args;

use super::helpers::{
    commits_on_date, expand_path, parse_date, read_commits_file, warn_if_pattern_invalid,
};
use super::types::{total_hours, EntryRow, SessionRow};
use super::Context;
use crate::output::{print_heading, print_json, print_rows, print_success, OutputFormat};

#[derive(Args)]
pub struct DayArgs {
    /// Date to segment (YYYY-MM-DD, today, yesterday)
    pub date: String,

    /// JSON file holding an array of commits
    #[arg(short, long)]
    pub commits: String,
}

pub async fn execute(ctx: &Context, args: DayArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let all = read_commits_file(&expand_path(&args.commits))?;
    let commits = commits_on_date(&all, date, &ctx.workday);
    warn_if_pattern_invalid(&ctx.workday);

    let day = daylog_core::process_day(&commits, date, &ctx.workday)?;

    if ctx.format == OutputFormat::Json {
        return print_json(&day);
    }

    let session_rows: Vec<SessionRow> = day.sessions.iter().map(SessionRow::from).collect();
    let entry_rows: Vec<EntryRow> = day.entries.iter().map(EntryRow::from).collect();

    print_heading(&format!("Sessions on {}", date), ctx.quiet);
    print_rows(&session_rows, &day.sessions, ctx.format, "No commits on this date.")?;
    println!();
    print_heading("Log entries", ctx.quiet);
    print_rows(&entry_rows, &day.entries, ctx.format, "No billable entries.")?;
    print_success(
        &format!(
            "{} commits, {} sessions, {:.2} hours",
            commits.len(),
            day.sessions.len(),
            total_hours(&day.entries)
        ),
        ctx.quiet,
    );

    Ok(())
}
