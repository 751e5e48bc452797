//! Command helper functions
//!
//! Shared utilities for day and range commands.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use daylog_core::{Commit, WorkdayConfig};
use std::path::{Path, PathBuf};

use crate::output::print_warning;

/// Parse date string supporting common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    if s == "today" {
        return Ok(chrono::Local::now().date_naive());
    }
    if s == "yesterday" {
        return Ok(chrono::Local::now().date_naive() - chrono::Duration::days(1));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format: {}. Use YYYY-MM-DD", s))
}

/// Expand `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Parse a JSON array of commits
pub fn parse_commits(content: &str, origin: &Path) -> Result<Vec<Commit>> {
    serde_json::from_str(content)
        .with_context(|| format!("{} is not a JSON array of commits", origin.display()))
}

/// Read a JSON array of commits from a file
pub fn read_commits_file(path: &Path) -> Result<Vec<Commit>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read commits from {}", path.display()))?;
    parse_commits(&content, path)
}

/// Keep the commits made on `date` in the workday zone
///
/// Commits whose date cannot be read are logged and skipped.
pub fn commits_on_date(
    commits: &[Commit],
    date: NaiveDate,
    config: &WorkdayConfig,
) -> Vec<Commit> {
    let mut matching = Vec::new();
    for commit in commits {
        match commit.instant(&config.time_zone) {
            Ok(at) if config.local_date(&at) == date => matching.push(commit.clone()),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping commit {}: {}", commit.short_sha, e),
        }
    }
    matching
}

/// Warn when the task id pattern will not compile
pub fn warn_if_pattern_invalid(config: &WorkdayConfig) {
    if let Some(e) = config.pattern_error() {
        print_warning(&format!("Warning: {}. No task ids will be attributed.", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use daylog_core::TimeZoneSetting;

    fn commits_json() -> &'static str {
        r#"[
            {
                "sha": "aaa111", "shortSha": "aaa", "message": "one",
                "date": "2024-01-01T23:30:00+00:00", "url": "",
                "repository": { "name": "web", "fullName": "acme/web" },
                "author": { "name": "Dana", "email": "dana@example.com", "date": "2024-01-01T23:30:00+00:00" },
                "branch": "feature/DMO-1"
            },
            {
                "sha": "bbb222", "shortSha": "bbb", "message": "two",
                "date": "2024-01-01T10:00:00+00:00", "url": "",
                "repository": { "name": "web", "fullName": "acme/web" },
                "author": { "name": "Dana", "email": "dana@example.com", "date": "2024-01-01T10:00:00+00:00" },
                "branch": "feature/DMO-1",
                "pullRequest": null
            }
        ]"#
    }

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2025-01-15").unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = chrono::Local::now().date_naive();
        assert_eq!(parse_date("today").unwrap(), today);
        assert_eq!(parse_date("yesterday").unwrap(), today - chrono::Duration::days(1));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("01/15/2025").is_err());
    }

    #[test]
    fn test_commits_on_date_respects_zone() {
        let commits = parse_commits(commits_json(), Path::new("inline.json")).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let utc = WorkdayConfig::default().with_time_zone(TimeZoneSetting::parse("Z").unwrap());
        assert_eq!(commits_on_date(&commits, day, &utc).len(), 2);

        // 23:30 UTC is already Jan 2 at +08:00
        let taipei =
            WorkdayConfig::default().with_time_zone(TimeZoneSetting::parse("+08:00").unwrap());
        let on_day = commits_on_date(&commits, day, &taipei);
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].short_sha, "bbb");
    }

    #[test]
    fn test_commits_on_date_skips_unreadable_dates() {
        let mut commits = parse_commits(commits_json(), Path::new("inline.json")).unwrap();
        commits[0].date = "not a date".to_string();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let utc = WorkdayConfig::default().with_time_zone(TimeZoneSetting::parse("Z").unwrap());
        let on_day = commits_on_date(&commits, day, &utc);
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].short_sha, "bbb");
    }

    #[test]
    fn test_parse_commits_rejects_object() {
        assert!(parse_commits("{}", Path::new("x.json")).is_err());
    }
}
