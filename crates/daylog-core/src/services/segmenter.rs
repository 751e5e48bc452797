//! Session segmentation
//!
//! Reconstructs how a day was spent from its commits. Commits are sorted,
//! split into branch runs, and the runs tile the day from the (smart)
//! workday start to the (smart) workday end with no gaps:
//!
//! ```text
//!  dayStart        c1   c2        c3         c4              dayEnd
//!     |------------ a ---|---------- b -------|------ a -------|
//!     ^ run 1 ends at its last commit        ^ last run absorbs the tail
//! ```
//!
//! A commit before `dayStart` pulls the timeline start back to it; a
//! commit after `dayEnd` pushes the timeline end out to it.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::config::WorkdayConfig;
use crate::error::Result;
use crate::models::{Commit, TaskIdSource, WorkSession};
use crate::services::task_id::extract_task_id;
use crate::utils::minutes_between;

/// A commit paired with its resolved timestamp
struct TimedCommit<'a> {
    at: DateTime<FixedOffset>,
    commit: &'a Commit,
}

/// Partition one date's commits into contiguous work sessions.
///
/// Returns an empty list for no commits. Fails only when a commit
/// timestamp cannot be read or the workday bounds do not exist on `date`.
pub fn segment_sessions(
    commits: &[Commit],
    date: NaiveDate,
    config: &WorkdayConfig,
) -> Result<Vec<WorkSession>> {
    if commits.is_empty() {
        return Ok(Vec::new());
    }

    let mut timed = Vec::with_capacity(commits.len());
    for commit in commits {
        timed.push(TimedCommit {
            at: commit.instant(&config.time_zone)?,
            commit,
        });
    }
    // sort_by is stable, so equal timestamps keep their input order
    timed.sort_by(|a, b| a.at.cmp(&b.at));

    let (day_start, day_end) = config.day_bounds(date)?;
    let first_at = timed[0].at;
    let last_at = timed[timed.len() - 1].at;
    let timeline_start = day_start.min(first_at);
    let timeline_end = day_end.max(last_at);

    let runs = branch_runs(&timed);
    let mut sessions = Vec::with_capacity(runs.len());
    let mut start = timeline_start;

    for (index, run) in runs.iter().enumerate() {
        let end = if index + 1 == runs.len() {
            timeline_end
        } else {
            run[run.len() - 1].at
        };

        let session = build_session(run, start, end, day_start, day_end, &config.task_id_pattern);
        log::debug!(
            "[segmenter] {} {} -> {} ({} min, {} commits, task {:?})",
            session.branch,
            session.start_time.format("%H:%M"),
            session.end_time.format("%H:%M"),
            session.duration_minutes,
            session.commits.len(),
            session.task_id
        );
        sessions.push(session);
        start = end;
    }

    Ok(sessions)
}

/// Split sorted commits into maximal runs sharing one branch.
///
/// Leaving a branch and coming back starts a new run.
fn branch_runs<'s, 'a>(timed: &'s [TimedCommit<'a>]) -> Vec<&'s [TimedCommit<'a>]> {
    let mut runs = Vec::new();
    let mut run_start = 0;

    for i in 1..timed.len() {
        if timed[i].commit.branch != timed[i - 1].commit.branch {
            runs.push(&timed[run_start..i]);
            run_start = i;
        }
    }
    if run_start < timed.len() {
        runs.push(&timed[run_start..]);
    }

    runs
}

fn build_session(
    run: &[TimedCommit<'_>],
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    day_start: DateTime<FixedOffset>,
    day_end: DateTime<FixedOffset>,
    pattern: &str,
) -> WorkSession {
    let branch = run[0].commit.branch.clone();
    let pull_request = run.iter().find_map(|t| t.commit.pull_request.as_ref());
    let pr_title = pull_request.map(|pr| pr.title.clone());

    let found = extract_task_id(&branch, pr_title.as_deref(), pattern);
    let task_id_source = found.task_id.as_deref().map(|id| classify_source(id, &branch));

    WorkSession {
        task_id: found.task_id,
        task_id_source,
        branch,
        pr_title,
        pr_number: pull_request.map(|pr| pr.number),
        start_time: start,
        end_time: end,
        commits: run.iter().map(|t| t.commit.clone()).collect(),
        duration_minutes: minutes_between(&start, &end).max(0),
        starts_before_work_hours: start < day_start,
        ends_after_work_hours: end > day_end,
    }
}

/// Display label for where a task id came from: "branch" whenever the id
/// appears in the branch name, regardless of where the extractor matched.
fn classify_source(task_id: &str, branch: &str) -> TaskIdSource {
    if branch.contains(task_id) {
        TaskIdSource::Branch
    } else {
        TaskIdSource::Pr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeZoneSetting;
    use crate::models::{CommitAuthor, PullRequest, Repository};

    fn config() -> WorkdayConfig {
        WorkdayConfig::default().with_time_zone(TimeZoneSetting::parse("Z").unwrap())
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn commit(sha: &str, branch: &str, time: &str) -> Commit {
        let date = format!("2024-01-01T{}:00Z", time);
        Commit {
            sha: sha.to_string(),
            short_sha: sha.chars().take(7).collect(),
            message: format!("commit {}", sha),
            date: date.clone(),
            url: format!("https://git.example.com/acme/web/commit/{}", sha),
            repository: Repository {
                name: "web".to_string(),
                full_name: "acme/web".to_string(),
            },
            author: CommitAuthor {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                date,
            },
            branch: branch.to_string(),
            pull_request: None,
        }
    }

    fn with_pr(mut c: Commit, number: u64, title: &str) -> Commit {
        c.pull_request = Some(PullRequest {
            number,
            title: title.to_string(),
            branch_deleted: false,
            url: format!("https://git.example.com/acme/web/pull/{}", number),
        });
        c
    }

    fn shas(session: &WorkSession) -> Vec<&str> {
        session.commits.iter().map(|c| c.sha.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_sessions(&[], day(), &config()).unwrap().is_empty());
    }

    #[test]
    fn test_early_start_is_kept() {
        let commits = vec![
            commit("c1", "feature/DMO-12-x", "08:30"),
            commit("c2", "feature/DMO-12-x", "09:15"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions.len(), 1);
        let s = &sessions[0];
        assert_eq!(s.task_id.as_deref(), Some("DMO-12"));
        assert!(s.starts_before_work_hours);
        assert!(!s.ends_after_work_hours);
        assert_eq!(s.start_time.to_rfc3339(), "2024-01-01T08:30:00+00:00");
        assert_eq!(s.end_time.to_rfc3339(), "2024-01-01T17:00:00+00:00");
        assert_eq!(s.duration_minutes, 510);
    }

    #[test]
    fn test_last_session_extends_to_day_end() {
        let commits = vec![
            commit("a1", "a", "09:30"),
            commit("a2", "a", "10:00"),
            commit("b1", "b", "11:00"),
            commit("b2", "b", "11:30"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].start_time.to_rfc3339(), "2024-01-01T09:00:00+00:00");
        assert_eq!(sessions[0].end_time.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(sessions[0].duration_minutes, 60);
        assert_eq!(sessions[1].start_time.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(sessions[1].end_time.to_rfc3339(), "2024-01-01T17:00:00+00:00");
        assert_eq!(sessions[1].duration_minutes, 420);
    }

    #[test]
    fn test_late_commit_extends_day_end() {
        let commits = vec![commit("c1", "a", "10:00"), commit("c2", "a", "19:45")];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].end_time.to_rfc3339(), "2024-01-01T19:45:00+00:00");
        assert!(sessions[0].ends_after_work_hours);
        assert!(!sessions[0].starts_before_work_hours);
    }

    #[test]
    fn test_returning_to_branch_starts_new_session() {
        let commits = vec![
            commit("a1", "a", "09:30"),
            commit("b1", "b", "10:30"),
            commit("a2", "a", "11:30"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        let branches: Vec<&str> = sessions.iter().map(|s| s.branch.as_str()).collect();
        assert_eq!(branches, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let commits = vec![
            commit("b1", "b", "11:00"),
            commit("a1", "a", "09:30"),
            commit("a2", "a", "10:00"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(shas(&sessions[0]), vec!["a1", "a2"]);
        assert_eq!(shas(&sessions[1]), vec!["b1"]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let commits = vec![
            commit("x1", "a", "10:00"),
            commit("x2", "b", "10:00"),
            commit("x3", "a", "10:00"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        let all: Vec<&str> = sessions.iter().flat_map(|s| shas(s)).collect();
        assert_eq!(all, vec!["x1", "x2", "x3"]);
        // the middle run starts and ends at the same instant
        assert_eq!(sessions[1].duration_minutes, 0);
    }

    #[test]
    fn test_sessions_are_contiguous() {
        let commits = vec![
            commit("a1", "a", "07:10"),
            commit("b1", "b", "09:40"),
            commit("c1", "c", "13:05"),
            commit("a2", "a", "18:20"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        for pair in sessions.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        for s in &sessions {
            assert_eq!(s.duration_minutes, minutes_between(&s.start_time, &s.end_time));
            assert!(s.duration_minutes >= 0);
        }
    }

    #[test]
    fn test_task_id_from_pr_title() {
        let commits = vec![
            commit("h1", "hotfix-999", "10:00"),
            with_pr(commit("h2", "hotfix-999", "10:30"), 7, "Fixes DMO-77 bug"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        let s = &sessions[0];
        assert_eq!(s.task_id.as_deref(), Some("DMO-77"));
        assert_eq!(s.task_id_source, Some(TaskIdSource::Pr));
        assert_eq!(s.pr_title.as_deref(), Some("Fixes DMO-77 bug"));
        assert_eq!(s.pr_number, Some(7));
    }

    #[test]
    fn test_first_pull_request_in_run_is_used() {
        let commits = vec![
            with_pr(commit("p1", "main", "10:00"), 1, "DMO-1 first"),
            with_pr(commit("p2", "main", "10:30"), 2, "DMO-2 second"),
        ];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions[0].task_id.as_deref(), Some("DMO-1"));
        assert_eq!(sessions[0].pr_number, Some(1));
    }

    #[test]
    fn test_source_is_branch_when_id_in_branch_name() {
        let commits = vec![with_pr(commit("c1", "feature/DMO-3", "10:00"), 3, "DMO-3 title")];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions[0].task_id_source, Some(TaskIdSource::Branch));
    }

    #[test]
    fn test_no_task_id() {
        let commits = vec![commit("c1", "main", "10:00")];
        let sessions = segment_sessions(&commits, day(), &config()).unwrap();
        assert_eq!(sessions[0].task_id, None);
        assert_eq!(sessions[0].task_id_source, None);
    }

    #[test]
    fn test_invalid_pattern_degrades_to_no_task_id() {
        let mut cfg = config();
        cfg.task_id_pattern = "DMO-(".to_string();
        let commits = vec![commit("c1", "feature/DMO-12", "10:00")];
        let sessions = segment_sessions(&commits, day(), &cfg).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].task_id, None);
    }

    #[test]
    fn test_invalid_timestamp_is_error() {
        let mut bad = commit("c1", "a", "10:00");
        bad.date = "not a date".to_string();
        assert!(segment_sessions(&[bad], day(), &config()).is_err());
    }

    #[test]
    fn test_classify_source() {
        assert_eq!(classify_source("DMO-1", "feature/DMO-1"), TaskIdSource::Branch);
        assert_eq!(classify_source("DMO-1", "feature/x"), TaskIdSource::Pr);
    }
}
