//! # daylog-core
//!
//! Core engine for Daylog - reconstructs a developer's day from commits
//! and reduces it to billable worklog entries.
//!
//! This crate provides:
//! - Data models (`models` module)
//! - Workday settings (`config` module)
//! - The segmentation pipeline (`services` module)
//! - Unified error handling (`error` module)
//!
//! Everything here is a synchronous, deterministic transformation except
//! the per-date fetch in [`services::run_range`], which is delegated to a
//! [`CommitSource`].

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports for convenience
pub use config::{TimeZoneSetting, WorkdayConfig};
pub use error::{Error, Result};

// Re-export commonly used types from models
pub use models::{
    Commit, CommitAuthor, LogEntry, PullRequest, Repository, TaskIdSource, WorkSession,
    FALLBACK_BRANCH,
};

// Re-export commonly used types from services
pub use services::{
    compile_task_pattern, extract_task_id, process_day, reduce_sessions,
    round_up_to_quarter_hours, run_range, run_range_cancellable, segment_sessions,
    segmentation_key, CommitSource, DateRange, DayResult, RangeSummary, SessionCache,
    TaskIdMatch,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
