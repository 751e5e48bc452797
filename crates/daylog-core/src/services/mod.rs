//! Services module
//!
//! The segmentation pipeline, leaves first: task id extraction, session
//! segmentation, reduction to log entries and range orchestration.

pub mod cache;
pub mod orchestrator;
pub mod reducer;
pub mod segmenter;
pub mod task_id;

pub use cache::{segmentation_key, SessionCache};
pub use orchestrator::{
    process_day, run_range, run_range_cancellable, CommitSource, DateRange, DayResult,
    RangeSummary,
};
pub use reducer::{reduce_sessions, round_up_to_quarter_hours};
pub use segmenter::segment_sessions;
pub use task_id::{compile_task_pattern, extract_task_id, TaskIdMatch};
