//! Task id extraction
//!
//! Locates a work-tracking task identifier (e.g. `DMO-123`) in a branch
//! name or pull request title using a configurable pattern.

use regex::Regex;

use crate::error::Result;
use crate::models::TaskIdSource;

/// Outcome of a task id lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskIdMatch {
    pub task_id: Option<String>,
    pub source: Option<TaskIdSource>,
}

impl TaskIdMatch {
    fn found(task_id: &str, source: TaskIdSource) -> Self {
        Self {
            task_id: Some(task_id.to_string()),
            source: Some(source),
        }
    }

    pub fn is_match(&self) -> bool {
        self.task_id.is_some()
    }
}

/// Compile a task id pattern
pub fn compile_task_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Extract a task id from `branch`, falling back to `pr_title`.
///
/// The whole matched text is returned, not a capture group. A pattern
/// that fails to compile is logged and treated as matching nothing.
pub fn extract_task_id(branch: &str, pr_title: Option<&str>, pattern: &str) -> TaskIdMatch {
    let re = match compile_task_pattern(pattern) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("[task_id] Ignoring task id pattern {:?}: {}", pattern, e);
            return TaskIdMatch::default();
        }
    };

    if let Some(m) = re.find(branch) {
        return TaskIdMatch::found(m.as_str(), TaskIdSource::Branch);
    }

    if let Some(m) = pr_title.and_then(|title| re.find(title)) {
        return TaskIdMatch::found(m.as_str(), TaskIdSource::Pr);
    }

    TaskIdMatch::default()
}
