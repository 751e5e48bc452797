//! Content-addressed memoization of segmentation results
//!
//! Segmentation is a pure function of its inputs, so callers that
//! recompute sessions repeatedly (e.g. while a user tweaks settings) can
//! key results by a hash of those inputs.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};

use crate::config::WorkdayConfig;
use crate::error::Result;
use crate::models::{Commit, WorkSession};
use crate::services::segmenter::segment_sessions;

/// Entries kept by [`SessionCache::new`] before the oldest is evicted
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// SHA-256 over the commits, date, workday bounds, pattern and zone
pub fn segmentation_key(
    commits: &[Commit],
    date: NaiveDate,
    config: &WorkdayConfig,
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(commits)?);
    for part in [
        date.to_string(),
        config.day_start.format("%H:%M").to_string(),
        config.day_end.format("%H:%M").to_string(),
        config.task_id_pattern.clone(),
        config.time_zone.to_string(),
    ] {
        hasher.update([0u8]);
        hasher.update(part.as_bytes());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// In-memory session cache keyed by [`segmentation_key`]
///
/// Holds at most `max_entries` results; inserting past that evicts the
/// oldest insertion.
#[derive(Debug)]
pub struct SessionCache {
    entries: HashMap<String, Vec<WorkSession>>,
    order: VecDeque<String>,
    max_entries: usize,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache bounded to `max_entries` (at least one)
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Return cached sessions for these inputs, segmenting on a miss.
    ///
    /// Segmentation errors are returned and not cached.
    pub fn get_or_segment(
        &mut self,
        commits: &[Commit],
        date: NaiveDate,
        config: &WorkdayConfig,
    ) -> Result<Vec<WorkSession>> {
        let key = segmentation_key(commits, date, config)?;
        if let Some(sessions) = self.entries.get(&key) {
            log::debug!("[cache] hit for {} ({})", date, &key[..12]);
            return Ok(sessions.clone());
        }

        let sessions = segment_sessions(commits, date, config)?;
        while self.entries.len() >= self.max_entries {
            match self.order.pop_front() {
                Some(oldest) => {
                    log::debug!("[cache] evicting {}", &oldest[..12]);
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, sessions.clone());
        Ok(sessions)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeZoneSetting;
    use crate::models::{CommitAuthor, Repository};

    fn commit(sha: &str, branch: &str, date: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            short_sha: sha.to_string(),
            message: "wip".to_string(),
            date: date.to_string(),
            url: String::new(),
            repository: Repository {
                name: "web".to_string(),
                full_name: "acme/web".to_string(),
            },
            author: CommitAuthor {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                date: date.to_string(),
            },
            branch: branch.to_string(),
            pull_request: None,
        }
    }

    fn config() -> WorkdayConfig {
        WorkdayConfig::default().with_time_zone(TimeZoneSetting::parse("Z").unwrap())
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_segmentation_key_consistent() {
        let commits = vec![commit("c1", "feature/DMO-1", "2024-01-01T10:00:00Z")];
        let a = segmentation_key(&commits, day(), &config()).unwrap();
        let b = segmentation_key(&commits, day(), &config()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_segmentation_key_changes_with_inputs() {
        let commits = vec![commit("c1", "feature/DMO-1", "2024-01-01T10:00:00Z")];
        let base = segmentation_key(&commits, day(), &config()).unwrap();

        let other_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_ne!(base, segmentation_key(&commits, other_day, &config()).unwrap());

        let mut cfg = config();
        cfg.task_id_pattern = r"ABC-\d+".to_string();
        assert_ne!(base, segmentation_key(&commits, day(), &cfg).unwrap());

        let moved = vec![commit("c1", "feature/DMO-2", "2024-01-01T10:00:00Z")];
        assert_ne!(base, segmentation_key(&moved, day(), &config()).unwrap());
    }

    #[test]
    fn test_cache_hit_returns_same_sessions() {
        let commits = vec![
            commit("c1", "a", "2024-01-01T09:30:00Z"),
            commit("c2", "b", "2024-01-01T11:00:00Z"),
        ];
        let mut cache = SessionCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_segment(&commits, day(), &config()).unwrap();
        let second = cache.get_or_segment(&commits, day(), &config()).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_evicts_oldest_when_full() {
        let first = vec![commit("c1", "a", "2024-01-01T10:00:00Z")];
        let second = vec![commit("c2", "b", "2024-01-01T11:00:00Z")];
        let third = vec![commit("c3", "c", "2024-01-01T12:00:00Z")];
        let mut cache = SessionCache::with_max_entries(2);

        cache.get_or_segment(&first, day(), &config()).unwrap();
        cache.get_or_segment(&second, day(), &config()).unwrap();
        cache.get_or_segment(&third, day(), &config()).unwrap();
        assert_eq!(cache.len(), 2);

        let first_key = segmentation_key(&first, day(), &config()).unwrap();
        let third_key = segmentation_key(&third, day(), &config()).unwrap();
        assert!(!cache.entries.contains_key(&first_key));
        assert!(cache.entries.contains_key(&third_key));
    }

    #[test]
    fn test_cache_zero_limit_still_holds_one() {
        let commits = vec![commit("c1", "a", "2024-01-01T10:00:00Z")];
        let mut cache = SessionCache::with_max_entries(0);
        cache.get_or_segment(&commits, day(), &config()).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let commits = vec![commit("c1", "a", "garbage")];
        let mut cache = SessionCache::new();
        assert!(cache.get_or_segment(&commits, day(), &config()).is_err());
        assert!(cache.is_empty());
    }
}
