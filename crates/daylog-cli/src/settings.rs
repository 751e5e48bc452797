//! Settings loading
//!
//! Reads the string-keyed workday settings from a JSON file and applies
//! command-line overrides on top. The CLI never writes settings back.

use anyhow::{Context as _, Result};
use daylog_core::config::{DAY_END_KEY, DAY_START_KEY, TASK_ID_REGEX_KEY, UTC_OFFSET_KEY};
use daylog_core::WorkdayConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tabled::Tabled;

const SETTING_KEYS: [&str; 4] = [DAY_START_KEY, DAY_END_KEY, TASK_ID_REGEX_KEY, UTC_OFFSET_KEY];

/// Values given on the command line, taking precedence over the file
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub day_start: Option<String>,
    pub day_end: Option<String>,
    pub task_id_regex: Option<String>,
    pub utc_offset: Option<String>,
}

impl SettingsOverrides {
    fn get(&self, key: &str) -> Option<&String> {
        match key {
            DAY_START_KEY => self.day_start.as_ref(),
            DAY_END_KEY => self.day_end.as_ref(),
            TASK_ID_REGEX_KEY => self.task_id_regex.as_ref(),
            UTC_OFFSET_KEY => self.utc_offset.as_ref(),
            _ => None,
        }
    }
}

/// One effective setting and where it came from
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SettingRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Effective workday config plus per-key origins
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub workday: WorkdayConfig,
    pub rows: Vec<SettingRow>,
}

/// Default settings file: `<config_dir>/daylog/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("daylog").join("settings.json"))
}

/// Load settings from `path` (or the default location) and apply overrides
pub fn load_settings(path: Option<&str>, overrides: &SettingsOverrides) -> Result<LoadedSettings> {
    let file_settings = read_settings_file(path)?;

    let mut merged = HashMap::new();
    let mut origins = HashMap::new();
    for key in SETTING_KEYS {
        if let Some(value) = overrides.get(key) {
            merged.insert(key.to_string(), value.clone());
            origins.insert(key, "flag");
        } else if let Some(value) = file_settings.get(key) {
            merged.insert(key.to_string(), value.clone());
            origins.insert(key, "file");
        }
    }

    let workday = WorkdayConfig::from_settings(&merged)?;
    let effective = workday.to_settings();
    let rows = SETTING_KEYS
        .iter()
        .map(|key| SettingRow {
            key: key.to_string(),
            value: effective.get(*key).cloned().unwrap_or_default(),
            source: origins.get(key).copied().unwrap_or("default").to_string(),
        })
        .collect();

    Ok(LoadedSettings { workday, rows })
}

/// Read a flat JSON object of settings.
///
/// An explicit path must exist; a missing default file means no settings.
fn read_settings_file(path: Option<&str>) -> Result<HashMap<String, String>> {
    let path = match path {
        Some(p) => PathBuf::from(shellexpand::tilde(p).into_owned()),
        None => match default_settings_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(HashMap::new()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("Settings file {} is not a JSON object", path.display()))?;

    log::debug!("Loaded {} settings from {}", raw.len(), path.display());

    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Null => None,
            other => Some((key, other.to_string())),
        })
        .collect())
}
