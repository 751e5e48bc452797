//! Workday configuration
//!
//! Typed view over the string-keyed settings the segmenter consumes:
//! nominal workday bounds, the task id pattern and the zone used for
//! wall-clock times.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::error::{Error, Result};
use crate::services::task_id::compile_task_pattern;
use crate::utils::parse_clock_time;

pub const DAY_START_KEY: &str = "dayStartTime";
pub const DAY_END_KEY: &str = "dayEndTime";
pub const TASK_ID_REGEX_KEY: &str = "taskIdRegex";
pub const UTC_OFFSET_KEY: &str = "utcOffset";

pub const DEFAULT_DAY_START: &str = "09:00";
pub const DEFAULT_DAY_END: &str = "17:00";
pub const DEFAULT_TASK_ID_REGEX: &str = r"DMO-\d+";

/// Zone in which wall-clock times (workday bounds, offset-less commits) are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSetting {
    /// Host time zone
    #[default]
    Local,
    Fixed(FixedOffset),
}

/// Two ASCII digits, at most `max`
fn offset_component(digits: &str, max: i32) -> Option<i32> {
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|value| *value <= max)
}

impl TimeZoneSetting {
    /// Parse `local`, `Z`/`UTC`, or a `+HH:MM` / `-HH:MM` offset
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(TimeZoneSetting::Local);
        }
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(TimeZoneSetting::Fixed(Utc.fix()));
        }

        let invalid =
            || Error::config(format!("Invalid UTC offset '{}'. Use local or +HH:MM", value));

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let hours = offset_component(hours, 23).ok_or_else(invalid)?;
        let minutes = offset_component(minutes, 59).ok_or_else(invalid)?;

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(TimeZoneSetting::Fixed)
            .ok_or_else(invalid)
    }

    /// Resolve a wall-clock time in this zone to an instant
    ///
    /// Returns `None` for times skipped by a DST transition.
    pub fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            TimeZoneSetting::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            TimeZoneSetting::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }

    /// Express an instant in this zone
    pub fn convert(&self, instant: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            TimeZoneSetting::Local => instant.with_timezone(&Local).fixed_offset(),
            TimeZoneSetting::Fixed(offset) => instant.with_timezone(offset),
        }
    }
}

impl Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Settings consumed by the segmentation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkdayConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    /// Regular expression locating a task id; not validated on load
    pub task_id_pattern: String,
    pub time_zone: TimeZoneSetting,
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid default start"),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).expect("valid default end"),
            task_id_pattern: DEFAULT_TASK_ID_REGEX.to_string(),
            time_zone: TimeZoneSetting::Local,
        }
    }
}

impl WorkdayConfig {
    /// Build a config from "HH:MM" bounds and a task id pattern
    pub fn new(day_start: &str, day_end: &str, task_id_pattern: impl Into<String>) -> Result<Self> {
        let config = Self {
            day_start: parse_clock_time(day_start)?,
            day_end: parse_clock_time(day_end)?,
            task_id_pattern: task_id_pattern.into(),
            time_zone: TimeZoneSetting::Local,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the config from string-keyed settings.
    ///
    /// Missing or blank keys fall back to defaults and unknown keys are
    /// ignored. The task id pattern is taken as-is even when it does not
    /// compile.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self> {
        let value = |key: &str, default: &'static str| -> String {
            settings
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let pattern = settings
            .get(TASK_ID_REGEX_KEY)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_TASK_ID_REGEX.to_string());

        let mut config = Self::new(
            &value(DAY_START_KEY, DEFAULT_DAY_START),
            &value(DAY_END_KEY, DEFAULT_DAY_END),
            pattern,
        )?;
        config.time_zone = TimeZoneSetting::parse(&value(UTC_OFFSET_KEY, "local"))?;
        Ok(config)
    }

    /// Set the zone used for wall-clock times
    pub fn with_time_zone(mut self, time_zone: TimeZoneSetting) -> Self {
        self.time_zone = time_zone;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.day_end <= self.day_start {
            return Err(Error::config(format!(
                "{} ({}) must be later than {} ({})",
                DAY_END_KEY,
                self.day_end.format("%H:%M"),
                DAY_START_KEY,
                self.day_start.format("%H:%M")
            )));
        }
        Ok(())
    }

    /// The compile error of the task id pattern, if it has one
    pub fn pattern_error(&self) -> Option<Error> {
        compile_task_pattern(&self.task_id_pattern).err()
    }

    /// Nominal workday start and end instants for `date`
    pub fn day_bounds(
        &self,
        date: NaiveDate,
    ) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let resolve = |time: NaiveTime| {
            self.time_zone.resolve(&date.and_time(time)).ok_or_else(|| {
                Error::config(format!(
                    "{} {} does not exist in zone {}",
                    date,
                    time.format("%H:%M"),
                    self.time_zone
                ))
            })
        };
        Ok((resolve(self.day_start)?, resolve(self.day_end)?))
    }

    /// Calendar date of an instant in the workday zone
    pub fn local_date(&self, instant: &DateTime<FixedOffset>) -> NaiveDate {
        self.time_zone.convert(instant).date_naive()
    }

    /// The config as string-keyed settings
    pub fn to_settings(&self) -> HashMap<String, String> {
        HashMap::from([
            (DAY_START_KEY.to_string(), self.day_start.format("%H:%M").to_string()),
            (DAY_END_KEY.to_string(), self.day_end.format("%H:%M").to_string()),
            (TASK_ID_REGEX_KEY.to_string(), self.task_id_pattern.clone()),
            (UTC_OFFSET_KEY.to_string(), self.time_zone.to_string()),
        ])
    }
}
