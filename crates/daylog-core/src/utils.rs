//! Time helpers shared by the segmenter and configuration

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime};

use crate::config::TimeZoneSetting;
use crate::error::{Error, Result};

/// Offset-less layouts accepted for commit timestamps, tried in order
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp into an instant expressed in `zone`.
///
/// Timestamps carrying an offset (`Z`, `+08:00`, `+0800`) are absolute and
/// only converted. Timestamps without one are read as wall-clock time in
/// `zone`.
pub fn parse_timestamp(value: &str, zone: &TimeZoneSetting) -> Result<DateTime<FixedOffset>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(zone.convert(&dt));
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(zone.convert(&dt));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return zone.resolve(&naive).ok_or_else(|| {
                Error::invalid_timestamp(format!("{} does not exist in zone {}", trimmed, zone))
            });
        }
    }

    Err(Error::invalid_timestamp(format!(
        "'{}' is not an ISO-8601 timestamp",
        trimmed
    )))
}

/// Parse a wall-clock "HH:MM" value
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| Error::config(format!("Invalid time '{}'. Use HH:MM", value)))
}

/// Whole minutes between two instants, rounded to the nearest minute
pub fn minutes_between(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> i64 {
    let millis = end.signed_duration_since(*start).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}
