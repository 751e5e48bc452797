//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod config;
pub mod day;
pub mod helpers;
pub mod range;
pub mod types;

use crate::output::OutputFormat;
use crate::settings::SettingRow;
use daylog_core::WorkdayConfig;

/// Shared context for all commands
pub struct Context {
    pub workday: WorkdayConfig,
    pub settings: Vec<SettingRow>,
    pub format: OutputFormat,
    pub quiet: bool,
}
