//! Daylog CLI - reconstruct a work day from commits
//!
//! A command-line front end for the segmentation engine: reads exported
//! commits, shows the work sessions they imply and the worklog entries
//! those sessions reduce to.

mod commands;
mod output;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};

use settings::{load_settings, SettingsOverrides};

#[derive(Parser)]
#[command(name = "daylog")]
#[command(author, version, about = "Turn a day of commits into worklog entries", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Settings file (or set DAYLOG_CONFIG env var)
    #[arg(long, env = "DAYLOG_CONFIG", global = true)]
    config: Option<String>,

    /// Workday start, HH:MM
    #[arg(long, global = true)]
    day_start: Option<String>,

    /// Workday end, HH:MM
    #[arg(long, global = true)]
    day_end: Option<String>,

    /// Regular expression matching task ids
    #[arg(long, global = true)]
    task_id_regex: Option<String>,

    /// Zone for wall-clock times: local, Z, or +HH:MM
    #[arg(long, global = true)]
    utc_offset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show sessions and log entries for one date
    Day(commands::day::DayArgs),

    /// Produce log entries for every date in a range
    Range(commands::range::RangeArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let overrides = SettingsOverrides {
        day_start: cli.day_start,
        day_end: cli.day_end,
        task_id_regex: cli.task_id_regex,
        utc_offset: cli.utc_offset,
    };
    let loaded = match load_settings(cli.config.as_deref(), &overrides) {
        Ok(loaded) => loaded,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    };

    // Create context for commands
    let ctx = commands::Context {
        workday: loaded.workday,
        settings: loaded.rows,
        format: cli.format,
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Day(args) => commands::day::execute(&ctx, args).await,
        Commands::Range(args) => commands::range::execute(&ctx, args).await,
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    }
}
