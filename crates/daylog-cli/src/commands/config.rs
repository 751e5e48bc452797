//! Config commands
//!
//! Show the effective workday settings and where each value came from.

use anyhow::Result;
use clap::Subcommand;

use super::helpers::warn_if_pattern_invalid;
use super::Context;
use crate::output::print_rows;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the default settings file location
    Path,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    print_rows(&ctx.settings, &ctx.settings, ctx.format, "No settings.")?;
    warn_if_pattern_invalid(&ctx.workday);
    Ok(())
}

fn show_path() -> Result<()> {
    match crate::settings::default_settings_path() {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("No configuration directory on this platform"),
    }
    Ok(())
}
