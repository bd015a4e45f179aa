//! Format inspection and storage commands

use anyhow::{Context, Result};

use calver::config::{self, Config};
use calver::error::ConfigError;
use calver::format::RawFormat;

use super::{open_repository, GlobalArgs};

/// Print the active format and where it came from.
pub fn cmd_format_show(globals: &GlobalArgs) -> Result<()> {
    let repo = open_repository(globals)?;
    match Config::load(&repo, globals.format.as_deref()) {
        Ok(config) => {
            println!("{} (from {})", config.format, config.source);
            Ok(())
        }
        Err(ConfigError::FormatNotSet) => {
            anyhow::bail!(
                "No format configured. Run `git-calver format set <FORMAT>` or set {}",
                config::FORMAT_ENV
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// Validate `raw` and store it under `calver.format`.
pub fn cmd_format_set(globals: &GlobalArgs, raw: &str) -> Result<()> {
    let format: RawFormat = raw
        .parse()
        .with_context(|| format!("Invalid format '{}'", raw))?;
    let repo = open_repository(globals)?;

    if globals.dry_run {
        println!("Would set {} to '{}'", config::FORMAT_KEY, format);
        return Ok(());
    }

    config::store_format(&repo, &format).context("Failed to write git config")?;
    println!("Set {} to '{}'", config::FORMAT_KEY, format);
    Ok(())
}
