//! Tag listing commands

use anyhow::{Context, Result};
use chrono::Local;

use calver::formatters;
use calver::tags::{latest_tag_group, scan_tag_groups, ListOptions};

use super::CommandContext;

/// List the newest tag groups matching the active format.
pub fn cmd_list(ctx: &CommandContext, limit: usize, changelog: bool, json: bool) -> Result<()> {
    let pattern = ctx.version.match_pattern()?;
    let options = ListOptions {
        limit,
        changelog,
        changelog_cap: ctx.config.changelog_cap,
    };
    let scan = scan_tag_groups(&ctx.repo, &pattern, &options).context("Failed to list tags")?;

    if json {
        println!("{}", formatters::format_groups_json(&scan.groups)?);
        return Ok(());
    }

    if scan.groups.is_empty() {
        println!("No tags found.");
        return Ok(());
    }

    print!(
        "{}",
        formatters::format_tag_groups(&scan.groups, &Local::now(), ctx.colour)
    );
    Ok(())
}

/// Show the most recent tag group matching the active format.
pub fn cmd_latest(ctx: &CommandContext, changelog: bool, json: bool, lean: bool) -> Result<()> {
    let pattern = ctx.version.match_pattern()?;
    let latest = latest_tag_group(
        &ctx.repo,
        &pattern,
        changelog && !lean,
        ctx.config.changelog_cap,
    )
    .context("Failed to find latest tag")?;

    if json {
        let groups = latest.as_ref().map(std::slice::from_ref).unwrap_or_default();
        println!("{}", formatters::format_groups_json(groups)?);
        return Ok(());
    }

    match latest {
        Some(group) if lean => println!("{}", group.primary_tag()),
        Some(group) => print!(
            "{}",
            formatters::format_tag_groups(&[group], &Local::now(), ctx.colour)
        ),
        None if lean => anyhow::bail!("No tag found"),
        None => println!("No tag found."),
    }
    Ok(())
}
