//! Tag mutation and preview commands

use anyhow::{Context, Result};
use chrono::Local;

use calver::formatters;
use calver::operations::{
    self, create_tag, next_tag, retag, untag, PushOutcome, TagOptions, UntagOptions,
};

use super::CommandContext;

fn push_failed(push: &PushOutcome, remote: &str) -> Result<()> {
    if push.is_failed() {
        anyhow::bail!("Push to '{}' failed; the local change was kept", remote);
    }
    Ok(())
}

/// Print the version that would be rendered right now.
pub fn cmd_current(ctx: &CommandContext) -> Result<()> {
    let now = Local::now();
    let version = operations::resolve_version(&ctx.repo, &ctx.version, &now)?;
    println!("{}", version.render(&now)?);
    Ok(())
}

/// Preview the next tag and whether it already exists.
pub fn cmd_next(ctx: &CommandContext, revision: &str) -> Result<()> {
    let next = next_tag(&ctx.repo, &ctx.version, revision, &Local::now())
        .context("Failed to resolve next tag")?;
    println!("{}", formatters::format_next(&next, ctx.colour));
    Ok(())
}

pub fn cmd_tag(
    ctx: &CommandContext,
    name: Option<String>,
    revision: &str,
    push: bool,
    lean: bool,
) -> Result<()> {
    let options = TagOptions {
        name,
        revision: revision.to_string(),
        push,
        dry_run: ctx.dry_run,
    };
    let outcome = create_tag(&ctx.repo, &ctx.version, &options, &Local::now())
        .context("Failed to create tag")?;

    if lean {
        println!("{}", outcome.name);
    } else {
        println!(
            "{}",
            formatters::format_tag_outcome(&outcome, ctx.repo.remote(), ctx.colour)
        );
    }
    push_failed(&outcome.push, ctx.repo.remote())
}

pub fn cmd_retag(
    ctx: &CommandContext,
    name: Option<String>,
    revision: &str,
    push: bool,
) -> Result<()> {
    let options = TagOptions {
        name,
        revision: revision.to_string(),
        push,
        dry_run: ctx.dry_run,
    };
    let outcome = retag(&ctx.repo, &ctx.version, &options, &Local::now())
        .context("Failed to retag")?;

    println!(
        "{}",
        formatters::format_retag_outcome(&outcome, ctx.repo.remote(), ctx.colour)
    );
    push_failed(&outcome.delete_push, ctx.repo.remote())?;
    push_failed(&outcome.tag.push, ctx.repo.remote())
}

pub fn cmd_untag(ctx: &CommandContext, name: Option<String>, push: bool) -> Result<()> {
    let options = UntagOptions {
        name,
        push,
        dry_run: ctx.dry_run,
    };
    let outcome = untag(&ctx.repo, &ctx.version, &options, &Local::now())
        .context("Failed to delete tag")?;

    println!(
        "{}",
        formatters::format_untag_outcome(&outcome, ctx.repo.remote(), ctx.colour)
    );
    push_failed(&outcome.push, ctx.repo.remote())
}
