//! CLI entry point for git-calver.

mod cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use cmd::{CommandContext, GlobalArgs};

#[derive(Parser)]
#[command(name = "git-calver")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"))]
#[command(about = "Calendar versioning for git tags", long_about = None)]
#[command(
    after_help = "FORMAT:\n    Two or three dotted segments from YYYY YY 0Y MM 0M WW 0W DD 0D MINOR MICRO,\n    optionally followed by -MODIFIER and -AUTO, e.g. YYYY.0M.0D-RC-AUTO.\n\n    The format is read from --format, then CALVER, then git config calver.format."
)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or set the stored version format
    Format {
        #[command(subcommand)]
        command: Option<FormatCommands>,
    },
    /// List tag groups matching the format, newest first
    List {
        /// Maximum number of tag groups to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
        /// Leave out changelogs
        #[arg(long)]
        no_changelog: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the latest tag group matching the format
    Latest {
        /// Output the tag name only
        #[arg(long)]
        lean: bool,
        /// Leave out the changelog
        #[arg(long)]
        no_changelog: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what the next tag will be
    Next {
        /// Revision the tag would point at
        #[arg(long, default_value = "HEAD")]
        hash: String,
        /// Include an auto-incremented counter after the modifier
        #[arg(short = 'i', long)]
        auto_increment: bool,
    },
    /// Create a tag for the current version
    Tag {
        /// Tag name (default: the rendered version)
        name: Option<String>,
        /// Push the tag after creating it
        #[arg(short, long)]
        push: bool,
        /// Add an auto-incremented counter after the modifier
        #[arg(short = 'i', long)]
        auto_increment: bool,
        /// Revision to tag
        #[arg(long, default_value = "HEAD")]
        hash: String,
        /// Output the tag name only
        #[arg(short, long)]
        lean: bool,
    },
    /// Move an existing tag to another revision
    Retag {
        /// Tag name (default: the rendered version)
        name: Option<String>,
        /// Push the deletion and the new tag
        #[arg(short, long)]
        push: bool,
        /// Revision to move the tag to
        #[arg(long, default_value = "HEAD")]
        hash: String,
    },
    /// Delete a tag
    Untag {
        /// Tag name (default: the rendered version)
        name: Option<String>,
        /// Also delete the tag on the remote
        #[arg(short, long)]
        push: bool,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum FormatCommands {
    /// Validate a format and store it in git config
    Set {
        /// Format string, e.g. YYYY.0M.0D-RC
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.globals.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("git_calver={level},calver={level}", level = log_level).into()
            }),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let globals = &cli.globals;
    match cli.command {
        None => cmd::tag::cmd_current(&CommandContext::load(globals, false)?),
        Some(Commands::Format { command }) => match command {
            None => cmd::format::cmd_format_show(globals),
            Some(FormatCommands::Set { format }) => cmd::format::cmd_format_set(globals, &format),
        },
        Some(Commands::List {
            limit,
            no_changelog,
            json,
        }) => cmd::list::cmd_list(
            &CommandContext::load(globals, false)?,
            limit,
            !no_changelog,
            json,
        ),
        Some(Commands::Latest {
            lean,
            no_changelog,
            json,
        }) => cmd::list::cmd_latest(
            &CommandContext::load(globals, false)?,
            !no_changelog,
            json,
            lean,
        ),
        Some(Commands::Next {
            hash,
            auto_increment,
        }) => cmd::tag::cmd_next(&CommandContext::load(globals, auto_increment)?, &hash),
        Some(Commands::Tag {
            name,
            push,
            auto_increment,
            hash,
            lean,
        }) => cmd::tag::cmd_tag(
            &CommandContext::load(globals, auto_increment)?,
            name,
            &hash,
            push,
            lean,
        ),
        Some(Commands::Retag { name, push, hash }) => {
            cmd::tag::cmd_retag(&CommandContext::load(globals, false)?, name, &hash, push)
        }
        Some(Commands::Untag { name, push }) => {
            cmd::tag::cmd_untag(&CommandContext::load(globals, false)?, name, push)
        }
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }
}

fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "git-calver", &mut io::stdout());
    Ok(())
}
