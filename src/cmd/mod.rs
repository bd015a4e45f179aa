//! Command module structure for the git-calver CLI

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::PathBuf;

use calver::config::Config;
use calver::repository::GitRepository;
use calver::version::{CalVer, VersionArgs};

pub mod format;
pub mod list;
pub mod tag;

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Version format, overriding CALVER and the calver.format git config
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Modifier appended after a '-', e.g. RC or DEV
    #[arg(long, global = true)]
    pub modifier: Option<String>,

    /// Value for the MINOR segment
    #[arg(long, global = true)]
    pub minor: Option<u64>,

    /// Value for the MICRO segment
    #[arg(long, global = true)]
    pub micro: Option<u64>,

    /// Remote to push tags to (default: calver.remote or origin)
    #[arg(long, global = true)]
    pub remote: Option<String>,

    /// Repository directory (default: current directory)
    #[arg(short = 'C', long = "repo", global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Show what would happen without changing any refs
    #[arg(short, long, global = true)]
    pub dry_run: bool,

    /// Disable colour output
    #[arg(long, global = true)]
    pub no_colour: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Everything a command needs, resolved once per invocation.
pub struct CommandContext {
    pub repo: GitRepository,
    pub config: Config,
    pub version: CalVer,
    pub colour: bool,
    pub dry_run: bool,
}

impl CommandContext {
    /// Open the repository, resolve the format and build the version.
    pub fn load(globals: &GlobalArgs, auto_increment: bool) -> Result<Self> {
        let repo = open_repository(globals)?;
        let config = Config::load(&repo, globals.format.as_deref())
            .context("Failed to resolve version format")?;

        let remote = globals
            .remote
            .clone()
            .unwrap_or_else(|| config.remote.clone());
        let repo = repo.with_remote(remote);

        let version = CalVer::from_raw(
            &config.format,
            &VersionArgs {
                minor: globals.minor,
                micro: globals.micro,
                modifier: globals.modifier.clone(),
                auto_increment,
            },
        );

        Ok(Self {
            repo,
            config,
            version,
            colour: use_colour(globals),
            dry_run: globals.dry_run,
        })
    }
}

/// Open the repository named by `--repo`, or the current directory.
pub fn open_repository(globals: &GlobalArgs) -> Result<GitRepository> {
    let dir = match &globals.repo {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    GitRepository::open(dir).context("Not a git repository")
}

/// Colour is on for terminals unless `--no-colour` or `NO_COLOR` is set.
pub fn use_colour(globals: &GlobalArgs) -> bool {
    !globals.no_colour && atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
}
