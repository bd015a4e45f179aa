//! Low-level git command wrappers.
//!
//! Pure wrappers around the `git` executable without any knowledge of
//! formats or tag groups. [`crate::repository::GitRepository`] builds the
//! repository capability on top of these.

use std::path::Path;
use std::process::{Command, Output};

use chrono::DateTime;
use tracing::debug;

use crate::error::ResolutionError;
use crate::repository::Commit;

/// Field separator used in `--format` strings (ASCII unit separator).
pub const FIELD_SEP: char = '\x1f';

/// `git log` format producing one [`Commit`] per line.
pub const COMMIT_FORMAT: &str = "--format=%H%x1f%aI%x1f%an%x1f%ae%x1f%s";

fn git_command(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output, ResolutionError> {
    debug!(dir = %dir.display(), "git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .envs(envs.iter().copied())
        .current_dir(dir)
        .output()
        .map_err(|source| ResolutionError::Spawn {
            command: args.join(" "),
            source,
        })
}

/// Run a git command and return stdout on success.
///
/// # Errors
///
/// Returns an error if git cannot be spawned or exits with non-zero status.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String, ResolutionError> {
    run_git_with_env(dir, args, &[])
}

/// Like [`run_git`], with extra environment variables for the child.
pub fn run_git_with_env(
    dir: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Result<String, ResolutionError> {
    let output = git_command(dir, args, envs)?;

    if !output.status.success() {
        return Err(ResolutionError::Git {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run a git command that is allowed to fail, returning stdout only on success.
///
/// Spawn failures are still errors; a non-zero exit is `Ok(None)`.
pub fn try_git(dir: &Path, args: &[&str]) -> Result<Option<String>, ResolutionError> {
    let output = git_command(dir, args, &[])?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
}

/// Get a git config value by key.
///
/// Returns `Some(value)` if the key exists and has a non-empty value,
/// `None` otherwise.
pub fn get_git_config(dir: &Path, key: &str) -> Option<String> {
    let output = try_git(dir, &["config", "--get", key]).ok().flatten()?;
    let value = output.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Set a repository-local git config value.
pub fn set_git_config(dir: &Path, key: &str, value: &str) -> Result<(), ResolutionError> {
    run_git(dir, &["config", "--local", key, value])?;
    Ok(())
}

/// Parse one line produced with [`COMMIT_FORMAT`].
pub fn parse_commit_line(line: &str) -> Result<Commit, ResolutionError> {
    let parts: Vec<&str> = line.splitn(5, FIELD_SEP).collect();
    if parts.len() != 5 {
        return Err(ResolutionError::MalformedOutput(line.to_string()));
    }

    let author_time = DateTime::parse_from_rfc3339(parts[1])
        .map_err(|_| ResolutionError::MalformedOutput(line.to_string()))?;

    Ok(Commit {
        id: parts[0].to_string(),
        author_time,
        author_name: parts[2].to_string(),
        author_email: parts[3].to_string(),
        message: parts[4].to_string(),
    })
}

/// Parse `git log` output, skipping blank lines.
pub fn parse_commit_log(stdout: &str) -> Result<Vec<Commit>, ResolutionError> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_commit_line)
        .collect()
}
