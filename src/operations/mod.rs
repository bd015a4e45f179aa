//! Tag mutations and previews.
//!
//! This module holds the canonical implementation of the tagging commands.
//! Operations take their options explicitly and report what happened; the
//! CLI layer decides how to print it.

pub mod next;
pub mod tag;
pub mod untag;

pub use next::{next_tag, NextTag};
pub use tag::{create_tag, retag, RetagOutcome, TagOptions, TagOutcome};
pub use untag::{untag, UntagOptions, UntagOutcome};

use chrono::Datelike;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ResolutionError, TagError};
use crate::increment::resolve_auto_increment;
use crate::repository::{Commit, Repository};
use crate::tags::latest_tag_group;
use crate::version::CalVer;

/// Result of the optional push that follows a local change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum PushOutcome {
    NotRequested,
    Pushed,
    /// The local change stands; only the remote update failed.
    Failed(String),
}

impl PushOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PushOutcome::Failed(_))
    }
}

/// Fill in the auto-increment counter of `version` if it needs one.
///
/// The counter continues from the latest group matching the version's own
/// pattern; versions without auto-increment come back unchanged.
pub fn resolve_version<R: Repository + ?Sized, D: Datelike>(
    repo: &R,
    version: &CalVer,
    now: &D,
) -> Result<CalVer, TagError> {
    if !version.auto_increment() || version.increment().is_some() {
        return Ok(version.clone());
    }

    let latest = latest_tag_group(repo, &version.match_pattern()?, false, 1)?;
    let increment = resolve_auto_increment(version, latest.as_ref(), now);
    Ok(version.clone().with_increment(increment))
}

/// The explicit tag name if one was given, else `version` rendered for `now`.
pub(crate) fn target_name<R: Repository + ?Sized, D: Datelike>(
    repo: &R,
    version: &CalVer,
    explicit: Option<&str>,
    now: &D,
) -> Result<String, TagError> {
    match explicit {
        Some(name) => Ok(name.to_string()),
        None => Ok(resolve_version(repo, version, now)?.render(now)?),
    }
}

/// Resolve `revision` all the way to commit metadata.
pub(crate) fn target_commit<R: Repository + ?Sized>(
    repo: &R,
    revision: &str,
) -> Result<Commit, ResolutionError> {
    let id = repo.resolve_revision(revision)?;
    repo.resolve_commit(&id)?
        .ok_or_else(|| ResolutionError::RevisionNotFound(revision.to_string()))
}

/// Push (or push the deletion of) `name` when `requested`, downgrading
/// failures to [`PushOutcome::Failed`].
pub(crate) fn push_tag<R: Repository + ?Sized>(
    repo: &R,
    name: &str,
    delete: bool,
    requested: bool,
) -> PushOutcome {
    if !requested {
        return PushOutcome::NotRequested;
    }

    match repo.push_ref(name, delete) {
        Ok(()) => {
            info!(tag = name, delete, "pushed tag");
            PushOutcome::Pushed
        }
        Err(e) => {
            warn!(tag = name, delete, error = %e, "push failed");
            PushOutcome::Failed(e.to_string())
        }
    }
}
