//! Tag removal.

use chrono::Datelike;
use serde::Serialize;
use tracing::info;

use super::{push_tag, PushOutcome};
use crate::error::{ResolutionError, TagError};
use crate::repository::Repository;
use crate::version::CalVer;

/// Options for the untag operation.
#[derive(Debug, Clone, Default)]
pub struct UntagOptions {
    /// Tag name to remove instead of the rendered version.
    pub name: Option<String>,
    /// Also delete the tag on the configured remote.
    pub push: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntagOutcome {
    pub name: String,
    /// Commit the tag pointed at before removal, if it still resolves.
    pub commit_id: Option<String>,
    pub push: PushOutcome,
    pub dry_run: bool,
}

/// Delete a tag locally and, if requested, on the remote.
///
/// # Returns
/// * `Err(ResolutionError::TagNotFound)` if the tag does not exist locally
pub fn untag<R: Repository + ?Sized, D: Datelike>(
    repo: &R,
    version: &CalVer,
    options: &UntagOptions,
    now: &D,
) -> Result<UntagOutcome, TagError> {
    let name = match &options.name {
        Some(name) => name.clone(),
        None => version.render(now)?,
    };

    let reference = repo
        .list_tag_references()?
        .into_iter()
        .find(|reference| reference.name == name)
        .ok_or_else(|| ResolutionError::TagNotFound(name.clone()))?;
    let commit_id = repo.resolve_commit(&reference.target_id)?.map(|c| c.id);

    if options.dry_run {
        return Ok(UntagOutcome {
            name,
            commit_id,
            push: PushOutcome::NotRequested,
            dry_run: true,
        });
    }

    repo.delete_tag(&name)?;
    info!(tag = %name, commit = ?commit_id, "deleted tag");
    let push = push_tag(repo, &name, true, options.push);

    Ok(UntagOutcome {
        name,
        commit_id,
        push,
        dry_run: false,
    })
}
