//! Tag creation and re-creation.

use chrono::Datelike;
use serde::Serialize;
use tracing::{info, warn};

use super::{push_tag, target_commit, target_name, PushOutcome};
use crate::error::{ResolutionError, TagError};
use crate::repository::{Commit, Repository};
use crate::version::CalVer;

/// Options for the tag and retag operations.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// Tag name to use instead of the rendered version.
    pub name: Option<String>,
    /// Revision to tag: `HEAD`, a ref name or an abbreviated hash.
    pub revision: String,
    /// Push the result to the configured remote.
    pub push: bool,
    /// Resolve everything but leave refs untouched.
    pub dry_run: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            name: None,
            revision: "HEAD".to_string(),
            push: false,
            dry_run: false,
        }
    }
}

/// What a tag operation did (or, on a dry run, would do).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOutcome {
    pub name: String,
    pub commit_id: String,
    /// False when the name was already taken and nothing was written.
    pub created: bool,
    pub push: PushOutcome,
    pub dry_run: bool,
}

impl TagOutcome {
    pub fn short_id(&self) -> &str {
        self.commit_id.get(..7).unwrap_or(&self.commit_id)
    }
}

/// Create an annotated tag for `version` (or `options.name`) on
/// `options.revision`.
///
/// The tagger is the target commit's author and the message is the tag name.
/// An existing tag is reported with `created == false` rather than failing.
///
/// # Arguments
/// * `repo` - Repository to tag
/// * `version` - Version to render when no explicit name is given
/// * `options` - Tag operation options
/// * `now` - Date the version is rendered for
pub fn create_tag<R: Repository + ?Sized, D: Datelike>(
    repo: &R,
    version: &CalVer,
    options: &TagOptions,
    now: &D,
) -> Result<TagOutcome, TagError> {
    let name = target_name(repo, version, options.name.as_deref(), now)?;
    let commit = target_commit(repo, &options.revision)?;
    Ok(tag_commit(repo, &name, &commit, options)?)
}

/// Outcome of a retag: the removed tag's old target plus the new tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetagOutcome {
    pub previous_commit_id: Option<String>,
    /// Push of the deletion, made before the new tag is pushed.
    pub delete_push: PushOutcome,
    pub tag: TagOutcome,
}

/// Move an existing tag to `options.revision`.
///
/// The name is `options.name` or `version` rendered as-is; auto-increment is
/// not resolved, since the tag being moved must already exist.
///
/// # Returns
/// * `Err(ResolutionError::TagNotFound)` if no such tag exists
/// * `Err(TagError::RetagFailed)` if the old tag was deleted but the new one
///   could not be created; the error carries the old target
pub fn retag<R: Repository + ?Sized, D: Datelike>(
    repo: &R,
    version: &CalVer,
    options: &TagOptions,
    now: &D,
) -> Result<RetagOutcome, TagError> {
    let name = match &options.name {
        Some(name) => name.clone(),
        None => version.render(now)?,
    };

    let previous = repo
        .list_tag_references()?
        .into_iter()
        .find(|reference| reference.name == name)
        .ok_or_else(|| ResolutionError::TagNotFound(name.clone()))?;
    let previous_commit_id = repo.resolve_commit(&previous.target_id)?.map(|c| c.id);
    let commit = target_commit(repo, &options.revision)?;

    if options.dry_run {
        return Ok(RetagOutcome {
            previous_commit_id,
            delete_push: PushOutcome::NotRequested,
            tag: TagOutcome {
                name,
                commit_id: commit.id,
                created: true,
                push: PushOutcome::NotRequested,
                dry_run: true,
            },
        });
    }

    repo.delete_tag(&name)?;
    info!(tag = %name, previous = ?previous_commit_id, "deleted tag for retag");
    let delete_push = push_tag(repo, &name, true, options.push);
    let tag = tag_commit(repo, &name, &commit, options).map_err(|source| {
        warn!(tag = %name, previous = ?previous_commit_id, "tag deleted but not recreated");
        TagError::RetagFailed {
            name: name.clone(),
            previous: previous_commit_id.clone(),
            source,
        }
    })?;

    Ok(RetagOutcome {
        previous_commit_id,
        delete_push,
        tag,
    })
}

fn tag_commit<R: Repository + ?Sized>(
    repo: &R,
    name: &str,
    commit: &Commit,
    options: &TagOptions,
) -> Result<TagOutcome, ResolutionError> {
    if options.dry_run {
        return Ok(TagOutcome {
            name: name.to_string(),
            commit_id: commit.id.clone(),
            created: !repo.tag_exists(name)?,
            push: PushOutcome::NotRequested,
            dry_run: true,
        });
    }

    let created = repo.create_tag(name, &commit.id, &commit.author(), name)?;
    let push = if created {
        info!(tag = name, commit = commit.short_id(), "created tag");
        push_tag(repo, name, false, options.push)
    } else {
        info!(tag = name, "tag already exists");
        PushOutcome::NotRequested
    };

    Ok(TagOutcome {
        name: name.to_string(),
        commit_id: commit.id.clone(),
        created,
        push,
        dry_run: false,
    })
}
