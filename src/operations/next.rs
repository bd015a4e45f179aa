//! Preview of the next tag.

use chrono::Datelike;
use serde::Serialize;

use super::{target_commit, target_name};
use crate::error::TagError;
use crate::repository::Repository;
use crate::version::CalVer;

/// The tag `create_tag` would produce right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextTag {
    pub name: String,
    pub commit_id: String,
    pub exists: bool,
}

/// Render the next version for `now` against `revision` without touching
/// any refs.
pub fn next_tag<R: Repository + ?Sized, D: Datelike>(
    repo: &R,
    version: &CalVer,
    revision: &str,
    now: &D,
) -> Result<NextTag, TagError> {
    let name = target_name(repo, version, None, now)?;
    let commit = target_commit(repo, revision)?;
    let exists = repo.tag_exists(&name)?;
    Ok(NextTag {
        name,
        commit_id: commit.id,
        exists,
    })
}
