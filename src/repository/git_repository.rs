use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Commit, Repository, Signature, TagReference, TimeWindow};
use crate::error::ResolutionError;
use crate::git_ops::{self, COMMIT_FORMAT, FIELD_SEP};

/// Date layout git's `--since`/`--until` parse without ambiguity.
const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Default remote for pushing tags.
pub const DEFAULT_REMOTE: &str = "origin";

/// [`Repository`] backed by the `git` executable in a working directory.
#[derive(Debug, Clone)]
pub struct GitRepository {
    dir: PathBuf,
    remote: String,
}

impl GitRepository {
    /// Open the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NotARepository`] when `dir` is not inside a
    /// git work tree.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ResolutionError> {
        let dir = dir.into();
        if git_ops::try_git(&dir, &["rev-parse", "--git-dir"])?.is_none() {
            return Err(ResolutionError::NotARepository(dir));
        }
        Ok(Self {
            dir,
            remote: DEFAULT_REMOTE.to_string(),
        })
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn config(&self, key: &str) -> Option<String> {
        git_ops::get_git_config(&self.dir, key)
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<(), ResolutionError> {
        git_ops::set_git_config(&self.dir, key, value)
    }
}

impl Repository for GitRepository {
    fn list_tag_references(&self) -> Result<Vec<TagReference>, ResolutionError> {
        let stdout = git_ops::run_git(
            &self.dir,
            &[
                "for-each-ref",
                "--format=%(refname:strip=2)%1f%(objectname)",
                "refs/tags",
            ],
        )?;

        let mut references = Vec::new();
        for line in stdout.lines().filter(|line| !line.is_empty()) {
            match line.split_once(FIELD_SEP) {
                Some((name, target_id)) => references.push(TagReference {
                    name: name.to_string(),
                    target_id: target_id.to_string(),
                }),
                None => debug!(line, "ignoring unparseable tag ref"),
            }
        }
        Ok(references)
    }

    fn resolve_commit(&self, target_id: &str) -> Result<Option<Commit>, ResolutionError> {
        let peeled = format!("{}^{{commit}}", target_id);
        let Some(stdout) = git_ops::try_git(&self.dir, &["log", "-1", COMMIT_FORMAT, &peeled])?
        else {
            return Ok(None);
        };

        match stdout.lines().find(|line| !line.trim().is_empty()) {
            Some(line) => git_ops::parse_commit_line(line).map(Some),
            None => Ok(None),
        }
    }

    fn resolve_revision(&self, revision: &str) -> Result<String, ResolutionError> {
        let revision = if revision.is_empty() { "HEAD" } else { revision };
        let peeled = format!("{}^{{commit}}", revision);

        git_ops::try_git(&self.dir, &["rev-parse", "--verify", "--quiet", &peeled])?
            .map(|stdout| stdout.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResolutionError::RevisionNotFound(revision.to_string()))
    }

    fn create_tag(
        &self,
        name: &str,
        commit_id: &str,
        tagger: &Signature,
        message: &str,
    ) -> Result<bool, ResolutionError> {
        if self.tag_exists(name)? {
            return Ok(false);
        }

        // git records the committer identity as the tagger
        git_ops::run_git_with_env(
            &self.dir,
            &["tag", "-a", name, commit_id, "-m", message],
            &[
                ("GIT_COMMITTER_NAME", tagger.name.as_str()),
                ("GIT_COMMITTER_EMAIL", tagger.email.as_str()),
            ],
        )?;
        Ok(true)
    }

    fn delete_tag(&self, name: &str) -> Result<(), ResolutionError> {
        if !self.tag_exists(name)? {
            return Err(ResolutionError::TagNotFound(name.to_string()));
        }
        git_ops::run_git(&self.dir, &["tag", "-d", name])?;
        Ok(())
    }

    fn push_ref(&self, name: &str, delete: bool) -> Result<(), ResolutionError> {
        let refspec = if delete {
            format!(":refs/tags/{}", name)
        } else {
            format!("refs/tags/{0}:refs/tags/{0}", name)
        };
        git_ops::run_git(&self.dir, &["push", &self.remote, &refspec])?;
        Ok(())
    }

    fn commit_history(&self, window: &TimeWindow) -> Result<Vec<Commit>, ResolutionError> {
        let until = format!("--until={}", window.until.format(GIT_DATE_FORMAT));
        let since = window
            .since
            .map(|since| format!("--since={}", since.format(GIT_DATE_FORMAT)));

        let mut args = vec!["log", "HEAD", "--date-order", COMMIT_FORMAT, until.as_str()];
        if let Some(since) = since.as_deref() {
            args.push(since);
        }

        // An unborn HEAD or shallow boundary has no history to offer.
        match git_ops::try_git(&self.dir, &args)? {
            Some(stdout) => git_ops::parse_commit_log(&stdout),
            None => Ok(Vec::new()),
        }
    }
}
