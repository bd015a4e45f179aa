use std::cell::RefCell;
use std::collections::HashMap;

use super::{Commit, Repository, Signature, TagReference, TimeWindow};
use crate::error::ResolutionError;

/// In-memory implementation of [`Repository`] for testing.
///
/// Tags may point straight at a commit id or at a tag object registered with
/// [`InMemoryRepository::with_tag_object`], mirroring annotated tags.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    commits: Vec<Commit>,
    head: Option<String>,
    tag_objects: HashMap<String, String>,
    shallow: bool,
    push_error: Option<String>,
    create_error: Option<String>,
    tags: RefCell<Vec<TagReference>>,
    annotations: RefCell<HashMap<String, (Signature, String)>>,
    pushes: RefCell<Vec<(String, bool)>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit; the most recently added commit becomes `HEAD`.
    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.head = Some(commit.id.clone());
        self.commits.push(commit);
        self
    }

    pub fn with_commits(self, commits: impl IntoIterator<Item = Commit>) -> Self {
        commits.into_iter().fold(self, Self::with_commit)
    }

    /// Add a lightweight tag pointing at `target_id`.
    pub fn with_tag(self, name: &str, target_id: &str) -> Self {
        self.tags.borrow_mut().push(TagReference {
            name: name.to_string(),
            target_id: target_id.to_string(),
        });
        self
    }

    /// Register a tag object id that peels to `commit_id`.
    pub fn with_tag_object(mut self, object_id: &str, commit_id: &str) -> Self {
        self.tag_objects
            .insert(object_id.to_string(), commit_id.to_string());
        self
    }

    /// Behave like a shallow clone: history queries return nothing.
    pub fn shallow(mut self) -> Self {
        self.shallow = true;
        self
    }

    /// Make every push fail with `message`.
    pub fn failing_pushes(mut self, message: &str) -> Self {
        self.push_error = Some(message.to_string());
        self
    }

    /// Make every tag creation fail with `message`.
    pub fn failing_tag_creates(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    /// Names of all current tags, in listing order.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.borrow().iter().map(|t| t.name.clone()).collect()
    }

    /// Target of a tag, if it exists.
    pub fn tag_target(&self, name: &str) -> Option<String> {
        self.tags
            .borrow()
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.target_id.clone())
    }

    /// Tagger and message recorded by [`Repository::create_tag`].
    pub fn annotation(&self, name: &str) -> Option<(Signature, String)> {
        self.annotations.borrow().get(name).cloned()
    }

    /// Every push attempted so far as `(name, delete)`.
    pub fn pushes(&self) -> Vec<(String, bool)> {
        self.pushes.borrow().clone()
    }

    fn commit(&self, id: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.id == id)
    }
}

impl Repository for InMemoryRepository {
    fn list_tag_references(&self) -> Result<Vec<TagReference>, ResolutionError> {
        Ok(self.tags.borrow().clone())
    }

    fn resolve_commit(&self, target_id: &str) -> Result<Option<Commit>, ResolutionError> {
        let id = self
            .tag_objects
            .get(target_id)
            .map(String::as_str)
            .unwrap_or(target_id);
        Ok(self.commit(id).cloned())
    }

    fn resolve_revision(&self, revision: &str) -> Result<String, ResolutionError> {
        let not_found = || ResolutionError::RevisionNotFound(revision.to_string());

        if revision.is_empty() || revision == "HEAD" {
            return self.head.clone().ok_or_else(not_found);
        }

        if let Some(target) = self.tag_target(revision) {
            return self
                .resolve_commit(&target)?
                .map(|c| c.id)
                .ok_or_else(not_found);
        }

        let mut matches = self.commits.iter().filter(|c| c.id.starts_with(revision));
        match (matches.next(), matches.next()) {
            (Some(commit), None) => Ok(commit.id.clone()),
            _ => Err(not_found()),
        }
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
        if self.commit(commit_id).is_none() {
            return Err(ResolutionError::RevisionNotFound(commit_id.to_string()));
        }
        if let Some(message) = &self.create_error {
            return Err(ResolutionError::Git {
                command: format!("tag -a {}", name),
                stderr: message.clone(),
            });
        }

        self.tags.borrow_mut().push(TagReference {
            name: name.to_string(),
            target_id: commit_id.to_string(),
        });
        self.annotations
            .borrow_mut()
            .insert(name.to_string(), (tagger.clone(), message.to_string()));
        Ok(true)
    }

    fn delete_tag(&self, name: &str) -> Result<(), ResolutionError> {
        let mut tags = self.tags.borrow_mut();
        let before = tags.len();
        tags.retain(|t| t.name != name);
        if tags.len() == before {
            return Err(ResolutionError::TagNotFound(name.to_string()));
        }
        self.annotations.borrow_mut().remove(name);
        Ok(())
    }

    fn push_ref(&self, name: &str, delete: bool) -> Result<(), ResolutionError> {
        self.pushes.borrow_mut().push((name.to_string(), delete));
        match &self.push_error {
            Some(message) => Err(ResolutionError::Git {
                command: format!("push origin refs/tags/{}", name),
                stderr: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn commit_history(&self, window: &TimeWindow) -> Result<Vec<Commit>, ResolutionError> {
        if self.shallow {
            return Ok(Vec::new());
        }
        let mut history: Vec<Commit> = self
            .commits
            .iter()
            .filter(|c| window.contains(&c.author_time))
            .cloned()
            .collect();
        history.sort_by(|a, b| b.author_time.cmp(&a.author_time));
        Ok(history)
    }
}
