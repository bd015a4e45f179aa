//! The narrow repository capability the engines depend on.
//!
//! [`GitRepository`] drives the `git` executable; [`InMemoryRepository`]
//! holds a fixed history for tests.

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;

use crate::error::ResolutionError;

pub mod git_repository;
pub mod in_memory;

pub use git_repository::GitRepository;
pub use in_memory::InMemoryRepository;

/// A tag ref as listed by the repository, before peeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReference {
    pub name: String,
    pub target_id: String,
}

/// Commit metadata needed for grouping and changelogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: String,
    pub author_time: DateTime<FixedOffset>,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
}

impl Commit {
    /// Abbreviated commit id, as shown in listings.
    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(&self.id)
    }

    /// The identity used when tagging this commit.
    pub fn author(&self) -> Signature {
        Signature {
            name: self.author_name.clone(),
            email: self.author_email.clone(),
        }
    }
}

/// Tagger identity attached to annotated tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

/// Commit-time bounds for a history query. Both ends are inclusive; a
/// missing `since` reaches back to the first commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: Option<DateTime<FixedOffset>>,
    pub until: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// The window attributed to a tag group at `until` whose next older group
    /// sits at `previous`: `(previous + 1s, until]`.
    pub fn after(previous: Option<DateTime<FixedOffset>>, until: DateTime<FixedOffset>) -> Self {
        Self {
            since: previous.map(|when| when + Duration::seconds(1)),
            until,
        }
    }

    pub fn contains(&self, when: &DateTime<FixedOffset>) -> bool {
        let after_since = self.since.map_or(true, |since| *when >= since);
        after_since && *when <= self.until
    }
}

/// Version-control operations consumed by tag resolution and tagging.
pub trait Repository {
    /// List every tag ref with its raw target id.
    fn list_tag_references(&self) -> Result<Vec<TagReference>, ResolutionError>;

    /// Peel `target_id` to a commit; `Ok(None)` when it does not resolve.
    fn resolve_commit(&self, target_id: &str) -> Result<Option<Commit>, ResolutionError>;

    /// Resolve `HEAD`, a ref name or an abbreviated hash to a full commit id.
    fn resolve_revision(&self, revision: &str) -> Result<String, ResolutionError>;

    /// Create an annotated tag; `Ok(false)` when the name is already taken.
    fn create_tag(
        &self,
        name: &str,
        commit_id: &str,
        tagger: &Signature,
        message: &str,
    ) -> Result<bool, ResolutionError>;

    fn delete_tag(&self, name: &str) -> Result<(), ResolutionError>;

    /// Push (or delete, when `delete` is set) `refs/tags/<name>` on the remote.
    fn push_ref(&self, name: &str, delete: bool) -> Result<(), ResolutionError>;

    /// Commits inside `window`, newest first by commit time.
    fn commit_history(&self, window: &TimeWindow) -> Result<Vec<Commit>, ResolutionError>;

    fn tag_exists(&self, name: &str) -> Result<bool, ResolutionError> {
        Ok(self
            .list_tag_references()?
            .iter()
            .any(|reference| reference.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_window_after_previous_group() {
        let window = TimeWindow::after(
            Some(at("2024-01-01T10:00:00Z")),
            at("2024-01-02T10:00:00Z"),
        );
        assert!(!window.contains(&at("2024-01-01T10:00:00Z")));
        assert!(window.contains(&at("2024-01-01T10:00:01Z")));
        assert!(window.contains(&at("2024-01-02T10:00:00Z")));
        assert!(!window.contains(&at("2024-01-02T10:00:01Z")));
    }

    #[test]
    fn test_window_without_previous_reaches_back() {
        let window = TimeWindow::after(None, at("2024-01-02T10:00:00Z"));
        assert!(window.contains(&at("1970-01-01T00:00:00Z")));
    }

    #[test]
    fn test_short_id() {
        let commit = Commit {
            id: "0123456789abcdef".to_string(),
            author_time: at("2024-01-01T00:00:00Z"),
            author_name: "Test User".to_string(),
            author_email: "test@example.com".to_string(),
            message: "msg".to_string(),
        };
        assert_eq!(commit.short_id(), "0123456");
        assert_eq!(commit.author().email, "test@example.com");
    }
}
