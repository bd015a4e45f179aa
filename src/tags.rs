//! Tag discovery and grouping.
//!
//! Tags matching a version pattern are resolved to commits and collapsed so
//! that every commit appears once, however many names point at it. Groups
//! come back newest first with the newest flagged as latest.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::debug;

use crate::changelog::attach_change_log_with_floor;
use crate::error::ResolutionError;
use crate::repository::{Commit, Repository};
use crate::version::MatchPattern;

/// Every tag name that points at one commit, treated as one release point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagGroup {
    pub commit_id: String,
    pub tag_names: Vec<String>,
    pub when: DateTime<FixedOffset>,
    pub is_latest: bool,
    /// The tagged commit itself; also the first changelog entry once a
    /// changelog is attached.
    #[serde(skip)]
    pub commit: Commit,
    pub change_log: Vec<Commit>,
    /// Commits dropped from `change_log` by the changelog cap.
    pub elided: usize,
}

impl TagGroup {
    fn new(name: String, commit: Commit) -> Self {
        Self {
            commit_id: commit.id.clone(),
            tag_names: vec![name],
            when: commit.author_time,
            is_latest: false,
            change_log: Vec::new(),
            commit,
            elided: 0,
        }
    }

    pub fn short_id(&self) -> &str {
        self.commit.short_id()
    }

    /// The name reported by `--lean` output: the last one discovered.
    pub fn primary_tag(&self) -> &str {
        self.tag_names.last().map(String::as_str).unwrap_or_default()
    }
}

/// Why a matching tag ref was left out of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ref's target does not peel to a commit.
    Unresolvable,
}

/// A matching tag name that was dropped without failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRef {
    pub name: String,
    pub reason: SkipReason,
}

/// Result of one discovery pass: the groups plus any refs that were skipped.
#[derive(Debug, Clone, Default)]
pub struct TagScan {
    pub groups: Vec<TagGroup>,
    pub skipped: Vec<SkippedRef>,
}

/// What to return from a discovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of groups; zero is rejected.
    pub limit: usize,
    /// Attach a changelog to each returned group.
    pub changelog: bool,
    /// Maximum commits per changelog.
    pub changelog_cap: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            changelog: true,
            changelog_cap: crate::changelog::DEFAULT_CHANGELOG_CAP,
        }
    }
}

/// Discover, group and order every tag matching `pattern`.
///
/// Malformed or unresolvable refs are skipped and reported in
/// [`TagScan::skipped`]; only repository failures are errors.
pub fn scan_tag_groups<R: Repository + ?Sized>(
    repo: &R,
    pattern: &MatchPattern,
    options: &ListOptions,
) -> Result<TagScan, ResolutionError> {
    if options.limit == 0 {
        return Err(ResolutionError::InvalidLimit(options.limit));
    }

    let mut scan = TagScan::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for reference in repo.list_tag_references()? {
        if !pattern.is_match(&reference.name) {
            continue;
        }

        let Some(commit) = repo.resolve_commit(&reference.target_id)? else {
            debug!(tag = %reference.name, target = %reference.target_id, "skipping unresolvable tag");
            scan.skipped.push(SkippedRef {
                name: reference.name,
                reason: SkipReason::Unresolvable,
            });
            continue;
        };

        match index.get(&commit.id) {
            Some(&position) => scan.groups[position].tag_names.push(reference.name),
            None => {
                index.insert(commit.id.clone(), scan.groups.len());
                scan.groups.push(TagGroup::new(reference.name, commit));
            }
        }
    }

    // stable: equal timestamps keep discovery order
    scan.groups.sort_by(|a, b| b.when.cmp(&a.when));
    if let Some(latest) = scan.groups.first_mut() {
        latest.is_latest = true;
    }

    let floor = scan.groups.get(options.limit).map(|group| group.when);
    scan.groups.truncate(options.limit);

    if options.changelog {
        attach_change_log_with_floor(repo, &mut scan.groups, options.changelog_cap, floor)?;
    }

    debug!(
        groups = scan.groups.len(),
        skipped = scan.skipped.len(),
        pattern = pattern.as_str(),
        "resolved tag groups"
    );
    Ok(scan)
}

/// [`scan_tag_groups`] without the skipped-ref report.
pub fn list_tag_groups<R: Repository + ?Sized>(
    repo: &R,
    pattern: &MatchPattern,
    options: &ListOptions,
) -> Result<Vec<TagGroup>, ResolutionError> {
    Ok(scan_tag_groups(repo, pattern, options)?.groups)
}

/// The most recent group matching `pattern`, if any tag matches at all.
pub fn latest_tag_group<R: Repository + ?Sized>(
    repo: &R,
    pattern: &MatchPattern,
    changelog: bool,
    changelog_cap: usize,
) -> Result<Option<TagGroup>, ResolutionError> {
    let options = ListOptions {
        limit: 1,
        changelog,
        changelog_cap,
    };
    Ok(list_tag_groups(repo, pattern, &options)?.into_iter().next())
}
