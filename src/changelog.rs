//! Changelog assembly for tag groups.
//!
//! Each group owns the commits made after the next older group and up to its
//! own commit. Windows of adjacent groups never overlap.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::ResolutionError;
use crate::repository::{Repository, TimeWindow};
use crate::tags::TagGroup;

/// Commits kept per group when no cap is configured.
pub const DEFAULT_CHANGELOG_CAP: usize = 10;

/// Attach a changelog to every group in `groups` (newest first).
///
/// The oldest group's window reaches back to the first commit.
pub fn attach_change_log<R: Repository + ?Sized>(
    repo: &R,
    groups: &mut [TagGroup],
    cap: usize,
) -> Result<(), ResolutionError> {
    attach_change_log_with_floor(repo, groups, cap, None)
}

/// Like [`attach_change_log`], with the oldest group's window starting just
/// after `floor` instead of at the beginning of history.
///
/// Used when `groups` is a truncated prefix of a longer listing.
pub fn attach_change_log_with_floor<R: Repository + ?Sized>(
    repo: &R,
    groups: &mut [TagGroup],
    cap: usize,
    floor: Option<DateTime<FixedOffset>>,
) -> Result<(), ResolutionError> {
    // the group's own commit is always kept
    let cap = cap.max(1);
    let bounds: Vec<Option<DateTime<FixedOffset>>> = (0..groups.len())
        .map(|i| groups.get(i + 1).map(|older| older.when).or(floor))
        .collect();
    // a tagged commit belongs to its own group even when another group's
    // window reaches it at the same timestamp
    let tagged: HashSet<String> = groups.iter().map(|g| g.commit_id.clone()).collect();

    for (group, previous) in groups.iter_mut().zip(bounds) {
        let window = TimeWindow::after(previous, group.when);
        let history = repo.commit_history(&window)?;
        debug!(
            commit = group.short_id(),
            since = ?window.since,
            until = %window.until,
            found = history.len(),
            "changelog window"
        );

        let mut seen: HashSet<String> = HashSet::new();
        let mut change_log = Vec::new();
        let foreign = history
            .into_iter()
            .filter(|commit| !tagged.contains(&commit.id));
        for commit in std::iter::once(group.commit.clone()).chain(foreign) {
            if seen.insert(commit.id.clone()) {
                change_log.push(commit);
            }
        }

        group.elided = change_log.len().saturating_sub(cap);
        change_log.truncate(cap);
        group.change_log = change_log;
    }

    Ok(())
}
