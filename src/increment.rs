//! Auto-increment resolution.
//!
//! The counter restarts at 1 every calendar period and otherwise continues
//! from the highest counter found on the latest matching tag group.

use chrono::Datelike;
use tracing::debug;

use crate::tags::TagGroup;
use crate::version::CalVer;

/// Next auto-increment counter for `version` at `now`.
///
/// The period is everything before the modifier, so a new minor or micro
/// value restarts the counter just like a new date does.
///
/// Returns 1 when there is no latest group, when none of its tags belong to
/// the period rendered for `now`, or when none carries a parsable counter
/// after `version`'s modifier.
pub fn resolve_auto_increment<D: Datelike>(
    version: &CalVer,
    latest: Option<&TagGroup>,
    now: &D,
) -> u64 {
    let Some(group) = latest else {
        return 1;
    };

    // minor and micro values are part of the period; a version that cannot
    // render them falls back to the date segments alone
    let period = version
        .render_base(now)
        .unwrap_or_else(|_| version.format().render(now));
    let previous = group
        .tag_names
        .iter()
        .filter_map(|name| increment_of(name, &period, version.modifier()))
        .max();

    debug!(period = %period, ?previous, tags = ?group.tag_names, "resolved auto increment");
    previous.map_or(1, |previous| previous.saturating_add(1))
}

/// Counter carried by `name` if it belongs to `period` and its modifier is
/// `modifier` followed by digits.
fn increment_of(name: &str, period: &str, modifier: &str) -> Option<u64> {
    let rest = name.strip_prefix(period)?;
    // "2024.1" must not claim "2024.11-RC3"
    if !(rest.is_empty() || rest.starts_with('.') || rest.starts_with('-')) {
        return None;
    }

    let (_, modifier_text) = rest.split_once('-')?;
    let digits = modifier_text.strip_prefix(modifier)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
