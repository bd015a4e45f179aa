//! Output formatters for tag groups and tag operations
//!
//! Every formatter is a pure function returning a `String`; colour is passed
//! in so callers decide between terminal and plain output.

use chrono::{DateTime, FixedOffset, TimeZone};
use colored::{Color, Colorize};

use crate::operations::{NextTag, PushOutcome, RetagOutcome, TagOutcome, UntagOutcome};
use crate::repository::Commit;
use crate::tags::TagGroup;

const LATEST_COLOUR: Color = Color::TrueColor {
    r: 175,
    g: 95,
    b: 255,
};

fn paint(text: &str, colour: bool, color: Color) -> String {
    if colour {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// Format one group as a headline, a subtitle and its changelog
pub fn format_tag_group<Tz: TimeZone>(group: &TagGroup, now: &DateTime<Tz>, colour: bool) -> String {
    let tags = group
        .tag_names
        .iter()
        .map(|name| format!("tag: {}", name))
        .collect::<Vec<_>>()
        .join(", ");
    let tags_colour = if group.is_latest {
        LATEST_COLOUR
    } else {
        Color::Green
    };
    let headline = format!(
        "{} - {}",
        paint(group.short_id(), colour, Color::Yellow),
        paint(&tags, colour, tags_colour)
    );

    let subtitle = format!(
        "{} - {}",
        group.commit.author_name,
        format_ago(&group.when, now)
    );

    let mut lines = vec![headline, subtitle];
    if !group.change_log.is_empty() {
        lines.push("CHANGELOG:".to_string());
        lines.extend(group.change_log.iter().map(|c| format_change(c, colour)));
        if group.elided > 0 {
            lines.push("\t...".to_string());
        }
    }

    lines.join("\n")
}

/// Format a listing, each group preceded by a blank line
pub fn format_tag_groups<Tz: TimeZone>(groups: &[TagGroup], now: &DateTime<Tz>, colour: bool) -> String {
    groups
        .iter()
        .map(|group| format!("\n{}\n", format_tag_group(group, now, colour)))
        .collect()
}

fn format_change(commit: &Commit, colour: bool) -> String {
    let subject = commit.message.replace('\n', "");
    format!(
        "\t{} {}  {}  {}  {}",
        paint("*", colour, Color::Red),
        paint(
            &commit.author_time.format("%Y-%m-%d %H:%M").to_string(),
            colour,
            Color::BrightBlack
        ),
        paint(commit.short_id(), colour, Color::Yellow),
        subject,
        paint(&format!("[{}]", commit.author_name), colour, Color::Cyan),
    )
}

/// Format `when` relative to `now`, e.g. "3d ago"
pub fn format_ago<Tz: TimeZone>(when: &DateTime<FixedOffset>, now: &DateTime<Tz>) -> String {
    let duration = now.clone().signed_duration_since(*when);

    let time_str = if duration.num_minutes() < 1 {
        "now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d", duration.num_days())
    } else if duration.num_weeks() < 4 {
        format!("{}w", duration.num_weeks())
    } else if duration.num_days() < 365 {
        format!("{}mo", duration.num_days() / 30)
    } else {
        format!("{}y", duration.num_days() / 365)
    };

    if time_str == "now" {
        time_str
    } else {
        format!("{} ago", time_str)
    }
}

/// Serialize groups as a pretty-printed JSON array
pub fn format_groups_json(groups: &[TagGroup]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(groups)
}

fn format_push(push: &PushOutcome, remote: &str, colour: bool) -> Option<String> {
    match push {
        PushOutcome::NotRequested => None,
        PushOutcome::Pushed => Some(format!("Pushed to '{}'", remote)),
        PushOutcome::Failed(message) => Some(paint(
            &format!("Push to '{}' failed: {}", remote, message),
            colour,
            Color::Red,
        )),
    }
}

/// Human summary of a tag operation
pub fn format_tag_outcome(outcome: &TagOutcome, remote: &str, colour: bool) -> String {
    let name = paint(&outcome.name, colour, Color::BrightGreen);
    let mut lines = vec![match (outcome.dry_run, outcome.created) {
        (true, true) => format!("Would create tag '{}' (hash {})", name, outcome.short_id()),
        (false, true) => format!("Created tag '{}' (hash {})", name, outcome.short_id()),
        (_, false) => format!("Tag '{}' already exists", name),
    }];
    lines.extend(format_push(&outcome.push, remote, colour));
    lines.join("\n")
}

pub fn format_retag_outcome(outcome: &RetagOutcome, remote: &str, colour: bool) -> String {
    let mut lines = Vec::new();
    if let Some(previous) = &outcome.previous_commit_id {
        let short = previous.get(..7).unwrap_or(previous);
        let verb = if outcome.tag.dry_run {
            "Would move"
        } else {
            "Moved"
        };
        lines.push(format!("{} tag '{}' from {}", verb, outcome.tag.name, short));
    }
    lines.extend(format_push(&outcome.delete_push, remote, colour));
    lines.push(format_tag_outcome(&outcome.tag, remote, colour));
    lines.join("\n")
}

pub fn format_untag_outcome(outcome: &UntagOutcome, remote: &str, colour: bool) -> String {
    let name = paint(&outcome.name, colour, Color::BrightGreen);
    let verb = if outcome.dry_run {
        "Would delete"
    } else {
        "Deleted"
    };
    let mut lines = vec![match &outcome.commit_id {
        Some(id) => format!("{} tag '{}' (was {})", verb, name, id.get(..7).unwrap_or(id)),
        None => format!("{} tag '{}'", verb, name),
    }];
    lines.extend(format_push(&outcome.push, remote, colour));
    lines.join("\n")
}

pub fn format_next(next: &NextTag, colour: bool) -> String {
    let name = paint(&next.name, colour, Color::BrightGreen);
    if next.exists {
        format!("Tag '{}' already exists", name)
    } else {
        let short = next.commit_id.get(..7).unwrap_or(&next.commit_id);
        format!("Will create tag '{}' (hash {})", name, short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn commit(id: &str, when: &str, message: &str) -> Commit {
        Commit {
            id: id.to_string(),
            author_time: at(when),
            author_name: "Jane Doe".to_string(),
            author_email: "jane@example.com".to_string(),
            message: message.to_string(),
        }
    }

    fn group(is_latest: bool, elided: usize) -> TagGroup {
        let own = commit("0123456789abcdef", "2024-03-09T10:30:00+00:00", "release");
        TagGroup {
            commit_id: own.id.clone(),
            tag_names: vec!["2024.3.9".to_string(), "2024.03.09".to_string()],
            when: own.author_time,
            is_latest,
            change_log: vec![
                own.clone(),
                commit("fedcba9876543210", "2024-03-08T08:05:00+00:00", "fix parser"),
            ],
            commit: own,
            elided,
        }
    }

    #[test]
    fn test_format_tag_group_plain() {
        let now = at("2024-03-09T12:30:00+00:00");
        let output = format_tag_group(&group(true, 0), &now, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "0123456 - tag: 2024.3.9, tag: 2024.03.09");
        assert_eq!(lines[1], "Jane Doe - 2h ago");
        assert_eq!(lines[2], "CHANGELOG:");
        assert_eq!(lines[3], "\t* 2024-03-09 10:30  0123456  release  [Jane Doe]");
        assert_eq!(lines[4], "\t* 2024-03-08 08:05  fedcba9  fix parser  [Jane Doe]");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_elided_commits_are_marked() {
        let now = at("2024-03-09T12:30:00+00:00");
        let output = format_tag_group(&group(false, 3), &now, false);
        assert!(output.ends_with("\n\t..."));
    }

    #[test]
    fn test_format_tag_groups_separates_with_blank_lines() {
        let now = at("2024-03-09T12:30:00+00:00");
        let output = format_tag_groups(&[group(true, 0), group(false, 0)], &now, false);
        assert!(output.starts_with("\n0123456"));
        assert_eq!(output.matches("CHANGELOG:").count(), 2);
    }

    #[test]
    fn test_format_ago() {
        let when = at("2024-03-09T10:00:00+00:00");
        assert_eq!(format_ago(&when, &when), "now");
        assert_eq!(format_ago(&when, &(when + Duration::minutes(5))), "5m ago");
        assert_eq!(format_ago(&when, &(when + Duration::hours(3))), "3h ago");
        assert_eq!(format_ago(&when, &(when + Duration::days(2))), "2d ago");
        assert_eq!(format_ago(&when, &(when + Duration::days(15))), "2w ago");
        assert_eq!(format_ago(&when, &(when + Duration::days(90))), "3mo ago");
        assert_eq!(format_ago(&when, &(when + Duration::days(800))), "2y ago");
    }

    #[test]
    fn test_format_groups_json() {
        let json = format_groups_json(&[group(true, 2)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];

        assert_eq!(first["commit_id"], "0123456789abcdef");
        assert_eq!(first["tag_names"][1], "2024.03.09");
        assert_eq!(first["is_latest"], true);
        assert_eq!(first["elided"], 2);
        assert_eq!(first["when"], "2024-03-09T10:30:00+00:00");
        assert_eq!(first["change_log"][1]["message"], "fix parser");
        assert!(first.get("commit").is_none());
    }

    #[test]
    fn test_format_tag_outcome() {
        let mut outcome = TagOutcome {
            name: "2024.03.09".to_string(),
            commit_id: "0123456789abcdef".to_string(),
            created: true,
            push: PushOutcome::Failed("rejected".to_string()),
            dry_run: false,
        };
        assert_eq!(
            format_tag_outcome(&outcome, "origin", false),
            "Created tag '2024.03.09' (hash 0123456)\nPush to 'origin' failed: rejected"
        );

        outcome.created = false;
        outcome.push = PushOutcome::NotRequested;
        assert_eq!(
            format_tag_outcome(&outcome, "origin", false),
            "Tag '2024.03.09' already exists"
        );
    }

    #[test]
    fn test_format_next() {
        let next = NextTag {
            name: "2024.03.09".to_string(),
            commit_id: "0123456789abcdef".to_string(),
            exists: false,
        };
        assert_eq!(
            format_next(&next, false),
            "Will create tag '2024.03.09' (hash 0123456)"
        );
    }
}
