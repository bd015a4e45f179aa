//! # git-calver - Calendar versioning for git tags
//!
//! Renders calendar versions such as `2024.03.09-RC2` from a format string,
//! finds the tags in a repository that match a format, groups them by commit
//! and attaches a changelog to each group.
//!
//! ## Core Concepts
//!
//! - **Format**: two or three dotted segments (`YYYY.0M.0D`, `YY.MINOR.MICRO`)
//! - **Version**: a format plus minor/micro values, a modifier and an
//!   optional auto-increment counter
//! - **Tag group**: every matching tag that points at one commit
//!
//! ## Modules
//!
//! - [`segment`] / [`format`] - Format parsing and date rendering
//! - [`version`] - Version rendering and match-pattern generation
//! - [`tags`] / [`changelog`] - Tag discovery, grouping and changelogs
//! - [`increment`] - Auto-increment resolution
//! - [`repository`] - The repository capability and its implementations
//! - [`operations`] - Tag, retag, untag and next-version preview
//! - [`config`] - Format source resolution and git config storage
//!
//! ## Example
//!
//! ```
//! use calver::format::parse_format;
//! use calver::version::CalVer;
//! use chrono::NaiveDate;
//!
//! let format = parse_format("YYYY.0M.0D").unwrap();
//! let version = CalVer::new(format).with_modifier("RC");
//! let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
//!
//! assert_eq!(version.render(&date).unwrap(), "2024.03.09-RC");
//! assert!(version.match_pattern().unwrap().is_match("2024.03.09-RC2"));
//! ```

pub mod changelog;
pub mod config;
pub mod error;
pub mod format;
pub mod formatters;
pub mod git_ops;
pub mod increment;
pub mod operations;
pub mod repository;
pub mod segment;
pub mod tags;
pub mod version;

pub use error::{ConfigError, FormatError, ResolutionError, TagError, VersionError};
pub use format::{parse_format, Format, RawFormat};
pub use repository::{GitRepository, InMemoryRepository, Repository};
pub use tags::{latest_tag_group, list_tag_groups, ListOptions, TagGroup};
pub use version::{CalVer, MatchPattern};
