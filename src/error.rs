//! Error types for the version-format and tag-resolution engines.
//!
//! Each family maps to one stage of a run: parsing a format, rendering a
//! version, talking to the repository, and loading configuration. The CLI
//! layer wraps all of them in `anyhow` with extra context.

use std::fmt;

use thiserror::Error;

/// Failure to parse a dotted format specification such as `YYYY.0M.0D`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("requires min 2 segments in format: {0:?}")]
    InsufficientSegments(String),

    #[error("requires at most 3 segments in format: {0:?}")]
    TooManySegments(String),

    #[error("invalid format segment: {0:?}")]
    UnknownSegment(String),

    #[error("segment {token} cannot be used in the {slot} position")]
    MisplacedPlaceholder { token: String, slot: Slot },
}

/// Position of a segment inside a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Major,
    Minor,
    Micro,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Major => write!(f, "major"),
            Slot::Minor => write!(f, "minor"),
            Slot::Micro => write!(f, "micro"),
        }
    }
}

/// Failure to render a concrete version string or its match pattern.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("minor version required for format: {format}")]
    MissingMinorValue { format: String },

    #[error("micro version required for format: {format}")]
    MissingMicroValue { format: String },

    #[error("could not build tag pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failure while querying or mutating the repository.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("could not open repository at {}", .0.display())]
    NotARepository(std::path::PathBuf),

    #[error("failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("cannot resolve revision '{0}'")]
    RevisionNotFound(String),

    #[error("tag '{0}' does not exist")]
    TagNotFound(String),

    #[error("limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    #[error("unexpected git output: {0:?}")]
    MalformedOutput(String),
}

/// Where the active format string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSource {
    Argument,
    Environment,
    GitConfig,
}

impl fmt::Display for FormatSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSource::Argument => write!(f, "argument"),
            FormatSource::Environment => write!(f, "environment"),
            FormatSource::GitConfig => write!(f, "gitconfig"),
        }
    }
}

/// Failure to assemble the per-invocation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "format not set, please set with --format or CALVER environment variable or git config calver.format"
    )]
    FormatNotSet,

    #[error("loading format from {source_kind} failed: {error}")]
    InvalidFormat {
        source_kind: FormatSource,
        error: FormatError,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Failure of a tagging operation.
#[derive(Debug, Error)]
pub enum TagError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(
        "tag '{name}' was removed from {} but could not be recreated: {source}",
        .previous.as_deref().unwrap_or("an unknown commit")
    )]
    RetagFailed {
        name: String,
        previous: Option<String>,
        #[source]
        source: ResolutionError,
    },
}
