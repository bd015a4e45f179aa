//! Per-invocation configuration.
//!
//! The active format comes from the first of: the `--format` argument, the
//! `CALVER` environment variable, the repository's `calver.format` key.
//! Everything is resolved once into a [`Config`] and passed down explicitly.

use crate::changelog::DEFAULT_CHANGELOG_CAP;
use crate::error::{ConfigError, FormatSource, ResolutionError};
use crate::format::RawFormat;
use crate::repository::git_repository::DEFAULT_REMOTE;
use crate::repository::GitRepository;

/// Git config key holding the raw format string.
pub const FORMAT_KEY: &str = "calver.format";
/// Git config key naming the push remote.
pub const REMOTE_KEY: &str = "calver.remote";
/// Git config key holding the changelog cap.
pub const CHANGELOG_KEY: &str = "calver.changelog";
/// Environment variable overriding the stored format.
pub const FORMAT_ENV: &str = "CALVER";

/// Resolved configuration for one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub format: RawFormat,
    pub source: FormatSource,
    pub remote: String,
    pub changelog_cap: usize,
}

/// Raw values gathered from every configuration source.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub argument: Option<String>,
    pub environment: Option<String>,
    pub git_format: Option<String>,
    pub git_remote: Option<String>,
    pub git_changelog: Option<String>,
}

impl ConfigSources {
    /// Read the environment and the repository's git config.
    pub fn gather(repo: &GitRepository, argument: Option<&str>) -> Self {
        Self {
            argument: argument.map(str::to_string),
            environment: std::env::var(FORMAT_ENV).ok(),
            git_format: repo.config(FORMAT_KEY),
            git_remote: repo.config(REMOTE_KEY),
            git_changelog: repo.config(CHANGELOG_KEY),
        }
    }
}

impl Config {
    /// Load configuration for `repo`, with `argument` taking precedence.
    pub fn load(repo: &GitRepository, argument: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_sources(ConfigSources::gather(repo, argument))
    }

    /// Resolve configuration from already-gathered values.
    pub fn from_sources(sources: ConfigSources) -> Result<Self, ConfigError> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let (raw, source) = non_empty(sources.argument)
            .map(|raw| (raw, FormatSource::Argument))
            .or_else(|| non_empty(sources.environment).map(|raw| (raw, FormatSource::Environment)))
            .or_else(|| non_empty(sources.git_format).map(|raw| (raw, FormatSource::GitConfig)))
            .ok_or(ConfigError::FormatNotSet)?;

        let format = RawFormat::parse(&raw).map_err(|error| ConfigError::InvalidFormat {
            source_kind: source,
            error,
        })?;

        let changelog_cap = match non_empty(sources.git_changelog) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|cap| *cap > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: CHANGELOG_KEY.to_string(),
                    value,
                })?,
            None => DEFAULT_CHANGELOG_CAP,
        };

        Ok(Self {
            format,
            source,
            remote: non_empty(sources.git_remote).unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            changelog_cap,
        })
    }
}

/// Read and parse the format stored in the repository's git config.
pub fn stored_format(repo: &GitRepository) -> Result<RawFormat, ConfigError> {
    let raw = repo.config(FORMAT_KEY).ok_or(ConfigError::FormatNotSet)?;
    RawFormat::parse(&raw).map_err(|error| ConfigError::InvalidFormat {
        source_kind: FormatSource::GitConfig,
        error,
    })
}

/// Persist `format` under `calver.format`.
pub fn store_format(repo: &GitRepository, format: &RawFormat) -> Result<(), ResolutionError> {
    repo.set_config(FORMAT_KEY, &format.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    fn sources() -> ConfigSources {
        ConfigSources {
            argument: Some("YYYY.0M.0D".to_string()),
            environment: Some("YY.WW".to_string()),
            git_format: Some("YYYY.MINOR-RC-AUTO".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_argument_wins() {
        let config = Config::from_sources(sources()).unwrap();
        assert_eq!(config.source, FormatSource::Argument);
        assert_eq!(config.format.format.to_string(), "YYYY.0M.0D");
    }

    #[test]
    fn test_environment_before_git_config() {
        let config = Config::from_sources(ConfigSources {
            argument: None,
            ..sources()
        })
        .unwrap();
        assert_eq!(config.source, FormatSource::Environment);
        assert_eq!(config.format.format.to_string(), "YY.WW");
    }

    #[test]
    fn test_git_config_with_modifier_and_marker() {
        let config = Config::from_sources(ConfigSources {
            argument: None,
            environment: Some(String::new()),
            ..sources()
        })
        .unwrap();
        assert_eq!(config.source, FormatSource::GitConfig);
        assert_eq!(config.format.modifier, "RC");
        assert!(config.format.auto_increment);
    }

    #[test]
    fn test_missing_format() {
        let err = Config::from_sources(ConfigSources::default()).unwrap_err();
        assert!(matches!(err, ConfigError::FormatNotSet));
    }

    #[test]
    fn test_invalid_format_names_its_source() {
        let err = Config::from_sources(ConfigSources {
            environment: Some("BING.BONG".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        match err {
            ConfigError::InvalidFormat { source_kind, error } => {
                assert_eq!(source_kind, FormatSource::Environment);
                assert_eq!(error, FormatError::UnknownSegment("BING".to_string()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = Config::from_sources(sources()).unwrap();
        assert_eq!(config.remote, "origin");
        assert_eq!(config.changelog_cap, DEFAULT_CHANGELOG_CAP);

        let config = Config::from_sources(ConfigSources {
            git_remote: Some("upstream".to_string()),
            git_changelog: Some("20".to_string()),
            ..sources()
        })
        .unwrap();
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.changelog_cap, 20);
    }

    #[test]
    fn test_bad_changelog_cap() {
        let err = Config::from_sources(ConfigSources {
            git_changelog: Some("lots".to_string()),
            ..sources()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
