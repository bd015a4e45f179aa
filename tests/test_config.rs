//! Tests for format resolution from the environment and git config

use calver::config::{self, Config, FORMAT_ENV};
use calver::error::{ConfigError, FormatSource};
use calver::format::RawFormat;
use calver::repository::GitRepository;
use serial_test::serial;

mod support;
use support::harness::TestHarness;

fn repo(harness: &TestHarness) -> GitRepository {
    harness.commit_at("start", "2024-01-01T10:00:00+00:00");
    GitRepository::open(harness.path()).unwrap()
}

#[test]
#[serial]
fn test_git_config_format() {
    std::env::remove_var(FORMAT_ENV);
    let harness = TestHarness::new();
    let repo = repo(&harness);
    harness.git(&["config", "calver.format", "YY.0W-DEV"]);
    harness.git(&["config", "calver.changelog", "3"]);

    let config = Config::load(&repo, None).unwrap();
    assert_eq!(config.source, FormatSource::GitConfig);
    assert_eq!(config.format.modifier, "DEV");
    assert!(!config.format.auto_increment);
    assert_eq!(config.changelog_cap, 3);
    assert_eq!(config.remote, "origin");
}

#[test]
#[serial]
fn test_environment_beats_git_config() {
    let harness = TestHarness::new();
    let repo = repo(&harness);
    harness.git(&["config", "calver.format", "YY.0W"]);

    std::env::set_var(FORMAT_ENV, "YYYY.0M.0D-AUTO");
    let config = Config::load(&repo, None);
    std::env::remove_var(FORMAT_ENV);

    let config = config.unwrap();
    assert_eq!(config.source, FormatSource::Environment);
    assert!(config.format.auto_increment);
    assert_eq!(config.format.modifier, "");

    let config = Config::load(&repo, Some("YYYY.MM")).unwrap();
    assert_eq!(config.source, FormatSource::Argument);
}

#[test]
#[serial]
fn test_no_format_anywhere() {
    std::env::remove_var(FORMAT_ENV);
    let harness = TestHarness::new();
    let repo = repo(&harness);

    assert!(matches!(
        Config::load(&repo, None),
        Err(ConfigError::FormatNotSet)
    ));
    assert!(matches!(
        config::stored_format(&repo),
        Err(ConfigError::FormatNotSet)
    ));
}

#[test]
#[serial]
fn test_store_format_round_trip() {
    std::env::remove_var(FORMAT_ENV);
    let harness = TestHarness::new();
    let repo = repo(&harness);

    let format = RawFormat::parse("YYYY.MINOR.MICRO-RC-AUTO").unwrap();
    config::store_format(&repo, &format).unwrap();

    assert_eq!(harness.git(&["config", "calver.format"]), "YYYY.MINOR.MICRO-RC-AUTO");
    assert_eq!(config::stored_format(&repo).unwrap(), format);
}
