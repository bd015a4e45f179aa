//! Concrete calendar versions.
//!
//! A [`CalVer`] couples a [`Format`] with the values the clock cannot supply:
//! the `MINOR`/`MICRO` counters, a textual modifier and the auto-increment
//! suffix. Rendering is a pure function of the version and a date.

use chrono::Datelike;
use regex::Regex;

use crate::error::VersionError;
use crate::format::{Format, RawFormat};

/// A format plus caller-supplied overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalVer {
    format: Format,
    minor: Option<u64>,
    micro: Option<u64>,
    modifier: String,
    auto_increment: bool,
    increment: Option<u64>,
}

/// Inputs for building a [`CalVer`] in one go, mirroring the command flags.
#[derive(Debug, Clone, Default)]
pub struct VersionArgs {
    pub minor: Option<u64>,
    pub micro: Option<u64>,
    pub modifier: Option<String>,
    pub auto_increment: bool,
}

impl CalVer {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            minor: None,
            micro: None,
            modifier: String::new(),
            auto_increment: false,
            increment: None,
        }
    }

    /// Build a version from a raw format, letting explicit arguments win over
    /// whatever modifier and marker the raw format carried.
    pub fn from_raw(raw: &RawFormat, args: &VersionArgs) -> Self {
        let modifier = args.modifier.clone().unwrap_or_else(|| raw.modifier.clone());
        let mut version = Self::new(raw.format)
            .with_modifier(modifier)
            .with_auto_increment(raw.auto_increment || args.auto_increment);
        version.minor = args.minor;
        version.micro = args.micro;
        version
    }

    pub fn with_minor(mut self, value: u64) -> Self {
        self.minor = Some(value);
        self
    }

    pub fn with_micro(mut self, value: u64) -> Self {
        self.micro = Some(value);
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = modifier.into();
        self
    }

    pub fn with_auto_increment(mut self, enabled: bool) -> Self {
        self.auto_increment = enabled;
        self
    }

    /// Fix the auto-increment counter appended after the modifier.
    pub fn with_increment(mut self, increment: u64) -> Self {
        self.increment = Some(increment);
        self
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn modifier(&self) -> &str {
        &self.modifier
    }

    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn increment(&self) -> Option<u64> {
        self.increment
    }

    /// Full modifier text as it appears after the `-`, e.g. `RC4`.
    pub fn modifier_text(&self) -> String {
        match self.increment {
            Some(increment) => format!("{}{}", self.modifier, increment),
            None => self.modifier.clone(),
        }
    }

    /// Render the version string for `date`.
    ///
    /// Fails when the format has a `MINOR` or `MICRO` slot whose value was
    /// never supplied; no default is substituted.
    pub fn render<D: Datelike>(&self, date: &D) -> Result<String, VersionError> {
        let mut version = self.render_base(date)?;

        let modifier = self.modifier_text();
        if !modifier.is_empty() {
            version.push('-');
            version.push_str(&modifier);
        }

        Ok(version)
    }

    /// Render everything except the modifier.
    pub fn render_base<D: Datelike>(&self, date: &D) -> Result<String, VersionError> {
        let mut version = self.format.render(date);

        if self.format.needs_minor() {
            let minor = self.minor.ok_or_else(|| VersionError::MissingMinorValue {
                format: self.format.to_string(),
            })?;
            version.push_str(&format!(".{}", minor));
        }

        if self.format.needs_micro() {
            let micro = self.micro.ok_or_else(|| VersionError::MissingMicroValue {
                format: self.format.to_string(),
            })?;
            version.push_str(&format!(".{}", micro));
        }

        Ok(version)
    }

    /// Anchored pattern matching every tag name this version could render to.
    pub fn match_pattern(&self) -> Result<MatchPattern, VersionError> {
        let suffix = if !self.modifier.is_empty() {
            format!(r"-{}[0-9]*", regex::escape(&self.modifier))
        } else if self.auto_increment {
            r"-[0-9]+".to_string()
        } else {
            String::new()
        };

        let source = format!("^{}{}$", self.format.pattern(), suffix);
        Ok(MatchPattern {
            regex: Regex::new(&source)?,
        })
    }
}

/// A compiled, fully anchored tag-name pattern.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    regex: Regex,
}

impl MatchPattern {
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
