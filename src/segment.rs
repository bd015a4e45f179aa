//! The closed vocabulary of format tokens.
//!
//! Every token knows three things: its canonical name, how it renders for a
//! given date, and the regex fragment that matches its rendered form.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::error::FormatError;

/// A single dot-separated component of a version format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// `YYYY` - 2006, 2016, 2024
    FullYear,
    /// `YY` - 6, 16, 24
    ShortYear,
    /// `0Y` - 06, 16, 24
    PaddedYear,
    /// `MM` - 1, 2 ... 11, 12
    ShortMonth,
    /// `0M` - 01, 02 ... 11, 12
    PaddedMonth,
    /// `WW` - ISO week 1, 2 ... 52, 53
    ShortWeek,
    /// `0W` - ISO week 01, 02 ... 52, 53
    PaddedWeek,
    /// `DD` - 1, 2 ... 30, 31
    ShortDay,
    /// `0D` - 01, 02 ... 30, 31
    PaddedDay,
    /// `MINOR` - externally supplied counter
    Minor,
    /// `MICRO` - externally supplied counter
    Micro,
}

impl Segment {
    /// All tokens, in the order they are documented.
    pub const ALL: [Segment; 11] = [
        Segment::FullYear,
        Segment::ShortYear,
        Segment::PaddedYear,
        Segment::ShortMonth,
        Segment::PaddedMonth,
        Segment::ShortWeek,
        Segment::PaddedWeek,
        Segment::ShortDay,
        Segment::PaddedDay,
        Segment::Minor,
        Segment::Micro,
    ];

    /// Canonical token name as written in a format string.
    pub fn name(self) -> &'static str {
        match self {
            Segment::FullYear => "YYYY",
            Segment::ShortYear => "YY",
            Segment::PaddedYear => "0Y",
            Segment::ShortMonth => "MM",
            Segment::PaddedMonth => "0M",
            Segment::ShortWeek => "WW",
            Segment::PaddedWeek => "0W",
            Segment::ShortDay => "DD",
            Segment::PaddedDay => "0D",
            Segment::Minor => "MINOR",
            Segment::Micro => "MICRO",
        }
    }

    /// Regex fragment matching this segment's rendered form.
    ///
    /// Full years only match `20xx`; tags outside 2000-2099 are not recognised.
    pub fn pattern(self) -> &'static str {
        match self {
            Segment::FullYear => "20[0-9]{2}",
            Segment::ShortYear
            | Segment::ShortMonth
            | Segment::ShortWeek
            | Segment::ShortDay => "[0-9]{1,2}",
            Segment::PaddedYear
            | Segment::PaddedMonth
            | Segment::PaddedWeek
            | Segment::PaddedDay => "[0-9]{2}",
            Segment::Minor | Segment::Micro => "[0-9]+",
        }
    }

    /// True for the numeric placeholders whose value is supplied by the caller.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Segment::Minor | Segment::Micro)
    }

    /// Render the calendar value for `date`.
    ///
    /// Placeholders have no calendar value and return `None`.
    pub fn render<D: Datelike>(self, date: &D) -> Option<String> {
        let rendered = match self {
            Segment::FullYear => format!("{}", date.year()),
            Segment::ShortYear => {
                let padded = format!("{:02}", date.year().rem_euclid(100));
                match padded.strip_prefix('0') {
                    Some(stripped) => stripped.to_string(),
                    None => padded,
                }
            }
            Segment::PaddedYear => format!("{:02}", date.year().rem_euclid(100)),
            Segment::ShortMonth => format!("{}", date.month()),
            Segment::PaddedMonth => format!("{:02}", date.month()),
            Segment::ShortWeek => format!("{}", date.iso_week().week()),
            Segment::PaddedWeek => format!("{:02}", date.iso_week().week()),
            Segment::ShortDay => format!("{}", date.day()),
            Segment::PaddedDay => format!("{:02}", date.day()),
            Segment::Minor | Segment::Micro => return None,
        };
        Some(rendered)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Segment {
    type Err = FormatError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|segment| segment.name() == token)
            .ok_or_else(|| FormatError::UnknownSegment(token.to_string()))
    }
}
