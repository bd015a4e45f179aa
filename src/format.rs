//! Format parsing and date rendering.
//!
//! A format is two or three dotted segments, e.g. `YYYY.0M.0D` or
//! `YY.MINOR.MICRO`. A raw format string as stored in git config may carry a
//! `-MODIFIER` suffix and the `AUTO` marker; [`RawFormat`] separates those
//! from the segment list.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::error::{FormatError, Slot};
use crate::segment::Segment;

/// Marker at the end of a raw modifier that turns on auto-increment.
pub const AUTO_MARKER: &str = "AUTO";

/// An ordered major/minor[/micro] tuple of segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    major: Segment,
    minor: Segment,
    micro: Option<Segment>,
}

/// Parse a dotted format specification.
///
/// Anything after the first `-` is a modifier and is ignored here; use
/// [`RawFormat`] to keep it.
pub fn parse_format(raw: &str) -> Result<Format, FormatError> {
    let (segments, _) = split_modifier(raw);
    let tokens: Vec<&str> = segments.split('.').collect();

    if tokens.len() < 2 {
        return Err(FormatError::InsufficientSegments(raw.to_string()));
    }
    if tokens.len() > 3 {
        return Err(FormatError::TooManySegments(raw.to_string()));
    }

    let major = slot_segment(tokens[0], Slot::Major)?;
    let minor = slot_segment(tokens[1], Slot::Minor)?;
    let micro = match tokens.get(2) {
        Some(token) => Some(slot_segment(token, Slot::Micro)?),
        None => None,
    };

    Ok(Format {
        major,
        minor,
        micro,
    })
}

fn slot_segment(token: &str, slot: Slot) -> Result<Segment, FormatError> {
    let segment: Segment = token.parse()?;
    let allowed = match segment {
        Segment::Minor => slot == Slot::Minor,
        Segment::Micro => slot == Slot::Micro,
        _ => true,
    };
    if !allowed {
        return Err(FormatError::MisplacedPlaceholder {
            token: token.to_string(),
            slot,
        });
    }
    Ok(segment)
}

fn split_modifier(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('-') {
        Some((segments, modifier)) => (segments, Some(modifier)),
        None => (raw, None),
    }
}

impl Format {
    /// Build a format from already-typed segments.
    ///
    /// Placeholder placement is checked the same way [`parse_format`] checks it.
    pub fn new(major: Segment, minor: Segment, micro: Option<Segment>) -> Result<Self, FormatError> {
        let check = |segment: Segment, slot: Slot| slot_segment(segment.name(), slot);
        check(major, Slot::Major)?;
        check(minor, Slot::Minor)?;
        if let Some(micro) = micro {
            check(micro, Slot::Micro)?;
        }
        Ok(Self {
            major,
            minor,
            micro,
        })
    }

    pub fn major(&self) -> Segment {
        self.major
    }

    pub fn minor(&self) -> Segment {
        self.minor
    }

    pub fn micro(&self) -> Option<Segment> {
        self.micro
    }

    /// Segments in major, minor, micro order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> {
        [Some(self.major), Some(self.minor), self.micro]
            .into_iter()
            .flatten()
    }

    /// The minor slot holds the `MINOR` placeholder.
    pub fn needs_minor(&self) -> bool {
        self.minor == Segment::Minor
    }

    /// The micro slot holds the `MICRO` placeholder.
    pub fn needs_micro(&self) -> bool {
        self.micro == Some(Segment::Micro)
    }

    /// Render the calendar portion of a version.
    ///
    /// Placeholders are left out entirely rather than emitted as empty fields;
    /// [`crate::version::CalVer::render`] appends their values afterwards.
    pub fn render<D: Datelike>(&self, date: &D) -> String {
        self.segments()
            .filter_map(|segment| segment.render(date))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dotted regex fragments for every segment, without anchors.
    pub fn pattern(&self) -> String {
        self.segments()
            .map(Segment::pattern)
            .collect::<Vec<_>>()
            .join(r"\.")
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(micro) = self.micro {
            write!(f, ".{}", micro)?;
        }
        Ok(())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_format(raw)
    }
}

/// A format string as users write it: segments, optional modifier, optional
/// auto-increment marker.
///
/// `YYYY.0M.0D-RC-AUTO` is format `YYYY.0M.0D`, modifier `RC`, auto-increment on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFormat {
    pub format: Format,
    pub modifier: String,
    pub auto_increment: bool,
}

impl RawFormat {
    pub fn parse(raw: &str) -> Result<Self, FormatError> {
        let raw = raw.trim();
        let format = parse_format(raw)?;
        let (_, suffix) = split_modifier(raw);

        let (modifier, auto_increment) = match suffix {
            Some(suffix) => match suffix.strip_suffix(AUTO_MARKER) {
                Some(rest) => (rest.trim_end_matches('-').to_string(), true),
                None => (suffix.to_string(), false),
            },
            None => (String::new(), false),
        };

        Ok(Self {
            format,
            modifier,
            auto_increment,
        })
    }
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format)?;
        match (self.modifier.is_empty(), self.auto_increment) {
            (true, false) => Ok(()),
            (true, true) => write!(f, "-{}", AUTO_MARKER),
            (false, false) => write!(f, "-{}", self.modifier),
            (false, true) => write!(f, "-{}-{}", self.modifier, AUTO_MARKER),
        }
    }
}

impl FromStr for RawFormat {
    type Err = FormatError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        RawFormat::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_formats() {
        let cases = [
            ("YYYY.MM.DD", Segment::FullYear, Segment::ShortMonth, Some(Segment::ShortDay)),
            ("YYYY.0M.DD", Segment::FullYear, Segment::PaddedMonth, Some(Segment::ShortDay)),
            ("YYYY.0M.0D", Segment::FullYear, Segment::PaddedMonth, Some(Segment::PaddedDay)),
            ("YY.WW", Segment::ShortYear, Segment::ShortWeek, None),
            ("YY.0W", Segment::ShortYear, Segment::PaddedWeek, None),
            ("YY.MINOR.MICRO", Segment::ShortYear, Segment::Minor, Some(Segment::Micro)),
            ("YY.MINOR", Segment::ShortYear, Segment::Minor, None),
            ("YYYY.MM.DD-A", Segment::FullYear, Segment::ShortMonth, Some(Segment::ShortDay)),
        ];

        for (raw, major, minor, micro) in cases {
            let format = parse_format(raw).unwrap_or_else(|e| panic!("{}: {}", raw, e));
            assert_eq!(format.major(), major, "{}", raw);
            assert_eq!(format.minor(), minor, "{}", raw);
            assert_eq!(format.micro(), micro, "{}", raw);
        }
    }

    #[test]
    fn test_parse_rejects_single_segment() {
        assert_eq!(
            parse_format("YY"),
            Err(FormatError::InsufficientSegments("YY".to_string()))
        );
        assert!(matches!(
            parse_format("WW"),
            Err(FormatError::InsufficientSegments(_))
        ));
        assert!(matches!(
            parse_format(""),
            Err(FormatError::InsufficientSegments(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        assert_eq!(
            parse_format("BING.BONG.BANG"),
            Err(FormatError::UnknownSegment("BING".to_string()))
        );
        assert_eq!(
            parse_format("YY.MM.BANG"),
            Err(FormatError::UnknownSegment("BANG".to_string()))
        );
        assert!(matches!(
            parse_format("YYYY..DD"),
            Err(FormatError::UnknownSegment(_))
        ));
    }

    #[test]
    fn test_parse_rejects_misplaced_placeholders() {
        assert!(matches!(
            parse_format("MINOR.YYYY"),
            Err(FormatError::MisplacedPlaceholder { slot: Slot::Major, .. })
        ));
        assert!(matches!(
            parse_format("YYYY.MICRO"),
            Err(FormatError::MisplacedPlaceholder { slot: Slot::Minor, .. })
        ));
        assert!(matches!(
            parse_format("YYYY.MM.MINOR"),
            Err(FormatError::MisplacedPlaceholder { slot: Slot::Micro, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_four_segments() {
        assert!(matches!(
            parse_format("YYYY.MM.DD.WW"),
            Err(FormatError::TooManySegments(_))
        ));
    }

    #[test]
    fn test_render_dates() {
        let cases = [
            ("YYYY.MM.DD", date(2020, 1, 1), "2020.1.1"),
            ("YYYY.0M.0D", date(2020, 1, 1), "2020.01.01"),
            ("YY.MM.DD", date(2020, 1, 1), "20.1.1"),
            ("YY.0M.0D", date(2020, 1, 1), "20.01.01"),
            ("YY.0M", date(2020, 1, 1), "20.01"),
            ("YY.MM.DD", date(2020, 11, 11), "20.11.11"),
            ("0Y.MM.DD", date(2001, 11, 11), "01.11.11"),
            ("YY.MM.DD", date(2001, 11, 11), "1.11.11"),
            ("YY.WW", date(2001, 11, 11), "1.45"),
            ("YY.WW", date(2001, 1, 11), "1.2"),
            ("YY.0W", date(2001, 1, 11), "1.02"),
        ];

        for (raw, when, expected) in cases {
            let format = parse_format(raw).unwrap();
            assert_eq!(format.render(&when), expected, "{} at {}", raw, when);
        }
    }

    #[test]
    fn test_render_skips_placeholders() {
        let format = parse_format("YYYY.MINOR.MICRO").unwrap();
        assert_eq!(format.render(&date(2024, 5, 1)), "2024");
        assert!(format.needs_minor());
        assert!(format.needs_micro());
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(parse_format("YYYY.0M.0D-RC").unwrap().to_string(), "YYYY.0M.0D");
        assert_eq!(parse_format("YY.WW").unwrap().to_string(), "YY.WW");
    }

    #[test]
    fn test_new_checks_placement() {
        assert!(Format::new(Segment::FullYear, Segment::Minor, Some(Segment::Micro)).is_ok());
        assert!(Format::new(Segment::Micro, Segment::ShortMonth, None).is_err());
    }

    #[test]
    fn test_raw_format_modifier_and_marker() {
        let raw = RawFormat::parse("YYYY.0M.0D").unwrap();
        assert_eq!(raw.modifier, "");
        assert!(!raw.auto_increment);

        let raw = RawFormat::parse("YYYY.0M.0D-RC").unwrap();
        assert_eq!(raw.modifier, "RC");
        assert!(!raw.auto_increment);

        let raw = RawFormat::parse("YYYY.0M.0D-RC-AUTO").unwrap();
        assert_eq!(raw.modifier, "RC");
        assert!(raw.auto_increment);

        let raw = RawFormat::parse("YYYY.0M.0D-AUTO").unwrap();
        assert_eq!(raw.modifier, "");
        assert!(raw.auto_increment);
    }

    #[test]
    fn test_raw_format_display_reparses() {
        for input in ["YY.0W", "YYYY.0M.0D-RC", "YYYY.0M.0D-AUTO", "YY.MM-DEV-AUTO"] {
            let raw = RawFormat::parse(input).unwrap();
            assert_eq!(raw.to_string(), input);
            assert_eq!(RawFormat::parse(&raw.to_string()).unwrap(), raw);
        }
    }
}
