//! Semantic version value type: parsing and canonical formatting

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use crate::comparer::VersionComparer;

/// Error type for version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,
    #[error("\"{0}\" is not a valid version string")]
    InvalidFormat(String),
    #[error("version component \"{0}\" is out of range")]
    OutOfRange(String),
}

/// A semantic version with an optional fourth (revision) component.
///
/// The textual form is `MAJOR.MINOR.PATCH[.REVISION][-RELEASE][+METADATA]`.
/// A version with at least one release label is a prerelease. Metadata is
/// opaque and ignored by the default ordering.
#[derive(Debug, Clone)]
pub struct Version {
    pub(crate) major: u64,
    pub(crate) minor: u64,
    pub(crate) patch: u64,
    pub(crate) revision: u64,
    pub(crate) release_labels: Vec<String>,
    pub(crate) metadata: Option<String>,
    /// The input spelled out a fourth numeric part. Presentation state
    /// only; excluded from equality, ordering and hashing.
    pub(crate) explicit_revision: bool,
}

impl Version {
    /// Create a stable three-part version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Version {
        Version {
            major,
            minor,
            patch,
            revision: 0,
            release_labels: Vec::new(),
            metadata: None,
            explicit_revision: false,
        }
    }

    /// Create a stable four-part version.
    pub fn with_revision(major: u64, minor: u64, patch: u64, revision: u64) -> Version {
        Version {
            major,
            minor,
            patch,
            revision,
            release_labels: Vec::new(),
            metadata: None,
            explicit_revision: true,
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The ordered release labels; empty for a stable version.
    pub fn release_labels(&self) -> &[String] {
        &self.release_labels
    }

    /// The release labels joined with `.`, or an empty string.
    pub fn release(&self) -> String {
        self.release_labels.join(".")
    }

    /// The build metadata after `+`, if any.
    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.release_labels.is_empty()
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// The same numeric version without release labels or metadata.
    pub fn to_stable(&self) -> Version {
        Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            revision: self.revision,
            release_labels: Vec::new(),
            metadata: None,
            explicit_revision: self.explicit_revision,
        }
    }

    /// Parse a version string, returning `None` on failure.
    pub fn try_parse(input: &str) -> Option<Version> {
        Version::parse(input).ok()
    }

    /// Parse a version string.
    ///
    /// The numeric core is 1 to 4 dot-separated integers; a single integer
    /// is padded so `"1"` parses as `1.0`. The first `-` opens the release
    /// section and the first `+` after it opens metadata.
    pub fn parse(input: &str) -> Result<Version, VersionError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let (core, release, metadata) = split_sections(text);

        let mut numbers = [0u64; 4];
        let mut count = 0;
        for piece in core.split('.') {
            if count == 4 {
                return Err(VersionError::InvalidFormat(text.to_string()));
            }
            numbers[count] = parse_core_number(piece, text)?;
            count += 1;
        }

        let release_labels = match release {
            Some(section) => parse_release_labels(section, text)?,
            None => Vec::new(),
        };

        let metadata = match metadata {
            Some(section) => {
                validate_metadata(section, text)?;
                Some(section.to_string())
            }
            None => None,
        };

        Ok(Version {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            revision: numbers[3],
            release_labels,
            metadata,
            explicit_revision: count == 4,
        })
    }

    /// Render the version through the format mini-language.
    ///
    /// `N` emits the full normalized string, `V` the numeric core, `R` the
    /// joined release labels, `M` the metadata, and `x`/`y`/`z`/`r` the
    /// individual numeric components. Any other character passes through.
    pub fn format(&self, format: &str) -> String {
        let mut out = String::new();
        for ch in format.chars() {
            match ch {
                'N' => self.write_normalized(&mut out),
                'V' => self.write_core(&mut out),
                'R' => out.push_str(&self.release()),
                'M' => out.push_str(self.metadata.as_deref().unwrap_or("")),
                'x' => {
                    let _ = write!(out, "{}", self.major);
                }
                'y' => {
                    let _ = write!(out, "{}", self.minor);
                }
                'z' => {
                    let _ = write!(out, "{}", self.patch);
                }
                'r' => {
                    let _ = write!(out, "{}", self.revision);
                }
                other => out.push(other),
            }
        }
        out
    }

    fn write_core(&self, out: &mut String) {
        let _ = write!(out, "{}.{}.{}", self.major, self.minor, self.patch);
        if self.revision > 0 || self.explicit_revision {
            let _ = write!(out, ".{}", self.revision);
        }
    }

    fn write_normalized(&self, out: &mut String) {
        self.write_core(out);
        if self.is_prerelease() {
            out.push('-');
            out.push_str(&self.release());
        }
        if let Some(metadata) = &self.metadata {
            out.push('+');
            out.push_str(metadata);
        }
    }
}

/// Split off the release section at the first `-` and the metadata section
/// at the first `+` after it. A `+` before any `-` means there is no
/// release section at all.
fn split_sections(text: &str) -> (&str, Option<&str>, Option<&str>) {
    let dash = text.find('-');
    let plus = text.find('+');
    match (dash, plus) {
        (Some(d), Some(p)) if d < p => (&text[..d], Some(&text[d + 1..p]), Some(&text[p + 1..])),
        (Some(d), None) => (&text[..d], Some(&text[d + 1..]), None),
        (_, Some(p)) => (&text[..p], None, Some(&text[p + 1..])),
        (None, None) => (text, None, None),
    }
}

fn parse_core_number(piece: &str, whole: &str) -> Result<u64, VersionError> {
    if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidFormat(whole.to_string()));
    }
    if piece.len() > 1 && piece.starts_with('0') {
        return Err(VersionError::InvalidFormat(whole.to_string()));
    }
    piece
        .parse()
        .map_err(|_| VersionError::OutOfRange(piece.to_string()))
}

fn parse_release_labels(section: &str, whole: &str) -> Result<Vec<String>, VersionError> {
    let mut labels = Vec::new();
    for label in section.split('.') {
        if label.is_empty() || !label.bytes().all(is_identifier_byte) {
            return Err(VersionError::InvalidFormat(whole.to_string()));
        }
        let numeric = label.bytes().all(|b| b.is_ascii_digit());
        if numeric && label.len() > 1 && label.starts_with('0') {
            return Err(VersionError::InvalidFormat(whole.to_string()));
        }
        labels.push(label.to_string());
    }
    Ok(labels)
}

fn validate_metadata(section: &str, whole: &str) -> Result<(), VersionError> {
    for part in section.split('.') {
        if part.is_empty() || !part.bytes().all(is_identifier_byte) {
            return Err(VersionError::InvalidFormat(whole.to_string()));
        }
    }
    Ok(())
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_normalized(&mut out);
        f.write_str(&out)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        VersionComparer::VERSION_RELEASE.equals(self, other)
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        VersionComparer::VERSION_RELEASE.compare(self, other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        VersionComparer::VERSION_RELEASE.feed(self, state);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let version = Version::parse("1.2.3").unwrap();
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 3);
        assert_eq!(version.revision(), 0);
        assert!(!version.is_prerelease());
        assert!(!version.has_metadata());
    }

    #[test]
    fn test_parse_pads_short_cores() {
        assert_eq!(Version::parse("1").unwrap().to_string(), "1.0.0");
        assert_eq!(Version::parse("1.2").unwrap().to_string(), "1.2.0");
    }

    #[test]
    fn test_parse_four_part() {
        let version = Version::parse("1.2.3.4").unwrap();
        assert_eq!(version.revision(), 4);
        assert_eq!(version.to_string(), "1.2.3.4");
    }

    #[test]
    fn test_explicit_zero_revision_round_trips() {
        assert_eq!(Version::parse("1.2.3.0").unwrap().to_string(), "1.2.3.0");
        assert_eq!(Version::parse("1.2.3").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_release_and_metadata() {
        let version = Version::parse("1.2.3-alpha.1+build.5").unwrap();
        assert_eq!(version.release(), "alpha.1");
        assert_eq!(version.metadata(), Some("build.5"));
        assert!(version.is_prerelease());
    }

    #[test]
    fn test_plus_before_dash_is_all_metadata() {
        let version = Version::parse("1.2.3+foo-bar").unwrap();
        assert!(!version.is_prerelease());
        assert_eq!(version.metadata(), Some("foo-bar"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Version::parse("  1.2.3 ").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn test_rejects_leading_zeros_in_core() {
        assert!(Version::parse("01.2.3").is_err());
        assert!(Version::parse("1.02.3").is_err());
        assert!(Version::parse("0.2.3").is_ok());
    }

    #[test]
    fn test_rejects_leading_zeros_in_numeric_release_labels() {
        assert!(Version::parse("1.0.0-01").is_err());
        assert!(Version::parse("1.0.0-0").is_ok());
        assert!(Version::parse("1.0.0-0a.01a").is_ok());
    }

    #[test]
    fn test_metadata_allows_leading_zeros() {
        assert!(Version::parse("1.0.0+01.002").is_ok());
    }

    #[test]
    fn test_rejects_empty_identifiers() {
        assert!(Version::parse("1.0.0-").is_err());
        assert!(Version::parse("1.0.0-a..b").is_err());
        assert!(Version::parse("1.0.0+").is_err());
        assert!(Version::parse("1.0.0-alpha+").is_err());
        assert!(Version::parse("1..0").is_err());
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert!(Version::parse("1.0.0-alphä").is_err());
        assert!(Version::parse("1.0.0+méta").is_err());
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
        assert_eq!(Version::parse("   "), Err(VersionError::Empty));
        assert!(Version::parse("1.2.3.4.5").is_err());
        assert!(Version::parse("not-a-version").is_err());
        assert!(Version::try_parse("x.y.z").is_none());
    }

    #[test]
    fn test_out_of_range_component() {
        let err = Version::parse("99999999999999999999.0.0").unwrap_err();
        assert!(matches!(err, VersionError::OutOfRange(_)));
    }

    #[test]
    fn test_format_characters() {
        let version = Version::parse("1.2.3.4-alpha.2+meta").unwrap();
        assert_eq!(version.format("N"), "1.2.3.4-alpha.2+meta");
        assert_eq!(version.format("V"), "1.2.3.4");
        assert_eq!(version.format("R"), "alpha.2");
        assert_eq!(version.format("M"), "meta");
        assert_eq!(version.format("x.y.z.r"), "1.2.3.4");
        assert_eq!(version.format("version x!"), "version 1!");
    }

    #[test]
    fn test_format_empty_sections() {
        let version = Version::parse("2.0.0").unwrap();
        assert_eq!(version.format("R"), "");
        assert_eq!(version.format("M"), "");
        assert_eq!(version.format("x.y.z.r"), "2.0.0.0");
    }

    #[test]
    fn test_normalized_output_is_stable() {
        assert_eq!(
            Version::parse("1.2.3-X.yZ.3+METADATA").unwrap().format("N"),
            "1.2.3-X.yZ.3+METADATA"
        );
    }

    #[test]
    fn test_round_trip_law() {
        for input in [
            "1.2.3-X.yZ.3+METADATA",
            "0.0.0",
            "1.2.3.4",
            "1.0.0-alpha.1.2-x",
            "10.20.30+0.0.0",
        ] {
            let version = Version::parse(input).unwrap();
            let reparsed = Version::parse(&version.format("N")).unwrap();
            assert_eq!(version, reparsed, "round trip failed for {input}");
        }
    }

    #[test]
    fn test_equality_ignores_metadata_and_label_case() {
        assert_eq!(
            Version::parse("1.0.0+one").unwrap(),
            Version::parse("1.0.0+two").unwrap()
        );
        assert_eq!(
            Version::parse("1.0.0-ALPHA").unwrap(),
            Version::parse("1.0.0-alpha").unwrap()
        );
    }

    #[test]
    fn test_to_stable() {
        let version = Version::parse("1.2.3-beta+meta").unwrap();
        let stable = version.to_stable();
        assert!(!stable.is_prerelease());
        assert!(!stable.has_metadata());
        assert_eq!(stable.to_string(), "1.2.3");
    }
}
