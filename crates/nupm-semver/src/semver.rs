//! Semver facade providing high-level version operations

use crate::comparator::Comparator;
use crate::comparer::VersionComparer;
use crate::version::Version;

/// Main facade for matching and sorting version strings.
pub struct Semver;

impl Semver {
    /// Check if a version satisfies a range expression.
    pub fn satisfies(version: &str, range: &str) -> bool {
        let Some(version) = Version::try_parse(version) else {
            return false;
        };
        let Some(range) = Comparator::try_parse(range) else {
            return false;
        };
        range.matches(&version)
    }

    /// Return all versions that satisfy the given range, in input order.
    /// Unparseable versions are skipped.
    pub fn satisfied_by<'a>(versions: &[&'a str], range: &str) -> Vec<&'a str> {
        let Some(range) = Comparator::try_parse(range) else {
            return Vec::new();
        };
        versions
            .iter()
            .copied()
            .filter(|text| {
                Version::try_parse(text).is_some_and(|version| range.matches(&version))
            })
            .collect()
    }

    /// Return the highest version that satisfies the given range.
    pub fn max_satisfying<'a>(versions: &[&'a str], range: &str) -> Option<&'a str> {
        let range = Comparator::try_parse(range)?;
        versions
            .iter()
            .copied()
            .filter_map(|text| Version::try_parse(text).map(|version| (text, version)))
            .filter(|(_, version)| range.matches(version))
            .max_by(|(_, a), (_, b)| VersionComparer::VERSION_RELEASE.compare(a, b))
            .map(|(text, _)| text)
    }

    /// Sort versions in ascending order. Unparseable versions are dropped.
    pub fn sort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, true)
    }

    /// Sort versions in descending order (reverse sort).
    pub fn rsort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, false)
    }

    fn usort(versions: &[&str], ascending: bool) -> Vec<String> {
        let mut parsed: Vec<(Version, usize)> = versions
            .iter()
            .enumerate()
            .filter_map(|(i, text)| Version::try_parse(text).map(|version| (version, i)))
            .collect();

        parsed.sort_by(|(a, _), (b, _)| {
            let ord = VersionComparer::VERSION_RELEASE.compare(a, b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });

        parsed
            .into_iter()
            .map(|(_, i)| versions[i].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfies_positive() {
        assert!(Semver::satisfies("1.2.3", "1.0.0 - 2.0.0"));
        assert!(Semver::satisfies("1.0.0", "1.0.0"));
        assert!(Semver::satisfies("1.2.3", "*"));
        assert!(Semver::satisfies("v1.2.3", "*"));

        assert!(Semver::satisfies("1.0.0", ">=1.0.0"));
        assert!(Semver::satisfies("1.1.0", ">1.0.0"));
        assert!(Semver::satisfies("1.9999.9999", "<=2.0.0"));
        assert!(Semver::satisfies("0.2.9", "<2.0.0"));

        assert!(Semver::satisfies("1.2.4", "0.1.20 || 1.2.4"));
        assert!(Semver::satisfies("0.2.3", ">=0.2.3 || <0.0.1"));

        assert!(Semver::satisfies("1.2.3", "1.2.x"));
        assert!(Semver::satisfies("2.1.3", "1.2.* || 2.*"));

        assert!(Semver::satisfies("1.2.9", "~1.2.3"));
        assert!(Semver::satisfies("1.8.1", "^1.2.3"));
        assert!(Semver::satisfies("0.1.2", "^0.1.2"));

        assert!(Semver::satisfies("1.5.0", ">=1.2.3 && <2.0.0"));
    }

    #[test]
    fn test_satisfies_negative() {
        assert!(!Semver::satisfies("2.2.3", "1.0.0 - 2.0.0"));
        assert!(!Semver::satisfies("1.0.1", "1.0.0"));
        assert!(!Semver::satisfies("0.1.0", ">=1.0.0"));
        assert!(!Semver::satisfies("1.2.3", "0.1.20 || 1.2.4"));
        assert!(!Semver::satisfies("1.3.3", "1.2.x"));
        assert!(!Semver::satisfies("1.3.0", "~1.2.3"));
        assert!(!Semver::satisfies("2.0.0", "^1.2.3"));
        assert!(!Semver::satisfies("1.2.2", "^1.2.3"));

        // unparseable inputs fail soft
        assert!(!Semver::satisfies("not-a-version", "*"));
        assert!(!Semver::satisfies("1.0.0", "not a range ["));
    }

    #[test]
    fn test_satisfied_by() {
        let versions = ["1.0", "1.2", "1.2.9", "1.3.0", "2.0", "garbage"];
        assert_eq!(
            Semver::satisfied_by(&versions, "~1.2"),
            vec!["1.2", "1.2.9"]
        );
        assert_eq!(
            Semver::satisfied_by(&versions, ">1.0 && <2.0 || >=2.0"),
            vec!["1.2", "1.2.9", "1.3.0", "2.0"]
        );
    }

    #[test]
    fn test_max_satisfying() {
        let versions = ["1.0.0", "1.2.3", "1.2.9", "2.0.0"];
        assert_eq!(Semver::max_satisfying(&versions, "~1.2.3"), Some("1.2.9"));
        assert_eq!(Semver::max_satisfying(&versions, "^1.0.0"), Some("1.2.9"));
        assert_eq!(Semver::max_satisfying(&versions, ">2.0.0"), None);
    }

    #[test]
    fn test_sort() {
        let versions = ["1.0", "0.1", "3.2.1", "2.4.0-alpha", "2.4.0"];
        assert_eq!(
            Semver::sort(&versions),
            vec!["0.1", "1.0", "2.4.0-alpha", "2.4.0", "3.2.1"]
        );
    }

    #[test]
    fn test_rsort() {
        let versions = ["1.0", "0.1", "3.2.1", "2.4.0-alpha", "2.4.0"];
        assert_eq!(
            Semver::rsort(&versions),
            vec!["3.2.1", "2.4.0", "2.4.0-alpha", "1.0", "0.1"]
        );
    }
}
