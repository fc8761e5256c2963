//! Version ordering and equality under selectable comparison modes

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::version::Version;

/// How much of a version participates in a comparison.
///
/// The default mode is [`VersionRelease`](VersionComparison::VersionRelease):
/// numerics plus release labels, metadata ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionComparison {
    /// Compare only the four numeric components.
    Version,
    /// Compare numerics, then release labels.
    VersionRelease,
    /// As `VersionRelease`, then metadata case-insensitively.
    VersionReleaseMetadata,
}

impl Default for VersionComparison {
    fn default() -> Self {
        VersionComparison::VersionRelease
    }
}

/// A comparer fixed to one [`VersionComparison`] mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionComparer {
    mode: VersionComparison,
}

impl Default for VersionComparer {
    fn default() -> Self {
        VersionComparer::VERSION_RELEASE
    }
}

impl VersionComparer {
    pub const VERSION: VersionComparer = VersionComparer {
        mode: VersionComparison::Version,
    };
    pub const VERSION_RELEASE: VersionComparer = VersionComparer {
        mode: VersionComparison::VersionRelease,
    };
    pub const VERSION_RELEASE_METADATA: VersionComparer = VersionComparer {
        mode: VersionComparison::VersionReleaseMetadata,
    };

    pub fn new(mode: VersionComparison) -> VersionComparer {
        VersionComparer { mode }
    }

    pub fn mode(&self) -> VersionComparison {
        self.mode
    }

    /// Total order over versions under this comparer's mode.
    ///
    /// Numerics compare first. A prerelease sorts before a stable version
    /// with the same numerics; two prereleases compare label by label, with
    /// numeric labels before alphanumeric ones and a shorter label list
    /// first when the shared labels are equal.
    pub fn compare(&self, a: &Version, b: &Version) -> Ordering {
        let ord = compare_numeric(a, b);
        if ord != Ordering::Equal || self.mode == VersionComparison::Version {
            return ord;
        }

        let ord = match (a.is_prerelease(), b.is_prerelease()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => compare_release(a.release_labels(), b.release_labels()),
            (false, false) => Ordering::Equal,
        };
        if ord != Ordering::Equal || self.mode != VersionComparison::VersionReleaseMetadata {
            return ord;
        }

        icase_cmp(a.metadata().unwrap_or(""), b.metadata().unwrap_or(""))
    }

    pub fn equals(&self, a: &Version, b: &Version) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Hash over exactly the fields this mode compares, so that
    /// `equals(a, b)` implies `hash_version(a) == hash_version(b)`.
    pub fn hash_version(&self, version: &Version) -> u64 {
        let mut state = DefaultHasher::new();
        self.feed(version, &mut state);
        state.finish()
    }

    pub(crate) fn feed<H: Hasher>(&self, version: &Version, state: &mut H) {
        version.major().hash(state);
        version.minor().hash(state);
        version.patch().hash(state);
        version.revision().hash(state);
        if self.mode == VersionComparison::Version {
            return;
        }
        version.release_labels().len().hash(state);
        for label in version.release_labels() {
            label.to_ascii_lowercase().hash(state);
        }
        if self.mode == VersionComparison::VersionReleaseMetadata {
            version
                .metadata()
                .unwrap_or("")
                .to_ascii_lowercase()
                .hash(state);
        }
    }
}

fn compare_numeric(a: &Version, b: &Version) -> Ordering {
    a.major()
        .cmp(&b.major())
        .then(a.minor().cmp(&b.minor()))
        .then(a.patch().cmp(&b.patch()))
        .then(a.revision().cmp(&b.revision()))
}

fn compare_release(a: &[String], b: &[String]) -> Ordering {
    for (left, right) in a.iter().zip(b.iter()) {
        let ord = compare_label(left, right);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_label(a: &str, b: &str) -> Ordering {
    match (numeric_label(a), numeric_label(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => icase_cmp(a, b),
    }
}

fn numeric_label(label: &str) -> Option<u64> {
    if label.bytes().all(|b| b.is_ascii_digit()) {
        label.parse().ok()
    } else {
        None
    }
}

/// Ordinal case-insensitive comparison over ASCII text.
pub(crate) fn icase_cmp(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(b.bytes().map(|b| b.to_ascii_lowercase()))
}
