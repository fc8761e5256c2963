//! Single-relation version comparators

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::float::{parse_floating, FloatBehavior};
use crate::comparer::{icase_cmp, VersionComparer};
use crate::version::{Version, VersionError};

/// Error type for comparator and range parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparatorError {
    #[error("comparator string is empty")]
    Empty,
    #[error("\"{0}\" is not a valid version string")]
    InvalidFormat(String),
    #[error("\"{0}\" is not a valid version range")]
    InvalidRange(String),
    #[error(transparent)]
    InvalidVersion(#[from] VersionError),
}

/// Relational operators for version comparators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorOperator {
    /// Equal (`==`, `=`, or no prefix)
    Eq,
    /// Not equal (`!=` or `<>`)
    NotEq,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`, or trailing `+`)
    GtEq,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`, or trailing `-`)
    LtEq,
}

impl ComparatorOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparatorOperator::Eq => "==",
            ComparatorOperator::NotEq => "!=",
            ComparatorOperator::Gt => ">",
            ComparatorOperator::GtEq => ">=",
            ComparatorOperator::Lt => "<",
            ComparatorOperator::LtEq => "<=",
        }
    }

    /// Whether `result = compare(reference, candidate)` satisfies this
    /// operator. "Candidate greater than reference" is encoded as `Less`.
    pub(crate) fn applies_to(&self, result: Ordering) -> bool {
        match self {
            ComparatorOperator::Eq => result == Ordering::Equal,
            ComparatorOperator::NotEq => result != Ordering::Equal,
            ComparatorOperator::Gt => result == Ordering::Less,
            ComparatorOperator::GtEq => result != Ordering::Greater,
            ComparatorOperator::Lt => result == Ordering::Greater,
            ComparatorOperator::LtEq => result != Ordering::Less,
        }
    }
}

impl fmt::Display for ComparatorOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator prefixes in match order; first match wins.
const OPERATOR_PREFIXES: [(&str, ComparatorOperator); 8] = [
    ("==", ComparatorOperator::Eq),
    ("!=", ComparatorOperator::NotEq),
    ("<>", ComparatorOperator::NotEq),
    (">=", ComparatorOperator::GtEq),
    ("<=", ComparatorOperator::LtEq),
    ("=", ComparatorOperator::Eq),
    (">", ComparatorOperator::Gt),
    ("<", ComparatorOperator::Lt),
];

/// A predicate `candidate OP reference` with an optional float behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComparator {
    version: Version,
    float: FloatBehavior,
    release_prefix: Option<String>,
    operator: ComparatorOperator,
}

impl VersionComparator {
    /// An exact (non-floating) comparator.
    pub fn new(version: Version, operator: ComparatorOperator) -> VersionComparator {
        VersionComparator {
            version,
            float: FloatBehavior::None,
            release_prefix: None,
            operator,
        }
    }

    pub(crate) fn floating(
        version: Version,
        float: FloatBehavior,
        release_prefix: Option<String>,
        operator: ComparatorOperator,
    ) -> VersionComparator {
        VersionComparator {
            version,
            float,
            release_prefix,
            operator,
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn float_behavior(&self) -> FloatBehavior {
        self.float
    }

    pub fn release_prefix(&self) -> Option<&str> {
        self.release_prefix.as_deref()
    }

    pub fn operator(&self) -> ComparatorOperator {
        self.operator
    }

    /// Parse a comparator, returning `None` on failure.
    pub fn try_parse(text: &str) -> Option<VersionComparator> {
        VersionComparator::parse(text).ok()
    }

    /// Parse a comparator: an optional operator prefix (`==`, `!=`, `<>`,
    /// `>=`, `<=`, `=`, `>`, `<`) followed by a possibly floating version.
    /// Without a prefix, a trailing `+` means `>=` and a trailing `-`
    /// means `<=`.
    pub fn parse(text: &str) -> Result<VersionComparator, ComparatorError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ComparatorError::Empty);
        }

        let (operator, rest) = match strip_operator(trimmed) {
            Some((operator, rest)) => (operator, rest.trim_start()),
            None => {
                if let Some(head) = trimmed.strip_suffix('+') {
                    (ComparatorOperator::GtEq, head)
                } else if let Some(head) = trimmed.strip_suffix('-') {
                    (ComparatorOperator::LtEq, head)
                } else {
                    (ComparatorOperator::Eq, trimmed)
                }
            }
        };

        let (version, float, release_prefix) = parse_floating(rest)
            .ok_or_else(|| ComparatorError::InvalidFormat(trimmed.to_string()))?;
        Ok(VersionComparator {
            version,
            float,
            release_prefix,
            operator,
        })
    }

    /// Whether the candidate satisfies this comparator.
    ///
    /// Each float behavior compares the reference against the candidate
    /// under its own mode; floating behaviors other than `Prerelease`
    /// reject prerelease candidates outright.
    pub fn matches(&self, candidate: &Version) -> bool {
        let reference = &self.version;
        let result = match self.float {
            FloatBehavior::None => VersionComparer::VERSION_RELEASE.compare(reference, candidate),
            FloatBehavior::Prerelease => {
                let numeric = VersionComparer::VERSION.compare(reference, candidate);
                if numeric != Ordering::Equal {
                    numeric
                } else if !candidate.is_prerelease() {
                    return false;
                } else {
                    let release = candidate.release();
                    let prefix = self.release_prefix.as_deref().unwrap_or("");
                    if starts_with_ignore_case(&release, prefix) {
                        Ordering::Equal
                    } else {
                        icase_cmp(prefix, &release)
                    }
                }
            }
            FloatBehavior::Revision
            | FloatBehavior::Patch
            | FloatBehavior::Minor
            | FloatBehavior::Major => {
                if candidate.is_prerelease() {
                    return false;
                }
                let fixed = match self.float {
                    FloatBehavior::Revision => 3,
                    FloatBehavior::Patch => 2,
                    FloatBehavior::Minor => 1,
                    _ => 0,
                };
                compare_fixed_components(reference, candidate, fixed)
            }
        };
        self.operator.applies_to(result)
    }
}

fn strip_operator(text: &str) -> Option<(ComparatorOperator, &str)> {
    for (token, operator) in OPERATOR_PREFIXES {
        if let Some(rest) = text.strip_prefix(token) {
            return Some((operator, rest));
        }
    }
    None
}

/// Compare only the first `fixed` numeric components.
fn compare_fixed_components(reference: &Version, candidate: &Version, fixed: usize) -> Ordering {
    let reference = [reference.major(), reference.minor(), reference.patch()];
    let candidate = [candidate.major(), candidate.minor(), candidate.patch()];
    reference[..fixed].cmp(&candidate[..fixed])
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl fmt::Display for VersionComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator != ComparatorOperator::Eq {
            f.write_str(self.operator.as_str())?;
        }
        match self.float {
            FloatBehavior::None => write!(f, "{}", self.version),
            FloatBehavior::Major => f.write_str("*"),
            FloatBehavior::Minor => write!(f, "{}.*", self.version.major()),
            FloatBehavior::Patch => {
                write!(f, "{}.{}.*", self.version.major(), self.version.minor())
            }
            FloatBehavior::Revision => write!(
                f,
                "{}.{}.{}.*",
                self.version.major(),
                self.version.minor(),
                self.version.patch()
            ),
            FloatBehavior::Prerelease => write!(
                f,
                "{}-{}*",
                self.version.format("V"),
                self.release_prefix.as_deref().unwrap_or("")
            ),
        }
    }
}

impl FromStr for VersionComparator {
    type Err = ComparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionComparator::parse(s)
    }
}
