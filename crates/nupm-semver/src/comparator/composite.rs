//! Composite comparators: AND/OR trees over single comparators

use std::fmt;
use std::str::FromStr;

use super::range;
use super::single::{ComparatorError, VersionComparator};
use crate::version::Version;

/// The logical connective binding a composite's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compositor {
    /// All children must match.
    And,
    /// At least one child must match.
    Or,
}

impl Compositor {
    fn separator(&self) -> &'static str {
        match self {
            Compositor::And => " && ",
            Compositor::Or => " || ",
        }
    }
}

/// A comparator tree node: either a single comparator or a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparator {
    Single(VersionComparator),
    Composite(CompositeComparator),
}

impl Comparator {
    /// Parse a range expression into a comparator tree.
    ///
    /// The grammar supports bracketed ranges `[1.0, 2.0)`, hyphen ranges
    /// `1.0 - 2.0`, tilde `~1.2.3`, caret `^1.2.3`, single comparators,
    /// and infix `||` / `&&` with parentheses.
    pub fn parse(text: &str) -> Result<Comparator, ComparatorError> {
        range::parse_expression(text)
    }

    pub fn try_parse(text: &str) -> Option<Comparator> {
        Comparator::parse(text).ok()
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self {
            Comparator::Single(single) => single.matches(candidate),
            Comparator::Composite(composite) => composite.matches(candidate),
        }
    }
}

impl From<VersionComparator> for Comparator {
    fn from(single: VersionComparator) -> Comparator {
        Comparator::Single(single)
    }
}

impl From<CompositeComparator> for Comparator {
    fn from(composite: CompositeComparator) -> Comparator {
        Comparator::Composite(composite)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Single(single) => write!(f, "{single}"),
            Comparator::Composite(composite) => write!(f, "{composite}"),
        }
    }
}

impl FromStr for Comparator {
    type Err = ComparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparator::parse(s)
    }
}

/// An ordered list of child comparators joined by one compositor.
///
/// Equality is multiset equality of the children plus the compositor; the
/// order the children were written in does not matter.
#[derive(Debug, Clone)]
pub struct CompositeComparator {
    comparators: Vec<Comparator>,
    compositor: Compositor,
}

impl CompositeComparator {
    pub fn new(comparators: Vec<Comparator>, compositor: Compositor) -> CompositeComparator {
        CompositeComparator {
            comparators,
            compositor,
        }
    }

    /// Parse a range expression, always yielding a composite node; a lone
    /// comparator is wrapped in a single-child AND.
    pub fn parse(text: &str) -> Result<CompositeComparator, ComparatorError> {
        match Comparator::parse(text)? {
            Comparator::Composite(composite) => Ok(composite),
            single => Ok(CompositeComparator::new(vec![single], Compositor::And)),
        }
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    pub fn compositor(&self) -> Compositor {
        self.compositor
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self.compositor {
            Compositor::And => self.comparators.iter().all(|c| c.matches(candidate)),
            Compositor::Or => self.comparators.iter().any(|c| c.matches(candidate)),
        }
    }
}

impl PartialEq for CompositeComparator {
    fn eq(&self, other: &Self) -> bool {
        if self.compositor != other.compositor
            || self.comparators.len() != other.comparators.len()
        {
            return false;
        }
        let mut used = vec![false; other.comparators.len()];
        'children: for child in &self.comparators {
            for (i, candidate) in other.comparators.iter().enumerate() {
                if !used[i] && child == candidate {
                    used[i] = true;
                    continue 'children;
                }
            }
            return false;
        }
        true
    }
}

impl Eq for CompositeComparator {}

impl fmt::Display for CompositeComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, child) in self.comparators.iter().enumerate() {
            if i > 0 {
                f.write_str(self.compositor.separator())?;
            }
            match child {
                // an OR child inside an AND needs grouping to survive a
                // reparse
                Comparator::Composite(inner)
                    if self.compositor == Compositor::And
                        && inner.compositor() == Compositor::Or =>
                {
                    write!(f, "({inner})")?
                }
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Comparator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Comparator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Comparator::parse(&text).map_err(serde::de::Error::custom)
    }
}
