//! Semantic versioning library with NuGet-compatible extensions
//!
//! This crate provides semantic version parsing with an optional fourth
//! (revision) component, ordering under selectable comparison modes, and
//! range matching with float (wildcard) behaviors, bracketed and hyphen
//! ranges, tilde, caret, and infix `||` / `&&` expressions.

pub mod comparator;
mod comparer;
mod semver;
mod version;

pub use comparator::{
    Comparator, ComparatorError, ComparatorOperator, CompositeComparator, Compositor,
    FloatBehavior, VersionComparator,
};
pub use comparer::{VersionComparer, VersionComparison};
pub use semver::Semver;
pub use version::{Version, VersionError};
