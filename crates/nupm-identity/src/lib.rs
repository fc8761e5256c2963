//! Assembly identity parsing and comparison
//!
//! This crate parses .NET assembly display names
//! (`Name, Version=1.2.3.4, Culture=neutral, PublicKeyToken=…`) into
//! immutable identity values and compares them under selectable
//! strictness, from short-name-only up to every field.

mod architecture;
mod comparer;
mod culture;
mod identity;

pub use architecture::{InvalidArchitectureError, ProcessorArchitecture};
pub use comparer::{AssemblyIdentityComparer, AssemblyIdentityComparison};
pub use identity::{AssemblyIdentity, IdentityError};
