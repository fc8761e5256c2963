//! Assembly identity comparison under selectable strictness

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::identity::AssemblyIdentity;

/// How much of an identity participates in a comparison, in ascending
/// strictness. Each mode compares all fields at its level and below.
///
/// The default compares every field, which coincides with
/// [`Architecture`](AssemblyIdentityComparison::Architecture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssemblyIdentityComparison {
    /// Short name only.
    ShortName,
    /// Short name and version.
    Version,
    /// Short name, version and culture.
    Culture,
    /// Short name, version, culture and public key token.
    PublicKeyToken,
    /// Every field.
    Architecture,
}

impl Default for AssemblyIdentityComparison {
    fn default() -> Self {
        AssemblyIdentityComparison::Architecture
    }
}

/// A comparer fixed to one [`AssemblyIdentityComparison`] mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyIdentityComparer {
    mode: AssemblyIdentityComparison,
}

impl Default for AssemblyIdentityComparer {
    fn default() -> Self {
        AssemblyIdentityComparer::DEFAULT
    }
}

impl AssemblyIdentityComparer {
    pub const SHORT_NAME: AssemblyIdentityComparer = AssemblyIdentityComparer {
        mode: AssemblyIdentityComparison::ShortName,
    };
    pub const VERSION: AssemblyIdentityComparer = AssemblyIdentityComparer {
        mode: AssemblyIdentityComparison::Version,
    };
    pub const CULTURE: AssemblyIdentityComparer = AssemblyIdentityComparer {
        mode: AssemblyIdentityComparison::Culture,
    };
    pub const PUBLIC_KEY_TOKEN: AssemblyIdentityComparer = AssemblyIdentityComparer {
        mode: AssemblyIdentityComparison::PublicKeyToken,
    };
    pub const ARCHITECTURE: AssemblyIdentityComparer = AssemblyIdentityComparer {
        mode: AssemblyIdentityComparison::Architecture,
    };
    pub const DEFAULT: AssemblyIdentityComparer = AssemblyIdentityComparer::ARCHITECTURE;

    pub fn new(mode: AssemblyIdentityComparison) -> AssemblyIdentityComparer {
        AssemblyIdentityComparer { mode }
    }

    pub fn mode(&self) -> AssemblyIdentityComparison {
        self.mode
    }

    /// Structural equality under this comparer's mode. The short name and
    /// culture compare case-insensitively; an absent token or version only
    /// equals another absent one.
    pub fn equals(&self, a: &AssemblyIdentity, b: &AssemblyIdentity) -> bool {
        if !a.short_name().eq_ignore_ascii_case(b.short_name()) {
            return false;
        }
        if self.mode >= AssemblyIdentityComparison::Version && a.version() != b.version() {
            return false;
        }
        if self.mode >= AssemblyIdentityComparison::Culture
            && !culture_equals(a.culture(), b.culture())
        {
            return false;
        }
        if self.mode >= AssemblyIdentityComparison::PublicKeyToken
            && a.public_key_token() != b.public_key_token()
        {
            return false;
        }
        if self.mode >= AssemblyIdentityComparison::Architecture
            && a.architecture() != b.architecture()
        {
            return false;
        }
        true
    }

    /// Hash over exactly the fields this mode compares.
    pub fn hash_identity(&self, identity: &AssemblyIdentity) -> u64 {
        let mut state = DefaultHasher::new();
        self.feed(identity, &mut state);
        state.finish()
    }

    pub(crate) fn feed<H: Hasher>(&self, identity: &AssemblyIdentity, state: &mut H) {
        identity.short_name().to_ascii_lowercase().hash(state);
        if self.mode >= AssemblyIdentityComparison::Version {
            identity.version().hash(state);
        }
        if self.mode >= AssemblyIdentityComparison::Culture {
            identity
                .culture()
                .map(|c| c.to_ascii_lowercase())
                .hash(state);
        }
        if self.mode >= AssemblyIdentityComparison::PublicKeyToken {
            identity.public_key_token().hash(state);
        }
        if self.mode >= AssemblyIdentityComparison::Architecture {
            (identity.architecture() as u8).hash(state);
        }
    }
}

fn culture_equals(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(left), Some(right)) => left.eq_ignore_ascii_case(right),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(text: &str) -> AssemblyIdentity {
        AssemblyIdentity::parse(text).unwrap()
    }

    #[test]
    fn test_short_name_mode() {
        let comparer = AssemblyIdentityComparer::SHORT_NAME;
        assert!(comparer.equals(
            &identity("Lib, Version=1.0"),
            &identity("lib, Version=2.0")
        ));
        assert!(!comparer.equals(&identity("Lib"), &identity("Other")));
    }

    #[test]
    fn test_version_mode() {
        let comparer = AssemblyIdentityComparer::VERSION;
        assert!(comparer.equals(
            &identity("Lib, Version=1.0, Culture=de"),
            &identity("Lib, Version=1.0, Culture=fr")
        ));
        assert!(!comparer.equals(
            &identity("Lib, Version=1.0"),
            &identity("Lib, Version=2.0")
        ));
        // absent vs present version is unequal
        assert!(!comparer.equals(&identity("Lib, Version=1.0"), &identity("Lib")));
    }

    #[test]
    fn test_culture_mode() {
        let comparer = AssemblyIdentityComparer::CULTURE;
        assert!(!comparer.equals(
            &identity("Lib, Culture=zh-Hans"),
            &identity("Lib, Culture=zh-TW")
        ));
        assert!(comparer.equals(
            &identity("Lib, Culture=EN-us"),
            &identity("Lib, Culture=en-US")
        ));
        assert!(comparer.equals(
            &identity("Lib, Culture=neutral"),
            &identity("Lib")
        ));
    }

    #[test]
    fn test_token_mode() {
        let comparer = AssemblyIdentityComparer::PUBLIC_KEY_TOKEN;
        let signed = identity("Lib, PublicKeyToken=31bf3856ad364e35");
        let same = identity("Lib, PublicKeyToken=31BF3856AD364E35");
        let other = identity("Lib, PublicKeyToken=b77a5c561934e089");
        let unsigned = identity("Lib, PublicKeyToken=null");
        assert!(comparer.equals(&signed, &same));
        assert!(!comparer.equals(&signed, &other));
        assert!(!comparer.equals(&signed, &unsigned));
        assert!(comparer.equals(&unsigned, &identity("Lib")));
    }

    #[test]
    fn test_architecture_and_default_mode() {
        let msil = identity("Lib, processorArchitecture=msil");
        let amd64 = identity("Lib, processorArchitecture=amd64");
        assert!(!AssemblyIdentityComparer::DEFAULT.equals(&msil, &amd64));
        assert!(AssemblyIdentityComparer::PUBLIC_KEY_TOKEN.equals(&msil, &amd64));
        assert_eq!(msil, msil.clone());
        assert_ne!(msil, amd64);
    }

    #[test]
    fn test_equal_implies_equal_hash() {
        let cases = [
            (
                "Lib, Version=1.0, Culture=EN-us",
                "lib, Version=1.0, Culture=en-US",
                AssemblyIdentityComparer::DEFAULT,
            ),
            (
                "Lib, Version=1.0",
                "LIB, Version=2.0",
                AssemblyIdentityComparer::SHORT_NAME,
            ),
            (
                "Lib, PublicKeyToken=31bf3856ad364e35",
                "Lib, PublicKeyToken=31BF3856AD364E35",
                AssemblyIdentityComparer::PUBLIC_KEY_TOKEN,
            ),
        ];
        for (left, right, comparer) in cases {
            let (a, b) = (identity(left), identity(right));
            assert!(comparer.equals(&a, &b));
            assert_eq!(
                comparer.hash_identity(&a),
                comparer.hash_identity(&b),
                "hash mismatch for {left} / {right}"
            );
        }
    }

    #[test]
    fn test_hash_excludes_stricter_fields() {
        let comparer = AssemblyIdentityComparer::SHORT_NAME;
        assert_eq!(
            comparer.hash_identity(&identity("Lib, Version=1.0")),
            comparer.hash_identity(&identity("Lib, Version=9.9"))
        );
    }
}
