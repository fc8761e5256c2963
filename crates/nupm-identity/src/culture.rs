//! Structural validation of culture tags

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// BCP 47-shaped tag: a 2-8 letter primary subtag followed by 1-8
    /// character alphanumeric subtags separated by '-'.
    static ref CULTURE_TAG_RE: Regex =
        Regex::new(r"^[A-Za-z]{2,8}(?:-[0-9A-Za-z]{1,8})*$").unwrap();
}

pub(crate) fn is_valid_culture(tag: &str) -> bool {
    CULTURE_TAG_RE.is_match(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_tags() {
        for tag in ["de", "en-US", "zh-Hans", "zh-TW", "fr-FR", "sr-Latn-RS", "es-419"] {
            assert!(is_valid_culture(tag), "{tag} should be valid");
        }
    }

    #[test]
    fn test_rejects_malformed_tags() {
        for tag in ["", "a", "-x", "en--US", "en-", "toolongprimary", "en_US", "en US", ".."] {
            assert!(!is_valid_culture(tag), "{tag} should be invalid");
        }
    }
}
