//! Float behaviors: wildcard degrees for comparator reference versions

use crate::version::Version;

/// How far a comparator's reference version floats.
///
/// A floating comparator treats the trailing components of its reference as
/// wildcards: `1.2.*` floats the patch, `1.0-alpha*` floats the release
/// labels behind a fixed prefix, and `*` floats everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatBehavior {
    /// Exact reference, no floating.
    None,
    /// Numerics fixed, release labels float behind a prefix.
    Prerelease,
    /// Revision floats.
    Revision,
    /// Patch and revision float.
    Patch,
    /// Minor and below float.
    Minor,
    /// Everything floats.
    Major,
}

impl FloatBehavior {
    pub fn is_floating(&self) -> bool {
        *self != FloatBehavior::None
    }
}

/// Parse a version that may carry a float suffix: `*`, `1.*`, `1.x`,
/// `1.2.3.*`, or `1.2.3-alpha*`. A leading `v`/`V` before the numeric core
/// is discarded. Plain versions parse with `FloatBehavior::None`.
pub(crate) fn parse_floating(text: &str) -> Option<(Version, FloatBehavior, Option<String>)> {
    let text = strip_v_prefix(text.trim());
    if text.is_empty() {
        return None;
    }

    if text == "*" {
        return Some((Version::new(0, 0, 0), FloatBehavior::Major, None));
    }

    // a '+' before the first '-' puts the dash inside metadata
    if let Some(dash) = text.find('-').filter(|&d| d < text.find('+').unwrap_or(usize::MAX)) {
        if let Some(head) = text.strip_suffix('*') {
            let prefix = &head[dash + 1..];
            if prefix.contains('+')
                || !prefix
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
            {
                return None;
            }
            let version = Version::parse(&text[..dash]).ok()?;
            return Some((version, FloatBehavior::Prerelease, Some(prefix.to_string())));
        }
        let version = Version::parse(text).ok()?;
        return Some((version, FloatBehavior::None, None));
    }

    if let Some((head, behavior)) = split_wildcard_tail(text) {
        let version = Version::parse(head).ok()?;
        return Some((version, behavior, None));
    }

    let version = Version::parse(text).ok()?;
    Some((version, FloatBehavior::None, None))
}

/// Strip a trailing `.*` / `.x` / `.X` segment and classify the float by
/// the number of numeric parts left in front of it.
fn split_wildcard_tail(text: &str) -> Option<(&str, FloatBehavior)> {
    let head = text
        .strip_suffix(".*")
        .or_else(|| text.strip_suffix(".x"))
        .or_else(|| text.strip_suffix(".X"))?;
    let behavior = match head.split('.').count() {
        1 => FloatBehavior::Minor,
        2 => FloatBehavior::Patch,
        3 => FloatBehavior::Revision,
        _ => return None,
    };
    Some((head, behavior))
}

fn strip_v_prefix(text: &str) -> &str {
    match text.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_version() {
        let (version, float, prefix) = parse_floating("1.2.3").unwrap();
        assert_eq!(version.to_string(), "1.2.3");
        assert_eq!(float, FloatBehavior::None);
        assert_eq!(prefix, None);
    }

    #[test]
    fn test_star_floats_major() {
        let (version, float, _) = parse_floating("*").unwrap();
        assert_eq!(version.to_string(), "0.0.0");
        assert_eq!(float, FloatBehavior::Major);
    }

    #[test]
    fn test_wildcard_depths() {
        assert_eq!(parse_floating("1.*").unwrap().1, FloatBehavior::Minor);
        assert_eq!(parse_floating("1.x").unwrap().1, FloatBehavior::Minor);
        assert_eq!(parse_floating("1.2.*").unwrap().1, FloatBehavior::Patch);
        assert_eq!(parse_floating("1.2.x").unwrap().1, FloatBehavior::Patch);
        assert_eq!(parse_floating("1.2.3.*").unwrap().1, FloatBehavior::Revision);
        assert!(parse_floating("1.2.3.4.*").is_none());
    }

    #[test]
    fn test_prerelease_float() {
        let (version, float, prefix) = parse_floating("1.2.3-alpha*").unwrap();
        assert_eq!(version.to_string(), "1.2.3");
        assert_eq!(float, FloatBehavior::Prerelease);
        assert_eq!(prefix.as_deref(), Some("alpha"));

        let (_, _, prefix) = parse_floating("1.2.3-*").unwrap();
        assert_eq!(prefix.as_deref(), Some(""));

        let (_, _, prefix) = parse_floating("1.0-alpha.1*").unwrap();
        assert_eq!(prefix.as_deref(), Some("alpha.1"));
    }

    #[test]
    fn test_v_prefix_discarded() {
        assert_eq!(
            parse_floating("v1.2.3").unwrap().0.to_string(),
            "1.2.3"
        );
        assert_eq!(parse_floating("V2.0").unwrap().0.to_string(), "2.0.0");
        // bare "v" or "v-something" is not a version
        assert!(parse_floating("v").is_none());
    }

    #[test]
    fn test_invalid_floats() {
        assert!(parse_floating("1.x.x").is_none());
        assert!(parse_floating("x.2").is_none());
        assert!(parse_floating("1.2.3-ä*").is_none());
        assert!(parse_floating("").is_none());
    }
}
