//! Range expression grammar: brackets, hyphen ranges, tilde, caret, and
//! infix `||` / `&&` composition

use super::composite::{Comparator, CompositeComparator, Compositor};
use super::float::{parse_floating, FloatBehavior};
use super::single::{ComparatorError, ComparatorOperator, VersionComparator};
use crate::version::Version;

pub(crate) fn parse_expression(text: &str) -> Result<Comparator, ComparatorError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ComparatorError::Empty);
    }
    parse_or(trimmed)
}

fn invalid(text: &str) -> ComparatorError {
    ComparatorError::InvalidRange(text.to_string())
}

fn parse_or(text: &str) -> Result<Comparator, ComparatorError> {
    let parts = split_top_level(text, "||")?;
    if parts.len() == 1 {
        return parse_and(parts[0]);
    }
    let children = parts
        .into_iter()
        .map(parse_and)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Comparator::Composite(CompositeComparator::new(
        children,
        Compositor::Or,
    )))
}

fn parse_and(text: &str) -> Result<Comparator, ComparatorError> {
    let parts = split_top_level(text, "&&")?;
    if parts.len() == 1 {
        return parse_atom(parts[0]);
    }
    let children = parts
        .into_iter()
        .map(parse_atom)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Comparator::Composite(CompositeComparator::new(
        children,
        Compositor::And,
    )))
}

/// Split on a separator at grouping depth zero. When depth tracking finds
/// no split and the grouping is unbalanced, retry ignoring depth so flat
/// expressions with stray brackets still parse.
fn split_top_level<'a>(
    text: &'a str,
    separator: &str,
) -> Result<Vec<&'a str>, ComparatorError> {
    let (mut parts, balanced) = scan_split(text, separator, true);
    if parts.len() == 1 && !balanced && text.contains(separator) {
        parts = scan_split(text, separator, false).0;
    }
    let parts: Vec<&str> = parts.iter().map(|p| p.trim()).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid(text));
    }
    Ok(parts)
}

fn scan_split<'a>(text: &'a str, separator: &str, respect_depth: bool) -> (Vec<&'a str>, bool) {
    let bytes = text.as_bytes();
    let sep = separator.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            _ => {
                if (depth <= 0 || !respect_depth) && bytes[i..].starts_with(sep) {
                    parts.push(&text[start..i]);
                    i += sep.len();
                    start = i;
                    continue;
                }
            }
        }
        i += 1;
    }
    parts.push(&text[start..]);
    (parts, depth == 0)
}

fn parse_atom(text: &str) -> Result<Comparator, ComparatorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ComparatorError::Empty);
    }

    if text.starts_with('[') {
        return parse_bracket_range(text).ok_or_else(|| invalid(text));
    }
    if text.starts_with('(') {
        if let Some(range) = parse_bracket_range(text) {
            return Ok(range);
        }
        // not a version range; treat as a parenthesized sub-expression
        if let Some(interior) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            return parse_expression(interior);
        }
        // unmatched '(' left over from a flat split; tolerate the stray
        return parse_atom(&text[1..]);
    }

    if let Some(pos) = text.find(" - ") {
        return parse_hyphen_range(&text[..pos], &text[pos + 3..], text);
    }
    if let Some(rest) = text.strip_prefix('-') {
        // bare '-' at the start: missing lower bound
        if let Some(upper) = try_bound(rest, ComparatorOperator::LtEq) {
            return Ok(Comparator::Single(upper));
        }
    } else if let Some(head) = text.strip_suffix('-') {
        // bare '-' at the end: missing upper bound
        if let Some(lower) = try_bound(head, ComparatorOperator::GtEq) {
            return Ok(Comparator::Single(lower));
        }
    }

    if let Some(rest) = text.strip_prefix('~') {
        return parse_tilde(rest, text);
    }
    if let Some(rest) = text.strip_prefix('^') {
        return parse_caret(rest);
    }

    VersionComparator::parse(text).map(Comparator::Single)
}

/// `[lo, hi]` with `[`/`]` inclusive and `(`/`)` exclusive. A missing bound
/// leaves that side unbounded; a single value is used for both bounds.
fn parse_bracket_range(text: &str) -> Option<Comparator> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let lower_inclusive = match bytes[0] {
        b'[' => true,
        b'(' => false,
        _ => return None,
    };
    let upper_inclusive = match bytes[bytes.len() - 1] {
        b']' => true,
        b')' => false,
        _ => return None,
    };

    let interior = &text[1..text.len() - 1];
    let (lower, upper) = match interior.find(',') {
        Some(pos) => (&interior[..pos], &interior[pos + 1..]),
        None => (interior, interior),
    };
    let lower = lower.trim();
    let upper = upper.trim();

    let mut children = Vec::new();
    if !lower.is_empty() {
        let operator = if lower_inclusive {
            ComparatorOperator::GtEq
        } else {
            ComparatorOperator::Gt
        };
        children.push(Comparator::Single(try_bound(lower, operator)?));
    }
    if !upper.is_empty() {
        let operator = if upper_inclusive {
            ComparatorOperator::LtEq
        } else {
            ComparatorOperator::Lt
        };
        children.push(Comparator::Single(try_bound(upper, operator)?));
    }

    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(Comparator::Composite(CompositeComparator::new(
            children,
            Compositor::And,
        ))),
    }
}

fn parse_hyphen_range(
    lower: &str,
    upper: &str,
    whole: &str,
) -> Result<Comparator, ComparatorError> {
    let lower = bound(lower.trim(), ComparatorOperator::GtEq, whole)?;
    let upper = bound(upper.trim(), ComparatorOperator::LtEq, whole)?;
    Ok(Comparator::Composite(CompositeComparator::new(
        vec![Comparator::Single(lower), Comparator::Single(upper)],
        Compositor::And,
    )))
}

/// `~X` floats the minor, `~X.Y` the patch; `~X.Y.Z` pins `[X.Y.Z, X.Y.x]`
/// and `~X.Y.Z.R` pins `[X.Y.Z.R, X.Y.Z.x]`. A prerelease reference also
/// accepts same-numeric prereleases at or after it.
fn parse_tilde(rest: &str, whole: &str) -> Result<Comparator, ComparatorError> {
    let rest = rest.trim();
    let version = Version::parse(rest)?;
    let depth = core_depth(rest);
    if version.is_prerelease() {
        let stable = version.to_stable();
        let tail = tilde_stable(&stable, depth, whole)?;
        return Ok(with_prerelease_window(version, stable, tail));
    }
    tilde_stable(&version, depth, whole)
}

fn tilde_stable(
    version: &Version,
    depth: usize,
    whole: &str,
) -> Result<Comparator, ComparatorError> {
    let comparator = match depth {
        1 => Comparator::Single(VersionComparator::floating(
            version.clone(),
            FloatBehavior::Minor,
            None,
            ComparatorOperator::Eq,
        )),
        2 => Comparator::Single(VersionComparator::floating(
            version.clone(),
            FloatBehavior::Patch,
            None,
            ComparatorOperator::Eq,
        )),
        3 => bounded(
            version.clone(),
            Version::new(version.major(), version.minor(), 0),
            FloatBehavior::Patch,
        ),
        4 => bounded(
            version.clone(),
            Version::new(version.major(), version.minor(), version.patch()),
            FloatBehavior::Revision,
        ),
        _ => return Err(invalid(whole)),
    };
    Ok(comparator)
}

/// `^` locks the leftmost non-zero numeric component; the all-zero chain
/// degenerates to an exact match.
fn parse_caret(rest: &str) -> Result<Comparator, ComparatorError> {
    let rest = rest.trim();
    let version = Version::parse(rest)?;
    if version.is_prerelease() {
        let stable = version.to_stable();
        let tail = caret_stable(&stable);
        return Ok(with_prerelease_window(version, stable, tail));
    }
    Ok(caret_stable(&version))
}

fn caret_stable(version: &Version) -> Comparator {
    if version.major() > 0 {
        bounded(
            version.clone(),
            Version::new(version.major(), 0, 0),
            FloatBehavior::Minor,
        )
    } else if version.minor() > 0 {
        bounded(
            version.clone(),
            Version::new(0, version.minor(), 0),
            FloatBehavior::Patch,
        )
    } else if version.patch() > 0 {
        bounded(
            version.clone(),
            Version::new(0, 0, version.patch()),
            FloatBehavior::Revision,
        )
    } else {
        Comparator::Single(VersionComparator::new(
            version.clone(),
            ComparatorOperator::Eq,
        ))
    }
}

/// `>= lower && <= upper.*` with the upper bound floating.
fn bounded(lower: Version, upper: Version, float: FloatBehavior) -> Comparator {
    Comparator::Composite(CompositeComparator::new(
        vec![
            Comparator::Single(VersionComparator::new(lower, ComparatorOperator::GtEq)),
            Comparator::Single(VersionComparator::floating(
                upper,
                float,
                None,
                ComparatorOperator::LtEq,
            )),
        ],
        Compositor::And,
    ))
}

/// `(>= version && < stable) || tail` — accept same-numeric prereleases at
/// or after the reference, plus whatever the stable expansion accepts.
fn with_prerelease_window(version: Version, stable: Version, tail: Comparator) -> Comparator {
    let window = CompositeComparator::new(
        vec![
            Comparator::Single(VersionComparator::new(version, ComparatorOperator::GtEq)),
            Comparator::Single(VersionComparator::new(stable, ComparatorOperator::Lt)),
        ],
        Compositor::And,
    );
    Comparator::Composite(CompositeComparator::new(
        vec![Comparator::Composite(window), tail],
        Compositor::Or,
    ))
}

fn bound(text: &str, operator: ComparatorOperator, whole: &str) -> Result<VersionComparator, ComparatorError> {
    try_bound(text, operator).ok_or_else(|| invalid(whole))
}

fn try_bound(text: &str, operator: ComparatorOperator) -> Option<VersionComparator> {
    let (version, float, release_prefix) = parse_floating(text)?;
    Some(VersionComparator::floating(
        version,
        float,
        release_prefix,
        operator,
    ))
}

fn core_depth(text: &str) -> usize {
    let end = text.find(['-', '+']).unwrap_or(text.len());
    text[..end].split('.').count()
}
