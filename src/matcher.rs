//! Wildcard event-name matching.
//!
//! Names are split on a delimiter. A pattern matches a name when both have the
//! same number of segments and every segment pair is either identical or has
//! [`WILDCARD`] on one side. The wildcard stands for exactly one segment, so
//! `"*"` never matches `"foo.bar"`.

pub const WILDCARD: &str = "*";

/// Returns true when `pattern` and `name` match segment by segment.
///
/// The comparison is symmetric: `*` may appear in either argument.
///
/// ```rust
/// use evenement::matcher::matches;
///
/// assert!(matches("*.test", "foo.test", "."));
/// assert!(matches("foo.test", "*.*", "."));
/// assert!(!matches("*", "foo.test", "."));
/// ```
pub fn matches(pattern: &str, name: &str, delimiter: &str) -> bool {
    if pattern == name {
        return true;
    }

    let mut pattern_parts = pattern.split(delimiter);
    let mut name_parts = name.split(delimiter);

    loop {
        match (pattern_parts.next(), name_parts.next()) {
            (None, None) => return true,
            (Some(p), Some(n)) => {
                if p != WILDCARD && n != WILDCARD && p != n {
                    return false;
                }
            }
            // segment count mismatch
            _ => return false,
        }
    }
}
