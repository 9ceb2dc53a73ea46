//! Line grammar for config files.
//!
//! ```text
//! line        := comment | blank | assignment
//! comment     := '#' any-text
//! blank       := whitespace*
//! assignment  := lhs '=' rhs
//! lhs         := [base '.'] name
//! ```

use super::error::MalformedKind;

/// Classification of a single config line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    Assignment {
        base: &'a str,
        name: &'a str,
        value: &'a str,
    },
    Malformed(MalformedKind),
}

/// Parses one line. Never fails; bad input is classified as
/// [`Line::Malformed`].
pub fn parse_line(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') {
        return Line::Comment;
    }

    let Some((lhs, value)) = line.split_once('=') else {
        return Line::Malformed(MalformedKind::MissingSeparator);
    };

    let (base, name) = lhs.split_once('.').unwrap_or(("", lhs));
    let name = name.trim();
    if name.is_empty() {
        return Line::Malformed(MalformedKind::EmptyKey);
    }

    Line::Assignment {
        base: base.trim(),
        name,
        value: value.trim(),
    }
}
