//! Path addressing into a [`Parameters`](crate::Parameters) tree.
//!
//! A path is a list of names separated by `/` (or `\`). Each name may carry a
//! list index suffix: `name[3]` addresses the fourth element of the list held
//! under `name`, and `name[]` (writes only) appends a new element.
//!
//! ```rust
//! use pdl::path::{canonicalize, Index, Segment};
//!
//! assert_eq!(canonicalize("\\servers//list[2]/"), Some("servers/list[2]".to_string()));
//!
//! let seg = Segment::parse("list[2]").unwrap();
//! assert_eq!(seg.name, "list");
//! assert_eq!(seg.index, Index::At(2));
//! ```

use crate::{Error, Result};

/// List index suffix of a path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Index {
    /// Plain `name`.
    None,
    /// `name[n]`.
    At(usize),
    /// `name[]`.
    Append,
}

/// One `/`-separated step of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    pub name: &'a str,
    pub index: Index,
}

impl<'a> Segment<'a> {
    /// Splits an index suffix off a segment.
    ///
    /// Returns `None` for an empty name or a malformed suffix
    /// (`name[`, `name[x]`, `name[-1]`, text after `]`).
    #[must_use]
    pub fn parse(text: &'a str) -> Option<Self> {
        let (name, index) = match text.find('[') {
            None => (text, Index::None),
            Some(open) => {
                let digits = text[open + 1..].strip_suffix(']')?;
                let index = if digits.is_empty() {
                    Index::Append
                } else if digits.bytes().all(|b| b.is_ascii_digit()) {
                    Index::At(digits.parse().ok()?)
                } else {
                    return None;
                };
                (&text[..open], index)
            }
        };
        if name.is_empty() || name.contains(']') {
            return None;
        }
        Some(Segment { name, index })
    }
}

/// Returns `true` if `name` can be written without quotes.
///
/// Bare names start with an ASCII letter, `_` or `$` and continue with
/// letters, digits, `_` or `$`.
///
/// # Examples
///
/// ```rust
/// use pdl::path::is_valid_name;
///
/// assert!(is_valid_name("$default$"));
/// assert!(is_valid_name("_x1"));
/// assert!(!is_valid_name("1x"));
/// assert!(!is_valid_name("a-b"));
/// assert!(!is_valid_name(""));
/// ```
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

#[inline]
pub(crate) fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

#[inline]
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[inline]
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalizes separators: `\` becomes `/`, runs of slashes collapse and
/// leading/trailing slashes are dropped. Returns `None` if nothing is left.
#[must_use]
pub fn canonicalize(path: &str) -> Option<String> {
    let joined = path
        .split(is_separator)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Canonicalizes and splits a path into segments.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path is empty or a segment is malformed.
pub fn split(path: &str) -> Result<Vec<Segment<'_>>> {
    let segments = path
        .split(is_separator)
        .filter(|part| !part.is_empty())
        .map(|part| Segment::parse(part).ok_or_else(|| Error::invalid_path(path)))
        .collect::<Result<Vec<_>>>()?;
    if segments.is_empty() {
        return Err(Error::invalid_path(path));
    }
    Ok(segments)
}
