//! Error types for PDL parsing, tree mutation and output.
//!
//! Reads never fail: path lookups on a [`Parameters`](crate::Parameters)
//! tree resolve to `None` or a caller-supplied default. Everything else
//! reports through [`Error`]:
//!
//! - **Parse errors**: malformed PDL text, tagged with the 1-based line number
//! - **Mutation errors**: invalid names, out-of-range list indices, element
//!   kind mismatches and empty paths
//! - **Render errors**: values that have no PDL text form (non-finite floats)
//! - **I/O errors**: reading or writing files and streams
//!
//! ## Examples
//!
//! ```rust
//! use pdl::{parse_str, Error};
//!
//! let err = parse_str("{a=1;").unwrap_err();
//! assert!(matches!(err, Error::Parse { line: 1, .. }));
//! assert!(err.to_string().contains("unexpected end of stream"));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed PDL text
    #[error("Parse error at line {line}: {msg}")]
    Parse { line: u32, msg: String },

    /// Name does not match the bare-name grammar
    #[error("Invalid parameter name: {0:?}")]
    InvalidName(String),

    /// List index past the end of the list
    #[error("Index {index} out of range for {name:?} (length {len})")]
    IndexOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },

    /// A list element or path step of the wrong kind
    #[error("Type mismatch for {name:?}: expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Null, empty or malformed path
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// Value that cannot be written as PDL text
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error at the given line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::Error;
    ///
    /// let err = Error::parse(10, "invalid character 'x'");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn parse(line: u32, msg: impl Into<String>) -> Self {
        Error::Parse {
            line,
            msg: msg.into(),
        }
    }

    pub fn invalid_name(name: &str) -> Self {
        Error::InvalidName(name.to_string())
    }

    pub fn index_out_of_range(name: &str, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            name: name.to_string(),
            index,
            len,
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::Error;
    ///
    /// let err = Error::type_mismatch("ports", "integer", "string");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(name: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn invalid_path(path: &str) -> Self {
        Error::InvalidPath(path.to_string())
    }

    pub fn unsupported_value(msg: impl Into<String>) -> Self {
        Error::UnsupportedValue(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the line number for parse errors.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse(3, "unexpected end of stream");
        assert_eq!(
            err.to_string(),
            "Parse error at line 3: unexpected end of stream"
        );
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.to_string().contains("gone"));
        assert!(err.source().is_some());
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_mutation_errors() {
        let err = Error::index_out_of_range("list", 5, 2);
        assert!(err.to_string().contains("Index 5"));
        assert!(err.to_string().contains("length 2"));

        let err = Error::invalid_name("1abc");
        assert!(err.to_string().contains("1abc"));
    }
}
