//! # pdl
//!
//! Reader, writer and in-memory tree for the Parameter Description Language.
//!
//! ## What is PDL?
//!
//! PDL is a small configuration format: a document is one `{ ... }` block of
//! `name = value;` entries. Values are booleans, 64-bit integers, floats,
//! strings, hex byte blobs, nested blocks and homogeneous lists.
//!
//! ```text
//! {
//!     name = "render farm";
//!     retries = 3;
//!     ratio = 0.75;
//!     secret = #de ad be ef;
//!     path = @"C:\jobs\""nightly""";   // verbatim string
//!     servers = ({ host = "a"; }, { host = "b"; port = 0x1F90; });
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Path access**: read and write deep values with `a/b[2]/c`, append with `a[]`
//! - **Two layouts**: compact canonical text that round-trips, and an indented
//!   cooked form for people
//! - **Structural hash**: an order-independent fingerprint of a whole tree
//! - **Serde bridge**: deserialize typed configuration straight from a tree
//!
//! ## Quick Start
//!
//! ```rust
//! use pdl::{parse_str, to_string, Value};
//!
//! let mut params = parse_str("{retries=3; servers=({host=\"a\";});}").unwrap();
//!
//! assert_eq!(params.get_i64("retries", 0), 3);
//! assert_eq!(params.get_str("servers[0]/host"), Some("a"));
//! assert_eq!(params.get_f64("timeout", 2.5), 2.5);
//!
//! params.put("servers[]/host", "b").unwrap();
//! params.put("limits/cpu", 0.5).unwrap();
//!
//! assert_eq!(
//!     to_string(&params),
//!     "{retries=3;servers=({host=\"a\";},{host=\"b\";});limits={cpu=0.5;};}"
//! );
//! ```
//!
//! ### Typed configuration
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Limits { cpu: f64, memory: u64 }
//!
//! let limits: Limits = pdl::from_str("{cpu=2; memory=0x4000;}").unwrap();
//! assert_eq!(limits.cpu, 2.0);
//! assert_eq!(limits.memory, 16384);
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: file I/O and parse summaries at
//! `debug`, entries dropped during serialization at `debug`. Install a
//! subscriber to see them.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`basic.rs`** - parse, query and write a document
//! - **`paths.rs`** - building a tree with `put`, lists and `merge_deep`
//! - **`typed_config.rs`** - deserializing into Rust structs
//!
//! Run any of them with: `cargo run --example <name>`

pub mod args;
pub mod cursor;
pub mod de;
pub mod error;
pub mod hash;
pub mod options;
pub mod params;
pub mod path;
pub mod ser;
pub mod value;
pub mod value_de;

pub use args::from_args;
pub use cursor::CharSource;
pub use de::Parser;
pub use error::{Error, Result};
pub use options::PdlOptions;
pub use params::{Parameters, DEFAULT_KEY};
pub use ser::Serializer;
pub use value::{Kind, List, Value};

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Parses a PDL document from a string.
///
/// Empty input (or input holding only whitespace and comments) yields an
/// empty tree.
///
/// # Examples
///
/// ```rust
/// use pdl::parse_str;
///
/// let params = parse_str("{x=1;}").unwrap();
/// assert_eq!(params.get_i64("x", 0), 1);
///
/// let err = parse_str("{x=1").unwrap_err();
/// assert_eq!(err.line(), Some(1));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] with the line of the first problem.
pub fn parse_str(input: &str) -> Result<Parameters> {
    Parser::from_str(input).parse_document()
}

/// Parses a PDL document from UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::Parse`] on invalid UTF-8 or malformed PDL.
pub fn parse_slice(input: &[u8]) -> Result<Parameters> {
    match std::str::from_utf8(input) {
        Ok(text) => parse_str(text),
        Err(err) => {
            let valid = &input[..err.valid_up_to()];
            let line = 1 + valid.iter().filter(|b| **b == b'\n').count() as u32;
            Err(Error::parse(line, format!("invalid UTF-8: {err}")))
        }
    }
}

/// Parses a PDL document from any reader.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails (including invalid UTF-8), or
/// [`Error::Parse`].
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Parameters> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_str(&text)
}

/// Parses a PDL document from a file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Parse`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Parameters> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let params = parse_str(&text)?;
    tracing::debug!(path = %path.display(), entries = params.len(), "parsed file");
    Ok(params)
}

/// Parses a PDL document from a custom character source.
///
/// # Errors
///
/// Returns [`Error::Parse`] on malformed input.
pub fn parse_source<S: CharSource>(source: S) -> Result<Parameters> {
    let mut parser = Parser::new(source);
    let params = parser.parse_document()?;
    tracing::debug!(lines = parser.line(), entries = params.len(), "parsed document");
    Ok(params)
}

/// Parses PDL text and deserializes it into `T`.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed text, or a deserialization error
/// if the tree does not fit `T`.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    let params = parse_str(input)?;
    T::deserialize(Value::Parameters(params))
}

/// Deserializes `T` from a tree.
///
/// # Errors
///
/// Returns an error if the tree does not fit `T`.
pub fn from_parameters<T: DeserializeOwned>(params: &Parameters) -> Result<T> {
    T::deserialize(Value::Parameters(params.clone()))
}

/// Serializes a tree to canonical PDL text.
///
/// # Examples
///
/// ```rust
/// use pdl::{parse_str, to_string};
///
/// let params = parse_str("{ b = \"x\" ; a = ( 1 , 2 ) ; }").unwrap();
/// assert_eq!(to_string(&params), "{b=\"x\";a=(1,2);}");
/// ```
#[must_use]
pub fn to_string(params: &Parameters) -> String {
    to_string_with_options(params, &PdlOptions::canonical())
}

/// Serializes a tree to cooked (indented) PDL text with default options.
#[must_use]
pub fn to_string_cooked(params: &Parameters) -> String {
    to_string_with_options(params, &PdlOptions::cooked())
}

/// Serializes a tree with custom options.
///
/// An empty tree renders as an empty string.
#[must_use]
pub fn to_string_with_options(params: &Parameters, options: &PdlOptions) -> String {
    Serializer::new(options.clone()).render(params)
}

/// Writes a tree to a writer as UTF-8.
///
/// Canonical output is written as is. Cooked output writes `{}` for an
/// empty tree and always ends with a newline.
///
/// # Examples
///
/// ```rust
/// use pdl::{to_writer, Parameters, PdlOptions};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Parameters::new(), &PdlOptions::cooked()).unwrap();
/// assert_eq!(buffer, b"{}\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W: Write>(mut writer: W, params: &Parameters, options: &PdlOptions) -> Result<()> {
    let mut text = to_string_with_options(params, options);
    if options.cooked {
        if text.is_empty() {
            text.push_str("{}");
        }
        text.push('\n');
    }
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes a tree to a file, replacing its contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn to_file<P: AsRef<Path>>(path: P, params: &Parameters, options: &PdlOptions) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    to_writer(BufWriter::new(file), params, options)?;
    tracing::debug!(path = %path.display(), cooked = options.cooked, "wrote file");
    Ok(())
}

/// Reads a whole document from stdin.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Parse`].
pub fn parse_stdin() -> Result<Parameters> {
    parse_reader(io::stdin().lock())
}
