//! Formatting options for PDL output.
//!
//! Number formatting is configured per call through [`PdlOptions`] instead of
//! any process-wide locale. Canonical output always uses `.` as the decimal
//! separator so it can be parsed back; the separator setting only affects
//! cooked (human-readable) output.
//!
//! ## Examples
//!
//! ```rust
//! use pdl::{parse_str, to_string_with_options, PdlOptions};
//!
//! let params = parse_str("{pi=3.14159;}").unwrap();
//!
//! let options = PdlOptions::cooked().with_indent(2).with_float_precision(2);
//! let text = to_string_with_options(&params, &options);
//! assert_eq!(text, "{\n  pi=3.14;\n}");
//! ```

/// Configuration options for PDL serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct PdlOptions {
    /// Indented, multi-line output when `true`; compact canonical text otherwise.
    pub cooked: bool,
    /// Spaces per nesting level in cooked output.
    pub indent: usize,
    /// Decimal separator for floats in cooked output.
    pub decimal_separator: char,
    /// Fixed number of fractional digits; `None` writes the shortest text that
    /// reads back to the same `f64`.
    pub float_precision: Option<usize>,
}

impl Default for PdlOptions {
    fn default() -> Self {
        PdlOptions {
            cooked: false,
            indent: 4,
            decimal_separator: '.',
            float_precision: None,
        }
    }
}

impl PdlOptions {
    /// Creates default options (canonical form, `.` separator, round-trip floats).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::PdlOptions;
    ///
    /// let options = PdlOptions::new();
    /// assert!(!options.cooked);
    /// assert_eq!(options.decimal_separator, '.');
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for compact canonical output.
    #[must_use]
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Options for indented, human-readable output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::PdlOptions;
    ///
    /// let options = PdlOptions::cooked();
    /// assert!(options.cooked);
    /// assert_eq!(options.indent, 4);
    /// ```
    #[must_use]
    pub fn cooked() -> Self {
        PdlOptions {
            cooked: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Only affects cooked output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the decimal separator used for floats in cooked output.
    ///
    /// Cooked text written with a separator other than `.` is meant for
    /// display only and does not parse back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::{parse_str, to_string_with_options, PdlOptions};
    ///
    /// let params = parse_str("{x=2.5;}").unwrap();
    /// let options = PdlOptions::cooked().with_decimal_separator(',');
    /// assert!(to_string_with_options(&params, &options).contains("x=2,5;"));
    ///
    /// let canonical = PdlOptions::canonical().with_decimal_separator(',');
    /// assert_eq!(to_string_with_options(&params, &canonical), "{x=2.5;}");
    /// ```
    #[must_use]
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Writes floats with a fixed number of fractional digits.
    #[must_use]
    pub fn with_float_precision(mut self, digits: usize) -> Self {
        self.float_precision = Some(digits);
        self
    }

    /// Separator actually applied to floats for the current mode.
    #[inline]
    pub(crate) fn effective_separator(&self) -> char {
        if self.cooked {
            self.decimal_separator
        } else {
            '.'
        }
    }
}
