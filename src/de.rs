//! PDL parsing.
//!
//! This module provides the [`Parser`], a recursive-descent reader that turns
//! PDL text into a [`Parameters`] tree.
//!
//! ## Overview
//!
//! - **Single pass**: characters are consumed strictly in order, no backtracking
//! - **Fail fast**: the first error aborts the parse; no partial tree is returned
//! - **Line tracking**: every error carries the line it was detected on
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use pdl::{parse_str, Value};
//!
//! let params = parse_str(r#"
//!     {
//!         name = "demo";          // line comment
//!         ratio = 2.5;            /* block comment */
//!         blob = #0a 1f;
//!         ports = (80, 443);
//!         nested = { enabled = True; };
//!     }
//! "#).unwrap();
//!
//! assert_eq!(params.get_str("name"), Some("demo"));
//! assert_eq!(params.get_bytes("blob"), Some(&[0x0a, 0x1f][..]));
//! assert_eq!(params.get("ports[1]"), Some(Value::Integer(443)));
//! assert!(params.get_bool("nested/enabled", false));
//! ```

use crate::cursor::{CharSource, Cursor, StrSource};
use crate::path::{is_name_char, is_name_start};
use crate::{Error, List, Parameters, Result, Value};

/// The PDL parser.
///
/// Created via [`Parser::from_str`] or [`Parser::new`] over any
/// [`CharSource`].
pub struct Parser<S> {
    cursor: Cursor<S>,
}

impl<'a> Parser<StrSource<'a>> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Parser::new(StrSource::new(input))
    }
}

impl<S: CharSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Parser {
            cursor: Cursor::new(source),
        }
    }

    /// Current 1-based line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Parses a whole document: one top-level block, or nothing at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed input or trailing content.
    pub fn parse_document(&mut self) -> Result<Parameters> {
        self.cursor.skip_whitespace()?;
        if self.cursor.at_end() {
            return Ok(Parameters::new());
        }
        self.expect('{')?;
        let params = self.parse_block()?;
        self.cursor.skip_whitespace()?;
        match self.cursor.peek_char() {
            None => Ok(params),
            Some(ch) => Err(self.invalid(ch, "after end of document")),
        }
    }

    fn invalid(&self, ch: char, context: &str) -> Error {
        self.cursor
            .error(format!("invalid character {ch:?} {context}"))
    }

    /// Consumes `expected`, skipping whitespace and comments first.
    fn expect(&mut self, expected: char) -> Result<()> {
        self.cursor.skip_whitespace()?;
        match self.cursor.next_char() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.invalid(ch, &format!("(expected {expected:?})"))),
            None => Err(self.cursor.unexpected_end()),
        }
    }

    /// Parses entries up to and including the closing `}`.
    /// The opening `{` has already been consumed.
    fn parse_block(&mut self) -> Result<Parameters> {
        let mut params = Parameters::new();
        loop {
            self.cursor.skip_whitespace()?;
            match self.cursor.peek_char() {
                None => return Err(self.cursor.unexpected_end()),
                Some('}') => {
                    self.cursor.next_char();
                    return Ok(params);
                }
                Some(_) => {
                    let (name, value) = self.parse_entry()?;
                    params.insert(name, value);
                }
            }
        }
    }

    fn parse_entry(&mut self) -> Result<(String, Value)> {
        let name = self.parse_name()?;
        self.expect('=')?;
        self.cursor.skip_whitespace()?;
        let value = match self.cursor.peek_char() {
            None => return Err(self.cursor.unexpected_end()),
            Some('{') => {
                self.cursor.next_char();
                Value::Parameters(self.parse_block()?)
            }
            Some('(') => {
                self.cursor.next_char();
                Value::List(self.parse_list()?)
            }
            Some('#') => {
                self.cursor.next_char();
                Value::Bytes(self.parse_hex_blob()?)
            }
            Some(_) => self.parse_scalar()?,
        };
        self.expect(';')?;
        Ok((name, value))
    }

    fn parse_name(&mut self) -> Result<String> {
        match self.cursor.peek_char() {
            Some('"') => {
                self.cursor.next_char();
                self.parse_quoted_string()
            }
            Some(ch) if is_name_start(ch) => {
                let mut name = String::new();
                while let Some(ch) = self.cursor.peek_char() {
                    if !is_name_char(ch) {
                        break;
                    }
                    name.push(ch);
                    self.cursor.next_char();
                }
                Ok(name)
            }
            Some(ch) => Err(self.invalid(ch, "at start of name")),
            None => Err(self.cursor.unexpected_end()),
        }
    }

    /// Parses a bool, number, quoted or verbatim string.
    fn parse_scalar(&mut self) -> Result<Value> {
        match self.cursor.peek_char() {
            Some('"') => {
                self.cursor.next_char();
                self.parse_quoted_string().map(Value::String)
            }
            Some('@') => {
                self.cursor.next_char();
                self.parse_verbatim_string().map(Value::String)
            }
            Some('t' | 'T' | 'f' | 'F') => self.parse_bool().map(Value::Bool),
            Some(ch) if ch == '+' || ch == '-' || ch == '.' || ch.is_ascii_digit() => {
                self.parse_number()
            }
            Some(ch) => Err(self.invalid(ch, "at start of value")),
            None => Err(self.cursor.unexpected_end()),
        }
    }

    /// Reads the rest of a `"..."` string; the opening quote is consumed.
    fn parse_quoted_string(&mut self) -> Result<String> {
        let mut result = String::new();
        loop {
            match self.cursor.expect_char()? {
                '"' => return Ok(result),
                '\\' => match self.cursor.expect_char()? {
                    '\\' => result.push('\\'),
                    '"' => result.push('"'),
                    other => {
                        return Err(self
                            .cursor
                            .error(format!("invalid escape sequence '\\{other}'")))
                    }
                },
                other => result.push(other),
            }
        }
    }

    /// Reads the rest of an `@"..."` string; the `@` is consumed.
    fn parse_verbatim_string(&mut self) -> Result<String> {
        match self.cursor.expect_char()? {
            '"' => {}
            other => return Err(self.invalid(other, "after '@' (expected '\"')")),
        }
        let mut result = String::new();
        loop {
            match self.cursor.expect_char()? {
                '"' if self.cursor.peek_char() == Some('"') => {
                    self.cursor.next_char();
                    result.push('"');
                }
                '"' => return Ok(result),
                other => result.push(other),
            }
        }
    }

    fn parse_bool(&mut self) -> Result<bool> {
        let (word, value) = match self.cursor.peek_char() {
            Some('t' | 'T') => ("true", true),
            _ => ("false", false),
        };
        for expected in word.chars() {
            match self.cursor.expect_char()? {
                ch if ch.eq_ignore_ascii_case(&expected) => {}
                ch => return Err(self.invalid(ch, &format!("in boolean (expected {word:?})"))),
            }
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let mut token = String::new();
        while let Some(ch) = self.cursor.peek_char() {
            if !is_number_char(ch) {
                break;
            }
            token.push(ch);
            self.cursor.next_char();
        }
        self.number_from_token(&token)
    }

    fn number_from_token(&self, token: &str) -> Result<Value> {
        let (negative, unsigned) = match token.as_bytes().first() {
            Some(b'-') => (true, &token[1..]),
            Some(b'+') => (false, &token[1..]),
            _ => (false, token),
        };
        if let Some(hex) = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            // 16 hex digits fill all 64 bits (two's complement).
            let bits = u64::from_str_radix(hex, 16)
                .ok()
                .filter(|_| !hex.starts_with(['+', '-']))
                .ok_or_else(|| self.cursor.error(format!("malformed hex number {token:?}")))?;
            let value = bits as i64;
            return Ok(Value::Integer(if negative {
                value.wrapping_neg()
            } else {
                value
            }));
        }
        if let Ok(i) = token.parse::<i64>() {
            return Ok(Value::Integer(i));
        }
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| self.cursor.error(format!("malformed number {token:?}")))
    }

    /// Reads hex digit pairs up to (not including) the terminating `;`.
    fn parse_hex_blob(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        loop {
            self.cursor.skip_whitespace()?;
            match self.cursor.peek_char() {
                Some(';') => return Ok(bytes),
                Some(high) if high.is_ascii_hexdigit() => {
                    self.cursor.next_char();
                    let low = self.cursor.expect_char()?;
                    match (high.to_digit(16), low.to_digit(16)) {
                        (Some(h), Some(l)) => bytes.push((h * 16 + l) as u8),
                        _ => return Err(self.invalid(low, "in hex blob (odd number of digits)")),
                    }
                }
                Some(ch) => return Err(self.invalid(ch, "in hex blob")),
                None => return Err(self.cursor.unexpected_end()),
            }
        }
    }

    /// Parses list elements up to and including `)`. The `(` is consumed.
    fn parse_list(&mut self) -> Result<List> {
        let mut list: Option<List> = None;
        self.cursor.skip_whitespace()?;
        if self.cursor.peek_char() == Some(')') {
            self.cursor.next_char();
            return Ok(List::default());
        }
        loop {
            self.cursor.skip_whitespace()?;
            let element = match self.cursor.peek_char() {
                Some('{') => {
                    self.cursor.next_char();
                    Value::Parameters(self.parse_block()?)
                }
                Some(ch @ ('(' | '#')) => {
                    return Err(self.invalid(ch, "in list (nested lists and hex blobs are not allowed)"))
                }
                _ => self.parse_scalar()?,
            };
            match list.as_mut() {
                None => list = Some(List::singleton(element)?),
                Some(items) => {
                    if let Err(err) = items.push_widening(element) {
                        return Err(self.cursor.error(format!("mixed list element types: {err}")));
                    }
                }
            }
            self.cursor.skip_whitespace()?;
            match self.cursor.next_char() {
                Some(',') => continue,
                Some(')') => return Ok(list.unwrap_or_default()),
                Some(ch) => return Err(self.invalid(ch, "in list (expected ',' or ')')")),
                None => return Err(self.cursor.unexpected_end()),
            }
        }
    }
}

#[inline]
fn is_number_char(ch: char) -> bool {
    ch.is_ascii_hexdigit() || matches!(ch, '+' | '-' | '.' | 'x' | 'X')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Parameters> {
        Parser::from_str(input).parse_document()
    }

    fn parse_err(input: &str) -> (u32, String) {
        match parse(input) {
            Err(Error::Parse { line, msg }) => (line, msg),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n // nothing here\n").unwrap().is_empty());
        assert!(parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_scalars() {
        let p = parse("{a=1; b=2.5; c=\"hi\"; d=true; e=FALSE; f=-7; g=+3;}").unwrap();
        assert_eq!(p.child("a"), Some(&Value::Integer(1)));
        assert_eq!(p.child("b"), Some(&Value::Float(2.5)));
        assert_eq!(p.child("c"), Some(&Value::from("hi")));
        assert_eq!(p.child("d"), Some(&Value::Bool(true)));
        assert_eq!(p.child("e"), Some(&Value::Bool(false)));
        assert_eq!(p.child("f"), Some(&Value::Integer(-7)));
        assert_eq!(p.child("g"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_bool_mixed_case() {
        let p = parse("{a=tRuE; b=FaLsE;}").unwrap();
        assert_eq!(p.child("a"), Some(&Value::Bool(true)));
        assert_eq!(p.child("b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_bool_misspelled() {
        let (line, msg) = parse_err("{a=tru;}");
        assert_eq!(line, 1);
        assert!(msg.contains("boolean"), "{msg}");
        assert!(parse("{a=truex;}").is_err());
    }

    #[test]
    fn test_hex_numbers() {
        let p = parse("{a=0x1F; b=-0x10; c=0xFFFFFFFFFFFFFFFF; d=0X0a;}").unwrap();
        assert_eq!(p.child("a"), Some(&Value::Integer(31)));
        assert_eq!(p.child("b"), Some(&Value::Integer(-16)));
        assert_eq!(p.child("c"), Some(&Value::Integer(-1)));
        assert_eq!(p.child("d"), Some(&Value::Integer(10)));
        assert!(parse("{a=0x;}").is_err());
        assert!(parse("{a=0x1.5;}").is_err());
        assert!(parse("{a=0x10000000000000000;}").is_err());
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        let p = parse("{big=99999999999999999999;}").unwrap();
        assert_eq!(p.child("big"), Some(&Value::Float(1e20)));
    }

    #[test]
    fn test_malformed_number() {
        let (_, msg) = parse_err("{a=1.2.3;}");
        assert!(msg.contains("malformed number"), "{msg}");
        assert!(parse("{a=--1;}").is_err());
    }

    #[test]
    fn test_string_escapes() {
        let p = parse(r#"{b="a\"b\\c";}"#).unwrap();
        assert_eq!(p.get_str("b"), Some("a\"b\\c"));
    }

    #[test]
    fn test_invalid_escape() {
        let (_, msg) = parse_err(r#"{b="a\nb";}"#);
        assert!(msg.contains("escape"), "{msg}");
    }

    #[test]
    fn test_verbatim_string() {
        let p = parse("{v=@\"C:\\dir\\\"\"quoted\"\"\";}").unwrap();
        assert_eq!(p.get_str("v"), Some("C:\\dir\\\"quoted\""));
    }

    #[test]
    fn test_verbatim_keeps_line_breaks() {
        let p = parse("{v=@\"one\r\ntwo\";\n}").unwrap();
        assert_eq!(p.get_str("v"), Some("one\r\ntwo"));
    }

    #[test]
    fn test_quoted_names() {
        let p = parse(r#"{"with space"=1; "q\"uote"=2;}"#).unwrap();
        assert_eq!(p.child("with space"), Some(&Value::Integer(1)));
        assert_eq!(p.child("q\"uote"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_hex_blob() {
        let p = parse("{blob=#0a1f; spaced=# 0A /* c */ ff // x\n 10 ; empty=#;}").unwrap();
        assert_eq!(p.get_bytes("blob"), Some(&[0x0a, 0x1f][..]));
        assert_eq!(p.get_bytes("spaced"), Some(&[0x0a, 0xff, 0x10][..]));
        assert_eq!(p.get_bytes("empty"), Some(&[][..]));
    }

    #[test]
    fn test_hex_blob_errors() {
        assert!(parse("{blob=#0a1;}").is_err());
        assert!(parse("{blob=#0 a;}").is_err());
        assert!(parse("{blob=#0g;}").is_err());
        assert!(parse("{blob=#zz;}").is_err());
    }

    #[test]
    fn test_lists() {
        let p = parse("{ints=(1,2,3); floats=(1,2.0,3); strs=(\"a\", @\"b\"); bools=(true,False); empty=();}").unwrap();
        assert_eq!(p.child("ints"), Some(&Value::from(vec![1i64, 2, 3])));
        assert_eq!(p.child("floats"), Some(&Value::from(vec![1.0, 2.0, 3.0])));
        assert_eq!(
            p.child("strs"),
            Some(&Value::from(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(p.child("bools"), Some(&Value::from(vec![true, false])));
        assert_eq!(p.get_list("empty").map(List::len), Some(0));
    }

    #[test]
    fn test_float_first_list_keeps_floats() {
        let p = parse("{xs=(1.5, 2, 3);}").unwrap();
        assert_eq!(p.child("xs"), Some(&Value::from(vec![1.5, 2.0, 3.0])));
    }

    #[test]
    fn test_list_of_parameters() {
        let p = parse("{servers=({host=\"a\";}, {host=\"b\"; port=80;}, {});}").unwrap();
        assert_eq!(p.get_str("servers[1]/host"), Some("b"));
        assert_eq!(p.get_i64("servers[1]/port", 0), 80);
        assert!(p.get_parameters("servers[2]").is_some_and(Parameters::is_empty));
    }

    #[test]
    fn test_list_errors() {
        assert!(parse("{xs=(1,\"a\");}").is_err());
        assert!(parse("{xs=(1,(2));}").is_err());
        assert!(parse("{xs=(#00);}").is_err());
        assert!(parse("{xs=(1,2)}").is_err());
        assert!(parse("{xs=(1 2);}").is_err());
        assert!(parse("{xs=({a=1;};);}").is_err());
    }

    #[test]
    fn test_nested_block_requires_semicolon() {
        assert!(parse("{a={x=1;}}").is_err());
        let p = parse("{a={x=1;};}").unwrap();
        assert_eq!(p.get_i64("a/x", 0), 1);
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let p = parse("{a=1; b=2; a=3;}").unwrap();
        assert_eq!(p.child("a"), Some(&Value::Integer(3)));
        assert_eq!(p.keys().next().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_unterminated_block() {
        let (line, msg) = parse_err("{a=1;");
        assert_eq!(line, 1);
        assert_eq!(msg, "unexpected end of stream");

        let (line, msg) = parse_err("{\n  a=1;\n  b=2;\n");
        assert_eq!(line, 4);
        assert_eq!(msg, "unexpected end of stream");
    }

    #[test]
    fn test_error_line_numbers() {
        let (line, _) = parse_err("{\r\n a=1;\r\n b=?;\r\n}");
        assert_eq!(line, 3);

        let (line, _) = parse_err("{\n/* two\nlines */ a=\"x\ny\"; b=oops;\n}");
        assert_eq!(line, 4);
    }

    #[test]
    fn test_missing_open_brace() {
        let (line, msg) = parse_err("a=1;");
        assert_eq!(line, 1);
        assert!(msg.contains("invalid character"), "{msg}");
    }

    #[test]
    fn test_trailing_content() {
        assert!(parse("{} // done").is_ok());
        assert!(parse("{}\n").is_ok());
        assert!(parse("{} x").is_err());
        assert!(parse("{}{}").is_err());
    }

    #[test]
    fn test_missing_terminator() {
        assert!(parse("{a=1}").is_err());
        assert!(parse("{a 1;}").is_err());
        assert!(parse("{a=\"x\" b=1;}").is_err());
        assert!(parse("{1a=1;}").is_err());
    }

    #[test]
    fn test_iterator_source() {
        let mut parser = Parser::new("{a=1;}".chars().peekable());
        let p = parser.parse_document().unwrap();
        assert_eq!(p.child("a"), Some(&Value::Integer(1)));
    }
}
