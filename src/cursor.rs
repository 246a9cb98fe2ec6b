//! Character input for the PDL parser.
//!
//! [`CharSource`] is the only thing the parser needs from its input: read a
//! character, peek at the next one, and tell when the stream has ended.
//! [`Cursor`] wraps a source, counts lines and skips whitespace and comments.
//!
//! Line terminators are counted, not rewritten: `\n`, `\r` and `\r\n` each
//! advance the line number by exactly one, and the characters themselves are
//! still handed to the parser (verbatim strings keep them).

use crate::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// A forward-only stream of characters.
pub trait CharSource {
    /// Consumes and returns the next character.
    fn next_char(&mut self) -> Option<char>;

    /// Returns the next character without consuming it.
    fn peek_char(&mut self) -> Option<char>;

    /// Returns `true` once every character has been consumed.
    fn at_end(&mut self) -> bool {
        self.peek_char().is_none()
    }
}

/// In-memory text source.
///
/// # Examples
///
/// ```rust
/// use pdl::cursor::{CharSource, StrSource};
///
/// let mut source = StrSource::new("ab");
/// assert_eq!(source.peek_char(), Some('a'));
/// assert_eq!(source.next_char(), Some('a'));
/// assert_eq!(source.next_char(), Some('b'));
/// assert!(source.at_end());
/// ```
pub struct StrSource<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        // A byte-order mark is an encoding artifact, not document content.
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        StrSource {
            chars: input.chars().peekable(),
        }
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    #[inline]
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}

impl<I> CharSource for Peekable<I>
where
    I: Iterator<Item = char>,
{
    fn next_char(&mut self) -> Option<char> {
        self.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.peek().copied()
    }
}

/// Line-counting reader over a [`CharSource`].
pub struct Cursor<S> {
    source: S,
    line: u32,
    after_cr: bool,
}

impl<S: CharSource> Cursor<S> {
    pub fn new(source: S) -> Self {
        Cursor {
            source,
            line: 1,
            after_cr: false,
        }
    }

    /// Current 1-based line number.
    #[inline]
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.source.next_char()?;
        match ch {
            '\r' => {
                self.line += 1;
                self.after_cr = true;
            }
            '\n' => {
                // The `\n` of a `\r\n` pair was already counted with the `\r`.
                if !self.after_cr {
                    self.line += 1;
                }
                self.after_cr = false;
            }
            _ => self.after_cr = false,
        }
        Some(ch)
    }

    #[inline]
    pub fn peek_char(&mut self) -> Option<char> {
        self.source.peek_char()
    }

    #[inline]
    pub fn at_end(&mut self) -> bool {
        self.source.at_end()
    }

    /// Builds a parse error at the current line.
    pub fn error(&self, msg: impl Into<String>) -> Error {
        Error::parse(self.line, msg)
    }

    pub fn unexpected_end(&self) -> Error {
        self.error("unexpected end of stream")
    }

    /// Consumes the next character, failing at end of stream.
    pub fn expect_char(&mut self) -> Result<char> {
        self.next_char().ok_or_else(|| self.unexpected_end())
    }

    /// Skips blanks, line breaks and comments.
    pub fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.next_char();
                }
                '/' => self.skip_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    /// Skips one `//` or `/* */` comment starting at the next `/`.
    pub fn skip_comment(&mut self) -> Result<()> {
        if self.next_char() != Some('/') {
            return Err(self.error("expected comment"));
        }
        match self.next_char() {
            Some('/') => {
                // A line comment may also run to the end of the stream.
                while let Some(ch) = self.peek_char() {
                    if ch == '\n' || ch == '\r' {
                        break;
                    }
                    self.next_char();
                }
                Ok(())
            }
            Some('*') => {
                let mut star = false;
                loop {
                    match self.next_char() {
                        Some('/') if star => return Ok(()),
                        Some(ch) => star = ch == '*',
                        None => return Err(self.unexpected_end()),
                    }
                }
            }
            Some(other) => Err(self.error(format!(
                "invalid character {other:?} after '/', expected '/' or '*'"
            ))),
            None => Err(self.unexpected_end()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(input: &str) -> Cursor<StrSource<'_>> {
        Cursor::new(StrSource::new(input))
    }

    #[test]
    fn test_line_counting() {
        let mut c = cursor("a\nb\r\nc\rd");
        let mut lines = Vec::new();
        while let Some(ch) = c.next_char() {
            if ch.is_alphabetic() {
                lines.push((ch, c.line()));
            }
        }
        assert_eq!(lines, vec![('a', 1), ('b', 2), ('c', 3), ('d', 4)]);
    }

    #[test]
    fn test_crlf_characters_are_preserved() {
        let mut c = cursor("\r\n");
        assert_eq!(c.next_char(), Some('\r'));
        assert_eq!(c.next_char(), Some('\n'));
        assert_eq!(c.line(), 2);
        assert!(c.at_end());
    }

    #[test]
    fn test_skip_line_comment() {
        let mut c = cursor("// note\n  x");
        c.skip_whitespace().unwrap();
        assert_eq!(c.peek_char(), Some('x'));
        assert_eq!(c.line(), 2);
    }

    #[test]
    fn test_line_comment_at_end_of_stream() {
        let mut c = cursor("  // trailing");
        c.skip_whitespace().unwrap();
        assert!(c.at_end());
    }

    #[test]
    fn test_skip_block_comment() {
        let mut c = cursor("/* a\n * b **/x");
        c.skip_whitespace().unwrap();
        assert_eq!(c.peek_char(), Some('x'));
        assert_eq!(c.line(), 2);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut c = cursor("/* never\nclosed *");
        let err = c.skip_whitespace().unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("unexpected end of stream"));
    }

    #[test]
    fn test_invalid_comment_start() {
        let mut c = cursor("/x");
        assert!(matches!(
            c.skip_whitespace(),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_peekable_iterator_source() {
        let mut source = "hi".chars().peekable();
        assert_eq!(CharSource::next_char(&mut source), Some('h'));
        assert_eq!(CharSource::peek_char(&mut source), Some('i'));
        assert!(!CharSource::at_end(&mut source));
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut source = StrSource::new("\u{feff}{");
        assert_eq!(source.next_char(), Some('{'));
    }
}
