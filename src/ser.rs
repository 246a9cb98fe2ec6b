//! PDL serialization.
//!
//! This module provides the [`Serializer`], which renders a [`Parameters`]
//! tree as PDL text in one of two layouts:
//!
//! - **Canonical**: one line, no insignificant whitespace, `.` as decimal
//!   separator. This is the form to store and to parse back.
//! - **Cooked**: one entry per line, nested blocks indented, scalar lists
//!   spaced out. Meant for people.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use pdl::{parse_str, to_string, to_string_cooked};
//!
//! let params = parse_str("{ a = 1 ; list = ( 1 , 2 ) ; }").unwrap();
//!
//! assert_eq!(to_string(&params), "{a=1;list=(1,2);}");
//! assert_eq!(to_string_cooked(&params), "{\n    a=1;\n    list=(1, 2);\n}");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use pdl::{parse_str, PdlOptions, Serializer};
//!
//! let params = parse_str("{blob=#0a1f;}").unwrap();
//! let serializer = Serializer::new(PdlOptions::cooked());
//! assert_eq!(serializer.render(&params), "{\n    blob=#0a 1f ;\n}");
//! ```
//!
//! Entries that cannot be written (non-finite floats) are left out of the
//! output, and nodes without any remaining entries are left out of their
//! parent. Empty nodes inside lists are kept as `{}` so element positions
//! survive.

use crate::path::is_valid_name;
use crate::{Error, List, Parameters, PdlOptions, Result, Value};
use std::fmt::Write;

/// The PDL serializer.
///
/// Stateless apart from its [`PdlOptions`]; one serializer can render any
/// number of trees.
pub struct Serializer {
    options: PdlOptions,
}

impl Serializer {
    pub fn new(options: PdlOptions) -> Self {
        Serializer { options }
    }

    #[must_use]
    pub fn options(&self) -> &PdlOptions {
        &self.options
    }

    /// Renders a whole tree. An empty tree renders as `""`.
    #[must_use]
    pub fn render(&self, params: &Parameters) -> String {
        self.render_node(params, 0).unwrap_or_default()
    }

    /// Renders one value as it would appear after `name=`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for non-finite floats and for
    /// nodes that have nothing to render.
    pub fn render_value(&self, value: &Value) -> Result<String> {
        self.value_text(value, 0)
    }

    fn newline_indent(&self, out: &mut String, depth: usize) {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(depth * self.options.indent));
    }

    /// `None` when no entry survived.
    fn render_node(&self, params: &Parameters, depth: usize) -> Option<String> {
        let cooked = self.options.cooked;
        let mut out = String::with_capacity(64);
        let mut written = 0usize;
        out.push('{');
        for (name, value) in params {
            let text = match self.value_text(value, depth + 1) {
                Ok(text) => text,
                Err(err) => {
                    tracing::debug!(name = %name, error = %err, "dropping entry from output");
                    continue;
                }
            };
            if cooked {
                self.newline_indent(&mut out, depth + 1);
            }
            write_name(&mut out, name);
            out.push('=');
            out.push_str(&text);
            out.push(';');
            written += 1;
        }
        if written == 0 {
            return None;
        }
        if cooked {
            self.newline_indent(&mut out, depth);
        }
        out.push('}');
        Some(out)
    }

    /// `depth` is the nesting level of the entry holding `value`.
    fn value_text(&self, value: &Value, depth: usize) -> Result<String> {
        let mut out = String::new();
        match value {
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Float(f) => out.push_str(&self.float_text(*f)?),
            Value::String(s) => write_quoted(&mut out, s),
            Value::Bytes(bytes) => {
                out.push('#');
                for b in bytes {
                    let _ = write!(out, "{b:02x}");
                    if self.options.cooked {
                        out.push(' ');
                    }
                }
            }
            Value::Parameters(p) => {
                return self
                    .render_node(p, depth)
                    .ok_or_else(|| Error::unsupported_value("empty parameters"))
            }
            Value::List(list) => self.write_list(&mut out, list, depth)?,
        }
        Ok(out)
    }

    fn write_list(&self, out: &mut String, list: &List, depth: usize) -> Result<()> {
        if list.is_empty() {
            out.push_str("()");
            return Ok(());
        }
        if let List::Parameters(nodes) = list {
            out.push('(');
            for (i, node) in nodes.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if self.options.cooked {
                    self.newline_indent(out, depth + 1);
                }
                match self.render_node(node, depth + 1) {
                    Some(text) => out.push_str(&text),
                    None => out.push_str("{}"),
                }
            }
            if self.options.cooked {
                self.newline_indent(out, depth);
            }
            out.push(')');
            return Ok(());
        }
        let separator = if self.options.cooked { ", " } else { "," };
        out.push('(');
        for i in 0..list.len() {
            if i > 0 {
                out.push_str(separator);
            }
            match list.get(i) {
                Some(element) => out.push_str(&self.value_text(&element, depth)?),
                None => break,
            }
        }
        out.push(')');
        Ok(())
    }

    /// Shortest round-trip text (or fixed precision), always with a decimal
    /// point so it reads back as a float.
    fn float_text(&self, f: f64) -> Result<String> {
        if !f.is_finite() {
            return Err(Error::unsupported_value(format!("non-finite float {f}")));
        }
        let mut text = match self.options.float_precision {
            Some(digits) => format!("{f:.digits$}"),
            None => format!("{f}"),
        };
        if !text.contains('.') {
            text.push_str(".0");
        }
        let separator = self.options.effective_separator();
        if separator != '.' {
            text = text.replace('.', separator.encode_utf8(&mut [0; 4]));
        }
        Ok(text)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Serializer::new(PdlOptions::default())
    }
}

fn write_name(out: &mut String, name: &str) {
    if is_valid_name(name) {
        out.push_str(name);
    } else {
        write_quoted(out, name);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(params: &Parameters) -> String {
        Serializer::new(PdlOptions::canonical()).render(params)
    }

    fn cooked(params: &Parameters) -> String {
        Serializer::new(PdlOptions::cooked()).render(params)
    }

    fn tree(entries: Vec<(&str, Value)>) -> Parameters {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_scalars_canonical() {
        let p = tree(vec![
            ("a", Value::Integer(-3)),
            ("b", Value::Float(2.5)),
            ("c", Value::Bool(true)),
            ("d", Value::from("hi")),
        ]);
        assert_eq!(canonical(&p), "{a=-3;b=2.5;c=true;d=\"hi\";}");
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(canonical(&Parameters::new()), "");
        assert_eq!(cooked(&Parameters::new()), "");
    }

    #[test]
    fn test_float_always_has_point() {
        let p = tree(vec![("a", Value::Float(3.0)), ("b", Value::Float(1e20))]);
        assert_eq!(canonical(&p), "{a=3.0;b=100000000000000000000.0;}");
    }

    #[test]
    fn test_float_precision() {
        let p = tree(vec![("pi", Value::Float(std::f64::consts::PI))]);
        let s = Serializer::new(PdlOptions::canonical().with_float_precision(3));
        assert_eq!(s.render(&p), "{pi=3.142;}");
        let s = Serializer::new(PdlOptions::canonical().with_float_precision(0));
        assert_eq!(s.render(&p), "{pi=3.0;}");
    }

    #[test]
    fn test_decimal_separator_only_cooked() {
        let p = tree(vec![("x", Value::Float(2.5))]);
        let cooked = Serializer::new(PdlOptions::cooked().with_decimal_separator(','));
        assert_eq!(cooked.render(&p), "{\n    x=2,5;\n}");
        let canonical = Serializer::new(PdlOptions::canonical().with_decimal_separator(','));
        assert_eq!(canonical.render(&p), "{x=2.5;}");
    }

    #[test]
    fn test_non_finite_dropped() {
        let p = tree(vec![
            ("a", Value::Float(f64::NAN)),
            ("b", Value::Integer(1)),
            ("c", Value::from(vec![1.0, f64::INFINITY])),
        ]);
        assert_eq!(canonical(&p), "{b=1;}");

        let only = tree(vec![("a", Value::Float(f64::NEG_INFINITY))]);
        assert_eq!(canonical(&only), "");
    }

    #[test]
    fn test_string_escaping() {
        let p = tree(vec![("s", Value::from("a\"b\\c"))]);
        assert_eq!(canonical(&p), r#"{s="a\"b\\c";}"#);
    }

    #[test]
    fn test_quoted_names() {
        let p = tree(vec![("with space", Value::Integer(1)), ("1st", Value::Integer(2))]);
        assert_eq!(canonical(&p), r#"{"with space"=1;"1st"=2;}"#);
    }

    #[test]
    fn test_bytes() {
        let p = tree(vec![("blob", Value::Bytes(vec![0x0a, 0x1f])), ("none", Value::Bytes(vec![]))]);
        assert_eq!(canonical(&p), "{blob=#0a1f;none=#;}");
        assert_eq!(cooked(&p), "{\n    blob=#0a 1f ;\n    none=#;\n}");
    }

    #[test]
    fn test_scalar_lists() {
        let p = tree(vec![
            ("xs", Value::from(vec![1i64, 2, 3])),
            ("empty", Value::List(List::default())),
        ]);
        assert_eq!(canonical(&p), "{xs=(1,2,3);empty=();}");
        assert_eq!(cooked(&p), "{\n    xs=(1, 2, 3);\n    empty=();\n}");
    }

    #[test]
    fn test_nested_cooked_layout() {
        let inner = tree(vec![("x", Value::Integer(1))]);
        let p = tree(vec![("a", Value::Integer(0)), ("n", Value::Parameters(inner))]);
        assert_eq!(
            cooked(&p),
            "{\n    a=0;\n    n={\n        x=1;\n    };\n}"
        );
        assert_eq!(canonical(&p), "{a=0;n={x=1;};}");
    }

    #[test]
    fn test_empty_nested_node_omitted() {
        let p = tree(vec![
            ("a", Value::Integer(1)),
            ("n", Value::Parameters(Parameters::new())),
        ]);
        assert_eq!(canonical(&p), "{a=1;}");
    }

    #[test]
    fn test_node_lists() {
        let first = tree(vec![("h", Value::from("a"))]);
        let p = tree(vec![(
            "servers",
            Value::from(vec![first, Parameters::new()]),
        )]);
        assert_eq!(canonical(&p), "{servers=({h=\"a\";},{});}");
        assert_eq!(
            cooked(&p),
            "{\n    servers=(\n        {\n            h=\"a\";\n        },\n        {}\n    );\n}"
        );
    }

    #[test]
    fn test_custom_indent() {
        let p = tree(vec![("a", Value::Integer(1))]);
        let s = Serializer::new(PdlOptions::cooked().with_indent(1));
        assert_eq!(s.render(&p), "{\n a=1;\n}");
    }

    #[test]
    fn test_render_value() {
        let s = Serializer::default();
        assert_eq!(s.render_value(&Value::from("x")).unwrap(), "\"x\"");
        assert!(s.render_value(&Value::Float(f64::NAN)).is_err());
        assert!(s.render_value(&Value::Parameters(Parameters::new())).is_err());
    }
}
