//! Dynamic value representation for PDL data.
//!
//! This module provides the [`Value`] enum stored under every name of a
//! [`Parameters`] node, and the [`List`] enum for typed homogeneous lists.
//!
//! ## Core Types
//!
//! - [`Value`]: a scalar, a byte blob, a nested node or a typed list
//! - [`List`]: a homogeneous list of bools, integers, floats, strings or nodes
//! - [`Kind`]: the element kinds a list can hold
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use pdl::{List, Value};
//!
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let ports = Value::from(vec![80i64, 443]);
//!
//! assert!(number.is_integer());
//! assert_eq!(ports, Value::List(List::Integer(vec![80, 443])));
//! ```
//!
//! ### Mixed numeric lists
//!
//! A list built from integer and float elements becomes a float list, no
//! matter where the first float appears:
//!
//! ```rust
//! use pdl::{List, Value};
//!
//! let list = List::from_values(vec![Value::from(1), Value::from(2.5)]).unwrap();
//! assert_eq!(list, List::Float(vec![1.0, 2.5]));
//! ```

use crate::{Error, Parameters, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed PDL value.
///
/// # Examples
///
/// ```rust
/// use pdl::Value;
///
/// let value = Value::Float(2.5);
/// assert_eq!(value.as_f64(), Some(2.5));
/// assert_eq!(value.as_i64(), None);
/// assert_eq!(value.type_name(), "float");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Parameters(Parameters),
    List(List),
}

/// A homogeneous list. Byte blobs are never list elements.
#[derive(Clone, Debug)]
pub enum List {
    Bool(Vec<bool>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
    Parameters(Vec<Parameters>),
}

/// The kind of a scalar value or list element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Integer,
    Float,
    String,
    Bytes,
    Parameters,
}

impl Kind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Parameters => "parameters",
        }
    }

    /// Returns `true` if lists may hold elements of this kind.
    #[inline]
    #[must_use]
    pub const fn is_listable(&self) -> bool {
        !matches!(self, Kind::Bytes)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Kind of a scalar, blob or node; `None` for lists.
    #[must_use]
    pub const fn kind(&self) -> Option<Kind> {
        match self {
            Value::Bool(_) => Some(Kind::Bool),
            Value::Integer(_) => Some(Kind::Integer),
            Value::Float(_) => Some(Kind::Float),
            Value::String(_) => Some(Kind::String),
            Value::Bytes(_) => Some(Kind::Bytes),
            Value::Parameters(_) => Some(Kind::Parameters),
            Value::List(_) => None,
        }
    }

    /// Human-readable type name, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::List(list) => match list.kind() {
                Kind::Bool => "bool list",
                Kind::Integer => "integer list",
                Kind::Float => "float list",
                Kind::String => "string list",
                Kind::Bytes => "bytes list",
                Kind::Parameters => "parameters list",
            },
            other => other.kind().map_or("list", |kind| kind.as_str()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_parameters(&self) -> bool {
        matches!(self, Value::Parameters(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns floats, and integers widened to `f64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::Value;
    ///
    /// assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    /// assert_eq!(Value::from("3").as_f64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_parameters(&self) -> Option<&Parameters> {
        match self {
            Value::Parameters(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }
}

impl List {
    /// Creates a one-element list of the value's kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for byte blobs and lists.
    pub fn singleton(value: Value) -> Result<List> {
        Ok(match value {
            Value::Bool(b) => List::Bool(vec![b]),
            Value::Integer(i) => List::Integer(vec![i]),
            Value::Float(f) => List::Float(vec![f]),
            Value::String(s) => List::String(vec![s]),
            Value::Parameters(p) => List::Parameters(vec![p]),
            other @ (Value::Bytes(_) | Value::List(_)) => {
                return Err(Error::type_mismatch(
                    "list element",
                    "bool, integer, float, string or parameters",
                    other.type_name(),
                ))
            }
        })
    }

    /// Builds a list from individual values.
    ///
    /// All values must share one kind, except that integers and floats mix
    /// into a float list. An empty input yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] on mixed kinds or unlistable values.
    pub fn from_values<I>(values: I) -> Result<List>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut values = values.into_iter();
        let mut list = match values.next() {
            Some(first) => List::singleton(first)?,
            None => return Ok(List::default()),
        };
        for value in values {
            list.push_widening(value)?;
        }
        Ok(list)
    }

    /// Like [`push`](List::push), but a float arriving in an integer list
    /// turns the whole list into floats first.
    pub(crate) fn push_widening(&mut self, value: Value) -> Result<()> {
        if let (List::Integer(ints), Value::Float(_)) = (&*self, &value) {
            *self = List::Float(ints.iter().map(|i| *i as f64).collect());
        }
        self.push(value)
    }

    /// Element kind. Empty lists report the kind they were created with.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            List::Bool(_) => Kind::Bool,
            List::Integer(_) => Kind::Integer,
            List::Float(_) => Kind::Float,
            List::String(_) => Kind::String,
            List::Parameters(_) => Kind::Parameters,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            List::Bool(v) => v.len(),
            List::Integer(v) => v.len(),
            List::Float(v) => v.len(),
            List::String(v) => v.len(),
            List::Parameters(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            List::Bool(v) => v.get(index).map(|b| Value::Bool(*b)),
            List::Integer(v) => v.get(index).map(|i| Value::Integer(*i)),
            List::Float(v) => v.get(index).map(|f| Value::Float(*f)),
            List::String(v) => v.get(index).map(|s| Value::String(s.clone())),
            List::Parameters(v) => v.get(index).map(|p| Value::Parameters(p.clone())),
        }
    }

    /// Returns `true` if `value` can be stored in this list.
    ///
    /// Float lists accept integers (widened); empty lists accept any listable
    /// value and adopt its kind.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match value.kind() {
            Some(kind) if kind.is_listable() => {
                self.is_empty()
                    || kind == self.kind()
                    || (kind == Kind::Integer && self.kind() == Kind::Float)
            }
            _ => false,
        }
    }

    /// Appends a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the list does not accept the value.
    pub fn push(&mut self, value: Value) -> Result<()> {
        if !self.accepts(&value) {
            return Err(self.mismatch(&value));
        }
        if self.is_empty() && value.kind() != Some(self.kind()) {
            *self = List::singleton(value)?;
            return Ok(());
        }
        match (self, value) {
            (List::Bool(v), Value::Bool(b)) => v.push(b),
            (List::Integer(v), Value::Integer(i)) => v.push(i),
            (List::Float(v), Value::Float(f)) => v.push(f),
            (List::Float(v), Value::Integer(i)) => v.push(i as f64),
            (List::String(v), Value::String(s)) => v.push(s),
            (List::Parameters(v), Value::Parameters(p)) => v.push(p),
            (list, value) => return Err(list.mismatch(&value)),
        }
        Ok(())
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] or [`Error::TypeMismatch`].
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(Error::index_out_of_range("list", index, len));
        }
        match (self, value) {
            (List::Bool(v), Value::Bool(b)) => v[index] = b,
            (List::Integer(v), Value::Integer(i)) => v[index] = i,
            (List::Float(v), Value::Float(f)) => v[index] = f,
            (List::Float(v), Value::Integer(i)) => v[index] = i as f64,
            (List::String(v), Value::String(s)) => v[index] = s,
            (List::Parameters(v), Value::Parameters(p)) => v[index] = p,
            (list, value) => return Err(list.mismatch(&value)),
        }
        Ok(())
    }

    /// Removes the last element; returns `false` on an empty list.
    pub fn pop(&mut self) -> bool {
        match self {
            List::Bool(v) => v.pop().is_some(),
            List::Integer(v) => v.pop().is_some(),
            List::Float(v) => v.pop().is_some(),
            List::String(v) => v.pop().is_some(),
            List::Parameters(v) => v.pop().is_some(),
        }
    }

    /// Converts every element into a [`Value`].
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        match self {
            List::Bool(v) => v.into_iter().map(Value::Bool).collect(),
            List::Integer(v) => v.into_iter().map(Value::Integer).collect(),
            List::Float(v) => v.into_iter().map(Value::Float).collect(),
            List::String(v) => v.into_iter().map(Value::String).collect(),
            List::Parameters(v) => v.into_iter().map(Value::Parameters).collect(),
        }
    }

    pub(crate) fn parameters_mut(&mut self) -> Option<&mut Vec<Parameters>> {
        match self {
            List::Parameters(v) => Some(v),
            _ => None,
        }
    }

    fn mismatch(&self, value: &Value) -> Error {
        Error::type_mismatch("list element", self.kind().as_str(), value.type_name())
    }
}

impl Default for List {
    fn default() -> Self {
        List::Integer(Vec::new())
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // An empty list has no meaningful element kind.
            (a, b) if a.is_empty() && b.is_empty() => true,
            (List::Bool(a), List::Bool(b)) => a == b,
            (List::Integer(a), List::Integer(b)) => a == b,
            (List::Float(a), List::Float(b)) => a == b,
            (List::String(a), List::String(b)) => a == b,
            (List::Parameters(a), List::Parameters(b)) => a == b,
            _ => false,
        }
    }
}

/// Canonical PDL notation, as the value would appear after `name=`.
///
/// Values with no PDL text fall back to a plain rendering: empty nodes show
/// as `{}`, non-finite floats as Rust prints them.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::Serializer::default().render_value(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => match self {
                Value::Float(x) => write!(f, "{x}"),
                Value::Parameters(_) => f.write_str("{}"),
                other => write!(f, "{other:?}"),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Parameters(p) => p.serialize(serializer),
            Value::List(list) => list.serialize(serializer),
        }
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            List::Bool(v) => v.serialize(serializer),
            List::Integer(v) => v.serialize(serializer),
            List::Float(v) => v.serialize(serializer),
            List::String(v) => v.serialize(serializer),
            List::Parameters(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid PDL value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                Ok(i64::try_from(value).map_or(Value::Float(value as f64), Value::Integer))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    items.push(elem);
                }
                List::from_values(items)
                    .map(Value::List)
                    .map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut node = Parameters::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    node.insert(key, value);
                }
                Ok(Value::Parameters(node))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Parameters {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Parameters(p) => Ok(p),
            other => Err(serde::de::Error::custom(format!(
                "expected parameters, found {}",
                other.type_name()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Parameters> for Value {
    fn from(value: Parameters) -> Self {
        Value::Parameters(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Vec<bool>> for Value {
    fn from(value: Vec<bool>) -> Self {
        Value::List(List::Bool(value))
    }
}

impl From<Vec<i64>> for Value {
    fn from(value: Vec<i64>) -> Self {
        Value::List(List::Integer(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::List(List::Float(value))
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(List::String(value))
    }
}

impl From<Vec<Parameters>> for Value {
    fn from(value: Vec<Parameters>) -> Self {
        Value::List(List::Parameters(value))
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(Error::type_mismatch("value", "integer", other.type_name())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::type_mismatch("value", "float", value.type_name()))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch("value", "bool", other.type_name())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch("value", "string", other.type_name())),
        }
    }
}
