//! The hierarchical PDL tree.
//!
//! [`Parameters`] is an insertion-ordered map from names to [`Value`]s,
//! backed by [`IndexMap`]. Nodes own their children, so `clone()` is a deep
//! copy and two nodes never share state.
//!
//! Values are addressed with `/`-separated paths (see [`crate::path`]):
//!
//! ```rust
//! use pdl::{Parameters, Value};
//!
//! let mut params = Parameters::new();
//! params.put("server/host", "localhost").unwrap();
//! params.put("server/ports[]", 80).unwrap();
//! params.put("server/ports[]", 443).unwrap();
//!
//! assert_eq!(params.get_str("server/host"), Some("localhost"));
//! assert_eq!(params.get("server/ports[1]"), Some(Value::Integer(443)));
//! assert_eq!(params.get_i64("server/missing", 8080), 8080);
//! ```
//!
//! Lookups never fail; a path that does not resolve yields `None` or the
//! supplied default. Writes return [`Result`] and reject invalid names,
//! out-of-range indices and list elements of the wrong kind.

use crate::path::{self, Index, Segment};
use crate::{hash, Error, List, Result, Value};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Key under which [`Parameters::merge_deep`] keeps a scalar that collided
/// with a nested node.
pub const DEFAULT_KEY: &str = "$default$";

/// A node of the PDL tree.
///
/// Equality is structural and ignores key order.
///
/// # Examples
///
/// ```rust
/// use pdl::{parse_str, Parameters};
///
/// let a = parse_str("{x=1; y=2;}").unwrap();
/// let b = parse_str("{y=2; x=1;}").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.structural_hash(), b.structural_hash());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters(IndexMap<String, Value>);

/// Where a read path ended: a stored value or one element of a list.
enum Slot<'a> {
    Value(&'a Value),
    Element(&'a List, usize),
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Parameters(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Parameters(IndexMap::with_capacity(capacity))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stores a value under a direct child name without validating it.
    ///
    /// Used for trusted construction (parsing, deserialization). Replacing
    /// an existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Returns the direct child stored under `name`.
    ///
    /// Unlike [`get`](Self::get), `name` is not interpreted as a path.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns an iterator over the names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the name-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    fn resolve(&self, path: &str) -> Option<Slot<'_>> {
        let segments = path::split(path).ok()?;
        let (last, parents) = segments.split_last()?;
        let mut node = self;
        for seg in parents {
            node = match (seg.index, node.0.get(seg.name)?) {
                (Index::None, Value::Parameters(p)) => p,
                (Index::At(i), Value::List(List::Parameters(items))) => items.get(i)?,
                _ => return None,
            };
        }
        match (last.index, node.0.get(last.name)?) {
            (Index::None, value) => Some(Slot::Value(value)),
            (Index::At(i), Value::List(list)) if i < list.len() => Some(Slot::Element(list, i)),
            _ => None,
        }
    }

    /// Returns a copy of the value at `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::{parse_str, Value};
    ///
    /// let params = parse_str("{list=(1,2,3); n={x=true;};}").unwrap();
    /// assert_eq!(params.get("list[1]"), Some(Value::Integer(2)));
    /// assert_eq!(params.get("n/x"), Some(Value::Bool(true)));
    /// assert_eq!(params.get("list[3]"), None);
    /// assert_eq!(params.get("n[0]/x"), None);
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        match self.resolve(path)? {
            Slot::Value(value) => Some(value.clone()),
            Slot::Element(list, i) => list.get(i),
        }
    }

    /// Returns a copy of the value at `path`, or `default`.
    #[must_use]
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Returns `true` if `path` resolves to a value.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    #[must_use]
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        match self.resolve(path) {
            Some(Slot::Value(Value::Bool(b))) => *b,
            Some(Slot::Element(List::Bool(v), i)) => v[i],
            _ => default,
        }
    }

    #[must_use]
    pub fn get_i64(&self, path: &str, default: i64) -> i64 {
        match self.resolve(path) {
            Some(Slot::Value(Value::Integer(n))) => *n,
            Some(Slot::Element(List::Integer(v), i)) => v[i],
            _ => default,
        }
    }

    /// Reads a float; integers are widened.
    #[must_use]
    pub fn get_f64(&self, path: &str, default: f64) -> f64 {
        match self.resolve(path) {
            Some(Slot::Value(Value::Float(f))) => *f,
            Some(Slot::Value(Value::Integer(n))) => *n as f64,
            Some(Slot::Element(List::Float(v), i)) => v[i],
            Some(Slot::Element(List::Integer(v), i)) => v[i] as f64,
            _ => default,
        }
    }

    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        match self.resolve(path)? {
            Slot::Value(Value::String(s)) => Some(s.as_str()),
            Slot::Element(List::String(v), i) => Some(v[i].as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_string(&self, path: &str, default: &str) -> String {
        self.get_str(path).unwrap_or(default).to_string()
    }

    #[must_use]
    pub fn get_bytes(&self, path: &str) -> Option<&[u8]> {
        match self.resolve(path)? {
            Slot::Value(Value::Bytes(b)) => Some(b.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_parameters(&self, path: &str) -> Option<&Parameters> {
        match self.resolve(path)? {
            Slot::Value(Value::Parameters(p)) => Some(p),
            Slot::Element(List::Parameters(v), i) => Some(&v[i]),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_list(&self, path: &str) -> Option<&List> {
        match self.resolve(path)? {
            Slot::Value(Value::List(list)) => Some(list),
            _ => None,
        }
    }

    /// Stores a value at `path`, creating intermediate nodes as needed.
    ///
    /// The last segment decides how the value is stored:
    ///
    /// - `name`: replaces whatever is stored under `name`
    /// - `name[]`: appends to the list under `name`; a missing value or a
    ///   list of another kind is replaced by a new one-element list
    /// - `name[n]`: replaces element `n`, or appends when `n` equals the list
    ///   length; a missing or non-list value accepts only `n == 0`
    ///
    /// Intermediate `name[n]` and `name[]` segments address (or append)
    /// nodes in a list of parameters. An intermediate plain `name` holding
    /// anything but a node is replaced by a new node, dropping the old value;
    /// likewise an intermediate indexed `name` holding a scalar or an empty
    /// list is replaced by a new list of parameters.
    ///
    /// A failed `put` leaves the tree unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`], [`Error::InvalidName`],
    /// [`Error::IndexOutOfRange`] or [`Error::TypeMismatch`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::{Error, Parameters};
    ///
    /// let mut params = Parameters::new();
    /// params.put("servers[]/host", "a").unwrap();
    /// params.put("servers[]/host", "b").unwrap();
    /// params.put("servers[1]/port", 8080).unwrap();
    /// assert_eq!(params.get_str("servers[1]/host"), Some("b"));
    /// assert_eq!(params.get_i64("servers[1]/port", 0), 8080);
    ///
    /// assert!(matches!(params.put("bad-name", 1), Err(Error::InvalidName(_))));
    /// assert!(matches!(params.put("servers[5]/x", 1), Err(Error::IndexOutOfRange { .. })));
    /// ```
    pub fn put(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let segments = path::split(path)?;
        for seg in &segments {
            check_name(seg.name)?;
        }
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::invalid_path(path))?;
        let value = value.into();
        self.check_put(parents, last, &value)?;
        let mut node = self;
        for seg in parents {
            node = node.descend_mut(seg)?;
        }
        node.put_entry(last, value)
    }

    /// Walks the path `put` would take without creating anything and reports
    /// the first step that would fail.
    fn check_put(
        &self,
        parents: &[Segment<'_>],
        last: &Segment<'_>,
        value: &Value,
    ) -> Result<()> {
        let mut node = Some(self);
        for seg in parents {
            let current = node.and_then(|node| node.0.get(seg.name));
            node = match (seg.index, current) {
                (Index::None, Some(Value::Parameters(p))) => Some(p),
                (Index::None, _) => None,
                (_, current) => {
                    let index = list_step(seg, current)?;
                    match current {
                        Some(Value::List(List::Parameters(items))) => items.get(index),
                        _ => None,
                    }
                }
            };
        }
        if last.index != Index::None && !value.kind().is_some_and(|kind| kind.is_listable()) {
            return Err(Error::type_mismatch(
                last.name,
                "list element",
                value.type_name(),
            ));
        }
        if let Index::At(n) = last.index {
            match node.and_then(|node| node.0.get(last.name)) {
                Some(Value::List(list)) if !list.accepts(value) => {
                    return Err(Error::type_mismatch(
                        last.name,
                        list.kind().as_str(),
                        value.type_name(),
                    ))
                }
                Some(Value::List(list)) if n > list.len() => {
                    return Err(Error::index_out_of_range(last.name, n, list.len()))
                }
                Some(Value::List(_)) => {}
                _ if n != 0 => return Err(Error::index_out_of_range(last.name, n, 0)),
                _ => {}
            }
        }
        Ok(())
    }

    fn descend_mut(&mut self, seg: &Segment<'_>) -> Result<&mut Parameters> {
        match seg.index {
            Index::None => {
                let slot = self
                    .0
                    .entry(seg.name.to_string())
                    .or_insert_with(|| Value::Parameters(Parameters::new()));
                if !slot.is_parameters() {
                    *slot = Value::Parameters(Parameters::new());
                }
                match slot {
                    Value::Parameters(p) => Ok(p),
                    other => Err(Error::type_mismatch(
                        seg.name,
                        "parameters",
                        other.type_name(),
                    )),
                }
            }
            Index::At(_) | Index::Append => {
                let index = list_step(seg, self.0.get(seg.name))?;
                let slot = self
                    .0
                    .entry(seg.name.to_string())
                    .or_insert_with(|| Value::List(List::Parameters(Vec::new())));
                if !matches!(slot, Value::List(List::Parameters(_))) {
                    *slot = Value::List(List::Parameters(Vec::new()));
                }
                let items = match slot {
                    Value::List(List::Parameters(items)) => items,
                    other => {
                        return Err(Error::type_mismatch(
                            seg.name,
                            "parameters list",
                            other.type_name(),
                        ))
                    }
                };
                if index == items.len() {
                    items.push(Parameters::new());
                }
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or_else(|| Error::index_out_of_range(seg.name, index, len))
            }
        }
    }

    fn put_entry(&mut self, seg: &Segment<'_>, value: Value) -> Result<()> {
        if seg.index != Index::None && !value.kind().is_some_and(|kind| kind.is_listable()) {
            return Err(Error::type_mismatch(
                seg.name,
                "list element",
                value.type_name(),
            ));
        }
        match seg.index {
            Index::None => {
                self.0.insert(seg.name.to_string(), value);
                Ok(())
            }
            Index::Append => {
                let appendable = matches!(
                    self.0.get(seg.name),
                    Some(Value::List(list)) if list.accepts(&value)
                );
                if appendable {
                    if let Some(Value::List(list)) = self.0.get_mut(seg.name) {
                        return list.push(value);
                    }
                }
                self.0
                    .insert(seg.name.to_string(), Value::List(List::singleton(value)?));
                Ok(())
            }
            Index::At(n) => {
                if let Some(Value::List(list)) = self.0.get_mut(seg.name) {
                    if !list.accepts(&value) {
                        return Err(Error::type_mismatch(
                            seg.name,
                            list.kind().as_str(),
                            value.type_name(),
                        ));
                    }
                    let len = list.len();
                    return if n == len {
                        list.push(value)
                    } else if n < len {
                        list.set(n, value)
                    } else {
                        Err(Error::index_out_of_range(seg.name, n, len))
                    };
                }
                if n != 0 {
                    return Err(Error::index_out_of_range(seg.name, n, 0));
                }
                self.0
                    .insert(seg.name.to_string(), Value::List(List::singleton(value)?));
                Ok(())
            }
        }
    }

    /// Removes the value at `path`.
    ///
    /// A `name[n]` path only removes the last element of a list (`n` must be
    /// the final index); returns whether anything was removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::parse_str;
    ///
    /// let mut params = parse_str("{a=1; list=(1,2,3);}").unwrap();
    /// assert!(!params.remove("list[0]"));
    /// assert!(params.remove("list[2]"));
    /// assert!(params.remove("a"));
    /// assert!(!params.remove("a"));
    /// assert_eq!(params.get_list("list").map(|l| l.len()), Some(2));
    /// ```
    pub fn remove(&mut self, path: &str) -> bool {
        let Ok(segments) = path::split(path) else {
            return false;
        };
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let mut node = self;
        for seg in parents {
            node = match (seg.index, node.0.get_mut(seg.name)) {
                (Index::None, Some(Value::Parameters(p))) => p,
                (Index::At(i), Some(Value::List(List::Parameters(items)))) => {
                    match items.get_mut(i) {
                        Some(p) => p,
                        None => return false,
                    }
                }
                _ => return false,
            };
        }
        match last.index {
            Index::None => node.0.shift_remove(last.name).is_some(),
            Index::At(i) => match node.0.get_mut(last.name) {
                Some(Value::List(list)) if list.len().checked_sub(1) == Some(i) => list.pop(),
                _ => false,
            },
            Index::Append => false,
        }
    }

    /// Copies every top-level entry of `other` into this node, replacing
    /// entries with the same name. Nested nodes are not merged.
    pub fn merge(&mut self, other: &Parameters) {
        for (name, value) in other.iter() {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Recursively merges `other` into this node.
    ///
    /// Nested nodes present on both sides are merged; other values from
    /// `other` replace ours. When a node meets a non-node value, the
    /// non-node value is kept inside the node under [`DEFAULT_KEY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::{parse_str, Value};
    ///
    /// let mut base = parse_str("{a={x=1;};}").unwrap();
    /// base.merge_deep(&parse_str("{a=2;}").unwrap());
    /// assert_eq!(base.get("a/x"), Some(Value::Integer(1)));
    /// assert_eq!(base.get("a/$default$"), Some(Value::Integer(2)));
    /// ```
    pub fn merge_deep(&mut self, other: &Parameters) {
        for (name, incoming) in other.iter() {
            match self.0.get_mut(name) {
                Some(existing) => merge_value(existing, incoming),
                None => {
                    self.0.insert(name.clone(), incoming.clone());
                }
            }
        }
    }

    /// Key-order-independent fingerprint of the whole tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdl::parse_str;
    ///
    /// let params = parse_str("{a=1;}").unwrap();
    /// let hash = params.structural_hash();
    /// assert!(hash.starts_with('1'));
    /// assert_eq!(hash, params.clone().structural_hash());
    /// ```
    #[must_use]
    pub fn structural_hash(&self) -> String {
        hash::structural_hash(self)
    }

    /// Serializes to cooked (`true`) or canonical (`false`) PDL text.
    #[must_use]
    pub fn to_text(&self, cooked: bool) -> String {
        if cooked {
            crate::to_string_cooked(self)
        } else {
            crate::to_string(self)
        }
    }
}

/// Index an intermediate `name[n]` or `name[]` step lands on, given the value
/// currently stored under `name`. Scalars and empty lists count as length 0.
fn list_step(seg: &Segment<'_>, current: Option<&Value>) -> Result<usize> {
    let len = match current {
        Some(Value::List(List::Parameters(items))) => items.len(),
        Some(Value::List(list)) if !list.is_empty() => {
            return Err(Error::type_mismatch(
                seg.name,
                "parameters list",
                &format!("{} list", list.kind()),
            ))
        }
        _ => 0,
    };
    let index = match seg.index {
        Index::At(n) => n,
        _ => len,
    };
    if index > len {
        return Err(Error::index_out_of_range(seg.name, index, len));
    }
    Ok(index)
}

fn check_name(name: &str) -> Result<()> {
    if path::is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::invalid_name(name))
    }
}

fn merge_value(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Parameters(mine), Value::Parameters(theirs)) => mine.merge_deep(theirs),
        (Value::Parameters(mine), scalar) => {
            mine.0.insert(DEFAULT_KEY.to_string(), scalar.clone());
        }
        (slot, Value::Parameters(theirs)) => {
            let mut node = theirs.clone();
            node.0
                .entry(DEFAULT_KEY.to_string())
                .or_insert_with(|| slot.clone());
            *slot = Value::Parameters(node);
        }
        (slot, scalar) => *slot = scalar.clone(),
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_string(self))
    }
}

impl Serialize for Parameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl IntoIterator for Parameters {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Parameters(IndexMap::from_iter(iter))
    }
}
