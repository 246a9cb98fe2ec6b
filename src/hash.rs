//! Structural hashing of [`Parameters`] trees.
//!
//! The fingerprint depends only on content: names are visited in sorted
//! order, so insertion order does not matter, and values that compare equal
//! hash equal (including `0.0`/`-0.0` and empty lists of any kind).
//!
//! Every step folds into a running `i64`: multiply by an odd constant, add,
//! take the absolute value. The result is written as a format-version digit
//! followed by lowercase base-26 letters.

use crate::{List, Parameters, Value};

const FORMAT_VERSION: char = '1';
const MULTIPLIER: i64 = 0x0100_0000_01B3;
const SEED: i64 = 17;
const NAME_SAMPLES: usize = 16;

const TAG_BOOL: i64 = 1;
const TAG_INTEGER: i64 = 2;
const TAG_FLOAT: i64 = 3;
const TAG_STRING: i64 = 4;
const TAG_BYTES: i64 = 5;
const TAG_PARAMETERS: i64 = 6;
const TAG_LIST: i64 = 7;

#[inline]
fn fold(acc: i64, h: i64) -> i64 {
    acc.wrapping_mul(MULTIPLIER).wrapping_add(h).wrapping_abs()
}

/// Names shorter than 16 characters are hashed in full; longer names are
/// sampled at 16 evenly spaced positions.
fn name_hash(name: &str) -> i64 {
    let chars: Vec<char> = name.chars().collect();
    let seed = chars.len() as i64;
    if chars.len() < NAME_SAMPLES {
        chars.iter().fold(seed, |h, c| fold(h, *c as i64))
    } else {
        let stride = chars.len() / NAME_SAMPLES;
        chars
            .iter()
            .step_by(stride)
            .take(NAME_SAMPLES)
            .fold(seed, |h, c| fold(h, *c as i64))
    }
}

fn text_hash(text: &str) -> i64 {
    text.chars()
        .fold(text.len() as i64, |h, c| fold(h, c as i64))
}

#[inline]
fn float_bits(f: f64) -> i64 {
    if f == 0.0 {
        0
    } else {
        f.to_bits() as i64
    }
}

fn value_hash(value: &Value) -> i64 {
    match value {
        Value::Bool(b) => fold(TAG_BOOL, *b as i64),
        Value::Integer(i) => fold(TAG_INTEGER, *i),
        Value::Float(f) => fold(TAG_FLOAT, float_bits(*f)),
        Value::String(s) => fold(TAG_STRING, text_hash(s)),
        Value::Bytes(bytes) => bytes
            .iter()
            .fold(fold(TAG_BYTES, bytes.len() as i64), |h, b| fold(h, *b as i64)),
        Value::Parameters(p) => fold(TAG_PARAMETERS, node_hash(p)),
        Value::List(list) => list_hash(list),
    }
}

fn list_hash(list: &List) -> i64 {
    if list.is_empty() {
        return fold(TAG_LIST, 0);
    }
    let head = fold(fold(TAG_LIST, list.len() as i64), list.kind() as i64 + 1);
    match list {
        List::Bool(v) => v.iter().fold(head, |h, b| fold(h, *b as i64)),
        List::Integer(v) => v.iter().fold(head, |h, i| fold(h, *i)),
        List::Float(v) => v.iter().fold(head, |h, f| fold(h, float_bits(*f))),
        List::String(v) => v.iter().fold(head, |h, s| fold(h, text_hash(s))),
        List::Parameters(v) => v.iter().fold(head, |h, p| fold(h, node_hash(p))),
    }
}

pub(crate) fn node_hash(params: &Parameters) -> i64 {
    let mut entries: Vec<(&String, &Value)> = params.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().fold(SEED, |acc, (name, value)| {
        fold(fold(acc, name_hash(name)), value_hash(value))
    })
}

fn render(acc: i64) -> String {
    let mut n = acc as u64;
    let mut letters = Vec::new();
    loop {
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
    }
    let mut out = String::with_capacity(letters.len() + 1);
    out.push(FORMAT_VERSION);
    out.extend(letters.iter().rev());
    out
}

/// Computes the structural hash string of a tree.
#[must_use]
pub fn structural_hash(params: &Parameters) -> String {
    render(node_hash(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(entries: &[(&str, Value)]) -> Parameters {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_format() {
        let hash = structural_hash(&node(&[("a", Value::Integer(1))]));
        assert!(hash.starts_with(FORMAT_VERSION));
        assert!(hash[1..].chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(structural_hash(&Parameters::new()), render(SEED));
    }

    #[test]
    fn test_order_independent() {
        let a = node(&[("x", Value::Integer(1)), ("y", Value::from("s"))]);
        let b = node(&[("y", Value::from("s")), ("x", Value::Integer(1))]);
        assert_eq!(structural_hash(&a), structural_hash(&b));
    }

    #[test]
    fn test_leaf_change_changes_hash() {
        let base = node(&[("x", Value::Integer(1)), ("flag", Value::Bool(true))]);
        let changed = node(&[("x", Value::Integer(2)), ("flag", Value::Bool(true))]);
        let flipped = node(&[("x", Value::Integer(1)), ("flag", Value::Bool(false))]);
        let renamed = node(&[("z", Value::Integer(1)), ("flag", Value::Bool(true))]);
        let h = structural_hash(&base);
        assert_ne!(h, structural_hash(&changed));
        assert_ne!(h, structural_hash(&flipped));
        assert_ne!(h, structural_hash(&renamed));
    }

    #[test]
    fn test_kind_is_part_of_hash() {
        let int = node(&[("x", Value::Integer(1))]);
        let float = node(&[("x", Value::Float(1.0))]);
        let text = node(&[("x", Value::from("1"))]);
        assert_ne!(structural_hash(&int), structural_hash(&float));
        assert_ne!(structural_hash(&int), structural_hash(&text));
    }

    #[test]
    fn test_equal_values_hash_equal() {
        let pos = node(&[("x", Value::Float(0.0))]);
        let neg = node(&[("x", Value::Float(-0.0))]);
        assert_eq!(structural_hash(&pos), structural_hash(&neg));

        let empty_ints = node(&[("l", Value::List(List::Integer(vec![])))]);
        let empty_strs = node(&[("l", Value::List(List::String(vec![])))]);
        assert_eq!(structural_hash(&empty_ints), structural_hash(&empty_strs));
    }

    #[test]
    fn test_long_names_are_sampled() {
        let long = "a".repeat(40);
        let h = name_hash(&long);
        assert_eq!(h, name_hash(&"a".repeat(40)));
        assert_ne!(h, name_hash(&"a".repeat(41)));
    }

    #[test]
    fn test_nested_change_propagates() {
        let inner = node(&[("deep", Value::Integer(1))]);
        let inner2 = node(&[("deep", Value::Integer(2))]);
        let a = node(&[("n", Value::Parameters(inner))]);
        let b = node(&[("n", Value::Parameters(inner2))]);
        assert_ne!(structural_hash(&a), structural_hash(&b));
    }
}
