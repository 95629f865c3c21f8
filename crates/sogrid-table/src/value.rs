//! Cell values and row data access.
//!
//! The engine never looks inside host rows directly. Every read goes through
//! [`RowData::field`] (for key accessors) or a column's accessor function, and
//! yields a [`CellValue`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single cell value.
///
/// Values compare numerically across `Int` and `Float`, strings compare with a
/// case-insensitive natural ordering, and `Null` sorts after every other value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A string value.
    String(String),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns `true` for `Int` and `Float` values.
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// Returns the string slice for `String` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value. Strings that parse as numbers are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Compares two values in ascending sort order.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Greater,
            (_, Null) => Ordering::Less,
            (Int(a), Int(b)) => a.cmp(b),
            (a, b) if a.is_number() && b.is_number() => {
                let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Bool(a), Bool(b)) => a.cmp(b),
            (String(a), String(b)) => natural_cmp(a, b),
            (a, b) => natural_cmp(&a.to_string(), &b.to_string()),
        }
    }

    /// Converts a JSON value. Arrays and objects become their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or_default(),
            },
            Value::String(s) => CellValue::String(s.clone()),
            other => CellValue::String(other.to_string()),
        }
    }

    /// Converts into a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            // Whole floats print without a fractional part.
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(CellValue::Int)
            .unwrap_or(CellValue::Float(value as f64))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        CellValue::from_json(value)
    }
}

/// Case-insensitive natural string ordering: digit runs compare by numeric
/// value, so `"item2"` sorts before `"item10"`.
///
/// Strings that differ only in leading zeros order by the first digit run
/// whose zeros differ, fewer zeros first: `"x7" < "x07" < "x007"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut left = Chunks::new(&a);
    let mut right = Chunks::new(&b);
    let mut zeros = Ordering::Equal;

    loop {
        match (left.next(), right.next()) {
            (None, None) => return zeros,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (is_digits(x), is_digits(y)) {
                    (true, true) => {
                        let (x_raw, y_raw) = (x, y);
                        let x = x.trim_start_matches('0');
                        let y = y.trim_start_matches('0');
                        if zeros == Ordering::Equal {
                            zeros = x_raw.len().cmp(&y_raw.len());
                        }
                        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
                    }
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

/// Access to a row's fields by key.
///
/// Implement this for host row types. `set_field` is only needed for cell
/// editing and returns `false` when the row cannot be written.
pub trait RowData: Send + Sync + 'static {
    /// Reads the value stored under `key`, or `Null` if absent.
    fn field(&self, key: &str) -> CellValue;

    /// Writes `value` under `key`. Returns `true` on success.
    fn set_field(&mut self, key: &str, value: CellValue) -> bool {
        let _ = (key, value);
        false
    }
}

fn lookup<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }
    // Dotted keys address nested objects.
    let mut parts = key.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

impl RowData for Map<String, Value> {
    fn field(&self, key: &str) -> CellValue {
        lookup(self, key).map(CellValue::from_json).unwrap_or_default()
    }

    fn set_field(&mut self, key: &str, value: CellValue) -> bool {
        self.insert(key.to_string(), value.to_json());
        true
    }
}

impl RowData for Value {
    fn field(&self, key: &str) -> CellValue {
        self.as_object()
            .map(|map| map.field(key))
            .unwrap_or_default()
    }

    fn set_field(&mut self, key: &str, value: CellValue) -> bool {
        match self.as_object_mut() {
            Some(map) => map.set_field(key, value),
            None => false,
        }
    }
}

impl RowData for HashMap<String, CellValue> {
    fn field(&self, key: &str) -> CellValue {
        self.get(key).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, key: &str, value: CellValue) -> bool {
        self.insert(key.to_string(), value);
        true
    }
}

impl RowData for BTreeMap<String, CellValue> {
    fn field(&self, key: &str) -> CellValue {
        self.get(key).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, key: &str, value: CellValue) -> bool {
        self.insert(key.to_string(), value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_natural_order() {
        assert_eq!(natural_cmp("item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("Alice", "bob"), Ordering::Less);
        assert_eq!(natural_cmp("b", "A"), Ordering::Greater);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Greater);
    }

    #[test]
    fn test_natural_order_leading_zeros() {
        assert_eq!(natural_cmp("x7", "x07"), Ordering::Less);
        assert_eq!(natural_cmp("x07", "x007"), Ordering::Less);
        assert_eq!(natural_cmp("a01b2", "a1b02"), Ordering::Greater);
        assert_eq!(natural_cmp("Item007", "item007"), Ordering::Equal);
        assert_eq!(natural_cmp("x007", "x8"), Ordering::Less);
    }

    #[test]
    fn test_sort_cmp_mixed_numbers_and_null() {
        assert_eq!(CellValue::Int(2).sort_cmp(&CellValue::Float(2.5)), Ordering::Less);
        assert_eq!(CellValue::Null.sort_cmp(&CellValue::Int(1)), Ordering::Greater);
        assert_eq!(CellValue::Int(1).sort_cmp(&CellValue::Null), Ordering::Less);
        assert_eq!(CellValue::Null.sort_cmp(&CellValue::Null), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::from("B,C").to_string(), "B,C");
    }

    #[test]
    fn test_json_row_access() {
        let mut row = json!({"id": 1, "name": "A", "address": {"city": "Seoul"}});
        assert_eq!(row.field("id"), CellValue::Int(1));
        assert_eq!(row.field("address.city"), CellValue::from("Seoul"));
        assert_eq!(row.field("missing"), CellValue::Null);

        assert!(row.set_field("name", CellValue::from("B")));
        assert_eq!(row["name"], json!("B"));

        let mut scalar = json!(5);
        assert!(!scalar.set_field("name", CellValue::Null));
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<CellValue> = serde_json::from_str(r#"[null, true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Int(3),
                CellValue::Float(1.5),
                CellValue::from("x"),
            ]
        );
    }
}
