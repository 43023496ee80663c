/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolved YAML value tree.

use chrono::NaiveDate;

/// A fully resolved YAML value.
///
/// By the time a `Value` reaches the converter, anchors and aliases have been
/// expanded, merge keys applied, and every scalar has been typed. The tree is
/// a strict tree: no node is its own ancestor.
///
/// ## Example
///
/// ```rust
/// use yaml_sexpr::Value;
///
/// let value = Value::mapping([("name", Value::from("Dorothy")), ("qty", Value::from(4))]);
/// assert!(value.is_mapping());
/// assert_eq!(value.type_name(), "mapping");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `~`, `null`, or an empty plain scalar
    Null,

    /// `true` / `false` (and the YAML 1.1 spellings)
    Boolean(bool),

    /// A signed integer that fits in 64 bits
    Integer(i64),

    /// A double, including the special values `.inf`, `-.inf` and `.nan`
    Float(f64),

    /// Any string scalar
    String(String),

    /// A calendar date; time-of-day components are dropped when loading
    Date(NaiveDate),

    /// An ordered sequence
    Sequence(Vec<Value>),

    /// An ordered mapping
    Mapping(Mapping),

    /// A node carrying an application-specific tag the converter does not
    /// understand.
    Tagged(Tagged),
}

/// An insertion-ordered YAML mapping.
///
/// Keys are stored as [`Value`]s so that a non-string key coming from the
/// parser is still representable; the converter rejects it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
}

/// A value with an unrecognized YAML tag (e.g. `!color red`).
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    /// The tag as written, including its handle (e.g. `!color`)
    pub tag: String,

    /// The tagged node
    pub value: Box<Value>,
}

impl Value {
    /// Build a mapping value from string-keyed pairs, preserving order.
    pub fn mapping<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (Value::String(k.into()), v))
                .collect(),
        )
    }

    /// Build a sequence value.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Sequence(items.into_iter().collect())
    }

    /// The YAML type name of this value, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Tagged(_) => "tagged value",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a string key if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping insertion order. Duplicate keys are kept
    /// as-is; the loader is responsible for key uniqueness.
    pub fn push(&mut self, key: Value, value: Value) {
        self.entries.push((key, value));
    }

    /// Check whether an entry with an equal key exists.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Look up the first entry whose key is the given string.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Value, Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a (Value, Value);
    type IntoIter = std::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_preserves_order() {
        let value = Value::mapping([
            ("zeta", Value::from(1)),
            ("alpha", Value::from(2)),
            ("mid", Value::from(3)),
        ]);
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_get() {
        let value = Value::mapping([("name", Value::from("Dorothy"))]);
        assert_eq!(value.get("name"), Some(&Value::from("Dorothy")));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Null.get("name"), None);
    }

    #[test]
    fn test_non_string_key_is_representable() {
        let mut mapping = Mapping::new();
        mapping.push(Value::Integer(1), Value::from("one"));
        assert!(mapping.contains_key(&Value::Integer(1)));
        assert_eq!(mapping.get("1"), None);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(1.5).type_name(), "float");
        assert_eq!(Value::Sequence(vec![]).type_name(), "sequence");
        let tagged = Value::Tagged(Tagged {
            tag: "!color".into(),
            value: Box::new(Value::from("red")),
        });
        assert_eq!(tagged.type_name(), "tagged value");
    }
}
