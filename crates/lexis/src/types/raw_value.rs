use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::Value as JsonValue;

/// An untyped value supplied by a loader.
///
/// Loaders produce `RawValue`s without knowing what shape an entry expects;
/// shape checking happens later, when an entry is first accessed.
///
/// # Example
///
/// ```
/// use lexis::RawValue;
///
/// let greeting: RawValue = "Hello".into();
/// let lines: RawValue = vec!["a", "b"].into();
/// let table = RawValue::map([("5", "Hello"), ("99", "<test>")]);
///
/// assert_eq!(greeting.kind(), "string");
/// assert_eq!(lines.kind(), "array");
/// assert_eq!(table.kind(), "map");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// An explicit null inside an array or map. Never matches a shape.
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// An ordered sequence of values.
    Array(Vec<RawValue>),
    /// A mapping, in source order. Keys are untyped as well.
    Map(Vec<(RawValue, RawValue)>),
}

impl RawValue {
    /// Builds a map value from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<RawValue>,
        V: Into<RawValue>,
    {
        RawValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Name of this value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Integer(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::Array(_) => "array",
            RawValue::Map(_) => "map",
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON document node.
    ///
    /// A top-level `null` means "no value" and yields `None`. A `null` inside
    /// an array or object is kept as [`RawValue::Null`] so positions are
    /// preserved and shape checks reject it. Integers that do not fit an
    /// `i64` become floats.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            other => Some(RawValue::from_json_element(other)),
        }
    }

    fn from_json_element(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RawValue::Null,
            JsonValue::Bool(b) => RawValue::Bool(*b),
            JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => RawValue::Integer(i),
                (None, Some(f)) => RawValue::Float(f),
                (None, None) => RawValue::String(n.to_string()),
            },
            JsonValue::String(s) => RawValue::String(s.clone()),
            JsonValue::Array(items) => {
                RawValue::Array(items.iter().map(RawValue::from_json_element).collect())
            }
            JsonValue::Object(fields) => RawValue::Map(
                fields
                    .iter()
                    .map(|(key, value)| {
                        (RawValue::String(key.clone()), RawValue::from_json_element(value))
                    })
                    .collect(),
            ),
        }
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Integer(n) => write!(f, "{n}"),
            RawValue::Float(n) => write!(f, "{n}"),
            RawValue::String(s) => write!(f, "{s:?}"),
            RawValue::Array(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            RawValue::Map(entries) => {
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// From implementations for common types

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Integer(i64::from(n))
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Integer(n)
    }
}

impl From<f32> for RawValue {
    fn from(n: f32) -> Self {
        RawValue::Float(f64::from(n))
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Float(n)
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>, const N: usize> From<[T; N]> for RawValue {
    fn from(items: [T; N]) -> Self {
        RawValue::Array(items.into_iter().map(Into::into).collect())
    }
}
