use std::fmt::{Display, Formatter, Result as FmtResult};

use ordered_float::OrderedFloat;

/// The primitive kinds a map-shaped entry may be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Boolean,
    Double,
    Float,
    Integer,
    Long,
    String,
}

impl KeyKind {
    pub fn name(self) -> &'static str {
        match self {
            KeyKind::Boolean => "boolean",
            KeyKind::Double => "double",
            KeyKind::Float => "float",
            KeyKind::Integer => "integer",
            KeyKind::Long => "long",
            KeyKind::String => "string",
        }
    }
}

/// A typed map key produced by coercion.
///
/// Floating point keys use `OrderedFloat` so every key is totally ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Boolean(bool),
    Double(OrderedFloat<f64>),
    Float(OrderedFloat<f32>),
    Integer(i32),
    Long(i64),
    String(String),
}

impl MapKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            MapKey::Boolean(_) => KeyKind::Boolean,
            MapKey::Double(_) => KeyKind::Double,
            MapKey::Float(_) => KeyKind::Float,
            MapKey::Integer(_) => KeyKind::Integer,
            MapKey::Long(_) => KeyKind::Long,
            MapKey::String(_) => KeyKind::String,
        }
    }
}

impl Display for MapKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MapKey::Boolean(b) => write!(f, "{b}"),
            MapKey::Double(n) => write!(f, "{n}"),
            MapKey::Float(n) => write!(f, "{n}"),
            MapKey::Integer(n) => write!(f, "{n}"),
            MapKey::Long(n) => write!(f, "{n}"),
            MapKey::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        MapKey::Boolean(b)
    }
}

impl From<i32> for MapKey {
    fn from(n: i32) -> Self {
        MapKey::Integer(n)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Long(n)
    }
}

impl From<f32> for MapKey {
    fn from(n: f32) -> Self {
        MapKey::Float(OrderedFloat(n))
    }
}

impl From<f64> for MapKey {
    fn from(n: f64) -> Self {
        MapKey::Double(OrderedFloat(n))
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::String(s)
    }
}
