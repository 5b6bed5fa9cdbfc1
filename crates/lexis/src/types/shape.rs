use std::fmt::{Display, Formatter, Result as FmtResult};

use super::KeyKind;

/// The declared shape of an entry's value.
///
/// Every leaf is a template string; arrays and maps nest arbitrarily, so a
/// two-dimensional array is `Array(Array(Text))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    #[default]
    Text,
    Array(Box<Shape>),
    Map(KeyKind, Box<Shape>),
}

impl Shape {
    /// An array of text.
    pub fn array() -> Self {
        Shape::Array(Box::new(Shape::Text))
    }

    /// An array of arrays of text.
    pub fn array_2d() -> Self {
        Shape::Array(Box::new(Shape::array()))
    }

    /// A map from `key` to text.
    pub fn map(key: KeyKind) -> Self {
        Shape::Map(key, Box::new(Shape::Text))
    }

    pub fn array_of(element: Shape) -> Self {
        Shape::Array(Box::new(element))
    }

    pub fn map_of(key: KeyKind, value: Shape) -> Self {
        Shape::Map(key, Box::new(value))
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Shape::Text => write!(f, "string"),
            Shape::Array(element) => write!(f, "array of {element}"),
            Shape::Map(key, value) => write!(f, "map of {} to {value}", key.name()),
        }
    }
}
