//! Shape checks applied to loader values.
//!
//! Coercion is pure: it never looks at languages or caches, only at one raw
//! value and the shape it should have.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::interpreter::error::CoercionError;
use crate::types::{KeyKind, MapKey, RawValue, Shape};

/// Accepts only a string.
pub fn check_string(raw: &RawValue) -> Result<&str, CoercionError> {
    raw.as_str()
        .ok_or_else(|| CoercionError::new("string", raw.kind()))
}

/// Accepts an array, coercing every element with `element`. Order is kept.
pub fn check_array<T>(
    raw: &RawValue,
    element: impl FnMut(&RawValue) -> Result<T, CoercionError>,
) -> Result<Vec<T>, CoercionError> {
    match raw {
        RawValue::Array(items) => items.iter().map(element).collect(),
        other => Err(CoercionError::new("array", other.kind())),
    }
}

/// Accepts a map, converting every key to `kind` and coercing every value
/// with `value`.
pub fn check_map<T>(
    raw: &RawValue,
    kind: KeyKind,
    mut value: impl FnMut(&RawValue) -> Result<T, CoercionError>,
) -> Result<BTreeMap<MapKey, T>, CoercionError> {
    let RawValue::Map(entries) = raw else {
        return Err(CoercionError::new("map", raw.kind()));
    };
    entries
        .iter()
        .map(|(key, item)| Ok::<_, CoercionError>((convert_key(key, kind)?, value(item)?)))
        .collect()
}

/// Checks `raw` against `shape` without building anything.
pub fn check_shape(raw: &RawValue, shape: &Shape) -> Result<(), CoercionError> {
    match shape {
        Shape::Text => check_string(raw).map(|_| ()),
        Shape::Array(element) => check_array(raw, |item| check_shape(item, element)).map(|_| ()),
        Shape::Map(kind, value) => check_map(raw, *kind, |item| check_shape(item, value)).map(|_| ()),
    }
}

/// Converts a raw map key to the requested key kind.
///
/// Numeric kinds accept numbers and decimal text. Booleans accept `true` and
/// `false` in any letter case.
pub fn convert_key(raw: &RawValue, kind: KeyKind) -> Result<MapKey, CoercionError> {
    let fail = || CoercionError::new(format!("{} key", kind.name()), describe(raw));
    let key = match (kind, raw) {
        (KeyKind::String, RawValue::String(s)) => MapKey::String(s.clone()),
        (KeyKind::Boolean, RawValue::Bool(b)) => MapKey::Boolean(*b),
        (KeyKind::Boolean, RawValue::String(s)) => {
            if s.eq_ignore_ascii_case("true") {
                MapKey::Boolean(true)
            } else if s.eq_ignore_ascii_case("false") {
                MapKey::Boolean(false)
            } else {
                return Err(fail());
            }
        }
        (KeyKind::Integer, RawValue::Integer(i)) => {
            MapKey::Integer(i32::try_from(*i).map_err(|_| fail())?)
        }
        (KeyKind::Long, RawValue::Integer(i)) => MapKey::Long(*i),
        (KeyKind::Double, RawValue::Integer(i)) => MapKey::Double(OrderedFloat(*i as f64)),
        (KeyKind::Double, RawValue::Float(f)) => MapKey::Double(OrderedFloat(*f)),
        (KeyKind::Float, RawValue::Integer(i)) => MapKey::Float(OrderedFloat(*i as f32)),
        (KeyKind::Float, RawValue::Float(f)) => MapKey::Float(OrderedFloat(*f as f32)),
        (KeyKind::Integer, RawValue::String(s)) => {
            MapKey::Integer(s.trim().parse().map_err(|_| fail())?)
        }
        (KeyKind::Long, RawValue::String(s)) => MapKey::Long(s.trim().parse().map_err(|_| fail())?),
        (KeyKind::Double, RawValue::String(s)) => {
            MapKey::Double(OrderedFloat(s.trim().parse().map_err(|_| fail())?))
        }
        (KeyKind::Float, RawValue::String(s)) => {
            MapKey::Float(OrderedFloat(s.trim().parse().map_err(|_| fail())?))
        }
        _ => return Err(fail()),
    };
    Ok(key)
}

fn describe(raw: &RawValue) -> String {
    match raw {
        RawValue::Null
        | RawValue::Bool(_)
        | RawValue::Integer(_)
        | RawValue::Float(_)
        | RawValue::String(_) => raw.to_string(),
        RawValue::Array(_) | RawValue::Map(_) => raw.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_converts_for_every_numeric_kind() {
        let raw = RawValue::from("42");
        assert_eq!(convert_key(&raw, KeyKind::Integer), Ok(MapKey::Integer(42)));
        assert_eq!(convert_key(&raw, KeyKind::Long), Ok(MapKey::Long(42)));
        assert_eq!(convert_key(&raw, KeyKind::Double), Ok(MapKey::from(42.0_f64)));
        assert_eq!(convert_key(&raw, KeyKind::Float), Ok(MapKey::from(42.0_f32)));
    }

    #[test]
    fn test_integer_key_out_of_range_fails() {
        let raw = RawValue::Integer(i64::from(i32::MAX) + 1);
        assert!(convert_key(&raw, KeyKind::Integer).is_err());
        assert_eq!(convert_key(&raw, KeyKind::Long), Ok(MapKey::Long(2_147_483_648)));
    }

    #[test]
    fn test_float_is_not_an_integer_key() {
        assert!(convert_key(&RawValue::Float(1.5), KeyKind::Integer).is_err());
    }

    #[test]
    fn test_boolean_text_ignores_case() {
        let raw = RawValue::from("TRUE");
        assert_eq!(convert_key(&raw, KeyKind::Boolean), Ok(MapKey::Boolean(true)));
        assert!(convert_key(&RawValue::from("yes"), KeyKind::Boolean).is_err());
    }

    #[test]
    fn test_string_keys_accept_only_text() {
        assert!(convert_key(&RawValue::Integer(1), KeyKind::String).is_err());
    }
}
