//! Attribute lookup and coercion
//!
//! Each output field is read through an explicit precedence order
//! (primary key, fallback key, default) and then coerced to its output type.
//! Coercion follows the numeric-conversion rules of the upstream toolkit:
//! booleans count as 0/1, strings are trimmed before parsing, and floats are
//! truncated toward zero when an integer is required.

use crate::config::CoordinateFallback;
use crate::error::{ExportError, ExportResult};
use crate::types::{AttrValue, AttributeMap};

/// Resolve an ordered alias list against an attribute map.
///
/// Returns `None` when the caller should use its default.
pub fn lookup_aliased<'a>(
    attributes: &'a AttributeMap,
    keys: &[String],
    policy: CoordinateFallback,
) -> Option<&'a AttrValue> {
    match policy {
        CoordinateFallback::Presence => keys.iter().find_map(|key| attributes.get(key)),
        CoordinateFallback::Falsy => {
            let (last, leading) = keys.split_last()?;
            leading
                .iter()
                .filter_map(|key| attributes.get(key))
                .find(|value| !is_falsy_coordinate(value))
                .or_else(|| attributes.get(last))
        }
    }
}

/// Coordinates are compared as numbers, so a string-typed `"0.0"` is as
/// falsy as a decoded `0.0`. Unparseable strings stay truthy and fail later
/// in `coerce_float`.
fn is_falsy_coordinate(value: &AttrValue) -> bool {
    match value {
        AttrValue::Str(s) => s.is_empty() || s.trim().parse::<f64>().map_or(false, |f| f == 0.0),
        other => other.is_falsy(),
    }
}

/// Coerce to a finite float. NaN and infinities have no JSON form, and
/// writing them as `null` would read as an absent value.
pub fn coerce_float(value: &AttrValue, element: &str, field: &str) -> ExportResult<f64> {
    let number = match value {
        AttrValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        AttrValue::Int(i) => Ok(*i as f64),
        AttrValue::Float(f) => Ok(*f),
        AttrValue::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| coercion_error(value, element, field, "float")),
    }?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(coercion_error(value, element, field, "finite float"))
    }
}

pub fn coerce_int(value: &AttrValue, element: &str, field: &str) -> ExportResult<i64> {
    match value {
        AttrValue::Bool(b) => Ok(i64::from(*b)),
        AttrValue::Int(i) => Ok(*i),
        AttrValue::Float(f) => {
            let truncated = f.trunc();
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            if truncated.is_finite()
                && truncated >= i64::MIN as f64
                && truncated < i64::MAX as f64
            {
                Ok(truncated as i64)
            } else {
                Err(coercion_error(value, element, field, "integer"))
            }
        }
        AttrValue::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| coercion_error(value, element, field, "integer")),
    }
}

/// Look up `field` and coerce it to float, falling back to `default` when absent
pub fn float_or(
    attributes: &AttributeMap,
    field: &str,
    default: f64,
    element: &str,
) -> ExportResult<f64> {
    match attributes.get(field) {
        Some(value) => coerce_float(value, element, field),
        None => Ok(default),
    }
}

/// Look up `field` and coerce it to float; absence stays absence
pub fn optional_float(
    attributes: &AttributeMap,
    field: &str,
    element: &str,
) -> ExportResult<Option<f64>> {
    attributes
        .get(field)
        .map(|value| coerce_float(value, element, field))
        .transpose()
}

pub fn int_or(
    attributes: &AttributeMap,
    field: &str,
    default: i64,
    element: &str,
) -> ExportResult<i64> {
    match attributes.get(field) {
        Some(value) => coerce_int(value, element, field),
        None => Ok(default),
    }
}

fn coercion_error(value: &AttrValue, element: &str, field: &str, expected: &'static str) -> ExportError {
    ExportError::TypeCoercion {
        element: element.to_string(),
        field: field.to_string(),
        value: format!("{value} ({})", value.type_name()),
        expected,
    }
}
