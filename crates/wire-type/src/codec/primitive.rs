//! Primitive codecs: any, integer, float, boolean, string.

use indexmap::IndexMap;

use super::Context;
use crate::error::ValidationError;
use crate::metaschema::schema_to_description;
use crate::schema::Schema;
use crate::value::{Normalized, WireValue};

fn decode_utf8(bytes: &[u8]) -> Result<String, ValidationError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| ValidationError::decode("Invalid UTF-8 string", WireValue::Bytes(bytes.to_vec())))
}

/// Pass-through with text re-encoding, recursing into arrays and objects.
pub fn normalize_any(value: &WireValue, ctx: &Context<'_>) -> Result<Normalized, ValidationError> {
    match value {
        WireValue::Null => Ok(Normalized::Null),
        WireValue::Bool(b) => Ok(Normalized::Bool(*b)),
        WireValue::Integer(i) => Ok(Normalized::Integer(*i)),
        WireValue::Float(f) => Ok(Normalized::Float(*f)),
        WireValue::Str(s) => Ok(Normalized::Str(s.clone())),
        WireValue::Bytes(b) => decode_utf8(b).map(Normalized::Str),
        WireValue::Array(items) => {
            let inner = ctx.descend()?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| normalize_any(item, &inner).map_err(|e| e.with_segment(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Normalized::Array)
        }
        WireValue::Object(entries) => {
            let inner = ctx.descend()?;
            let mut map = IndexMap::with_capacity(entries.len());
            for (key, item) in entries {
                let n = normalize_any(item, &inner).map_err(|e| e.with_segment(key.as_str()))?;
                map.insert(key.clone(), n);
            }
            Ok(Normalized::Object(map))
        }
    }
}

pub fn normalize_integer(value: &WireValue) -> Result<Normalized, ValidationError> {
    match value {
        WireValue::Integer(i) => Ok(Normalized::Integer(*i)),
        WireValue::Float(f) if f.fract() == 0.0 && fits_i64(*f) => Ok(Normalized::Integer(*f as i64)),
        other => Err(ValidationError::with_value("Invalid integer", other.clone())),
    }
}

// -2^63 is exact in f64; 2^63 is one past i64::MAX.
fn fits_i64(f: f64) -> bool {
    f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0
}

pub fn normalize_float(value: &WireValue) -> Result<Normalized, ValidationError> {
    match value {
        WireValue::Float(f) => Ok(Normalized::Float(*f)),
        WireValue::Integer(i) => Ok(Normalized::Float(*i as f64)),
        other => Err(ValidationError::with_value("Invalid float", other.clone())),
    }
}

pub fn normalize_boolean(value: &WireValue) -> Result<Normalized, ValidationError> {
    match value {
        WireValue::Bool(b) => Ok(Normalized::Bool(*b)),
        other => Err(ValidationError::with_value("Invalid boolean", other.clone())),
    }
}

pub fn normalize_string(value: &WireValue) -> Result<Normalized, ValidationError> {
    match value {
        WireValue::Str(s) => Ok(Normalized::Str(s.clone())),
        WireValue::Bytes(b) => decode_utf8(b).map(Normalized::Str),
        other => Err(ValidationError::with_value("Invalid string", other.clone())),
    }
}

/// Inverse of [`normalize_any`].
pub fn serialize_any(value: &Normalized, ctx: &Context<'_>) -> Result<WireValue, ValidationError> {
    Ok(match value {
        Normalized::Null => WireValue::Null,
        Normalized::Bool(b) => WireValue::Bool(*b),
        Normalized::Integer(i) => WireValue::Integer(*i),
        Normalized::Float(f) => WireValue::Float(*f),
        Normalized::Str(s) => WireValue::Str(s.clone()),
        Normalized::Array(items) => {
            let inner = ctx.descend()?;
            WireValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| serialize_any(item, &inner).map_err(|e| e.with_segment(i)))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        }
        Normalized::Object(map) => {
            let inner = ctx.descend()?;
            let mut entries = Vec::with_capacity(map.len());
            for (key, item) in map {
                let w = serialize_any(item, &inner).map_err(|e| e.with_segment(key.as_str()))?;
                entries.push((key.clone(), w));
            }
            WireValue::Object(entries)
        }
        Normalized::Schema(s) => schema_to_description(s, ctx.config.reference_separator),
    })
}

/// Primitives serialize as themselves; a value of the wrong kind fails with
/// the same message normalization would give.
pub fn serialize_primitive(
    schema: &Schema,
    value: &Normalized,
    ctx: &Context<'_>,
) -> Result<WireValue, ValidationError> {
    let matches = matches!(
        (schema, value),
        (Schema::Integer, Normalized::Integer(_))
            | (Schema::Float, Normalized::Float(_))
            | (Schema::Boolean, Normalized::Bool(_))
            | (Schema::String, Normalized::Str(_))
    );
    if !matches {
        let message = format!("Invalid {}", schema.kind());
        return Err(match serialize_any(value, ctx) {
            Ok(wire) => ValidationError::with_value(message, wire),
            Err(_) => ValidationError::new(message),
        });
    }
    serialize_any(value, ctx)
}
