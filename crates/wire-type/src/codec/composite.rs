//! Composite codecs: arrays and keyed records.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use super::{normalize, serialize, Context};
use crate::error::ValidationError;
use crate::schema::{ObjectSchema, Schema};
use crate::value::{Normalized, WireValue};

/// Structural difference between an object schema and a set of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    /// Required names absent from the keys, in schema order.
    pub missing: Vec<String>,
    /// Keys the schema does not declare, in key order.
    pub extra: Vec<String>,
}

impl KeyDiff {
    /// Fails with "Missing properties", then "Unexpected properties".
    pub fn check(&self) -> Result<(), ValidationError> {
        if !self.missing.is_empty() {
            return Err(ValidationError::with_value("Missing properties", names(&self.missing)));
        }
        if !self.extra.is_empty() {
            return Err(ValidationError::with_value("Unexpected properties", names(&self.extra)));
        }
        Ok(())
    }
}

pub(crate) fn names(names: &[String]) -> WireValue {
    WireValue::Array(names.iter().map(|n| WireValue::Str(n.clone())).collect())
}

/// Linear in the number of keys plus fields.
pub fn diff_keys<'k>(schema: &ObjectSchema, keys: impl IntoIterator<Item = &'k str>) -> KeyDiff {
    let declared: HashSet<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
    let mut present: HashSet<&str> = HashSet::new();
    let mut extra: IndexSet<&str> = IndexSet::new();
    for key in keys {
        present.insert(key);
        if !declared.contains(key) {
            extra.insert(key);
        }
    }
    let missing = schema
        .required_names()
        .filter(|name| !present.contains(name))
        .map(str::to_string)
        .collect();
    KeyDiff {
        missing,
        extra: extra.into_iter().map(str::to_string).collect(),
    }
}

/// Fail-fast, left to right.
pub fn normalize_array(items: &Schema, value: &WireValue, ctx: &Context<'_>) -> Result<Normalized, ValidationError> {
    let elements = match value {
        WireValue::Array(a) => a,
        other => return Err(ValidationError::with_value("Invalid array", other.clone())),
    };
    let inner = ctx.descend()?;
    let mut out = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        out.push(normalize(items, element, &inner).map_err(|e| e.with_segment(i))?);
    }
    Ok(Normalized::Array(out))
}

/// Structural checks (missing, then extra) run before any field is normalized.
pub fn normalize_object(
    schema: &ObjectSchema,
    value: &WireValue,
    ctx: &Context<'_>,
) -> Result<Normalized, ValidationError> {
    let entries = match value {
        WireValue::Object(entries) => entries,
        other => return Err(ValidationError::with_value("Invalid object", other.clone())),
    };
    diff_keys(schema, entries.iter().map(|(k, _)| k.as_str())).check()?;

    let inner = ctx.descend()?;
    let mut by_key: HashMap<&str, &WireValue> = HashMap::with_capacity(entries.len());
    for (k, v) in entries {
        by_key.entry(k.as_str()).or_insert(v);
    }
    let mut out = IndexMap::with_capacity(entries.len());
    for field in schema.fields() {
        if let Some(v) = by_key.get(field.name.as_str()) {
            let n = normalize(&field.schema, v, &inner).map_err(|e| e.with_segment(field.name.as_str()))?;
            out.insert(field.name.clone(), n);
        }
    }
    Ok(Normalized::Object(out))
}

pub fn serialize_array(items: &Schema, value: &Normalized, ctx: &Context<'_>) -> Result<WireValue, ValidationError> {
    let elements = match value {
        Normalized::Array(a) => a,
        other => return Err(ValidationError::new(format!("Invalid array: {}", other.kind()))),
    };
    let inner = ctx.descend()?;
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| serialize(items, element, &inner).map_err(|e| e.with_segment(i)))
        .collect::<Result<Vec<_>, _>>()
        .map(WireValue::Array)
}

pub fn serialize_object(
    schema: &ObjectSchema,
    value: &Normalized,
    ctx: &Context<'_>,
) -> Result<WireValue, ValidationError> {
    let map = match value {
        Normalized::Object(map) => map,
        other => return Err(ValidationError::new(format!("Invalid object: {}", other.kind()))),
    };
    diff_keys(schema, map.keys().map(String::as_str)).check()?;

    let inner = ctx.descend()?;
    let mut entries = Vec::with_capacity(map.len());
    for field in schema.fields() {
        if let Some(v) = map.get(&field.name) {
            let w = serialize(&field.schema, v, &inner).map_err(|e| e.with_segment(field.name.as_str()))?;
            entries.push((field.name.clone(), w));
        }
    }
    Ok(WireValue::Object(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::PathSegment;
    use crate::schema::{Field, SchemaBuilder};
    use serde_json::json;

    fn foo_bar() -> ObjectSchema {
        let b = SchemaBuilder::new();
        ObjectSchema::new(vec![
            Field::required("foo", b.bool()),
            Field::optional("bar", b.int()),
        ])
        .unwrap()
    }

    fn run(schema: &ObjectSchema, v: serde_json::Value) -> Result<Normalized, ValidationError> {
        let config = EngineConfig::default();
        normalize_object(schema, &WireValue::from(v), &Context::new(&config))
    }

    #[test]
    fn missing_reported_before_field_values() {
        let err = run(&foo_bar(), json!({"bar": 2.0})).unwrap_err();
        assert_eq!(err.message, "Missing properties");
        assert_eq!(err.value, Some(WireValue::from(json!(["foo"]))));
    }

    #[test]
    fn missing_wins_over_invalid_field() {
        let err = run(&foo_bar(), json!({"bar": "nope"})).unwrap_err();
        assert_eq!(err.message, "Missing properties");
    }

    #[test]
    fn extra_reported_before_field_values() {
        let err = run(&foo_bar(), json!({"foo": 1, "barr": 2.0})).unwrap_err();
        assert_eq!(err.message, "Unexpected properties");
        assert_eq!(err.value, Some(WireValue::from(json!(["barr"]))));
    }

    #[test]
    fn all_missing_listed() {
        let b = SchemaBuilder::new();
        let s = ObjectSchema::new(vec![
            Field::required("a", b.any()),
            Field::required("b", b.any()),
            Field::optional("c", b.any()),
        ])
        .unwrap();
        let err = run(&s, json!({"c": 1})).unwrap_err();
        assert_eq!(err.value, Some(WireValue::from(json!(["a", "b"]))));
    }

    #[test]
    fn field_error_carries_name() {
        let err = run(&foo_bar(), json!({"foo": true, "bar": 2.5})).unwrap_err();
        assert_eq!(err.message, "Invalid integer");
        assert_eq!(err.path, vec![PathSegment::Key("bar".into())]);
    }

    #[test]
    fn coerces_present_fields() {
        let n = run(&foo_bar(), json!({"foo": true, "bar": 2.0})).unwrap();
        assert_eq!(n.get("bar"), Some(&Normalized::Integer(2)));
        assert_eq!(n.get("foo"), Some(&Normalized::Bool(true)));
    }

    #[test]
    fn optional_may_be_absent() {
        let n = run(&foo_bar(), json!({"foo": false})).unwrap();
        assert_eq!(n.as_object().map(|m| m.len()), Some(1));
    }

    #[test]
    fn non_object_rejected() {
        assert_eq!(run(&foo_bar(), json!([1])).unwrap_err().message, "Invalid object");
    }

    #[test]
    fn array_fail_fast_with_index() {
        let config = EngineConfig::default();
        let ctx = Context::new(&config);
        let err = normalize_array(
            &Schema::Boolean,
            &WireValue::from(json!([true, false, 1, "x"])),
            &ctx,
        )
        .unwrap_err();
        assert_eq!(err.path, vec![PathSegment::Index(2)]);
        assert_eq!(err.value, Some(WireValue::Integer(1)));
    }

    #[test]
    fn array_rejects_non_sequence() {
        let config = EngineConfig::default();
        let ctx = Context::new(&config);
        let err = normalize_array(&Schema::Any, &WireValue::from(json!({})), &ctx).unwrap_err();
        assert_eq!(err.message, "Invalid array");
    }

    #[test]
    fn nested_path_is_innermost_first() {
        let b = SchemaBuilder::new();
        let s = ObjectSchema::new(vec![Field::required("flags", b.array(b.bool()))]).unwrap();
        let err = run(&s, json!({"flags": [true, 0]})).unwrap_err();
        assert_eq!(err.path, vec![PathSegment::Index(1), PathSegment::Key("flags".into())]);
        assert_eq!(err.render(), "Item at [\"flags\", 1] Invalid boolean: 0");
    }

    #[test]
    fn diff_lists_extra_in_key_order() {
        let d = diff_keys(&foo_bar(), ["z", "foo", "a"]);
        assert!(d.missing.is_empty());
        assert_eq!(d.extra, vec!["z", "a"]);
    }

    #[test]
    fn diff_dedups_repeated_extra_keys() {
        let d = diff_keys(&foo_bar(), ["z", "foo", "z", "a", "z"]);
        assert_eq!(d.extra, vec!["z", "a"]);
    }

    #[test]
    fn many_unexpected_keys_reported_in_order() {
        let b = SchemaBuilder::new();
        let s = ObjectSchema::new(vec![Field::required("a", b.any())]).unwrap();
        let n = 50_000;
        let mut entries = vec![("a".to_string(), WireValue::Null)];
        entries.extend((0..n).map(|i| (format!("k{i}"), WireValue::Integer(i as i64))));
        let config = EngineConfig::default();

        let started = std::time::Instant::now();
        let err = normalize_object(&s, &WireValue::Object(entries), &Context::new(&config)).unwrap_err();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        assert_eq!(err.message, "Unexpected properties");
        match err.value {
            Some(WireValue::Array(names)) => {
                assert_eq!(names.len(), n);
                assert_eq!(names[0], WireValue::Str("k0".into()));
                assert_eq!(names[n - 1], WireValue::Str(format!("k{}", n - 1)));
            }
            other => panic!("expected names array, got {other:?}"),
        }
    }
}
