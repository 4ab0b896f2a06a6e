//! Meta schema: the schema language described in itself.

use std::sync::OnceLock;

use crate::codec::{composite::normalize_object, Context};
use crate::error::ValidationError;
use crate::schema::*;
use crate::value::{Normalized, WireValue};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn key(name: &str, schema: Schema) -> Field {
    Field::required(name, schema)
}

fn key_opt(name: &str, schema: Schema) -> Field {
    Field::optional(name, schema)
}

// Field names below are literals and unique per object.
fn obj(fields: Vec<Field>) -> ObjectSchema {
    ObjectSchema::from_unique(fields)
}

fn property_def() -> Schema {
    Schema::Object(obj(vec![
        key("name", Schema::String),
        key("required", Schema::Boolean),
        key("schema", Schema::SchemaOfSchema),
    ]))
}

fn schema_def() -> ObjectSchema {
    obj(vec![
        key("type", Schema::String),
        key_opt("items", Schema::SchemaOfSchema),
        key_opt("properties", Schema::Array(Box::new(property_def()))),
    ])
}

// ── Public API ────────────────────────────────────────────────────────────────

/// The fixed object schema every schema description must satisfy.
pub fn meta_schema() -> &'static Schema {
    static META: OnceLock<Schema> = OnceLock::new();
    META.get_or_init(|| Schema::Object(meta_object().clone()))
}

fn meta_object() -> &'static ObjectSchema {
    static META: OnceLock<ObjectSchema> = OnceLock::new();
    META.get_or_init(schema_def)
}

/// Normalize a schema description into a [`Schema`].
///
/// Nested `items` and property schemas are normalized by the structural pass
/// itself, since they are typed `SchemaOfSchema` in the meta schema.
/// References are left unresolved.
pub fn normalize_schema(value: &WireValue, ctx: &Context<'_>) -> Result<Schema, ValidationError> {
    let checked = normalize_object(meta_object(), value, ctx)?;
    let type_name = checked.get("type").and_then(Normalized::as_str).unwrap_or_default();
    let items = checked.get("items").and_then(Normalized::as_schema);
    let properties = checked.get("properties");

    let invalid = || ValidationError::with_value(format!("Invalid {} schema", type_name), value.clone());
    if (type_name == ARRAY) != items.is_some() {
        return Err(invalid());
    }
    if (type_name == OBJECT) != properties.is_some() {
        return Err(invalid());
    }

    match type_name {
        ANY => Ok(Schema::Any),
        INTEGER => Ok(Schema::Integer),
        FLOAT => Ok(Schema::Float),
        BOOLEAN => Ok(Schema::Boolean),
        STRING => Ok(Schema::String),
        SCHEMA => Ok(Schema::SchemaOfSchema),
        ARRAY => Ok(Schema::Array(Box::new(items.cloned().ok_or_else(invalid)?))),
        OBJECT => object_from_properties(properties.ok_or_else(invalid)?).map(Schema::Object),
        other => parse_reference(other, ctx.config.reference_separator)
            .map(Schema::Reference)
            .ok_or_else(|| ValidationError::with_value("Unknown type", WireValue::Str(other.to_string()))),
    }
}

fn object_from_properties(properties: &Normalized) -> Result<ObjectSchema, ValidationError> {
    let entries = match properties {
        Normalized::Array(entries) => entries,
        _ => return Err(ValidationError::new("Invalid object schema")),
    };
    let mut fields = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.get("name").and_then(Normalized::as_str);
        let required = entry.get("required").and_then(Normalized::as_bool);
        let schema = entry.get("schema").and_then(Normalized::as_schema);
        match (name, required, schema) {
            (Some(name), Some(required), Some(schema)) => fields.push(Field {
                name: name.to_string(),
                required,
                schema: schema.clone(),
            }),
            _ => return Err(ValidationError::new("Invalid object schema")),
        }
    }
    let duplicates = duplicate_names(fields.iter().map(|f| f.name.as_str()));
    if !duplicates.is_empty() {
        return Err(ValidationError::with_value(
            "Duplicate properties",
            crate::codec::composite::names(&duplicates),
        ));
    }
    Ok(ObjectSchema::from_unique(fields))
}

fn parse_reference(name: &str, separator: char) -> Option<RefSchema> {
    let (api_name, type_name) = name.split_once(separator)?;
    if api_name.is_empty() || type_name.is_empty() {
        return None;
    }
    Some(RefSchema::new(api_name, type_name))
}

/// Render a schema back into its description form.
pub fn schema_to_description(schema: &Schema, separator: char) -> WireValue {
    let mut entries = Vec::with_capacity(2);
    match schema {
        Schema::Reference(r) => {
            entries.push(("type".to_string(), WireValue::Str(r.qualified(separator))));
        }
        Schema::Array(items) => {
            entries.push(("type".to_string(), WireValue::Str(ARRAY.to_string())));
            entries.push(("items".to_string(), schema_to_description(items, separator)));
        }
        Schema::Object(obj) => {
            entries.push(("type".to_string(), WireValue::Str(OBJECT.to_string())));
            let properties = obj
                .fields()
                .iter()
                .map(|f| {
                    WireValue::Object(vec![
                        ("name".to_string(), WireValue::Str(f.name.clone())),
                        ("required".to_string(), WireValue::Bool(f.required)),
                        ("schema".to_string(), schema_to_description(&f.schema, separator)),
                    ])
                })
                .collect();
            entries.push(("properties".to_string(), WireValue::Array(properties)));
        }
        other => {
            entries.push(("type".to_string(), WireValue::Str(other.kind().to_string())));
        }
    }
    WireValue::Object(entries)
}
