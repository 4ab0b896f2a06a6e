//! Normalized form of a fetched API description.

use std::sync::OnceLock;

use crate::codec::{normalize, Context};
use crate::error::ValidationError;
use crate::identifier::is_identifier;
use crate::namespace::Namespace;
use crate::schema::{Field, ObjectSchema, Schema};
use crate::value::{Normalized, WireValue};

/// Declared input/output schemas of a remote action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescription {
    pub accepts: Option<Schema>,
    pub returns: Option<Schema>,
}

/// An API's name, its models and its actions.
///
/// Model schemas are kept as raw descriptions; the registry normalizes one
/// only when a reference to it is first resolved.
#[derive(Debug, Clone)]
pub struct ApiDescription {
    pub name: String,
    pub models: Namespace<WireValue>,
    pub actions: Namespace<ActionDescription>,
}

fn object(fields: Vec<Field>) -> Schema {
    Schema::Object(ObjectSchema::from_unique(fields))
}

/// Shape of an API description document.
pub fn description_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let model = object(vec![
            Field::required("name", Schema::String),
            Field::required("schema", Schema::Any),
        ]);
        let action = object(vec![
            Field::required("name", Schema::String),
            Field::optional("accepts", Schema::SchemaOfSchema),
            Field::optional("returns", Schema::SchemaOfSchema),
        ]);
        object(vec![
            Field::required("name", Schema::String),
            Field::optional("models", Schema::Array(Box::new(model))),
            Field::optional("actions", Schema::Array(Box::new(action))),
        ])
    })
}

fn entries<'v>(value: Option<&'v WireValue>) -> &'v [WireValue] {
    match value {
        Some(WireValue::Array(items)) => items,
        _ => &[],
    }
}

fn checked_name<'v>(entry: &'v Normalized, index: usize, list: &str) -> Result<&'v str, ValidationError> {
    let name = entry.get("name").and_then(Normalized::as_str).unwrap_or_default();
    if !is_identifier(name) {
        return Err(ValidationError::with_value("Invalid identifier", WireValue::Str(name.to_string()))
            .with_segment("name")
            .with_segment(index)
            .with_segment(list));
    }
    Ok(name)
}

fn duplicate(kind: &str, name: &str, index: usize, list: &str) -> ValidationError {
    ValidationError::with_value(format!("Duplicate {} name", kind), WireValue::Str(name.to_string()))
        .with_segment(index)
        .with_segment(list)
}

impl ApiDescription {
    pub fn from_wire(value: &WireValue, ctx: &Context<'_>) -> Result<Self, ValidationError> {
        let checked = normalize(description_schema(), value, ctx)?;
        let name = checked
            .get("name")
            .and_then(Normalized::as_str)
            .unwrap_or_default()
            .to_string();

        let mut models = Namespace::new("model");
        let raw_models = entries(value.get("models"));
        if let Some(Normalized::Array(list)) = checked.get("models") {
            for (i, (entry, raw)) in list.iter().zip(raw_models).enumerate() {
                let model_name = checked_name(entry, i, "models")?;
                let schema = raw.get("schema").cloned().unwrap_or(WireValue::Null);
                models
                    .insert(model_name, schema)
                    .map_err(|_| duplicate("model", model_name, i, "models"))?;
            }
        }

        let mut actions = Namespace::new("action");
        if let Some(Normalized::Array(list)) = checked.get("actions") {
            for (i, entry) in list.iter().enumerate() {
                let action_name = checked_name(entry, i, "actions")?;
                let action = ActionDescription {
                    accepts: entry.get("accepts").and_then(Normalized::as_schema).cloned(),
                    returns: entry.get("returns").and_then(Normalized::as_schema).cloned(),
                };
                actions
                    .insert(action_name, action)
                    .map_err(|_| duplicate("action", action_name, i, "actions"))?;
            }
        }

        Ok(Self { name, models, actions })
    }
}
