//! Normalize/serialize pipeline.
//!
//! [`normalize`] checks a wire value against a schema and converts it to
//! [`Normalized`] form; [`serialize`] goes the other way. Both are pure apart
//! from lazy type registry population when a schema node is a reference.

pub mod compat;
pub mod composite;
pub mod primitive;

pub use compat::schema_is_compatible;
pub use composite::{diff_keys, KeyDiff};

use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::metaschema::{normalize_schema, schema_to_description};
use crate::registry::TypeRegistry;
use crate::schema::{RefSchema, Schema};
use crate::value::{Normalized, WireValue};

/// Per-call state threaded through normalization.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a EngineConfig,
    pub registry: Option<&'a TypeRegistry>,
    depth: usize,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            registry: None,
            depth: 0,
        }
    }

    pub fn with_registry(self, registry: &'a TypeRegistry) -> Self {
        Self {
            registry: Some(registry),
            ..self
        }
    }

    /// Context for one nesting level down.
    pub(crate) fn descend(&self) -> Result<Self, ValidationError> {
        if self.depth >= self.config.max_depth {
            return Err(ValidationError::new("Maximum nesting depth exceeded"));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    pub(crate) fn resolve(&self, reference: &RefSchema) -> Result<std::sync::Arc<Schema>, ValidationError> {
        match self.registry {
            Some(registry) => registry.resolve(&reference.api_name, &reference.type_name),
            None => Err(ValidationError::with_value(
                "Unknown API",
                WireValue::Str(reference.api_name.clone()),
            )),
        }
    }
}

/// Validate `value` against `schema` and convert it to canonical form.
pub fn normalize(schema: &Schema, value: &WireValue, ctx: &Context<'_>) -> Result<Normalized, ValidationError> {
    match schema {
        Schema::Any => primitive::normalize_any(value, ctx),
        Schema::Integer => primitive::normalize_integer(value),
        Schema::Float => primitive::normalize_float(value),
        Schema::Boolean => primitive::normalize_boolean(value),
        Schema::String => primitive::normalize_string(value),
        Schema::Array(items) => composite::normalize_array(items, value, ctx),
        Schema::Object(obj) => composite::normalize_object(obj, value, ctx),
        Schema::SchemaOfSchema => {
            normalize_schema(value, &ctx.descend()?).map(|s| Normalized::Schema(Box::new(s)))
        }
        Schema::Reference(r) => {
            let resolved = ctx.resolve(r)?;
            normalize(&resolved, value, &ctx.descend()?)
        }
    }
}

/// Convert a normalized value back to its wire form.
pub fn serialize(schema: &Schema, value: &Normalized, ctx: &Context<'_>) -> Result<WireValue, ValidationError> {
    match schema {
        Schema::Any => primitive::serialize_any(value, ctx),
        Schema::Integer | Schema::Float | Schema::Boolean | Schema::String => {
            primitive::serialize_primitive(schema, value, ctx)
        }
        Schema::Array(items) => composite::serialize_array(items, value, ctx),
        Schema::Object(obj) => composite::serialize_object(obj, value, ctx),
        Schema::SchemaOfSchema => match value {
            Normalized::Schema(s) => Ok(schema_to_description(s, ctx.config.reference_separator)),
            other => Err(ValidationError::new(format!("Invalid schema: {}", other.kind()))),
        },
        Schema::Reference(r) => {
            let resolved = ctx.resolve(r)?;
            serialize(&resolved, value, &ctx.descend()?)
        }
    }
}
