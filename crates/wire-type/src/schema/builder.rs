//! Schema builder — shorthand constructors for schema values.

use super::schema::*;
use crate::error::DefinitionError;

/// Builder for constructing schema values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBuilder;

impl SchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn any(&self) -> Schema {
        Schema::Any
    }

    pub fn int(&self) -> Schema {
        Schema::Integer
    }

    pub fn float(&self) -> Schema {
        Schema::Float
    }

    pub fn bool(&self) -> Schema {
        Schema::Boolean
    }

    pub fn str(&self) -> Schema {
        Schema::String
    }

    pub fn schema(&self) -> Schema {
        Schema::SchemaOfSchema
    }

    pub fn array(&self, items: Schema) -> Schema {
        Schema::Array(Box::new(items))
    }

    pub fn object(&self, fields: Vec<Field>) -> Result<Schema, DefinitionError> {
        ObjectSchema::new(fields).map(Schema::Object)
    }

    pub fn reference(&self, api_name: &str, type_name: &str) -> Schema {
        Schema::Reference(RefSchema::new(api_name, type_name))
    }

    pub fn required(&self, name: &str, schema: Schema) -> Field {
        Field::required(name, schema)
    }

    pub fn optional(&self, name: &str, schema: Schema) -> Field {
        Field::optional(name, schema)
    }
}
