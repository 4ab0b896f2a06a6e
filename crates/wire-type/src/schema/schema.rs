use std::collections::HashSet;

use crate::error::DefinitionError;

/// Primitive kind names as they appear in schema descriptions.
pub const ANY: &str = "any";
pub const INTEGER: &str = "integer";
pub const FLOAT: &str = "float";
pub const BOOLEAN: &str = "boolean";
pub const STRING: &str = "string";
pub const ARRAY: &str = "array";
pub const OBJECT: &str = "object";
pub const SCHEMA: &str = "schema";

/// A single property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub required: bool,
    pub schema: Schema,
}

impl Field {
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            required: true,
            schema,
        }
    }

    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            required: false,
            schema,
        }
    }
}

/// Ordered, duplicate-free property list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    /// Build an object schema, rejecting repeated property names.
    pub fn new(fields: Vec<Field>) -> Result<Self, DefinitionError> {
        let duplicates = duplicate_names(fields.iter().map(|f| f.name.as_str()));
        if !duplicates.is_empty() {
            return Err(DefinitionError::DuplicateProperties(duplicates));
        }
        Ok(Self { fields })
    }

    /// Caller guarantees the names are already unique.
    pub(crate) fn from_unique(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Names that occur more than once, each reported once, in first-seen order.
pub fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for name in names {
        if !seen.insert(name) && !duplicates.iter().any(|d| d == name) {
            duplicates.push(name.to_string());
        }
    }
    duplicates
}

/// Pointer to a type defined by another API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefSchema {
    pub api_name: String,
    pub type_name: String,
}

impl RefSchema {
    pub fn new(api_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            type_name: type_name.into(),
        }
    }

    /// Fully qualified `<api>.<type>` name.
    pub fn qualified(&self, separator: char) -> String {
        format!("{}{}{}", self.api_name, separator, self.type_name)
    }
}

/// The unified Schema enum covering all schema kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Any,
    Integer,
    Float,
    Boolean,
    String,
    Array(Box<Schema>),
    Object(ObjectSchema),
    /// Instances are themselves schemas.
    SchemaOfSchema,
    /// Resolved lazily through the type registry.
    Reference(RefSchema),
}

impl Schema {
    /// Returns the "type" string identifier for this schema node.
    ///
    /// References have no fixed kind name; they render by qualified name in
    /// descriptions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Any => ANY,
            Self::Integer => INTEGER,
            Self::Float => FLOAT,
            Self::Boolean => BOOLEAN,
            Self::String => STRING,
            Self::Array(_) => ARRAY,
            Self::Object(_) => OBJECT,
            Self::SchemaOfSchema => SCHEMA,
            Self::Reference(_) => "reference",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference(r) => write!(f, "{}", r.qualified('.')),
            other => f.write_str(other.kind()),
        }
    }
}
