//! `wire-type` — schema-driven normalization of wire values.
//!
//! Every action payload, model property and query parameter of an API is
//! described by a [`Schema`]. Incoming [`WireValue`]s are checked against it
//! and converted into [`Normalized`] form by [`normalize`]; [`serialize`]
//! converts them back. Schemas can point at types owned by other APIs; those
//! references resolve lazily through a [`TypeRegistry`].

pub mod codec;
pub mod config;
pub mod error;
pub mod identifier;
pub mod metaschema;
pub mod namespace;
pub mod registry;
pub mod schema;
pub mod signature;
pub mod value;

// Re-export the most commonly used types at crate root
pub use codec::{normalize, schema_is_compatible, serialize, Context};
pub use config::EngineConfig;
pub use error::{DefinitionError, ErrorKind, NotDefined, PathSegment, ValidationError};
pub use metaschema::{meta_schema, normalize_schema, schema_to_description};
pub use namespace::Namespace;
pub use registry::{DescriptionSource, SourceError, StaticSource, TypeRegistry};
pub use schema::{Field, ObjectSchema, RefSchema, Schema, SchemaBuilder};
pub use signature::{ActionSpec, Arguments, Param, Signature};
pub use value::{Normalized, WireValue};
