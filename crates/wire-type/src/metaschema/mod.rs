//! Metaschema — describes schema descriptions using the schema language itself.

#[allow(clippy::module_inception)]
pub mod metaschema;

pub use metaschema::{meta_schema, normalize_schema, schema_to_description};
