//! Type registry — process-wide table of cross-API type references.
//!
//! A reference `<api>.<type>` is resolved by fetching the API's description
//! through a [`DescriptionSource`], picking the named model out of it and
//! normalizing that model's schema description. Both the fetched description
//! and the resolved schema are cached for the registry's lifetime.

pub mod description;
#[allow(clippy::module_inception)]
pub mod registry;
pub mod source;

pub use description::{description_schema, ActionDescription, ApiDescription};
pub use registry::TypeRegistry;
pub use source::{DescriptionSource, SourceError, StaticSource};
