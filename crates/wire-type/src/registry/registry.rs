use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::description::ApiDescription;
use super::source::{DescriptionSource, SourceError};
use crate::codec::Context;
use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::metaschema::normalize_schema;
use crate::schema::{RefSchema, Schema};
use crate::value::WireValue;

/// A cache cell filled at most once; empty after a failed attempt.
type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

/// Memoizing resolver for cross-API type references.
///
/// Each key has its own slot lock, so the check-then-fetch-and-insert step
/// runs once per key while unrelated keys resolve in parallel. Failures are
/// not cached: the next lookup fetches again.
pub struct TypeRegistry {
    source: Arc<dyn DescriptionSource>,
    config: EngineConfig,
    apis: Mutex<HashMap<String, Slot<ApiDescription>>>,
    types: Mutex<IndexMap<RefSchema, Slot<Schema>>>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("config", &self.config)
            .field("apis", &self.apis.lock().len())
            .field("types", &self.types.lock().len())
            .finish()
    }
}

impl TypeRegistry {
    pub fn new(source: Arc<dyn DescriptionSource>, config: EngineConfig) -> Self {
        Self {
            source,
            config,
            apis: Mutex::new(HashMap::new()),
            types: Mutex::new(IndexMap::new()),
        }
    }

    fn api_slot(&self, api_name: &str) -> Slot<ApiDescription> {
        self.apis.lock().entry(api_name.to_string()).or_default().clone()
    }

    fn type_slot(&self, key: &RefSchema) -> Slot<Schema> {
        self.types.lock().entry(key.clone()).or_default().clone()
    }

    /// Context bound to this registry.
    pub fn context(&self) -> Context<'_> {
        Context::new(&self.config).with_registry(self)
    }

    /// Description of `api_name`, fetched on first use.
    pub fn describe(&self, api_name: &str) -> Result<Arc<ApiDescription>, ValidationError> {
        let cell = self.api_slot(api_name);
        let result = self.describe_into(api_name, &cell);
        if result.is_err() {
            let mut apis = self.apis.lock();
            if apis.get(api_name).is_some_and(|c| Arc::ptr_eq(c, &cell) && is_vacant(c)) {
                apis.remove(api_name);
            }
        }
        result
    }

    fn describe_into(&self, api_name: &str, cell: &Slot<ApiDescription>) -> Result<Arc<ApiDescription>, ValidationError> {
        let mut guard = cell.lock();
        if let Some(description) = guard.as_ref() {
            return Ok(description.clone());
        }

        debug!(api = %api_name, "fetching API description");
        let raw = self.source.fetch_description(api_name).map_err(|e| {
            match &e {
                SourceError::NotFound(_) => warn!(api = %api_name, "API not found"),
                SourceError::Failed(reason) => warn!(api = %api_name, %reason, "API fetch failed"),
            }
            ValidationError::with_value("Unknown API", WireValue::Str(api_name.to_string()))
        })?;
        let description = ApiDescription::from_wire(&raw, &Context::new(&self.config)).map_err(|e| {
            warn!(api = %api_name, error = %e, "invalid API description");
            e
        })?;

        let description = Arc::new(description);
        *guard = Some(description.clone());
        info!(
            api = %api_name,
            models = description.models.len(),
            actions = description.actions.len(),
            "API description cached"
        );
        Ok(description)
    }

    /// Resolve `<api_name>.<type_name>` to a schema that is not itself a reference.
    ///
    /// Nested references inside the result must name existing models, but stay
    /// unresolved and go through the registry again when data reaches them.
    pub fn resolve(&self, api_name: &str, type_name: &str) -> Result<Arc<Schema>, ValidationError> {
        let key = RefSchema::new(api_name, type_name);
        let cell = self.type_slot(&key);
        let result = self.resolve_into(&key, &cell);
        if result.is_err() {
            let mut types = self.types.lock();
            if types.get(&key).is_some_and(|c| Arc::ptr_eq(c, &cell) && is_vacant(c)) {
                types.shift_remove(&key);
            }
        }
        result
    }

    fn resolve_into(&self, key: &RefSchema, cell: &Slot<Schema>) -> Result<Arc<Schema>, ValidationError> {
        let mut guard = cell.lock();
        if let Some(schema) = guard.as_ref() {
            debug!(api = %key.api_name, ty = %key.type_name, "type cache hit");
            return Ok(schema.clone());
        }

        let (schema, chain) = self.follow(key)?;
        self.check_nested(&schema, chain)?;
        let schema = Arc::new(schema);
        *guard = Some(schema.clone());
        info!(api = %key.api_name, ty = %key.type_name, kind = schema.kind(), "type resolved");
        Ok(schema)
    }

    /// Model named by `key`, checked against the meta schema.
    fn model(&self, key: &RefSchema) -> Result<Schema, ValidationError> {
        let description = self.describe(&key.api_name)?;
        let raw = description.models.get(&key.type_name).map_err(|_| {
            warn!(api = %key.api_name, ty = %key.type_name, "model not found");
            ValidationError::with_value(
                format!("Unknown model for {} API", key.api_name),
                WireValue::Str(key.type_name.clone()),
            )
        })?;
        normalize_schema(raw, &Context::new(&self.config))
    }

    /// Follow alias chains from `key` to a concrete schema. Returns the schema
    /// and every key visited on the way.
    ///
    /// Only API description slots are locked here, never another type slot, so
    /// concurrent resolutions cannot deadlock on each other.
    fn follow(&self, key: &RefSchema) -> Result<(Schema, Vec<RefSchema>), ValidationError> {
        let separator = self.config.reference_separator;
        let mut chain: Vec<RefSchema> = Vec::new();
        let mut current = key.clone();
        loop {
            if chain.contains(&current) {
                warn!(ty = %current.qualified(separator), "circular type reference");
                return Err(ValidationError::with_value(
                    "Circular reference",
                    WireValue::Str(current.qualified(separator)),
                ));
            }
            let schema = self.model(&current)?;
            chain.push(current);
            match schema {
                Schema::Reference(next) => current = next,
                concrete => return Ok((concrete, chain)),
            }
        }
    }

    /// Check that every reference reachable from `schema` names an existing
    /// model. Reference nodes stay in place; keys in `seen` are skipped, which
    /// lets recursive types through.
    fn check_nested(&self, schema: &Schema, seen: Vec<RefSchema>) -> Result<(), ValidationError> {
        let mut seen: HashSet<RefSchema> = seen.into_iter().collect();
        let mut pending = Vec::new();
        collect_references(schema, &mut pending);
        while let Some(next) = pending.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            let nested = self.model(&next)?;
            collect_references(&nested, &mut pending);
        }
        Ok(())
    }

    /// Resolved entries in first-lookup order. Waits for keys that are being
    /// resolved by another thread.
    pub fn cached_types(&self) -> Vec<(RefSchema, Arc<Schema>)> {
        let slots: Vec<(RefSchema, Slot<Schema>)> = self
            .types
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        slots
            .into_iter()
            .filter_map(|(key, cell)| {
                let schema = cell.lock().clone()?;
                Some((key, schema))
            })
            .collect()
    }
}

/// Empty and not held by a resolution in progress.
fn is_vacant<T>(cell: &Slot<T>) -> bool {
    cell.try_lock().is_some_and(|guard| guard.is_none())
}

fn collect_references(schema: &Schema, out: &mut Vec<RefSchema>) {
    match schema {
        Schema::Reference(r) => out.push(r.clone()),
        Schema::Array(items) => collect_references(items, out),
        Schema::Object(obj) => {
            for field in obj.fields() {
                collect_references(&field.schema, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::source::StaticSource;
    use serde_json::json;

    fn registry(source: StaticSource) -> TypeRegistry {
        TypeRegistry::new(Arc::new(source), EngineConfig::default())
    }

    fn weather() -> StaticSource {
        StaticSource::new().with(
            "weather",
            WireValue::from(json!({
                "name": "weather",
                "models": [
                    {"name": "City", "schema": {"type": "object", "properties": [
                        {"name": "name", "required": true, "schema": {"type": "string"}}
                    ]}},
                    {"name": "Town", "schema": {"type": "weather.City"}},
                    {"name": "A", "schema": {"type": "weather.B"}},
                    {"name": "B", "schema": {"type": "weather.A"}},
                    {"name": "Broken", "schema": {"type": "array"}},
                    {"name": "Node", "schema": {"type": "object", "properties": [
                        {"name": "next", "required": false, "schema": {"type": "weather.Node"}}
                    ]}},
                    {"name": "Dangling", "schema": {"type": "object", "properties": [
                        {"name": "country", "required": false, "schema": {"type": "nope.Country"}}
                    ]}},
                    {"name": "Lost", "schema": {"type": "array", "items": {"type": "weather.Missing"}}}
                ]
            })),
        )
    }

    #[test]
    fn resolves_and_caches() {
        let r = registry(weather());
        let a = r.resolve("weather", "City").unwrap();
        let b = r.resolve("weather", "City").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.kind(), "object");
    }

    #[test]
    fn unknown_api_and_model() {
        let r = registry(weather());
        assert_eq!(r.resolve("traffic", "Road").unwrap_err().message, "Unknown API");
        let err = r.resolve("weather", "Road").unwrap_err();
        assert_eq!(err.message, "Unknown model for weather API");
        assert_eq!(err.value, Some(WireValue::Str("Road".into())));
    }

    #[test]
    fn alias_chains_are_followed() {
        let r = registry(weather());
        let town = r.resolve("weather", "Town").unwrap();
        let city = r.resolve("weather", "City").unwrap();
        assert_eq!(*town, *city);
    }

    #[test]
    fn circular_aliases_fail() {
        let r = registry(weather());
        assert_eq!(r.resolve("weather", "A").unwrap_err().message, "Circular reference");
    }

    #[test]
    fn invalid_model_schema_surfaces() {
        let r = registry(weather());
        assert_eq!(r.resolve("weather", "Broken").unwrap_err().message, "Invalid array schema");
        assert!(r.cached_types().is_empty());
    }

    #[test]
    fn nested_reference_to_unknown_api_fails() {
        let r = registry(weather());
        let err = r.resolve("weather", "Dangling").unwrap_err();
        assert_eq!(err.message, "Unknown API");
        assert_eq!(err.value, Some(WireValue::Str("nope".into())));
        assert!(r.cached_types().is_empty());
    }

    #[test]
    fn nested_reference_to_unknown_model_fails() {
        let r = registry(weather());
        let err = r.resolve("weather", "Lost").unwrap_err();
        assert_eq!(err.message, "Unknown model for weather API");
        assert_eq!(err.value, Some(WireValue::Str("Missing".into())));
    }

    #[test]
    fn recursive_types_resolve() {
        let r = registry(weather());
        let node = r.resolve("weather", "Node").unwrap();
        let next = node.as_object().and_then(|o| o.field("next")).unwrap();
        assert_eq!(next.schema, Schema::Reference(RefSchema::new("weather", "Node")));
    }

    #[test]
    fn failed_lookups_leave_no_slots() {
        let r = registry(weather());
        r.resolve("traffic", "Road").unwrap_err();
        r.resolve("weather", "Dangling").unwrap_err();
        assert!(r.types.lock().is_empty());
        assert!(!r.apis.lock().contains_key("traffic"));
        assert!(!r.apis.lock().contains_key("nope"));
        assert!(r.apis.lock().contains_key("weather"));
    }

    #[test]
    fn cached_types_in_lookup_order() {
        let r = registry(weather());
        r.resolve("weather", "Town").unwrap();
        r.resolve("weather", "City").unwrap();
        let keys: Vec<String> = r.cached_types().iter().map(|(k, _)| k.qualified('.')).collect();
        assert_eq!(keys, vec!["weather.Town", "weather.City"]);
    }
}
