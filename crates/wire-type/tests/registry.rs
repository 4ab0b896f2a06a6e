//! Integration tests for cross-API reference resolution.

use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use wire_type::{
    normalize, serialize, DescriptionSource, EngineConfig, Normalized, PathSegment, SchemaBuilder,
    SourceError, StaticSource, TypeRegistry, WireValue,
};

/// Wraps a source, counting fetches per API and optionally stalling each one.
struct CountingSource {
    inner: Mutex<StaticSource>,
    fetches: Mutex<HashMap<String, usize>>,
    delay: Duration,
}

impl CountingSource {
    fn new(inner: StaticSource, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(inner),
            fetches: Mutex::new(HashMap::new()),
            delay,
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.lock().values().sum()
    }

    fn fetches_of(&self, api_name: &str) -> usize {
        self.fetches.lock().get(api_name).copied().unwrap_or(0)
    }
}

impl DescriptionSource for CountingSource {
    fn fetch_description(&self, api_name: &str) -> Result<WireValue, SourceError> {
        *self.fetches.lock().entry(api_name.to_string()).or_default() += 1;
        thread::sleep(self.delay);
        self.inner.lock().fetch_description(api_name)
    }
}

fn weather_description() -> WireValue {
    WireValue::from(json!({
        "name": "weather",
        "models": [
            {"name": "City", "schema": {"type": "object", "properties": [
                {"name": "name", "required": true, "schema": {"type": "string"}},
                {"name": "country", "required": false, "schema": {"type": "geo.Country"}}
            ]}},
            {"name": "Town", "schema": {"type": "weather.City"}}
        ],
        "actions": [
            {"name": "forecast", "accepts": {"type": "weather.City"}, "returns": {"type": "float"}}
        ]
    }))
}

fn geo_description() -> WireValue {
    WireValue::from(json!({
        "name": "geo",
        "models": [
            {"name": "Country", "schema": {"type": "object", "properties": [
                {"name": "code", "required": true, "schema": {"type": "string"}}
            ]}}
        ]
    }))
}

fn sources() -> StaticSource {
    StaticSource::new()
        .with("weather", weather_description())
        .with("geo", geo_description())
}

#[test]
fn concurrent_resolution_fetches_once() {
    let source = CountingSource::new(sources(), Duration::from_millis(50));
    let registry = TypeRegistry::new(source.clone(), EngineConfig::default());
    let barrier = Barrier::new(2);

    let (a, b) = thread::scope(|s| {
        let first = s.spawn(|| {
            barrier.wait();
            registry.resolve("weather", "City")
        });
        let second = s.spawn(|| {
            barrier.wait();
            registry.resolve("weather", "City")
        });
        (first.join().unwrap(), second.join().unwrap())
    });

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(source.fetches_of("weather"), 1);
    assert_eq!(source.fetches_of("geo"), 1);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn concurrent_types_of_one_api_share_a_fetch() {
    let source = CountingSource::new(sources(), Duration::from_millis(50));
    let registry = TypeRegistry::new(source.clone(), EngineConfig::default());
    let barrier = Barrier::new(2);

    let (city, town) = thread::scope(|s| {
        let first = s.spawn(|| {
            barrier.wait();
            registry.resolve("weather", "City")
        });
        let second = s.spawn(|| {
            barrier.wait();
            registry.resolve("weather", "Town")
        });
        (first.join().unwrap(), second.join().unwrap())
    });

    assert_eq!(*city.unwrap(), *town.unwrap());
    assert_eq!(source.fetches_of("weather"), 1);
    assert_eq!(source.fetches_of("geo"), 1);
    assert_eq!(registry.cached_types().len(), 2);
}

#[test]
fn one_fetch_per_api_across_types() {
    let source = CountingSource::new(sources(), Duration::ZERO);
    let registry = TypeRegistry::new(source.clone(), EngineConfig::default());
    registry.resolve("weather", "City").unwrap();
    registry.describe("weather").unwrap();
    registry.resolve("geo", "Country").unwrap();
    registry.resolve("geo", "Country").unwrap();
    assert_eq!(source.fetches(), 2);
}

#[test]
fn nested_references_resolve_on_demand() {
    let source = CountingSource::new(sources(), Duration::ZERO);
    let registry = TypeRegistry::new(source.clone(), EngineConfig::default());
    let ctx = registry.context();
    let schema = SchemaBuilder::new().reference("weather", "City");

    let n = normalize(&schema, &WireValue::from(json!({"name": "Oslo"})), &ctx).unwrap();
    assert_eq!(n.get("name"), Some(&Normalized::Str("Oslo".into())));
    // geo is checked, but its type is not cached until a country shows up
    assert_eq!(source.fetches(), 2);
    let cached: Vec<String> = registry.cached_types().iter().map(|(k, _)| k.qualified('.')).collect();
    assert_eq!(cached, vec!["weather.City"]);

    let input = WireValue::from(json!({"name": "Oslo", "country": {"code": "NO"}}));
    let n = normalize(&schema, &input, &ctx).unwrap();
    assert_eq!(source.fetches(), 2);
    let cached: Vec<String> = registry.cached_types().iter().map(|(k, _)| k.qualified('.')).collect();
    assert_eq!(cached, vec!["weather.City", "geo.Country"]);
    assert_eq!(serialize(&schema, &n, &ctx).unwrap(), input);

    let err = normalize(&schema, &WireValue::from(json!({"name": "Oslo", "country": {}})), &ctx).unwrap_err();
    assert_eq!(err.message, "Missing properties");
    assert_eq!(err.path, vec![PathSegment::Key("country".into())]);
}

#[test]
fn failed_resolution_is_retried() {
    let source = CountingSource::new(StaticSource::new(), Duration::ZERO);
    let registry = TypeRegistry::new(source.clone(), EngineConfig::default());

    assert_eq!(registry.resolve("weather", "City").unwrap_err().message, "Unknown API");
    assert_eq!(registry.resolve("weather", "City").unwrap_err().message, "Unknown API");
    assert_eq!(source.fetches(), 2);

    source.inner.lock().insert("weather", weather_description());
    let err = registry.resolve("weather", "City").unwrap_err();
    assert_eq!(err.message, "Unknown API");
    assert_eq!(err.value, Some(WireValue::Str("geo".into())));
    assert_eq!(source.fetches_of("weather"), 3);
    assert_eq!(source.fetches_of("geo"), 1);

    source.inner.lock().insert("geo", geo_description());
    assert!(registry.resolve("weather", "City").is_ok());
    assert_eq!(source.fetches_of("weather"), 3);
    assert_eq!(source.fetches_of("geo"), 2);
    assert!(registry.resolve("weather", "City").is_ok());
    assert_eq!(source.fetches(), 5);
}

#[test]
fn described_actions_carry_schemas() {
    let registry = TypeRegistry::new(Arc::new(sources()), EngineConfig::default());
    let api = registry.describe("weather").unwrap();
    let forecast = api.actions.get("forecast").unwrap();
    assert_eq!(forecast.accepts, Some(SchemaBuilder::new().reference("weather", "City")));
    assert!(api.actions.get("history").is_err());
}
