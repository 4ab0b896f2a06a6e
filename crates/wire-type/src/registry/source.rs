//! Where API descriptions come from.

use std::collections::HashMap;

use thiserror::Error;

use crate::value::WireValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("API not found: {0}")]
    NotFound(String),
    #[error("failed to fetch API description: {0}")]
    Failed(String),
}

/// Loader collaborator: produces the description of a named API.
///
/// Implementations may block (network, disk); the registry calls them at most
/// once per API name that resolves successfully.
pub trait DescriptionSource: Send + Sync {
    fn fetch_description(&self, api_name: &str) -> Result<WireValue, SourceError>;
}

/// In-memory source backed by a map of descriptions.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    descriptions: HashMap<String, WireValue>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, api_name: impl Into<String>, description: impl Into<WireValue>) -> Self {
        self.insert(api_name, description);
        self
    }

    pub fn insert(&mut self, api_name: impl Into<String>, description: impl Into<WireValue>) {
        self.descriptions.insert(api_name.into(), description.into());
    }
}

impl DescriptionSource for StaticSource {
    fn fetch_description(&self, api_name: &str) -> Result<WireValue, SourceError> {
        self.descriptions
            .get(api_name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(api_name.to_string()))
    }
}
