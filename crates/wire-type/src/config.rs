//! Engine configuration.

use serde::Deserialize;

/// Tunables shared by every normalize/serialize call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Splits `<api>.<type>` reference names in schema descriptions.
    pub reference_separator: char,
    /// Deepest nesting normalize/serialize will descend into.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_separator: '.',
            max_depth: 64,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
