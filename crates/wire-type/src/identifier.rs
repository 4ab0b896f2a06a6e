//! Identifier rule for action and model names.

use std::sync::OnceLock;

use crate::error::DefinitionError;

fn identifier_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[a-zA-Z0-9_]+$").unwrap())
}

/// Identifiers are `[a-zA-Z0-9_]+`, do not start or end with `_` and do not
/// contain `__`.
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
        && !name.starts_with('_')
        && !name.ends_with('_')
        && !name.contains("__")
}

pub fn validate_identifier(name: &str) -> Result<(), DefinitionError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidIdentifier(name.to_string()))
    }
}
