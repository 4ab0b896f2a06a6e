//! Insertion-ordered table of named entries (actions, models).

use indexmap::IndexMap;

use crate::error::{DefinitionError, NotDefined};

/// Name → entry map with typed lookup misses.
///
/// `kind` names what the entries are ("action", "model") for error messages.
#[derive(Debug, Clone)]
pub struct Namespace<T> {
    kind: &'static str,
    entries: IndexMap<String, T>,
}

impl<T> Namespace<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Add an entry. Names are unique within a namespace.
    pub fn insert(&mut self, name: impl Into<String>, entry: T) -> Result<(), DefinitionError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(DefinitionError::DuplicateName {
                kind: self.kind,
                name,
            });
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&T, NotDefined> {
        self.entries.get(name).ok_or_else(|| NotDefined {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
