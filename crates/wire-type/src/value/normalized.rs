//! [`Normalized`] — canonical in-memory form of a value after normalization.

use indexmap::IndexMap;

use crate::schema::Schema;

/// A value that has passed through a schema.
///
/// Text is always canonical (`Str`), never raw bytes. Values of the
/// self-describing schema type carry the parsed [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Array(Vec<Normalized>),
    Object(IndexMap<String, Normalized>),
    Schema(Box<Schema>),
}

impl Normalized {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Schema(_) => "schema",
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Normalized>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Self::Schema(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Member lookup on objects.
    pub fn get(&self, key: &str) -> Option<&Normalized> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<&str> for Normalized {
    fn from(s: &str) -> Self {
        Normalized::Str(s.to_string())
    }
}

impl From<bool> for Normalized {
    fn from(b: bool) -> Self {
        Normalized::Bool(b)
    }
}

impl From<i64> for Normalized {
    fn from(i: i64) -> Self {
        Normalized::Integer(i)
    }
}

impl From<f64> for Normalized {
    fn from(f: f64) -> Self {
        Normalized::Float(f)
    }
}

impl From<Schema> for Normalized {
    fn from(s: Schema) -> Self {
        Normalized::Schema(Box::new(s))
    }
}
