//! Error types.
//!
//! Two families: [`ValidationError`] is raised per value and carries a path
//! stack, [`DefinitionError`] is raised once when an action, model or schema
//! is declared and should abort registration.

use std::fmt;

use thiserror::Error;

use crate::value::WireValue;

/// One step of a path into nested data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{:?}", k),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        Self::Key(k.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// Distinguishes generic validation failures from text decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Invalid,
    Decode,
}

/// A data-time failure raised while normalizing or serializing a value.
///
/// `path` is innermost-first: each enclosing frame appends its own segment
/// as the error propagates outward.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", render_parts(.path, .message, .value))]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub value: Option<WireValue>,
    pub path: Vec<PathSegment>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            message: message.into(),
            value: None,
            path: Vec::new(),
        }
    }

    /// Failure carrying the offending value.
    pub fn with_value(message: impl Into<String>, value: WireValue) -> Self {
        Self {
            value: Some(value),
            ..Self::new(message)
        }
    }

    /// Malformed byte sequence in a textual value.
    pub fn decode(message: impl Into<String>, value: WireValue) -> Self {
        Self {
            kind: ErrorKind::Decode,
            ..Self::with_value(message, value)
        }
    }

    pub fn is_decode(&self) -> bool {
        self.kind == ErrorKind::Decode
    }

    /// Push the segment of the enclosing frame.
    pub fn with_segment(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Path segments in outer-to-inner order.
    pub fn path_outer_to_inner(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Human-readable message with the path prefix and offending value.
    pub fn render(&self) -> String {
        render_parts(&self.path, &self.message, &self.value)
    }

    /// Transport form: `{"error": "<rendered>"}`.
    pub fn to_wire(&self) -> WireValue {
        WireValue::Object(vec![("error".to_string(), WireValue::Str(self.render()))])
    }
}

fn render_parts(path: &[PathSegment], message: &str, value: &Option<WireValue>) -> String {
    let mut out = String::new();
    if !path.is_empty() {
        let segments: Vec<String> = path.iter().rev().map(|s| s.to_string()).collect();
        out.push_str("Item at [");
        out.push_str(&segments.join(", "));
        out.push_str("] ");
    }
    out.push_str(message);
    if let Some(value) = value {
        out.push_str(": ");
        out.push_str(&value.to_json_string());
    }
    out
}

/// A declaration-time failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("cannot define action with variable arguments")]
    VariableArguments,
    #[error("incompatible accepts schema for {name}")]
    IncompatibleAccepts { name: String },
    #[error("{name} is said to take arguments, but doesn't")]
    TakesNoArguments { name: String },
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },
    #[error("duplicate properties in schema: {}", .0.join(", "))]
    DuplicateProperties(Vec<String>),
}

/// Lookup miss in a [`Namespace`](crate::namespace::Namespace).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {name:?} is not defined")]
pub struct NotDefined {
    pub kind: &'static str,
    pub name: String,
}
