use indexmap::IndexMap;

use crate::codec::composite::names;
use crate::codec::schema_is_compatible;
use crate::error::{DefinitionError, ValidationError};
use crate::schema::{Field, ObjectSchema, Schema};
use crate::value::Normalized;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Positional without a default.
    Required,
    /// Has a default value.
    Optional,
    /// Catch-all positional list.
    Variadic,
    /// Catch-all keyword map.
    KeywordVariadic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Required,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Optional,
        }
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Variadic,
        }
    }

    pub fn keyword_variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::KeywordVariadic,
        }
    }

    fn is_variadic(&self) -> bool {
        matches!(self.kind, ParamKind::Variadic | ParamKind::KeywordVariadic)
    }
}

/// Declared parameter list of a callable, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn has_variadic(&self) -> bool {
        self.params.iter().any(Param::is_variadic)
    }
}

/// Values to call a callable with.
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    None,
    /// The whole payload as the single argument.
    Positional(Normalized),
    /// Named arguments in declaration order; absent optionals are omitted.
    Keyword(IndexMap<String, Normalized>),
}

/// Implicit accepts schema of a signature.
///
/// No parameters accept nothing (`None`), one parameter accepts anything, and
/// several become an object with one field per parameter.
pub fn infer_accepts(signature: &Signature) -> Result<Option<Schema>, DefinitionError> {
    if signature.has_variadic() {
        return Err(DefinitionError::VariableArguments);
    }
    match signature.params.as_slice() {
        [] => Ok(None),
        [_] => Ok(Some(Schema::Any)),
        params => {
            let fields = params
                .iter()
                .map(|p| Field {
                    name: p.name.clone(),
                    required: p.kind == ParamKind::Required,
                    schema: Schema::Any,
                })
                .collect();
            ObjectSchema::new(fields).map(|o| Some(Schema::Object(o)))
        }
    }
}

/// Effective accepts schema for a callable named `name`.
///
/// An explicit schema must match the inferred shape, and may not be given at
/// all when the callable takes no parameters.
pub fn check_accepts(
    name: &str,
    signature: &Signature,
    explicit: Option<&Schema>,
) -> Result<Option<Schema>, DefinitionError> {
    match (infer_accepts(signature)?, explicit) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(DefinitionError::TakesNoArguments {
            name: name.to_string(),
        }),
        (Some(inferred), None) => Ok(Some(inferred)),
        (Some(inferred), Some(explicit)) => {
            if schema_is_compatible(&inferred, explicit) {
                Ok(Some(explicit.clone()))
            } else {
                Err(DefinitionError::IncompatibleAccepts {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// Spread a normalized payload over the parameters of `signature`.
pub fn bind_arguments(signature: &Signature, payload: Option<Normalized>) -> Result<Arguments, ValidationError> {
    if signature.has_variadic() {
        return Err(ValidationError::new(DefinitionError::VariableArguments.to_string()));
    }
    match (signature.params.as_slice(), payload) {
        ([], None) => Ok(Arguments::None),
        ([], Some(_)) => Err(ValidationError::new("Expected no arguments")),
        ([_], Some(value)) => Ok(Arguments::Positional(value)),
        ([param], None) if param.kind == ParamKind::Optional => Ok(Arguments::None),
        ([param], None) => Err(ValidationError::with_value(
            "Missing arguments",
            names(std::slice::from_ref(&param.name)),
        )),
        (params, payload) => {
            let mut given = match payload {
                None => IndexMap::new(),
                Some(Normalized::Object(map)) => map,
                Some(_) => return Err(ValidationError::new("Invalid arguments")),
            };
            let missing: Vec<String> = params
                .iter()
                .filter(|p| p.kind == ParamKind::Required && !given.contains_key(&p.name))
                .map(|p| p.name.clone())
                .collect();
            if !missing.is_empty() {
                return Err(ValidationError::with_value("Missing arguments", names(&missing)));
            }
            let mut bound = IndexMap::with_capacity(params.len());
            for param in params {
                if let Some(value) = given.shift_remove(&param.name) {
                    bound.insert(param.name.clone(), value);
                }
            }
            if !given.is_empty() {
                let unknown: Vec<String> = given.keys().cloned().collect();
                return Err(ValidationError::with_value("Unknown arguments", names(&unknown)));
            }
            Ok(Arguments::Keyword(bound))
        }
    }
}
