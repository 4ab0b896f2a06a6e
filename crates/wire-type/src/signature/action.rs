//! Action definitions: a named callable with its wire schemas.

use super::signature::{bind_arguments, check_accepts, Arguments, Signature};
use crate::codec::{normalize, serialize, Context};
use crate::error::{DefinitionError, ValidationError};
use crate::identifier::validate_identifier;
use crate::schema::Schema;
use crate::value::{Normalized, WireValue};

#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    pub name: String,
    pub signature: Signature,
    /// Effective schema for the call payload; `None` means no payload.
    pub accepts: Option<Schema>,
    /// Schema of the result; `None` means the action returns nothing.
    pub returns: Option<Schema>,
}

impl ActionSpec {
    /// Declare an action, checking its name and its accepts schema against
    /// the signature.
    pub fn define(
        name: &str,
        signature: Signature,
        accepts: Option<Schema>,
        returns: Option<Schema>,
    ) -> Result<Self, DefinitionError> {
        validate_identifier(name)?;
        let accepts = check_accepts(name, &signature, accepts.as_ref())?;
        Ok(Self {
            name: name.to_string(),
            signature,
            accepts,
            returns,
        })
    }

    /// Normalize an incoming payload and bind it to the parameters.
    pub fn normalize_call(&self, payload: Option<&WireValue>, ctx: &Context<'_>) -> Result<Arguments, ValidationError> {
        let normalized = match (&self.accepts, payload) {
            (Some(schema), Some(value)) => Some(normalize(schema, value, ctx)?),
            (None, Some(_)) => return Err(ValidationError::new("Expected no arguments")),
            (_, None) => None,
        };
        bind_arguments(&self.signature, normalized)
    }

    /// Serialize a result for the wire.
    pub fn serialize_result(&self, result: Option<&Normalized>, ctx: &Context<'_>) -> Result<Option<WireValue>, ValidationError> {
        match (&self.returns, result) {
            (Some(schema), Some(value)) => serialize(schema, value, ctx).map(Some),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ValidationError::new("Missing return value")),
            (None, Some(_)) => Err(ValidationError::new("Unexpected return value")),
        }
    }
}
