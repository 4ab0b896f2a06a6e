//! Callable signatures: inferring an accepts schema from declared
//! parameters, and binding normalized payloads back onto them.

pub mod action;
#[allow(clippy::module_inception)]
pub mod signature;

pub use action::ActionSpec;
pub use signature::{bind_arguments, check_accepts, infer_accepts, Arguments, Param, ParamKind, Signature};
