//! Value types: raw wire trees and their normalized counterparts.

pub mod normalized;
pub mod wire_value;

pub use normalized::Normalized;
pub use wire_value::WireValue;
