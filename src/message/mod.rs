//! Dynamic message model
//!
//! This module provides the schema-carrying record container: a message
//! names an insertion-ordered sequence of typed, named fields.

mod field;
#[allow(clippy::module_inception)]
mod message;
mod types;

pub use field::Field;
pub use message::DynMessage;
pub use types::{FieldType, Value};
