//! Type definitions for context facts

pub mod schema;
pub mod value;

pub use schema::{FieldType, Schema};
pub use value::Value;
