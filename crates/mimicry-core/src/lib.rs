//! Core contracts for Mimicry.
//!
//! This crate defines the schema facts consumed by the value-synthesis engine
//! and the consistency checks shared by the engine and the CLI.

pub mod error;
pub mod schema;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use schema::SchemaNode;
pub use types::SchemaType;
pub use validation::{compile_pattern, strip_negative_lookahead, validate_schema_node};
