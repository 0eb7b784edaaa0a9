//! Schema-constrained value synthesis for Mimicry.
//!
//! Given a [`SchemaNode`](mimicry_core::SchemaNode) and a stack of context
//! namespaces, the engine produces one concrete value per field: realistic data
//! from the caller's contexts where possible, format-aware fakes otherwise, and
//! always repaired against the node's declared constraints.

pub mod chain;
pub mod config;
pub mod constraints;
pub mod context;
pub mod direction;
pub mod errors;
pub mod pattern;
pub mod replacers;
pub mod state;
pub mod text;

pub use chain::{ValueResolver, create_value_resolver, has_correct_schema_value};
pub use config::{ContextSource, SynthConfig};
pub use constraints::apply_schema_constraints;
pub use context::{ContextSet, ContextValue, FakeRegistry, MixedValue, Namespace};
pub use direction::is_match_schema_read_write_to_state;
pub use errors::SynthError;
pub use pattern::create_string_from_pattern;
pub use replacers::{ReplaceContext, Replacement, Replacer, ReplacerRegistry, replacer_fn};
pub use state::GenerationState;

/// Literal context value that forces a field to resolve to null.
pub const NULL_SENTINEL: &str = "__null__";

/// Default key prefix for area-scoped namespaces (`in-header`, `in-path`).
pub const DEFAULT_AREA_PREFIX: &str = "in-";
