//! Replacer functions: one value-resolution strategy each.

pub mod area;
pub mod context;
pub mod schema;

use std::collections::BTreeMap;
use std::sync::Arc;

use mimicry_core::SchemaNode;
use rand::RngCore;
use serde_json::Value;

use crate::context::Namespace;
use crate::errors::SynthError;
use crate::state::GenerationState;

/// Outcome of one replacer.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Nothing found; the chain tries the next replacer.
    Absent,
    /// Stop the chain and resolve the field to null.
    ExplicitNull,
    Value(Value),
}

impl Replacement {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Option<Value>> for Replacement {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

/// Everything a replacer may read for one field.
#[derive(Debug, Clone, Copy)]
pub struct ReplaceContext<'a> {
    pub schema: Option<&'a SchemaNode>,
    pub state: Option<&'a GenerationState>,
    /// Context namespaces in priority order.
    pub data: &'a [&'a Namespace],
    pub area_prefix: &'a str,
}

impl<'a> ReplaceContext<'a> {
    pub fn new(
        schema: Option<&'a SchemaNode>,
        state: Option<&'a GenerationState>,
        data: &'a [&'a Namespace],
        area_prefix: &'a str,
    ) -> Self {
        Self {
            schema,
            state,
            data,
            area_prefix,
        }
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &'a Namespace> + 'a {
        self.data.iter().copied()
    }

    pub fn format(&self) -> Option<&'a str> {
        self.schema.and_then(SchemaNode::format)
    }
}

pub trait Replacer: Send + Sync {
    fn id(&self) -> &'static str;

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement;
}

struct FnReplacer<F> {
    id: &'static str,
    func: F,
}

impl<F> Replacer for FnReplacer<F>
where
    F: Fn(&ReplaceContext<'_>, &mut dyn RngCore) -> Replacement + Send + Sync,
{
    fn id(&self) -> &'static str {
        self.id
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement {
        (self.func)(ctx, rng)
    }
}

/// Wraps a closure as a replacer.
pub fn replacer_fn<F>(id: &'static str, func: F) -> Arc<dyn Replacer>
where
    F: Fn(&ReplaceContext<'_>, &mut dyn RngCore) -> Replacement + Send + Sync + 'static,
{
    Arc::new(FnReplacer { id, func })
}

/// Chain order used when nothing else is configured.
pub const DEFAULT_CHAIN: &[&str] = &[
    area::IN_HEADERS,
    area::IN_PATH,
    context::FROM_CONTEXT,
    schema::FROM_SCHEMA_EXAMPLE,
    schema::FROM_SCHEMA_FORMAT,
    schema::FROM_SCHEMA_PRIMITIVE,
    schema::FROM_SCHEMA_FALLBACK,
];

/// Replacers addressable by id, for configuration-driven chains.
#[derive(Clone)]
pub struct ReplacerRegistry {
    replacers: BTreeMap<&'static str, Arc<dyn Replacer>>,
}

impl Default for ReplacerRegistry {
    fn default() -> Self {
        let mut registry = Self {
            replacers: BTreeMap::new(),
        };
        area::register(&mut registry);
        context::register(&mut registry);
        schema::register(&mut registry);
        registry
    }
}

impl ReplacerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_replacer(&mut self, replacer: Arc<dyn Replacer>) {
        self.replacers.insert(replacer.id(), replacer);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Replacer>> {
        self.replacers.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.replacers.keys().copied()
    }

    /// Resolves ids into an ordered chain; an unknown id is an error.
    pub fn chain<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<dyn Replacer>>, SynthError> {
        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id)
                    .ok_or_else(|| SynthError::InvalidConfig(format!("unknown replacer '{id}'")))
            })
            .collect()
    }

    pub fn default_chain(&self) -> Vec<Arc<dyn Replacer>> {
        DEFAULT_CHAIN
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }
}
