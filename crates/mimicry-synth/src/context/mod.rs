//! Context namespaces: the caller-supplied sources of realistic values.

pub mod fakes;
pub mod loader;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};
use serde_json::Value;

use crate::NULL_SENTINEL;
use crate::replacers::Replacement;
use crate::text::{matches_pattern, maybe_regex_pattern};

pub use fakes::FakeRegistry;
pub use loader::ContextSet;

/// Marker for alias keys: `^name` is a fallback for a final segment `name`.
pub const ALIAS_MARKER: char = '^';

const WILDCARD: &str = "*";

/// A single scalar produced by a context generator or stored as a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum MixedValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MixedValue {
    pub fn get(&self) -> Value {
        match self {
            Self::String(value) => Value::String(value.clone()),
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => Value::from(*value),
            Self::Bool(value) => Value::Bool(*value),
        }
    }

    /// Scalar view of a JSON value; `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::String(text.clone())),
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float)),
            _ => None,
        }
    }
}

impl From<&str> for MixedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MixedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for MixedValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MixedValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for MixedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Zero-argument value source; the randomness comes from the caller.
pub type GeneratorFn = Arc<dyn Fn(&mut dyn RngCore) -> MixedValue + Send + Sync>;

pub type Namespace = BTreeMap<String, ContextValue>;

#[derive(Clone)]
pub enum ContextValue {
    Scalar(MixedValue),
    Map(Namespace),
    /// One element is picked uniformly at random on every lookup.
    List(Vec<ContextValue>),
    Generator(GeneratorFn),
}

impl ContextValue {
    pub fn generator<F>(func: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> MixedValue + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(func))
    }

    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ContextValue)>,
        K: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Converts a parsed document into context values. JSON nulls are dropped.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(Self::List(
                items.iter().filter_map(Self::from_json).collect(),
            )),
            Value::Object(fields) => Some(Self::Map(
                fields
                    .iter()
                    .filter_map(|(key, value)| {
                        Self::from_json(value).map(|value| (key.clone(), value))
                    })
                    .collect(),
            )),
            scalar => MixedValue::from_json(scalar).map(Self::Scalar),
        }
    }

    pub fn as_map(&self) -> Option<&Namespace> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Map(_))
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

macro_rules! scalar_context_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ContextValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_context_value!(&str, String, i64, f64, bool);

impl From<MixedValue> for ContextValue {
    fn from(value: MixedValue) -> Self {
        Self::Scalar(value)
    }
}

/// Resolves `path` against each namespace in order; the first hit wins.
pub fn lookup_in_stack<'a, I, S>(stack: I, path: &[S], rng: &mut dyn RngCore) -> Replacement
where
    I: IntoIterator<Item = &'a Namespace>,
    S: AsRef<str>,
{
    for namespace in stack {
        let found = lookup(namespace, path, rng);
        if !found.is_absent() {
            return found;
        }
    }
    Replacement::Absent
}

/// Walks `path` through one namespace.
///
/// Per level: a direct key for the current segment, then `^segment` when it is
/// the final one, then a leaf stored under the final segment's name, then keys
/// that look like regular expressions matched against the final segment, and
/// finally a bare `*`.
pub fn lookup<S: AsRef<str>>(namespace: &Namespace, path: &[S], rng: &mut dyn RngCore) -> Replacement {
    let Some((first, rest)) = path.split_first() else {
        return Replacement::Absent;
    };
    let segment = first.as_ref();
    let field_name = path.last().map_or(segment, |last| last.as_ref());

    if let Some(value) = namespace.get(segment) {
        let found = resolve_value(value, rest, rng);
        if !found.is_absent() {
            return found;
        }
    }

    if rest.is_empty() {
        if let Some(value) = namespace.get(&format!("{ALIAS_MARKER}{segment}")) {
            let found = resolve_value(value, rest, rng);
            if !found.is_absent() {
                return found;
            }
        }
    } else if let Some(value) = namespace.get(field_name)
        && value.is_leaf()
    {
        let found = resolve_value(value, &[] as &[S], rng);
        if !found.is_absent() {
            return found;
        }
    }

    for (key, value) in namespace {
        if key == WILDCARD || is_alias_key(key) || !maybe_regex_pattern(key) || !value.is_leaf() {
            continue;
        }
        if matches_pattern(field_name, key) {
            let found = resolve_value(value, &[] as &[S], rng);
            if !found.is_absent() {
                return found;
            }
        }
    }

    // A bare `*` is the catch-all and only applies when nothing else matched.
    match namespace.get(WILDCARD) {
        Some(value) if value.is_leaf() => resolve_value(value, &[] as &[S], rng),
        _ => Replacement::Absent,
    }
}

fn resolve_value<S: AsRef<str>>(value: &ContextValue, rest: &[S], rng: &mut dyn RngCore) -> Replacement {
    match value {
        ContextValue::Map(map) => lookup(map, rest, rng),
        ContextValue::List(items) => {
            if items.is_empty() {
                return Replacement::Absent;
            }
            let idx = rng.random_range(0..items.len());
            resolve_value(&items[idx], rest, rng)
        }
        _ if !rest.is_empty() => Replacement::Absent,
        ContextValue::Scalar(scalar) => leaf(scalar),
        ContextValue::Generator(func) => leaf(&func(rng)),
    }
}

fn leaf(value: &MixedValue) -> Replacement {
    match value {
        MixedValue::String(text) if text == NULL_SENTINEL => Replacement::ExplicitNull,
        other => Replacement::Value(other.get()),
    }
}

fn is_alias_key(key: &str) -> bool {
    key.strip_prefix(ALIAS_MARKER)
        .is_some_and(|name| !name.is_empty() && !maybe_regex_pattern(name))
}
