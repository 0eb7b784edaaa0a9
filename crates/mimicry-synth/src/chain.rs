use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mimicry_core::{SchemaNode, SchemaType};
use rand::RngCore;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{DEFAULT_AREA_PREFIX, NULL_SENTINEL};
use crate::constraints::apply_schema_constraints;
use crate::context::Namespace;
use crate::replacers::schema::{DATE_FORMAT, DATE_TIME_FORMAT};
use crate::replacers::{ReplaceContext, Replacement, Replacer};
use crate::state::GenerationState;

/// Ordered, short-circuiting composition of replacers over a seed stack of
/// context namespaces.
#[derive(Clone)]
pub struct ValueResolver {
    replacers: Vec<Arc<dyn Replacer>>,
    namespaces: Vec<Namespace>,
    area_prefix: String,
}

pub fn create_value_resolver(
    replacers: Vec<Arc<dyn Replacer>>,
    namespaces: Vec<Namespace>,
) -> ValueResolver {
    ValueResolver {
        replacers,
        namespaces,
        area_prefix: DEFAULT_AREA_PREFIX.to_string(),
    }
}

impl ValueResolver {
    pub fn with_area_prefix(mut self, area_prefix: impl Into<String>) -> Self {
        self.area_prefix = area_prefix.into();
        self
    }

    pub fn replacer_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.replacers.iter().map(|replacer| replacer.id())
    }

    /// Resolves one field using the thread-local random source.
    pub fn resolve(&self, schema: Option<&SchemaNode>, state: Option<&GenerationState>) -> Value {
        self.resolve_with(schema, state, &[], &mut rand::rng())
    }

    /// Resolves one field. `extra` namespaces take priority over the seed
    /// stack. Returns `Value::Null` when no replacer produced a value or one
    /// asked for null.
    pub fn resolve_with(
        &self,
        schema: Option<&SchemaNode>,
        state: Option<&GenerationState>,
        extra: &[Namespace],
        rng: &mut dyn RngCore,
    ) -> Value {
        let default_state = GenerationState::default();
        let state = state.unwrap_or(&default_state);
        let data: Vec<&Namespace> = extra.iter().chain(self.namespaces.iter()).collect();
        let ctx = ReplaceContext::new(schema, Some(state), &data, &self.area_prefix);
        let field = state.dotted_path();

        for replacer in &self.replacers {
            let value = match replacer.replace(&ctx, rng) {
                Replacement::Absent => {
                    trace!(event = "replacer_declined", replacer = replacer.id(), field = %field);
                    continue;
                }
                Replacement::ExplicitNull => {
                    debug!(event = "replacer_null", replacer = replacer.id(), field = %field);
                    return Value::Null;
                }
                Replacement::Value(Value::String(text)) if text == NULL_SENTINEL => {
                    debug!(event = "replacer_null", replacer = replacer.id(), field = %field);
                    return Value::Null;
                }
                Replacement::Value(value) => value,
            };

            if !has_correct_schema_value(schema, &value) {
                trace!(
                    event = "replacer_type_mismatch",
                    replacer = replacer.id(),
                    field = %field,
                    value = %value
                );
                continue;
            }

            let Some(value) = apply_schema_constraints(schema, value, rng) else {
                trace!(event = "replacer_unrepairable", replacer = replacer.id(), field = %field);
                continue;
            };
            if value.as_str().is_some_and(str::is_empty) {
                continue;
            }

            debug!(event = "value_resolved", replacer = replacer.id(), field = %field);
            return value;
        }

        Value::Null
    }
}

/// Checks a value against the schema's declared type and, for `int32`,
/// `int64`, `date`, `date-time` and `uuid`, its format. A missing schema or an
/// unrecognized type always passes.
pub fn has_correct_schema_value(schema: Option<&SchemaNode>, value: &Value) -> bool {
    let Some(schema) = schema else {
        return true;
    };
    if let Some(schema_type) = schema.schema_type.as_ref()
        && !is_correctly_replaced_type(value, schema_type)
    {
        return false;
    }

    let stringly = schema.is_type(&SchemaType::String);
    match schema.format() {
        Some("int32") if stringly => value.as_str().is_some_and(|text| text.parse::<i32>().is_ok()),
        Some("int32") => integral(value).is_some_and(|number| i32::try_from(number).is_ok()),
        Some("int64") if stringly => value.as_str().is_some_and(|text| text.parse::<i64>().is_ok()),
        Some("int64") => integral(value).is_some_and(|number| i64::try_from(number).is_ok()),
        Some("date") => match value.as_str() {
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok(),
            // Unix timestamps are accepted as-is.
            None => integral(value).is_some(),
        },
        Some("date-time" | "datetime") => match value.as_str() {
            Some(text) => {
                NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).is_ok()
                    || DateTime::parse_from_rfc3339(text).is_ok()
            }
            None => integral(value).is_some(),
        },
        Some("uuid") => value
            .as_str()
            .is_some_and(|text| uuid::Uuid::parse_str(text).is_ok()),
        _ => true,
    }
}

pub fn is_correctly_replaced_type(value: &Value, schema_type: &SchemaType) -> bool {
    match schema_type {
        SchemaType::String => value.is_string(),
        SchemaType::Integer => integral(value).is_some(),
        SchemaType::Number => value.is_number(),
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Array => value.is_array(),
        SchemaType::Object => value.is_object(),
        SchemaType::Other(_) => true,
    }
}

/// Integer view of a JSON number, accepting integral floats such as `3.0`.
fn integral(value: &Value) -> Option<i128> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(i128::from(int));
    }
    if let Some(int) = number.as_u64() {
        return Some(i128::from(int));
    }
    number
        .as_f64()
        .filter(|float| float.fract() == 0.0 && float.abs() < 1e38)
        .map(|float| float as i128)
}
