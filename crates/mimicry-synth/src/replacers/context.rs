use std::sync::Arc;

use mimicry_core::SchemaType;
use rand::RngCore;
use serde_json::Value;

use crate::context::lookup_in_stack;
use crate::replacers::{ReplaceContext, Replacement, Replacer, ReplacerRegistry};
use crate::text::to_snake_case;

pub const FROM_CONTEXT: &str = "from_context";

pub fn register(registry: &mut ReplacerRegistry) {
    registry.register_replacer(Arc::new(FromContext));
}

/// Walks the field's snake_cased name path through the namespace stack.
pub struct FromContext;

impl Replacer for FromContext {
    fn id(&self) -> &'static str {
        FROM_CONTEXT
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement {
        let Some(state) = ctx.state else {
            return Replacement::Absent;
        };
        let path: Vec<String> = state.lookup_path().into_iter().map(to_snake_case).collect();
        if path.is_empty() {
            return Replacement::Absent;
        }

        match lookup_in_stack(ctx.namespaces(), &path, rng) {
            // Empty strings would fail required-field checks downstream.
            Replacement::Value(Value::String(text)) if text.is_empty() => Replacement::Absent,
            // String fields keep integer formats as text.
            Replacement::Value(value)
                if ctx.schema.is_some_and(|schema| schema.is_type(&SchemaType::String)) =>
            {
                Replacement::Value(value)
            }
            Replacement::Value(value) => Replacement::Value(cast_to_format(ctx.format(), value)),
            other => other,
        }
    }
}

/// Casts context values to `int32` / `int64` when the schema asks for them.
/// Values that do not convert are returned unchanged.
pub fn cast_to_format(format: Option<&str>, value: Value) -> Value {
    let converted = match format {
        Some("int32") => as_integer(&value)
            .and_then(|number| i32::try_from(number).ok())
            .map(Value::from),
        Some("int64") => as_integer(&value).map(Value::from),
        _ => None,
    };
    converted.unwrap_or(value)
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
