//! Repairs a chosen value against the schema's declared constraints.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mimicry_core::{SchemaNode, SchemaType, compile_pattern, strip_negative_lookahead};
use rand::{Rng, RngCore};
use rand_regex::Regex as RandRegex;
use serde_json::{Number, Value};
use tracing::warn;

use crate::pattern::create_string_from_pattern;
use crate::text::matches_pattern;

const PATTERN_MAX_REPEAT: u32 = 10;
const PAD_CHAR: char = '-';
const MULTIPLE_EPSILON: f64 = 1e-9;

/// Formats whose layout is fixed; length repair would corrupt them.
const FIXED_LENGTH_FORMATS: &[&str] = &["date", "date-time", "datetime", "uuid"];

/// Applies the type-directed constraints of `schema` to `value`.
///
/// Returns `None` when a string cannot be made to match its pattern or a
/// numeric value cannot be read as a number. Types without constraints, and
/// a missing schema, pass the value through.
pub fn apply_schema_constraints(
    schema: Option<&SchemaNode>,
    value: Value,
    rng: &mut dyn RngCore,
) -> Option<Value> {
    let Some(schema) = schema else {
        return Some(value);
    };

    match schema.schema_type.as_ref() {
        Some(SchemaType::String) => match value {
            Value::String(text) => apply_string_constraints(schema, text, rng),
            other => Some(other),
        },
        Some(SchemaType::Integer) => {
            let number = to_f64(&value)?;
            let repaired = apply_number_constraints(schema, number, true, rng);
            Some(Value::from(repaired.round() as i64))
        }
        Some(SchemaType::Number) => {
            let number = to_f64(&value)?;
            let repaired = apply_number_constraints(schema, number, false, rng);
            Some(Number::from_f64(repaired).map_or(value, Value::Number))
        }
        Some(SchemaType::Boolean) => Some(apply_boolean_constraints(schema, value, rng)),
        _ => Some(value),
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    let converted = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    if converted.is_none() {
        warn!(event = "constraint_not_numeric", value = %value);
    }
    converted
}

fn apply_string_constraints(schema: &SchemaNode, text: String, rng: &mut dyn RngCore) -> Option<Value> {
    if matches!(schema.format(), Some("byte" | "binary")) {
        if STANDARD.decode(&text).is_ok() {
            return Some(Value::String(text));
        }
        return Some(Value::String(STANDARD.encode(text)));
    }

    let mut text = text;
    if let Some(pattern) = schema.pattern.as_deref()
        && !matches_pattern(&text, pattern)
    {
        match satisfy_pattern(schema, pattern, rng) {
            Some(replacement) => text = replacement,
            None => {
                warn!(event = "constraint_pattern_unsatisfied", pattern = pattern);
                return None;
            }
        }
    }

    let members: Vec<String> = schema
        .enum_values
        .iter()
        .filter_map(|member| match member {
            Value::String(member) if member == "null" => None,
            Value::String(member) => Some(member.clone()),
            Value::Number(member) => Some(member.to_string()),
            Value::Bool(member) => Some(member.to_string()),
            _ => None,
        })
        .collect();
    if !members.is_empty() && !members.contains(&text) {
        let idx = rng.random_range(0..members.len());
        return Some(Value::String(members[idx].clone()));
    }

    let fixed_length = schema
        .format()
        .is_some_and(|format| FIXED_LENGTH_FORMATS.contains(&format));
    if !fixed_length {
        let len = text.chars().count();
        if let Some(min_length) = schema.min_length
            && len < min_length
        {
            text.extend(std::iter::repeat_n(PAD_CHAR, min_length - len));
        }
        if let Some(max_length) = schema.max_length
            && len > max_length
        {
            text = text.chars().take(max_length).collect();
        }
    }

    Some(Value::String(text))
}

/// Example first, then the literal synthesizer, then one random sample of
/// the pattern.
///
/// Scalar examples are used in their string form; arrays and objects are
/// skipped.
fn satisfy_pattern(schema: &SchemaNode, pattern: &str, rng: &mut dyn RngCore) -> Option<String> {
    match schema.example.as_ref() {
        Some(Value::String(example)) => return Some(example.clone()),
        Some(example @ (Value::Number(_) | Value::Bool(_))) => return Some(example.to_string()),
        _ => {}
    }

    if compile_pattern(pattern).is_none() {
        warn!(event = "constraint_pattern_invalid", pattern = pattern);
        return None;
    }

    let synthesized = create_string_from_pattern(pattern);
    if matches_pattern(&synthesized, pattern) {
        return Some(synthesized);
    }

    let regex = match RandRegex::compile(&strip_negative_lookahead(pattern), PATTERN_MAX_REPEAT) {
        Ok(regex) => regex,
        Err(err) => {
            warn!(event = "constraint_pattern_invalid", pattern = pattern, error = %err);
            return None;
        }
    };
    let sampled: String = rng.sample(&regex);
    matches_pattern(&sampled, pattern).then_some(sampled)
}

fn apply_number_constraints(
    schema: &SchemaNode,
    value: f64,
    integer: bool,
    rng: &mut dyn RngCore,
) -> f64 {
    let members: Vec<f64> = schema
        .enum_values
        .iter()
        .filter_map(|member| match member {
            Value::String(member) => member.trim().parse().ok(),
            member => member.as_f64(),
        })
        .collect();
    if !members.is_empty() {
        if members.contains(&value) {
            return value;
        }
        return members[rng.random_range(0..members.len())];
    }

    let (minimum, maximum) = if integer {
        (schema.minimum.map(f64::ceil), schema.maximum.map(f64::floor))
    } else {
        (schema.minimum, schema.maximum)
    };

    // Minimum first, then maximum: with minimum > maximum the result is the
    // maximum.
    let mut value = value;
    if let Some(minimum) = minimum {
        value = value.max(minimum);
    }
    if let Some(maximum) = maximum {
        value = value.min(maximum);
    }

    if let Some(step) = schema.multiple_of.filter(|step| step.is_finite() && *step > 0.0)
        && !is_multiple_of(value, step)
    {
        let mut candidate = (value / step).floor() * step;
        if let Some(minimum) = minimum
            && candidate < minimum
        {
            let above = (minimum / step).ceil() * step;
            if maximum.is_none_or(|maximum| above <= maximum) {
                candidate = above;
            }
        }
        value = candidate;
    }

    value
}

fn is_multiple_of(value: f64, step: f64) -> bool {
    let quotient = value / step;
    (quotient - quotient.round()).abs() < MULTIPLE_EPSILON
}

fn apply_boolean_constraints(schema: &SchemaNode, value: Value, rng: &mut dyn RngCore) -> Value {
    let members: Vec<bool> = schema.enum_values.iter().filter_map(Value::as_bool).collect();
    if members.is_empty() || value.as_bool().is_some_and(|flag| members.contains(&flag)) {
        return value;
    }
    Value::Bool(members[rng.random_range(0..members.len())])
}
