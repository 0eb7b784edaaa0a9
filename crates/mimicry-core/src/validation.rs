use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

use crate::error::{Error, Result};
use crate::schema::SchemaNode;
use crate::types::SchemaType;

const PATTERN_CACHE_LIMIT: usize = 1024;

static PATTERN_CACHE: LazyLock<Mutex<HashMap<String, Option<Regex>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static NEGATIVE_LOOKAHEAD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\(\?!.*?\)").ok());

/// Remove `(?!...)` groups, which the regex engine cannot compile.
pub fn strip_negative_lookahead(pattern: &str) -> String {
    match NEGATIVE_LOOKAHEAD.as_ref() {
        Some(regex) => regex.replace_all(pattern, "").into_owned(),
        None => pattern.to_string(),
    }
}

/// Compile a schema pattern the way the engine matches it.
///
/// Results, failures included, are cached per pattern string.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    let Ok(mut cache) = PATTERN_CACHE.lock() else {
        return compile_uncached(pattern);
    };
    if let Some(compiled) = cache.get(pattern) {
        return compiled.clone();
    }
    if cache.len() >= PATTERN_CACHE_LIMIT {
        cache.clear();
    }
    let compiled = compile_uncached(pattern);
    cache.insert(pattern.to_string(), compiled.clone());
    compiled
}

fn compile_uncached(pattern: &str) -> Option<Regex> {
    Regex::new(&strip_negative_lookahead(pattern)).ok()
}

/// Validate internal consistency of a schema node.
///
/// This checks:
/// - `minimum <= maximum` and `minLength <= maxLength`
/// - `multipleOf` is a positive finite number
/// - `readOnly` and `writeOnly` are not both set
/// - `pattern` compiles
/// - `enum` members match the declared primitive type
///
/// The engine itself tolerates malformed nodes; callers use this to surface
/// problems before generation.
pub fn validate_schema_node(schema: &SchemaNode) -> Result<()> {
    if let (Some(minimum), Some(maximum)) = (schema.minimum, schema.maximum)
        && minimum > maximum
    {
        return Err(Error::InvalidSchema(format!(
            "minimum {minimum} is greater than maximum {maximum}"
        )));
    }

    if let (Some(min_length), Some(max_length)) = (schema.min_length, schema.max_length)
        && min_length > max_length
    {
        return Err(Error::InvalidSchema(format!(
            "minLength {min_length} is greater than maxLength {max_length}"
        )));
    }

    if let Some(multiple_of) = schema.multiple_of
        && (!multiple_of.is_finite() || multiple_of <= 0.0)
    {
        return Err(Error::InvalidSchema(format!(
            "multipleOf must be a positive number, got {multiple_of}"
        )));
    }

    if schema.read_only && schema.write_only {
        return Err(Error::InvalidSchema(
            "readOnly and writeOnly cannot both be set".to_string(),
        ));
    }

    if let Some(pattern) = schema.pattern.as_deref()
        && compile_pattern(pattern).is_none()
    {
        return Err(Error::InvalidSchema(format!(
            "pattern does not compile: {pattern}"
        )));
    }

    if let Some(schema_type) = schema.schema_type.as_ref() {
        for value in &schema.enum_values {
            let matches = match schema_type {
                SchemaType::String => value.is_string() || value.is_number(),
                SchemaType::Integer | SchemaType::Number => {
                    value.is_number()
                        || value.as_str().is_some_and(|text| text.trim().parse::<f64>().is_ok())
                }
                SchemaType::Boolean => value.is_boolean(),
                _ => true,
            };
            if !matches && !value.is_null() {
                return Err(Error::InvalidSchema(format!(
                    "enum member {value} does not match type {schema_type}"
                )));
            }
        }
    }

    Ok(())
}
