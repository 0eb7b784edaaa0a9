use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{Days, NaiveDate, NaiveTime};
use fake::Fake;
use fake::faker::internet::en::{IPv4, IPv6, Password, SafeEmail};
use fake::faker::lorem::en::{Word, Words};
use mimicry_core::{SchemaNode, SchemaType};
use rand::{Rng, RngCore};
use serde_json::Value;

use crate::context::fakes::{random_hostname, random_uuid};
use crate::replacers::{ReplaceContext, Replacement, Replacer, ReplacerRegistry};

pub const FROM_SCHEMA_FORMAT: &str = "from_schema_format";
pub const FROM_SCHEMA_PRIMITIVE: &str = "from_schema_primitive";
pub const FROM_SCHEMA_EXAMPLE: &str = "from_schema_example";
pub const FROM_SCHEMA_FALLBACK: &str = "from_schema_fallback";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const FIRST_YEAR: i32 = 2000;
const LAST_YEAR: i32 = 2030;

pub fn register(registry: &mut ReplacerRegistry) {
    registry.register_replacer(Arc::new(FromSchemaFormat));
    registry.register_replacer(Arc::new(FromSchemaPrimitive));
    registry.register_replacer(Arc::new(FromSchemaExample));
    registry.register_replacer(Arc::new(FromSchemaFallback));
}

/// Format-aware values; the declared type is ignored except for integer
/// formats on string fields, which are rendered as decimal strings.
pub struct FromSchemaFormat;

impl Replacer for FromSchemaFormat {
    fn id(&self) -> &'static str {
        FROM_SCHEMA_FORMAT
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement {
        let Some(schema) = ctx.schema else {
            return Replacement::Absent;
        };
        let Some(format) = schema.format() else {
            return Replacement::Absent;
        };
        format_value(schema, format, rng).into()
    }
}

fn format_value(schema: &SchemaNode, format: &str, rng: &mut dyn RngCore) -> Option<Value> {
    let text = match format {
        "date" => random_date(rng)?.format(DATE_FORMAT).to_string(),
        "date-time" | "datetime" => random_date_time(rng)?,
        "email" => SafeEmail().fake_with_rng(rng),
        "hostname" => random_hostname(rng),
        "uri" | "url" => format!("https://www.{}", random_hostname(rng)),
        "password" => Password(8..16).fake_with_rng(rng),
        "uuid" => random_uuid(rng),
        "ipv4" => IPv4().fake_with_rng(rng),
        "ipv6" => IPv6().fake_with_rng(rng),
        "byte" | "binary" => {
            let words: Vec<String> = Words(1..4).fake_with_rng(rng);
            STANDARD.encode(words.join(" "))
        }
        "int32" => return Some(integer_for(schema, i64::from(rng.random_range(1..=i32::MAX)))),
        "int64" => return Some(integer_for(schema, rng.random_range(1..=i64::MAX))),
        _ => return None,
    };
    Some(Value::String(text))
}

fn integer_for(schema: &SchemaNode, value: i64) -> Value {
    if schema.is_type(&SchemaType::String) {
        Value::String(value.to_string())
    } else {
        Value::from(value)
    }
}

fn random_date(rng: &mut dyn RngCore) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(FIRST_YEAR, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(LAST_YEAR, 12, 31)?;
    let span = (last - first).num_days().max(0) as u64;
    first.checked_add_days(Days::new(rng.random_range(0..=span)))
}

fn random_date_time(rng: &mut dyn RngCore) -> Option<String> {
    let date = random_date(rng)?;
    let seconds = rng.random_range(0..86_400_u32);
    let millis = rng.random_range(0..1_000_u32);
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, millis * 1_000_000)?;
    Some(date.and_time(time).format(DATE_TIME_FORMAT).to_string())
}

/// Plain values by declared type: a word, a 32-bit unsigned number or a bool.
pub struct FromSchemaPrimitive;

impl Replacer for FromSchemaPrimitive {
    fn id(&self) -> &'static str {
        FROM_SCHEMA_PRIMITIVE
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement {
        let Some(schema_type) = ctx.schema.and_then(|schema| schema.schema_type.as_ref()) else {
            return Replacement::Absent;
        };
        match schema_type {
            SchemaType::String => {
                let word: String = Word().fake_with_rng(rng);
                Replacement::Value(Value::String(word))
            }
            SchemaType::Integer | SchemaType::Number => {
                Replacement::Value(Value::from(rng.random_range(0..=u32::MAX)))
            }
            SchemaType::Boolean => Replacement::Value(Value::Bool(rng.random_bool(0.5))),
            _ => Replacement::Absent,
        }
    }
}

pub struct FromSchemaExample;

impl Replacer for FromSchemaExample {
    fn id(&self) -> &'static str {
        FROM_SCHEMA_EXAMPLE
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, _rng: &mut dyn RngCore) -> Replacement {
        ctx.schema.and_then(|schema| schema.example.clone()).into()
    }
}

/// The schema's `default`, used as the last resort.
pub struct FromSchemaFallback;

impl Replacer for FromSchemaFallback {
    fn id(&self) -> &'static str {
        FROM_SCHEMA_FALLBACK
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, _rng: &mut dyn RngCore) -> Replacement {
        ctx.schema.and_then(|schema| schema.default.clone()).into()
    }
}
