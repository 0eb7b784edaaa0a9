use std::fmt;

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Declared JSON type of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// A type name the engine does not recognize; treated as "don't care".
    Other(String),
}

impl SchemaType {
    pub fn parse(value: &str) -> Self {
        match value {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `"string"` as well as OpenAPI 3.1 type lists such as
/// `["string", "null"]`, where the first non-null entry is used.
pub(crate) fn deserialize_schema_type<'de, D>(deserializer: D) -> Result<Option<SchemaType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        None => None,
        Some(Value::String(name)) => Some(SchemaType::parse(&name)),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null")
            .map(SchemaType::parse),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "schema type must be a string or list of strings, got {other}"
            )));
        }
    };
    Ok(parsed)
}

pub(crate) fn serialize_schema_type<S>(
    value: &Option<SchemaType>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(schema_type) => serializer.serialize_str(schema_type.as_str()),
        None => serializer.serialize_none(),
    }
}
