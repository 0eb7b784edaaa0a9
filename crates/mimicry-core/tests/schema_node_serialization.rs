use mimicry_core::{SchemaNode, SchemaType, compile_pattern, validate_schema_node};
use serde_json::json;

#[test]
fn deserializes_openapi_field_names() {
    let node = SchemaNode::from_json(&json!({
        "type": "string",
        "format": "email",
        "pattern": "^[a-z]+@example\\.com$",
        "enum": ["a@example.com", "b@example.com"],
        "minLength": 3,
        "maxLength": 64,
        "readOnly": true,
        "example": "a@example.com"
    }))
    .expect("parse node");

    assert_eq!(node.schema_type, Some(SchemaType::String));
    assert_eq!(node.format(), Some("email"));
    assert_eq!(node.enum_values.len(), 2);
    assert_eq!(node.min_length, Some(3));
    assert_eq!(node.max_length, Some(64));
    assert!(node.read_only);
    assert!(!node.write_only);
    assert_eq!(node.example, Some(json!("a@example.com")));
    assert_eq!(node.default, None);
}

#[test]
fn type_list_uses_first_non_null_entry() {
    let node = SchemaNode::from_json(&json!({"type": ["null", "integer"], "multipleOf": 5}))
        .expect("parse node");
    assert_eq!(node.schema_type, Some(SchemaType::Integer));
    assert_eq!(node.multiple_of, Some(5.0));
}

#[test]
fn unknown_type_is_preserved() {
    let node = SchemaNode::from_json(&json!({"type": "file"})).expect("parse node");
    assert_eq!(node.schema_type, Some(SchemaType::Other("file".to_string())));
}

#[test]
fn null_example_means_not_set() {
    let node = SchemaNode::from_json(&json!({"type": "string", "example": null}))
        .expect("parse node");
    assert_eq!(node.example, None);
}

#[test]
fn serializes_node_compactly() {
    let node = SchemaNode::of_type(SchemaType::Number).with_bounds(Some(1.0), Some(10.0));
    let json = serde_json::to_string(&node).expect("serialize node");
    assert_eq!(json, r#"{"type":"number","minimum":1.0,"maximum":10.0}"#);
}

#[test]
fn validation_rejects_inverted_bounds() {
    let node = SchemaNode::of_type(SchemaType::Integer).with_bounds(Some(10.0), Some(1.0));
    assert!(validate_schema_node(&node).is_err());
}

#[test]
fn validation_rejects_conflicting_direction_flags() {
    let node = SchemaNode::of_type(SchemaType::String).read_only().write_only();
    assert!(validate_schema_node(&node).is_err());
}

#[test]
fn validation_accepts_lookahead_patterns() {
    let node = SchemaNode::of_type(SchemaType::String).with_pattern("^(?!admin)[a-z]+$");
    assert!(validate_schema_node(&node).is_ok());
}

#[test]
fn validation_rejects_mistyped_enum_members() {
    let node = SchemaNode::of_type(SchemaType::Boolean).with_enum(vec![json!("yes")]);
    assert!(validate_schema_node(&node).is_err());
}

#[test]
fn validation_accepts_numeric_strings_in_number_enums() {
    let node = SchemaNode::of_type(SchemaType::Integer).with_enum(vec![json!("1"), json!(2)]);
    assert!(validate_schema_node(&node).is_ok());

    let node = SchemaNode::of_type(SchemaType::Number).with_enum(vec![json!("one")]);
    assert!(validate_schema_node(&node).is_err());
}

#[test]
fn compiled_patterns_are_reused() {
    let first = compile_pattern("^(?!tmp)[a-z]{2,4}$").expect("compiles");
    let second = compile_pattern("^(?!tmp)[a-z]{2,4}$").expect("compiles");
    assert_eq!(first.as_str(), second.as_str());
    assert!(second.is_match("abc"));
    assert!(!second.is_match("abcdef"));

    assert!(compile_pattern("([a-z").is_none());
    assert!(compile_pattern("([a-z").is_none());
}
