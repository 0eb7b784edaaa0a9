use mimicry_core::{SchemaNode, SchemaType};
use mimicry_synth::apply_schema_constraints;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};

const SEEDS: u64 = 200;

fn random_number(rng: &mut ChaCha8Rng) -> Value {
    json!(rng.random_range(-1_000.0..1_000.0_f64))
}

#[test]
fn string_enum_always_yields_member() {
    let members = vec![json!("draft"), json!("active"), json!("archived")];
    let schema = SchemaNode::of_type(SchemaType::String).with_enum(members.clone());
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = json!(format!("value-{seed}"));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        assert!(members.contains(&value), "{value} is not a member");
    }
}

#[test]
fn string_enum_keeps_existing_member() {
    let schema = SchemaNode::of_type(SchemaType::String).with_enum(vec![json!("a"), json!("b")]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("b"), &mut rng),
        Some(json!("b"))
    );
}

#[test]
fn number_enum_always_yields_member() {
    let schema = SchemaNode::of_type(SchemaType::Number).with_enum(vec![json!(1.5), json!(2.5)]);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = random_number(&mut rng);
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        let number = value.as_f64().expect("number");
        assert!(number == 1.5 || number == 2.5, "{number} is not a member");
    }
}

#[test]
fn integer_enum_always_yields_member() {
    let schema = SchemaNode::of_type(SchemaType::Integer).with_enum(vec![json!(10), json!(20), json!(30)]);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = json!(rng.random_range(-50..50_i64));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        assert!([10, 20, 30].contains(&value.as_i64().expect("integer")));
    }
}

#[test]
fn numeric_strings_in_enum_are_members() {
    let schema = SchemaNode::of_type(SchemaType::Integer).with_enum(vec![json!("1"), json!("2")]);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = json!(rng.random_range(10..100_i64));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        assert!([1, 2].contains(&value.as_i64().expect("integer")), "{value}");
    }
}

#[test]
fn boolean_enum_always_yields_member() {
    let schema = SchemaNode::of_type(SchemaType::Boolean).with_enum(vec![json!(true)]);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = json!(rng.random_bool(0.5));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng);
        assert_eq!(value, Some(json!(true)));
    }
}

#[test]
fn numbers_stay_within_bounds() {
    let schema = SchemaNode::of_type(SchemaType::Number).with_bounds(Some(-12.5), Some(40.0));
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = random_number(&mut rng);
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        let number = value.as_f64().expect("number");
        assert!((-12.5..=40.0).contains(&number), "{number} out of bounds");
    }
}

#[test]
fn integers_stay_within_fractional_bounds() {
    let schema = SchemaNode::of_type(SchemaType::Integer).with_bounds(Some(1.5), Some(9.5));
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = json!(rng.random_range(-100..100_i64));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        let number = value.as_i64().expect("integer");
        assert!((2..=9).contains(&number), "{number} out of bounds");
    }
}

#[test]
fn multiple_of_is_respected() {
    let schema = SchemaNode::of_type(SchemaType::Number).with_multiple_of(0.25);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = random_number(&mut rng);
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        let quotient = value.as_f64().expect("number") / 0.25;
        assert!((quotient - quotient.round()).abs() < 1e-9, "{value} is not a multiple");
    }
}

#[test]
fn multiple_of_with_bounds_is_respected() {
    let schema = SchemaNode::of_type(SchemaType::Integer)
        .with_bounds(Some(3.0), Some(48.0))
        .with_multiple_of(5.0);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let input = json!(rng.random_range(-100..100_i64));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        let number = value.as_i64().expect("integer");
        assert_eq!(number % 5, 0, "{number} is not a multiple of 5");
        assert!((3..=48).contains(&number), "{number} out of bounds");
    }
}

#[test]
fn string_lengths_are_repaired() {
    let schema = SchemaNode::of_type(SchemaType::String).with_lengths(Some(4), Some(8));
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let len = rng.random_range(0..20_usize);
        let input = json!("x".repeat(len));
        let value = apply_schema_constraints(Some(&schema), input, &mut rng).expect("value");
        let count = value.as_str().expect("string").chars().count();
        assert!((4..=8).contains(&count), "length {count} out of range");
    }
}

#[test]
fn short_strings_are_padded_with_dashes() {
    let schema = SchemaNode::of_type(SchemaType::String).with_lengths(Some(5), None);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("ab"), &mut rng),
        Some(json!("ab---"))
    );
}

#[test]
fn length_repair_counts_characters() {
    let schema = SchemaNode::of_type(SchemaType::String).with_lengths(None, Some(3));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("äöüß"), &mut rng),
        Some(json!("äöü"))
    );
}

#[test]
fn fixed_layout_formats_skip_length_repair() {
    let schema = SchemaNode::of_type(SchemaType::String)
        .with_format("date")
        .with_lengths(Some(20), Some(20));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("2024-01-31"), &mut rng),
        Some(json!("2024-01-31"))
    );
}

#[test]
fn pattern_mismatch_uses_example() {
    let schema = SchemaNode::of_type(SchemaType::String)
        .with_pattern("^[A-Z]{3}$")
        .with_example(json!("EUR"));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("euro"), &mut rng),
        Some(json!("EUR"))
    );
}

#[test]
fn numeric_example_still_goes_through_enum_repair() {
    let schema = SchemaNode::of_type(SchemaType::String)
        .with_pattern("^[0-9]+$")
        .with_example(json!(42))
        .with_enum(vec![json!("a"), json!("b")]);
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = apply_schema_constraints(Some(&schema), json!("zzz"), &mut rng).expect("value");
        assert!(value == json!("a") || value == json!("b"), "{value} is not a member");
    }
}

#[test]
fn numeric_example_is_used_as_text() {
    let schema = SchemaNode::of_type(SchemaType::String)
        .with_pattern("^[0-9]+$")
        .with_example(json!(42))
        .with_lengths(Some(4), None);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("zzz"), &mut rng),
        Some(json!("42--"))
    );
}

#[test]
fn structured_example_is_not_used_for_patterns() {
    let schema = SchemaNode::of_type(SchemaType::String)
        .with_pattern("^ord-\\d{4}$")
        .with_example(json!({"id": 1}));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("nope"), &mut rng),
        Some(json!("ord-1234"))
    );
}

#[test]
fn oversized_pattern_repeat_is_rejected_quickly() {
    let schema = SchemaNode::of_type(SchemaType::String).with_pattern("^a{200000000}$");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(apply_schema_constraints(Some(&schema), json!("zzz"), &mut rng), None);
}

#[test]
fn pattern_mismatch_synthesizes_literal() {
    let schema = SchemaNode::of_type(SchemaType::String).with_pattern("^ord-\\d{4}$");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("nope"), &mut rng),
        Some(json!("ord-1234"))
    );
}

#[test]
fn matching_pattern_is_left_alone() {
    let schema = SchemaNode::of_type(SchemaType::String).with_pattern("^[a-z]+$");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("hello"), &mut rng),
        Some(json!("hello"))
    );
}

#[test]
fn non_numeric_value_is_rejected() {
    let schema = SchemaNode::of_type(SchemaType::Integer);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(apply_schema_constraints(Some(&schema), json!("many"), &mut rng), None);
    assert_eq!(apply_schema_constraints(Some(&schema), json!([1]), &mut rng), None);
}

#[test]
fn integer_results_are_integers() {
    let schema = SchemaNode::of_type(SchemaType::Integer);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let value = apply_schema_constraints(Some(&schema), json!(12.0), &mut rng).expect("value");
    assert!(value.is_i64());
    assert_eq!(value, json!(12));
}

#[test]
fn unconstrained_types_pass_through() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let schema = SchemaNode::of_type(SchemaType::Object);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!({"k": "v"}), &mut rng),
        Some(json!({"k": "v"}))
    );
    assert_eq!(apply_schema_constraints(None, json!(7), &mut rng), Some(json!(7)));
}

#[test]
fn byte_format_is_base64_encoded() {
    let schema = SchemaNode::of_type(SchemaType::String).with_format("byte");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        apply_schema_constraints(Some(&schema), json!("hi there"), &mut rng),
        Some(json!("aGkgdGhlcmU="))
    );
}
