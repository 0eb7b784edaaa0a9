use std::fs;

use mimicry_core::{SchemaNode, SchemaType};
use mimicry_synth::replacers::DEFAULT_CHAIN;
use mimicry_synth::{GenerationState, ReplacerRegistry, SynthConfig, SynthError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn defaults_use_full_chain() {
    let config = SynthConfig::default();
    assert_eq!(config.area_prefix, "in-");
    assert_eq!(config.replacers, DEFAULT_CHAIN);
    assert!(config.contexts.is_empty());
    assert!(config.seed.is_none());
    config
        .validate(&ReplacerRegistry::default())
        .expect("default chain is valid");
}

#[test]
fn empty_document_equals_defaults() {
    assert_eq!(SynthConfig::from_toml_str("").expect("parse"), SynthConfig::default());
}

#[test]
fn toml_overrides_are_applied() {
    let config = SynthConfig::from_toml_str(
        r#"
area_prefix = "x-"
replacers = ["from_context", "from_schema_fallback"]
stack = ["petstore.pets"]
seed = 7

[[contexts]]
name = "petstore"
path = "contexts/petstore.yml"
"#,
    )
    .expect("parse");

    assert_eq!(config.area_prefix, "x-");
    assert_eq!(config.replacers, vec!["from_context", "from_schema_fallback"]);
    assert_eq!(config.stack, vec!["petstore.pets"]);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.contexts[0].name.as_deref(), Some("petstore"));
}

#[test]
fn unknown_replacer_is_rejected() {
    let err = SynthConfig::from_toml_str("replacers = [\"from_moon\"]").unwrap_err();
    assert!(matches!(err, SynthError::InvalidConfig(message) if message.contains("from_moon")));
}

#[test]
fn empty_chain_is_rejected() {
    let err = SynthConfig::from_toml_str("replacers = []").unwrap_err();
    assert!(matches!(err, SynthError::InvalidConfig(_)));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SynthConfig::from_toml_str("replacer = [\"from_context\"]").unwrap_err();
    assert!(matches!(err, SynthError::Toml(_)));
}

#[test]
fn serialized_config_parses_back() {
    let mut config = SynthConfig::default();
    config.seed = Some(99);
    config.stack = vec!["common".to_string()];
    let text = config.to_toml_string().expect("serialize");
    assert_eq!(SynthConfig::from_toml_str(&text).expect("parse"), config);
}

#[test]
fn json_schema_describes_fields() {
    let schema = serde_json::to_value(SynthConfig::json_schema()).expect("schema json");
    let properties = schema["properties"].as_object().expect("properties");
    for key in ["area_prefix", "replacers", "contexts", "stack", "seed"] {
        assert!(properties.contains_key(key), "missing {key}");
    }
}

#[test]
fn relative_context_paths_resolve_against_config_dir() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("contexts")).expect("mkdir");
    fs::write(
        dir.path().join("contexts/common.json"),
        r#"{"name": "Jane", "address": {"city": "Lyon"}}"#,
    )
    .expect("write context");
    let config_path = dir.path().join("mimicry.toml");
    fs::write(&config_path, "[[contexts]]\npath = \"contexts/common.json\"\n").expect("write config");

    let config = SynthConfig::load(&config_path).expect("load");
    assert_eq!(config.contexts[0].path, dir.path().join("contexts/common.json"));

    let contexts = config.load_contexts().expect("contexts");
    assert_eq!(contexts.names().collect::<Vec<_>>(), vec!["common"]);
}

#[test]
fn build_resolver_resolves_from_configured_contexts() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("petstore.yaml"),
        "pets:\n  name: Rex\n  tag: \"__null__\"\nowner: Ann\n",
    )
    .expect("write context");
    let config_path = dir.path().join("mimicry.toml");
    fs::write(
        &config_path,
        "replacers = [\"from_context\", \"from_schema_example\"]\nstack = [\"petstore.pets\"]\n\n[[contexts]]\npath = \"petstore.yaml\"\n",
    )
    .expect("write config");

    let config = SynthConfig::load(&config_path).expect("load");
    let contexts = config.load_contexts().expect("contexts");
    let resolver = config
        .build_resolver(&ReplacerRegistry::default(), &contexts)
        .expect("resolver");
    assert_eq!(
        resolver.replacer_ids().collect::<Vec<_>>(),
        vec!["from_context", "from_schema_example"]
    );

    let schema = SchemaNode::of_type(SchemaType::String).with_example(json!("fallback"));
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let name = GenerationState::new().with_name("name");
    assert_eq!(resolver.resolve_with(Some(&schema), Some(&name), &[], &mut rng), json!("Rex"));

    let tag = GenerationState::new().with_name("tag");
    assert_eq!(resolver.resolve_with(Some(&schema), Some(&tag), &[], &mut rng), json!(null));

    // `owner` sits outside the selected child namespace.
    let owner = GenerationState::new().with_name("owner");
    assert_eq!(
        resolver.resolve_with(Some(&schema), Some(&owner), &[], &mut rng),
        json!("fallback")
    );
}

#[test]
fn serialized_config_validates_against_schema() {
    let schema = serde_json::to_value(SynthConfig::json_schema()).expect("schema json");
    let compiled = jsonschema::JSONSchema::compile(&schema).expect("compile schema");

    let mut config = SynthConfig::default();
    config.contexts.push(mimicry_synth::ContextSource {
        name: Some("common".to_string()),
        path: "contexts/common.json".into(),
    });
    let instance = serde_json::to_value(&config).expect("config json");
    assert!(compiled.is_valid(&instance));

    assert!(!compiled.is_valid(&json!({"area_prefix": 5})));
    assert!(!compiled.is_valid(&json!({"contexts": [{"name": "x"}]})));
}

#[test]
fn extra_contexts_join_a_configured_stack() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("shared.json"), r#"{"city": "Lyon"}"#).expect("write shared");
    let extra = dir.path().join("extra.yaml");
    fs::write(&extra, "nickname: Ace\n").expect("write extra");
    let config_path = dir.path().join("mimicry.toml");
    fs::write(
        &config_path,
        "stack = [\"shared\"]\n\n[[contexts]]\npath = \"shared.json\"\n",
    )
    .expect("write config");

    let mut config = SynthConfig::load(&config_path).expect("load");
    let contexts = config.load_contexts_with(&[extra]).expect("contexts");
    assert_eq!(config.stack, vec!["shared", "extra"]);
    assert_eq!(config.context_stack(&contexts).len(), 2);

    let resolver = config
        .build_resolver(&ReplacerRegistry::default(), &contexts)
        .expect("resolver");
    let schema = SchemaNode::of_type(SchemaType::String);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let nickname = GenerationState::new().with_name("nickname");
    assert_eq!(
        resolver.resolve_with(Some(&schema), Some(&nickname), &[], &mut rng),
        json!("Ace")
    );
}
