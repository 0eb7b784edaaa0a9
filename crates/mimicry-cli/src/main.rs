mod logging;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use logging::{LogFormat, init_logging};
use mimicry_core::{Error as CoreError, SchemaNode, validate_schema_node};
use mimicry_synth::{
    FakeRegistry, GenerationState, ReplacerRegistry, SynthConfig, SynthError,
    is_match_schema_read_write_to_state,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("synth error: {0}")]
    Synth(#[from] SynthError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

#[derive(Parser, Debug)]
#[command(name = "mimicry", version, about = "Schema-constrained mock value synthesis")]
struct Cli {
    /// Engine configuration file (TOML).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log output format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve values for one schema field.
    Resolve(ResolveArgs),
    /// List the fake generator ids usable from context files.
    Fakes,
    /// Print the JSON schema of the configuration file.
    ConfigSchema,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// JSON file holding the field's schema node.
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,
    /// Dotted field path, outermost first.
    #[arg(long, value_name = "PATH")]
    name: String,
    /// The field is a request header.
    #[arg(long, default_value_t = false, conflicts_with = "path_param")]
    header: bool,
    /// The field is a path parameter.
    #[arg(long, default_value_t = false)]
    path_param: bool,
    /// Generate for a response.
    #[arg(long, default_value_t = false, conflicts_with = "write_only")]
    read_only: bool,
    /// Generate for a request body.
    #[arg(long, default_value_t = false)]
    write_only: bool,
    /// Look the field up under this name instead of its path.
    #[arg(long, value_name = "NAME")]
    name_override: Option<String>,
    /// Extra context file(s), loaded after the configured ones.
    #[arg(long = "context", value_name = "FILE")]
    contexts: Vec<PathBuf>,
    /// Seed for reproducible output; overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of values to generate.
    #[arg(long, default_value_t = 1)]
    count: usize,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Resolve(args) => run_resolve(cli.config.as_deref(), args, &mut stdout),
        Command::Fakes => run_fakes(&mut stdout),
        Command::ConfigSchema => run_config_schema(&mut stdout),
    }
}

fn load_config(path: Option<&Path>) -> Result<SynthConfig, CliError> {
    match path {
        Some(path) => {
            let config = SynthConfig::load(path)?;
            tracing::info!(event = "config_loaded", path = %path.display());
            Ok(config)
        }
        None => Ok(SynthConfig::default()),
    }
}

fn read_schema(path: &Path) -> Result<SchemaNode, CliError> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let schema = SchemaNode::from_json(&value)?;
    validate_schema_node(&schema)?;
    Ok(schema)
}

fn generation_state(args: &ResolveArgs) -> Result<GenerationState, CliError> {
    let names: Vec<&str> = args.name.split('.').collect();
    if names.iter().any(|name| name.is_empty()) {
        return Err(CliError::InvalidArgs(format!(
            "field path '{}' has an empty segment",
            args.name
        )));
    }

    let mut state = GenerationState::new().with_name_path(names);
    if args.header {
        state = state.with_header();
    }
    if args.path_param {
        state = state.with_path();
    }
    if args.read_only {
        state = state.with_read_only();
    }
    if args.write_only {
        state = state.with_write_only();
    }
    if let Some(name) = &args.name_override {
        state = state.with_name_override(name.clone());
    }
    Ok(state)
}

fn run_resolve(
    config_path: Option<&Path>,
    args: ResolveArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    let schema = read_schema(&args.schema)?;
    let state = generation_state(&args)?;

    if !is_match_schema_read_write_to_state(Some(&schema), Some(&state)) {
        tracing::info!(event = "field_skipped", field = %args.name, reason = "direction");
        return Ok(());
    }

    let contexts = config.load_contexts_with(&args.contexts)?;
    let resolver = config.build_resolver(&ReplacerRegistry::default(), &contexts)?;
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    tracing::info!(
        event = "resolve_started",
        field = %args.name,
        seed = seed,
        count = args.count,
        contexts = contexts.names().count()
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..args.count {
        let value = resolver.resolve_with(Some(&schema), Some(&state), &[], &mut rng);
        writeln!(out, "{}", serde_json::to_string(&value)?)?;
    }

    tracing::info!(event = "resolve_finished", field = %args.name);
    Ok(())
}

fn run_fakes(out: &mut impl Write) -> Result<(), CliError> {
    for id in FakeRegistry::global().ids() {
        writeln!(out, "{id}")?;
    }
    Ok(())
}

fn run_config_schema(out: &mut impl Write) -> Result<(), CliError> {
    let schema = SynthConfig::json_schema();
    writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
    Ok(())
}
