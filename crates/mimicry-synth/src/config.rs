use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_AREA_PREFIX;
use crate::chain::{ValueResolver, create_value_resolver};
use crate::context::{ContextSet, Namespace};
use crate::errors::SynthError;
use crate::replacers::{DEFAULT_CHAIN, ReplacerRegistry};

/// A context file and the namespace name it is loaded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ContextSource {
    /// Namespace name; the file stem when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: PathBuf,
}

/// Engine configuration, usually read from `mimicry.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Key prefix of area-scoped namespaces such as `in-header`.
    pub area_prefix: String,
    /// Replacer ids in chain order.
    pub replacers: Vec<String>,
    pub contexts: Vec<ContextSource>,
    /// Namespace selectors (`name` or `name.sub`) in priority order. Every
    /// loaded context, in file order, when empty.
    pub stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            area_prefix: DEFAULT_AREA_PREFIX.to_string(),
            replacers: DEFAULT_CHAIN.iter().map(|id| id.to_string()).collect(),
            contexts: Vec::new(),
            stack: Vec::new(),
            seed: None,
        }
    }
}

impl SynthConfig {
    /// Loads a config file. Relative context paths resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            for source in &mut config.contexts {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SynthError> {
        let config: Self = toml::from_str(content)?;
        config.validate(&ReplacerRegistry::default())?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, SynthError> {
        toml::to_string_pretty(self).map_err(|err| SynthError::InvalidConfig(err.to_string()))
    }

    pub fn validate(&self, registry: &ReplacerRegistry) -> Result<(), SynthError> {
        if self.replacers.is_empty() {
            return Err(SynthError::InvalidConfig(
                "replacers must list at least one replacer".to_string(),
            ));
        }
        registry.chain(&self.replacers)?;
        Ok(())
    }

    pub fn load_contexts(&self) -> Result<ContextSet, SynthError> {
        let mut contexts = self.load_configured_contexts()?;
        contexts.resolve_aliases();
        Ok(contexts)
    }

    /// Loads the configured contexts, then `extra` files named by their stem.
    ///
    /// A non-empty stack gains the extra namespaces at its end, so they are
    /// consulted after the selected ones.
    pub fn load_contexts_with(&mut self, extra: &[PathBuf]) -> Result<ContextSet, SynthError> {
        let mut contexts = self.load_configured_contexts()?;
        for path in extra {
            let name = contexts.load_file(path, None)?;
            if !self.stack.is_empty() && !self.stack.contains(&name) {
                self.stack.push(name);
            }
        }
        contexts.resolve_aliases();
        Ok(contexts)
    }

    fn load_configured_contexts(&self) -> Result<ContextSet, SynthError> {
        let mut contexts = ContextSet::new();
        for source in &self.contexts {
            contexts.load_file(&source.path, source.name.as_deref())?;
        }
        Ok(contexts)
    }

    pub fn context_stack(&self, contexts: &ContextSet) -> Vec<Namespace> {
        if self.stack.is_empty() {
            contexts.all()
        } else {
            contexts.stack(&self.stack)
        }
    }

    pub fn build_resolver(
        &self,
        registry: &ReplacerRegistry,
        contexts: &ContextSet,
    ) -> Result<ValueResolver, SynthError> {
        let chain = registry.chain(&self.replacers)?;
        Ok(create_value_resolver(chain, self.context_stack(contexts))
            .with_area_prefix(self.area_prefix.clone()))
    }

    pub fn json_schema() -> RootSchema {
        schemars::schema_for!(SynthConfig)
    }
}
