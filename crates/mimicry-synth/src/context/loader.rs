use std::fs;
use std::path::Path;

use rand::{Rng, RngCore};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::fakes::{FakeRegistry, bothify};
use crate::context::{ContextValue, MixedValue, Namespace};
use crate::errors::SynthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFormat {
    Json,
    Toml,
    Yaml,
}

impl ContextFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingAlias {
    namespace: String,
    path: Vec<String>,
    target: String,
}

/// Named context namespaces, in the order they were added.
///
/// String values carrying a known prefix are turned into generators while a
/// document is added:
/// - `fake:<id>` uses a registry fake; a bare `fake:` infers the id from the key
/// - `func:echo:<text>`, `func:int_between:<min>,<max>`, `func:botify:<pattern>`
/// - `func:<id>` is the same as `fake:<id>`
/// - `botify:<pattern>` replaces `?` with a letter and `#` with a digit
/// - `alias:<namespace>.<path>` copies a value from another namespace once
///   every document is in; call [`ContextSet::resolve_aliases`] for that
#[derive(Debug, Clone, Default)]
pub struct ContextSet {
    namespaces: Vec<(String, Namespace)>,
    pending: Vec<PendingAlias>,
}

impl ContextSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a context file; the file stem names the namespace unless `name`
    /// is given.
    pub fn load_file(&mut self, path: &Path, name: Option<&str>) -> Result<String, SynthError> {
        let format = ContextFormat::from_path(path).ok_or_else(|| {
            SynthError::InvalidContext(format!(
                "unsupported context file extension: {}",
                path.display()
            ))
        })?;
        let name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    SynthError::InvalidContext(format!(
                        "cannot derive context name from {}",
                        path.display()
                    ))
                })?,
        };
        let content = fs::read_to_string(path)?;
        self.add_document(&name, format, &content)?;
        Ok(name)
    }

    pub fn add_document(
        &mut self,
        name: &str,
        format: ContextFormat,
        content: &str,
    ) -> Result<(), SynthError> {
        let document: Value = match format {
            ContextFormat::Json => serde_json::from_str(content)?,
            ContextFormat::Toml => toml::from_str(content)?,
            ContextFormat::Yaml => serde_yaml::from_str(content)?,
        };
        let Value::Object(fields) = document else {
            return Err(SynthError::InvalidContext(format!(
                "context '{name}' must be a mapping at the top level"
            )));
        };

        let mut path = Vec::new();
        let mut namespace = Namespace::new();
        for (key, value) in &fields {
            path.push(key.clone());
            if let Some(converted) = self.convert(name, &mut path, value) {
                namespace.insert(key.clone(), converted);
            }
            path.pop();
        }

        debug!(event = "context_added", context = name, keys = namespace.len());
        self.insert(name, namespace);
        Ok(())
    }

    /// Adds or replaces a namespace built in code.
    pub fn insert(&mut self, name: &str, namespace: Namespace) {
        match self.namespaces.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = namespace,
            None => self.namespaces.push((name.to_string(), namespace)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, namespace)| namespace)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Copies alias targets into place. Targets that cannot be found are
    /// dropped with a warning.
    pub fn resolve_aliases(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for alias in pending {
            let Some(value) = self.find_target(&alias.target) else {
                warn!(
                    event = "context_alias_unresolved",
                    context = %alias.namespace,
                    key = %alias.path.join("."),
                    target = %alias.target
                );
                continue;
            };
            if let Some(namespace) = self.namespace_mut(&alias.namespace) {
                set_by_path(namespace, &alias.path, value);
            }
        }
    }

    /// Builds the ordered stack for the chain. A selector is either a
    /// namespace name or `name.sub` for one child mapping of it. Unknown
    /// selectors are skipped.
    pub fn stack<S: AsRef<str>>(&self, selectors: &[S]) -> Vec<Namespace> {
        let mut stack = Vec::with_capacity(selectors.len());
        for selector in selectors {
            let selector = selector.as_ref();
            let (name, sub) = match selector.split_once('.') {
                Some((name, sub)) => (name, Some(sub)),
                None => (selector, None),
            };
            let Some(namespace) = self.get(name) else {
                warn!(event = "context_unknown", selector = selector);
                continue;
            };
            match sub {
                None => stack.push(namespace.clone()),
                Some(sub) => match namespace.get(sub).and_then(ContextValue::as_map) {
                    Some(child) => stack.push(child.clone()),
                    None => warn!(event = "context_unknown", selector = selector),
                },
            }
        }
        stack
    }

    /// Every namespace in insertion order.
    pub fn all(&self) -> Vec<Namespace> {
        self.namespaces
            .iter()
            .map(|(_, namespace)| namespace.clone())
            .collect()
    }

    fn namespace_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, namespace)| namespace)
    }

    fn find_target(&self, target: &str) -> Option<ContextValue> {
        let mut parts = target.split('.');
        let namespace = self.get(parts.next()?)?;
        let mut current = namespace.get(parts.next()?)?;
        for part in parts {
            current = current.as_map()?.get(part)?;
        }
        Some(current.clone())
    }

    fn convert(&mut self, name: &str, path: &mut Vec<String>, value: &Value) -> Option<ContextValue> {
        match value {
            Value::Null => None,
            Value::String(text) => self.convert_string(name, path, text),
            Value::Array(items) => Some(ContextValue::List(
                items.iter().filter_map(ContextValue::from_json).collect(),
            )),
            Value::Object(fields) => {
                let mut map = Namespace::new();
                for (key, child) in fields {
                    path.push(key.clone());
                    if let Some(converted) = self.convert(name, path, child) {
                        map.insert(key.clone(), converted);
                    }
                    path.pop();
                }
                Some(ContextValue::Map(map))
            }
            scalar => MixedValue::from_json(scalar).map(ContextValue::Scalar),
        }
    }

    fn convert_string(&mut self, name: &str, path: &[String], text: &str) -> Option<ContextValue> {
        let literal = || Some(ContextValue::from(text));
        let Some((prefix, rest)) = text.split_once(':') else {
            return literal();
        };

        match prefix.to_ascii_lowercase().as_str() {
            "fake" => {
                let dotted = path.join(".");
                let id = if rest.is_empty() { dotted.as_str() } else { rest };
                match FakeRegistry::global().context_value(id) {
                    Some(value) => Some(value),
                    None => {
                        warn!(event = "context_unknown_fake", context = name, key = %dotted, fake = id);
                        literal()
                    }
                }
            }
            "func" => match parse_func(rest) {
                Some(value) => Some(value),
                None => {
                    warn!(event = "context_unknown_func", context = name, key = %path.join("."), func = rest);
                    literal()
                }
            },
            "botify" => Some(botify_generator(rest)),
            "alias" => {
                self.pending.push(PendingAlias {
                    namespace: name.to_string(),
                    path: path.to_vec(),
                    target: rest.to_string(),
                });
                None
            }
            _ => literal(),
        }
    }
}

fn parse_func(call: &str) -> Option<ContextValue> {
    let (func, arg) = match call.split_once(':') {
        Some((func, arg)) => (func, Some(arg)),
        None => (call, None),
    };
    match (func, arg) {
        ("echo", Some(text)) => {
            let text = text.to_string();
            Some(ContextValue::generator(move |_| MixedValue::String(text.clone())))
        }
        ("botify", Some(pattern)) => Some(botify_generator(pattern)),
        ("int_between", Some(bounds)) => {
            let (min, max) = bounds.split_once(',')?;
            let min: i64 = min.trim().parse().ok()?;
            let max: i64 = max.trim().parse().ok()?;
            let (min, max) = if min <= max { (min, max) } else { (max, min) };
            Some(ContextValue::generator(move |rng: &mut dyn RngCore| {
                MixedValue::Int(rng.random_range(min..=max))
            }))
        }
        (id, None) => FakeRegistry::global().context_value(id),
        _ => None,
    }
}

fn botify_generator(pattern: &str) -> ContextValue {
    let pattern = pattern.to_string();
    ContextValue::generator(move |rng| MixedValue::String(bothify(&pattern, rng)))
}

fn set_by_path(namespace: &mut Namespace, path: &[String], value: ContextValue) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut map = namespace;
    for part in parents {
        let entry = map
            .entry(part.clone())
            .or_insert_with(|| ContextValue::Map(Namespace::new()));
        if !matches!(entry, ContextValue::Map(_)) {
            *entry = ContextValue::Map(Namespace::new());
        }
        let ContextValue::Map(child) = entry else {
            return;
        };
        map = child;
    }
    map.insert(last.clone(), value);
}
