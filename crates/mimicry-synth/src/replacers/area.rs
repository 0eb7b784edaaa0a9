use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fake::Fake;
use fake::faker::internet::en::{Password, Username};
use rand::RngCore;
use serde_json::Value;

use crate::context::lookup;
use crate::replacers::{ReplaceContext, Replacement, Replacer, ReplacerRegistry};
use crate::text::to_snake_case;

pub const IN_HEADERS: &str = "in_headers";
pub const IN_PATH: &str = "in_path";

pub fn register(registry: &mut ReplacerRegistry) {
    registry.register_replacer(Arc::new(InHeaders));
    registry.register_replacer(Arc::new(InPath));
}

/// Header values from the `<prefix>header` namespace, plus synthesized
/// `Authorization` credentials for `basic` and `bearer` formats.
pub struct InHeaders;

impl Replacer for InHeaders {
    fn id(&self) -> &'static str {
        IN_HEADERS
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement {
        let Some(state) = ctx.state.filter(|state| state.is_header) else {
            return Replacement::Absent;
        };
        let found = replace_in_area(ctx, "header", rng);

        let is_authorization = state
            .root_name()
            .is_some_and(|name| name.eq_ignore_ascii_case("authorization"));
        if !is_authorization || matches!(found, Replacement::ExplicitNull) {
            return found;
        }

        match ctx.format() {
            Some("basic") => {
                let credentials = credential_text(&found).unwrap_or_else(|| {
                    let user: String = Username().fake_with_rng(rng);
                    let password: String = Password(8..16).fake_with_rng(rng);
                    format!("{user}:{password}")
                });
                Replacement::Value(Value::String(format!(
                    "Basic {}",
                    STANDARD.encode(credentials)
                )))
            }
            Some("bearer") => {
                let token = credential_text(&found)
                    .unwrap_or_else(|| Password(16..32).fake_with_rng(rng));
                Replacement::Value(Value::String(format!("Bearer {token}")))
            }
            _ => found,
        }
    }
}

/// Path parameter values from the `<prefix>path` namespace.
pub struct InPath;

impl Replacer for InPath {
    fn id(&self) -> &'static str {
        IN_PATH
    }

    fn replace(&self, ctx: &ReplaceContext<'_>, rng: &mut dyn RngCore) -> Replacement {
        if !ctx.state.is_some_and(|state| state.is_path) {
            return Replacement::Absent;
        }
        replace_in_area(ctx, "path", rng)
    }
}

fn replace_in_area(ctx: &ReplaceContext<'_>, area: &str, rng: &mut dyn RngCore) -> Replacement {
    if ctx.area_prefix.is_empty() {
        return Replacement::Absent;
    }
    let Some(name) = ctx.state.and_then(|state| state.root_name()) else {
        return Replacement::Absent;
    };
    let key = format!("{}{area}", ctx.area_prefix);
    let path = [to_snake_case(name)];

    for namespace in ctx.namespaces() {
        let Some(scoped) = namespace.get(&key).and_then(|value| value.as_map()) else {
            continue;
        };
        let found = lookup(scoped, &path, rng);
        if !found.is_absent() {
            return found;
        }
    }
    Replacement::Absent
}

fn credential_text(found: &Replacement) -> Option<String> {
    match found.value()? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}
