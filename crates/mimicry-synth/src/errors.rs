use thiserror::Error;

/// Errors emitted while loading contexts or configuration.
///
/// Value resolution itself never fails; see [`crate::Replacement`].
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("invalid context: {0}")]
    InvalidContext(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
