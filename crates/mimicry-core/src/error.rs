use thiserror::Error;

/// Core error type shared across Mimicry crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema node violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by Mimicry crates.
pub type Result<T> = std::result::Result<T, Error>;
