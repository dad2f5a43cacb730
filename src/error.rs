//! Error types for paperlens.

use thiserror::Error;

/// Result type for paperlens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for paperlens operations.
///
/// Degenerate numerics (zero-magnitude vectors) and empty inputs are not
/// errors: they produce zero scores and empty results.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input violates the contract of the operation (bad offsets, ragged
    /// embeddings, unknown entity category, unpairable corpora).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding or encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be parsed or holds invalid values.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a malformed input error.
    #[must_use]
    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether this error reports a contract violation in caller data.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedInput(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
