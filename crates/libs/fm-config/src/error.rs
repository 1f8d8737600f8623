//! Configuration error types.

use std::path::PathBuf;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading a local configuration file failed.
    #[error("failed to read config file {path}: {source}")]
    IO {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fetching a remote configuration document failed.
    #[error(transparent)]
    Fetch(#[from] fm_requests::error::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// YAML deserialization failed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// A required setting was not provided by the file or the environment.
    #[error("missing required setting '{0}'")]
    MissingField(&'static str),

    /// A setting was provided but cannot be used.
    #[error("invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
