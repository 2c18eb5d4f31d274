//! Errors raised while reading `dpo.toml`.

use std::path::PathBuf;

/// Why a configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML is malformed or does not match the schema.
    #[error("invalid dpo.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A value is out of range.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted field name, e.g. `optimize.seed`.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}
