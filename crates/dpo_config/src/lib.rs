//! Parsing and validation of `dpo.toml` optimizer configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`DpoConfig`] naming the design to optimize, the command script, and the
//! optimizer limits (RNG seed, net-size guard, displacement window).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
