//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::DpoConfig;
use std::path::Path;

/// File name looked up inside a configuration directory.
pub const CONFIG_FILE_NAME: &str = "dpo.toml";

/// Loads and validates `dpo.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<DpoConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<DpoConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `dpo.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<DpoConfig, ConfigError> {
    let config: DpoConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and limits are sane.
fn validate_config(config: &DpoConfig) -> Result<(), ConfigError> {
    if config.design.input.trim().is_empty() {
        return Err(ConfigError::MissingField("design.input"));
    }
    let opt = &config.optimize;
    if opt.skip_nets_larger_than < 2 {
        return Err(ConfigError::Invalid {
            field: "optimize.skip_nets_larger_than",
            reason: format!("must be at least 2, got {}", opt.skip_nets_larger_than),
        });
    }
    for (field, value) in [
        ("optimize.max_displacement_x", opt.max_displacement_x),
        ("optimize.max_displacement_y", opt.max_displacement_y),
    ] {
        if value < 1 {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("must be positive, got {value}"),
            });
        }
    }
    Ok(())
}
