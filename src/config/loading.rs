//! TOML configuration file discovery, parsing and validation

use super::error::{ConfigError, ConfigResult};
use super::types::Configuration;
use std::path::{Path, PathBuf};

/// Default configuration file location: `<config_dir>/Reposcan/reposcan.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Reposcan").join("reposcan.toml"))
}

/// Load the configuration.
///
/// An explicitly given file must exist. Without one, the default location is
/// used if present, otherwise the built-in defaults.
pub fn load_configuration(config_file: Option<&Path>) -> ConfigResult<Configuration> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            parse_configuration(&contents, &path)
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Ok(Configuration::default())
        }
    }
}

/// Parse and validate a TOML document; `origin` is used in error messages
pub fn parse_configuration(contents: &str, origin: &Path) -> ConfigResult<Configuration> {
    let config: Configuration = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_configuration(&config)?;
    Ok(config)
}

/// Check every pattern compiles and ids are well formed
pub fn validate_configuration(config: &Configuration) -> ConfigResult<()> {
    let scanning = &config.repository_scanning;

    let mut seen = std::collections::HashSet::new();
    for file_type in &scanning.file_types {
        if file_type.id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "file type id cannot be empty".to_string(),
            });
        }
        if !seen.insert(file_type.id.as_str()) {
            return Err(ConfigError::Invalid {
                message: format!("file type '{}' is defined more than once", file_type.id),
            });
        }
        for pattern in &file_type.patterns {
            validate_pattern(pattern, &format!("file type '{}'", file_type.id))?;
        }
    }

    for pattern in &config.scan.ignore_patterns {
        validate_pattern(pattern, "scan.ignore-patterns")?;
    }

    if config.scan.queue_capacity == 0 {
        return Err(ConfigError::Invalid {
            message: "scan.queue-capacity must be greater than 0".to_string(),
        });
    }

    if let Some(format) = &config.logging.format {
        format
            .parse::<crate::core::logging::LogFormat>()
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;
    }

    Ok(())
}

/// Validate glob pattern syntax
pub fn validate_pattern(pattern: &str, location: &str) -> ConfigResult<()> {
    if pattern.trim().is_empty() {
        return Err(ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            location: location.to_string(),
            message: "pattern cannot be empty".to_string(),
        });
    }
    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            location: location.to_string(),
            message: e.to_string(),
        })
}
