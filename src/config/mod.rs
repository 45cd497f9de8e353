//! Configuration
//!
//! Loads the TOML configuration, validates its patterns and keeps the live
//! snapshot in a [`ConfigurationRegistry`] that notifies listeners when
//! properties change.

mod error;
mod loading;
mod registry;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use loading::{
    default_config_path, load_configuration, parse_configuration, validate_configuration,
    validate_pattern,
};
pub use registry::{
    ConfigurationEvent, ConfigurationListener, ConfigurationRegistry, PROPERTY_FILE_TYPES,
    PROPERTY_INVALID_CONSUMERS, PROPERTY_KNOWN_CONSUMERS, PROPERTY_LOGGING, PROPERTY_SCAN,
};
pub use types::{Configuration, FileType, LoggingSettings, RepositoryScanningConfig, ScanSettings};
