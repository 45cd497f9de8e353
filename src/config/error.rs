//! Configuration Error Types

use crate::core::error_handling::ContextualError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid pattern '{pattern}' in {location}: {message}")]
    InvalidPattern {
        pattern: String,
        location: String,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<String> {
        match self {
            ConfigError::Read { .. } => None,
            other => Some(other.to_string()),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
