//! Configuration snapshot types
//!
//! A [`Configuration`] is an immutable snapshot. Components receive it (or an
//! `Arc` of it) at call time instead of reading global state.

use crate::queue::{OverflowPolicy, DEFAULT_QUEUE_CAPACITY};
use serde::{Deserialize, Serialize};

/// A named category of files and the patterns that select them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    pub id: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FileType {
    pub fn new<S: Into<String>>(
        id: impl Into<String>,
        patterns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id: id.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    pub repository_scanning: RepositoryScanningConfig,
    pub scan: ScanSettings,
    pub logging: LoggingSettings,
}

/// File types and the consumers enabled for scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RepositoryScanningConfig {
    pub file_types: Vec<FileType>,
    pub known_content_consumers: Vec<String>,
    pub invalid_content_consumers: Vec<String>,
}

impl Default for RepositoryScanningConfig {
    fn default() -> Self {
        Self {
            file_types: Vec::new(),
            known_content_consumers: vec!["index-content".to_string()],
            invalid_content_consumers: Vec::new(),
        }
    }
}

impl RepositoryScanningConfig {
    /// Configured file type with the given id, if any
    pub fn file_type(&self, id: &str) -> Option<&FileType> {
        self.file_types.iter().find(|ft| ft.id == id)
    }
}

/// Scanner and indexing queue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScanSettings {
    /// Extra patterns ignored by every scan, on top of the built-in list
    pub ignore_patterns: Vec<String>,
    pub queue_capacity: usize,
    pub overflow: OverflowPolicy,
    /// Index directory, relative to the repository root
    pub index_directory: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow: OverflowPolicy::Fail,
            index_directory: ".indexer".to_string(),
        }
    }
}

/// Logging defaults; command line flags take precedence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<String>,
}
