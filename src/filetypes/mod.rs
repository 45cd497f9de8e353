//! File Types
//!
//! Resolves a file type id to its ordered pattern list. Lookup order is the
//! live configuration, then the packaged defaults, then the catch-all `**/*`.
//! The packaged defaults are parsed once and never change; configuration
//! changes only drop the derived artifact pattern cache.

use crate::config::{
    ConfigurationEvent, ConfigurationListener, ConfigurationRegistry, FileType,
    PROPERTY_FILE_TYPES,
};
use crate::pathmatch;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

pub const ARTIFACTS: &str = "artifacts";
pub const INDEXABLE_CONTENT: &str = "indexable-content";
pub const AUTO_REMOVE: &str = "auto-remove";
pub const IGNORED: &str = "ignored";

/// Pattern substituted when neither configuration nor defaults know an id
pub const CATCH_ALL: &str = "**/*";

/// Checksum and signature sidecars, repository metadata and index directories
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "**/maven-metadata.xml",
    "**/maven-metadata-*.xml",
    "**/*.sha1",
    "**/*.asc",
    "**/*.md5",
    "**/*.pgp",
    "**/.index/**",
    "**/.indexer/**",
];

/// Version control, lock files and index directories never worth visiting
const BUILTIN_SCAN_IGNORES: &[&str] = &[
    "**/.git/**",
    "**/.svn/**",
    "**/CVS/**",
    "**/.hg/**",
    "**/.bzr/**",
    "**/*.lock",
    "**/.DS_Store",
    "**/.index/**",
    "**/.indexer/**",
];

const PACKAGED_DEFAULTS: &str = include_str!("default_filetypes.toml");

#[derive(Deserialize)]
struct DefaultsDocument {
    #[serde(rename = "file-types", default)]
    file_types: Vec<FileType>,
}

static DEFAULT_PATTERNS: Lazy<HashMap<String, Vec<String>>> =
    Lazy::new(|| parse_defaults(PACKAGED_DEFAULTS));

fn parse_defaults(document: &str) -> HashMap<String, Vec<String>> {
    match toml::from_str::<DefaultsDocument>(document) {
        Ok(doc) => doc
            .file_types
            .into_iter()
            .map(|ft| (ft.id, ft.patterns))
            .collect(),
        Err(e) => {
            log::error!("Packaged file type defaults are unreadable: {}", e);
            HashMap::new()
        }
    }
}

/// Packaged default patterns for an id, if there are any
pub fn default_patterns(id: &str) -> Option<&'static [String]> {
    DEFAULT_PATTERNS.get(id).map(Vec::as_slice)
}

/// File type resolution backed by the live configuration
pub struct FileTypes {
    registry: Arc<ConfigurationRegistry>,
    /// Lower-cased artifact patterns; `None` until first use or after a change
    artifact_patterns: RwLock<Option<Arc<Vec<String>>>>,
}

impl FileTypes {
    /// Create and subscribe to configuration changes
    pub fn new(registry: Arc<ConfigurationRegistry>) -> Arc<Self> {
        let file_types = Arc::new(Self {
            registry: Arc::clone(&registry),
            artifact_patterns: RwLock::new(None),
        });
        let listener: Weak<dyn ConfigurationListener> =
            Arc::downgrade(&file_types) as Weak<dyn ConfigurationListener>;
        registry.subscribe(listener);
        file_types
    }

    /// Ordered patterns for `id`; never empty
    pub fn file_type_patterns(&self, id: &str) -> Vec<String> {
        let config = self.registry.snapshot();
        if let Some(configured) = config.repository_scanning.file_type(id) {
            if !configured.patterns.is_empty() {
                return configured.patterns.clone();
            }
        }
        match default_patterns(id) {
            Some(defaults) if !defaults.is_empty() => defaults.to_vec(),
            _ => vec![CATCH_ALL.to_string()],
        }
    }

    /// Every id known to the configuration or the packaged defaults, sorted
    pub fn file_type_ids(&self) -> Vec<String> {
        let config = self.registry.snapshot();
        let mut ids: Vec<String> = DEFAULT_PATTERNS.keys().cloned().collect();
        for ft in &config.repository_scanning.file_types {
            if !ids.contains(&ft.id) {
                ids.push(ft.id.clone());
            }
        }
        ids.sort();
        ids
    }

    /// True if the path matches any `artifacts` pattern, ignoring case
    pub fn matches_artifact_pattern(&self, path: &str) -> bool {
        let patterns = self.artifact_patterns();
        let path = normalise(path);
        pathmatch::any_matches(patterns.as_slice(), &path, false)
    }

    /// True if the path matches the built-in exclusion list, ignoring case
    pub fn matches_default_exclusions(&self, path: &str) -> bool {
        let path = normalise(path);
        pathmatch::any_matches(DEFAULT_EXCLUSIONS, &path, false)
    }

    /// Base ignore list for repository scans
    pub fn scan_ignore_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> =
            BUILTIN_SCAN_IGNORES.iter().map(|p| p.to_string()).collect();
        for pattern in self.file_type_patterns(IGNORED) {
            if !patterns.contains(&pattern) {
                patterns.push(pattern);
            }
        }
        patterns
    }

    fn artifact_patterns(&self) -> Arc<Vec<String>> {
        if let Ok(cache) = self.artifact_patterns.read() {
            if let Some(patterns) = cache.as_ref() {
                return Arc::clone(patterns);
            }
        }

        let patterns: Arc<Vec<String>> = Arc::new(
            self.file_type_patterns(ARTIFACTS)
                .iter()
                .map(|p| normalise(p))
                .collect(),
        );
        if let Ok(mut cache) = self.artifact_patterns.write() {
            *cache = Some(Arc::clone(&patterns));
        }
        patterns
    }

    fn invalidate(&self) {
        if let Ok(mut cache) = self.artifact_patterns.write() {
            *cache = None;
        }
    }

    #[cfg(test)]
    fn is_cached(&self) -> bool {
        self.artifact_patterns
            .read()
            .map(|c| c.is_some())
            .unwrap_or(false)
    }
}

impl ConfigurationListener for FileTypes {
    fn configuration_changed(&self, event: &ConfigurationEvent) {
        if event.property_name == PROPERTY_FILE_TYPES {
            log::debug!("File types changed, dropping cached artifact patterns");
            self.invalidate();
        }
    }
}

impl std::fmt::Debug for FileTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTypes")
            .field("ids", &self.file_type_ids())
            .finish()
    }
}

fn normalise(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}
