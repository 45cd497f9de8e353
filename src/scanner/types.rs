//! Scanner data types

use crate::consumer::{InvalidContentConsumer, KnownContentConsumer, Selection};
use crate::scanner::problems::ProblemReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity and location of the repository being scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub id: String,
    pub name: String,
    pub location: PathBuf,
}

impl RepositoryDescriptor {
    pub fn new(id: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location: location.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Descriptor with an id derived from the normalised location.
    ///
    /// The id is `repo-` followed by the first 16 hex digits of the SHA256 of
    /// the canonical path, so the same directory always gets the same id.
    pub fn from_path(location: &Path) -> Self {
        let normalised = location
            .canonicalize()
            .unwrap_or_else(|_| location.to_path_buf());

        let mut hasher = Sha256::new();
        hasher.update(normalised.to_string_lossy().as_bytes());
        let hash_hex = format!("{:x}", hasher.finalize());

        let name = normalised
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| normalised.to_string_lossy().to_string());

        Self {
            id: format!("repo-{}", &hash_hex[..16]),
            name,
            location: normalised,
        }
    }
}

/// Fresh scans treat every matched file as new; incremental scans compare
/// modification times against a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Fresh,
    Incremental { since: SystemTime },
}

impl ScanMode {
    /// The consumer lifecycle flag: true for a fresh scan of the whole repository
    pub fn executes_on_entire_repo(&self) -> bool {
        matches!(self, ScanMode::Fresh)
    }

    /// Whether a file with this modification time counts as new
    pub fn is_new(&self, modified: Option<SystemTime>) -> bool {
        match self {
            ScanMode::Fresh => true,
            // unknown mtime is treated as changed
            ScanMode::Incremental { since } => modified.map_or(true, |m| m >= *since),
        }
    }
}

/// Scan lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScanState {
    #[default]
    NotStarted,
    Scanning,
    Completed,
    Failed,
    Cancelled,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ScanState::NotStarted => "not started",
            ScanState::Scanning => "scanning",
            ScanState::Completed => "completed",
            ScanState::Failed => "failed",
            ScanState::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// One scan invocation: the repository, the borrowed consumers and the mode
pub struct ScanRequest<'a> {
    pub repository: RepositoryDescriptor,
    pub known_consumers: Vec<&'a mut dyn KnownContentConsumer>,
    pub invalid_consumers: Vec<&'a mut dyn InvalidContentConsumer>,
    pub global_ignore_patterns: Vec<String>,
    pub mode: ScanMode,
}

impl<'a> ScanRequest<'a> {
    pub fn new(repository: RepositoryDescriptor) -> Self {
        Self {
            repository,
            known_consumers: Vec::new(),
            invalid_consumers: Vec::new(),
            global_ignore_patterns: Vec::new(),
            mode: ScanMode::Fresh,
        }
    }

    /// Request using the consumers lent by a registry selection
    pub fn from_selection(repository: RepositoryDescriptor, selection: Selection<'a>) -> Self {
        Self {
            known_consumers: selection.known,
            invalid_consumers: selection.invalid,
            ..Self::new(repository)
        }
    }

    pub fn known_consumer(mut self, consumer: &'a mut dyn KnownContentConsumer) -> Self {
        self.known_consumers.push(consumer);
        self
    }

    pub fn invalid_consumer(mut self, consumer: &'a mut dyn InvalidContentConsumer) -> Self {
        self.invalid_consumers.push(consumer);
        self
    }

    pub fn ignore_patterns<S: Into<String>>(
        mut self,
        patterns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.global_ignore_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }
}

impl std::fmt::Debug for ScanRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanRequest")
            .field("repository", &self.repository)
            .field(
                "known_consumers",
                &self.known_consumers.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .field(
                "invalid_consumers",
                &self.invalid_consumers.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .field("global_ignore_patterns", &self.global_ignore_patterns)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Counters gathered by one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatistics {
    pub repository_id: String,
    pub when_gathered: DateTime<Utc>,
    pub duration_millis: u64,
    /// Files matched by at least one known consumer
    pub total_file_count: u64,
    pub new_file_count: u64,
    /// Files that survived the ignore list
    pub visited_file_count: u64,
    /// Files offered to invalid consumers
    pub invalid_file_count: u64,
    /// Files delivered per consumer id
    pub consumer_counts: BTreeMap<String, u64>,
}

impl ScanStatistics {
    pub fn new(repository_id: impl Into<String>, when_gathered: DateTime<Utc>) -> Self {
        Self {
            repository_id: repository_id.into(),
            when_gathered,
            duration_millis: 0,
            total_file_count: 0,
            new_file_count: 0,
            visited_file_count: 0,
            invalid_file_count: 0,
            consumer_counts: BTreeMap::new(),
        }
    }

    pub(crate) fn delivered(&mut self, consumer_id: &str) {
        *self.consumer_counts.entry(consumer_id.to_string()).or_insert(0) += 1;
    }
}

/// Result of a scan whose setup succeeded
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub statistics: ScanStatistics,
    pub problems: ProblemReport,
    pub state: ScanState,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty() && self.state == ScanState::Completed
    }
}
