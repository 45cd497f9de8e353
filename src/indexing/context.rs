//! Indexing context: the index state of one repository for one scan

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Handle to a repository's index, shared by every task of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingContext {
    pub id: String,
    pub repository_id: String,
    pub repository_root: PathBuf,
    pub index_dir: PathBuf,
    pub opened_at: SystemTime,
    /// Timestamp of the scan currently using this context
    pub last_scan: SystemTime,
    /// A fresh context starts from an empty index; otherwise the existing index is extended
    pub fresh: bool,
}

impl IndexingContext {
    /// Open a context whose index lives in `index_directory` under the repository root
    pub fn open(
        repository_id: &str,
        repository_root: &Path,
        index_directory: &str,
        when: SystemTime,
        fresh: bool,
    ) -> Self {
        let index_dir = repository_root.join(index_directory);
        Self {
            id: context_id(repository_id, &index_dir, when),
            repository_id: repository_id.to_string(),
            repository_root: repository_root.to_path_buf(),
            index_dir,
            opened_at: when,
            last_scan: when,
            fresh,
        }
    }

    /// The same index used again by a later incremental scan
    pub fn refreshed(&self, when: SystemTime) -> Self {
        Self {
            last_scan: when,
            fresh: false,
            ..self.clone()
        }
    }

    /// Absolute path of a repository-relative file
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.repository_root.join(relative_path)
    }
}

fn context_id(repository_id: &str, index_dir: &Path, when: SystemTime) -> String {
    let nanos = when
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(repository_id.as_bytes());
    hasher.update(index_dir.to_string_lossy().as_bytes());
    hasher.update(nanos.to_le_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());
    format!("idx-{}", &hash_hex[..16])
}
