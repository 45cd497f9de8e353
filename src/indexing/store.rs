//! Index storage
//!
//! [`DirectoryIndexStore`] keeps one JSON document per repository in the
//! context's index directory. Entries are held in memory while a context is
//! open and written atomically (temporary file, then rename) on FINISH.

use crate::indexing::context::IndexingContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const INDEX_FILE_NAME: &str = "index.json";

pub type IndexResult<T> = Result<T, IndexError>;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index document {} is invalid: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{action} task has no target path")]
    MissingTarget { action: String },
}

/// One indexed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub path: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub sha256: String,
}

/// On-disk index document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub repository_id: String,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<IndexEntry>,
}

/// Destination of indexing work
pub trait IndexStore: Send {
    fn add(&mut self, context: &IndexingContext, path: &str) -> IndexResult<()>;

    fn delete(&mut self, context: &IndexingContext, path: &str) -> IndexResult<()>;

    /// Persist and close the context
    fn finish(&mut self, context: &IndexingContext) -> IndexResult<()>;
}

/// File-backed index, one `index.json` per index directory
#[derive(Debug, Default)]
pub struct DirectoryIndexStore {
    open: HashMap<String, BTreeMap<String, IndexEntry>>,
}

impl DirectoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts with unflushed entries
    pub fn open_contexts(&self) -> usize {
        self.open.len()
    }

    fn entries_for(
        &mut self,
        context: &IndexingContext,
    ) -> IndexResult<&mut BTreeMap<String, IndexEntry>> {
        match self.open.entry(context.id.clone()) {
            Entry::Occupied(open) => Ok(open.into_mut()),
            Entry::Vacant(slot) => {
                let entries: BTreeMap<String, IndexEntry> = if context.fresh {
                    BTreeMap::new()
                } else {
                    read_index(&context.index_dir)?
                        .map(|doc| {
                            doc.entries
                                .into_iter()
                                .map(|e| (e.path.clone(), e))
                                .collect()
                        })
                        .unwrap_or_default()
                };
                log::debug!(
                    "Opened index context {} ({} existing entries)",
                    context.id,
                    entries.len()
                );
                Ok(slot.insert(entries))
            }
        }
    }
}

impl IndexStore for DirectoryIndexStore {
    fn add(&mut self, context: &IndexingContext, path: &str) -> IndexResult<()> {
        let entry = describe_file(&context.resolve(path), path)?;
        self.entries_for(context)?.insert(path.to_string(), entry);
        Ok(())
    }

    fn delete(&mut self, context: &IndexingContext, path: &str) -> IndexResult<()> {
        self.entries_for(context)?.remove(path);
        Ok(())
    }

    fn finish(&mut self, context: &IndexingContext) -> IndexResult<()> {
        let entries = self.entries_for(context)?;
        let document = IndexDocument {
            repository_id: context.repository_id.clone(),
            updated_at: Utc::now(),
            entries: entries.values().cloned().collect(),
        };
        write_index(&context.index_dir, &document)?;
        log::info!(
            "Wrote index for '{}' with {} entries",
            context.repository_id,
            document.entries.len()
        );
        self.open.remove(&context.id);
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> IndexError + '_ {
    move |source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn describe_file(absolute: &Path, relative: &str) -> IndexResult<IndexEntry> {
    let mut file = std::fs::File::open(absolute).map_err(io_error(absolute))?;
    let metadata = file.metadata().map_err(io_error(absolute))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer).map_err(io_error(absolute))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(IndexEntry {
        path: relative.to_string(),
        size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        sha256: format!("{:x}", hasher.finalize()),
    })
}

/// Read the index in `index_dir`; `Ok(None)` if none has been written yet
pub fn read_index(index_dir: &Path) -> IndexResult<Option<IndexDocument>> {
    let path = index_dir.join(INDEX_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(io_error(&path))?;
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| IndexError::Format { path, source })
}

fn write_index(index_dir: &Path, document: &IndexDocument) -> IndexResult<()> {
    std::fs::create_dir_all(index_dir).map_err(io_error(index_dir))?;

    let target = index_dir.join(INDEX_FILE_NAME);
    let temporary = index_dir.join(format!("{}.tmp", INDEX_FILE_NAME));
    let json = serde_json::to_string_pretty(document).map_err(|source| IndexError::Format {
        path: target.clone(),
        source,
    })?;
    std::fs::write(&temporary, json).map_err(io_error(&temporary))?;
    std::fs::rename(&temporary, &target).map_err(io_error(&target))?;
    Ok(())
}
