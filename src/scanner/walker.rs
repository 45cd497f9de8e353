//! Deterministic repository traversal
//!
//! Visits files in lexicographic order per directory and never descends
//! into ignored directories.

use crate::pathmatch;
use crate::scanner::error::{ScanError, ScanResult};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// A file found under the repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Path relative to the root, `/` separated
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub modified: Option<SystemTime>,
}

pub struct RepositoryWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl RepositoryWalker {
    pub fn new(root: impl Into<PathBuf>, ignore_patterns: Vec<String>) -> Self {
        Self {
            root: root.into(),
            ignore_patterns,
        }
    }

    fn is_ignored(&self, relative_path: &str) -> bool {
        pathmatch::any_matches(&self.ignore_patterns, relative_path, true)
    }

    fn relative(&self, entry: &DirEntry) -> String {
        relative_path(&self.root, entry.path())
    }

    /// Iterate files; an I/O error ends the walk with `ScanError::Enumeration`.
    ///
    /// Links are not followed into directories. A link to a regular file is
    /// reported like the file itself; any other link is skipped.
    pub fn walk(&self) -> impl Iterator<Item = ScanResult<WalkedFile>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                entry.depth() == 0 || !self.is_ignored(&self.relative(entry))
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => self.walked_file(entry).map(Ok),
                Err(e) => Some(Err(ScanError::enumeration(
                    e.path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone()),
                    e.to_string(),
                ))),
            })
    }

    fn walked_file(&self, entry: DirEntry) -> Option<WalkedFile> {
        let modified = if entry.path_is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => target.modified().ok(),
                Ok(_) => {
                    log::debug!("Skipping link to a non-file: {}", entry.path().display());
                    return None;
                }
                Err(e) => {
                    log::debug!("Skipping dangling link {}: {}", entry.path().display(), e);
                    return None;
                }
            }
        } else if entry.file_type().is_file() {
            entry.metadata().ok().and_then(|m| m.modified().ok())
        } else {
            return None;
        };
        Some(WalkedFile {
            relative_path: self.relative(&entry),
            modified,
            absolute_path: entry.into_path(),
        })
    }
}

/// `path` relative to `root` with `/` separators
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
