//! Artifact listing consumer
//!
//! Records every artifact delivered during a scan and writes the listing at
//! `complete_scan`, either to stdout or to a file.

use crate::consumer::error::{ConsumerError, ConsumerResult};
use crate::consumer::traits::{Consumer, KnownContentConsumer};
use crate::filetypes::{FileTypes, ARTIFACTS};
use crate::scanner::RepositoryDescriptor;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

pub const ID: &str = "artifact-listing";

/// Line format for the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingFormat {
    #[default]
    Text,
    Json,
}

/// One listed artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub path: String,
    pub size: u64,
    pub modified: Option<String>,
}

/// Shared view of the latest listing, readable after the scan
pub type ListingHandle = Arc<Mutex<Vec<ListingEntry>>>;

pub struct ArtifactListingConsumer {
    file_types: Arc<FileTypes>,
    format: ListingFormat,
    output_file: Option<PathBuf>,
    root: Option<PathBuf>,
    entries: ListingHandle,
}

impl ArtifactListingConsumer {
    pub fn new(file_types: Arc<FileTypes>) -> Self {
        Self {
            file_types,
            format: ListingFormat::Text,
            output_file: None,
            root: None,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_format(mut self, format: ListingFormat) -> Self {
        self.format = format;
        self
    }

    /// Write the listing to a file instead of stdout
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Handle to the entries of the current or last scan
    pub fn listing(&self) -> ListingHandle {
        Arc::clone(&self.entries)
    }

    fn format_entry(&self, entry: &ListingEntry) -> String {
        match self.format {
            ListingFormat::Json => serde_json::to_string(entry).unwrap_or_default(),
            ListingFormat::Text => format!(
                "{}\t{}\t{}",
                entry.path,
                entry.size,
                entry.modified.as_deref().unwrap_or("-")
            ),
        }
    }

    fn write_listing(&self, entries: &[ListingEntry]) -> std::io::Result<()> {
        let lines: Vec<String> = entries.iter().map(|e| self.format_entry(e)).collect();
        match &self.output_file {
            Some(path) => {
                let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
                for line in &lines {
                    writeln!(writer, "{}", line)?;
                }
                writer.flush()
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                for line in &lines {
                    writeln!(out, "{}", line)?;
                }
                Ok(())
            }
        }
    }
}

impl Consumer for ArtifactListingConsumer {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> &str {
        "List the artifacts found in the repository"
    }

    fn begin_scan(
        &mut self,
        repository: &RepositoryDescriptor,
        _when: SystemTime,
        _execute_on_entire_repo: bool,
    ) -> ConsumerResult<()> {
        self.root = Some(repository.location.clone());
        self.entries
            .lock()
            .map_err(|_| ConsumerError::lifecycle(ID, "begin-scan", "listing lock poisoned"))?
            .clear();
        Ok(())
    }

    fn process_file(&mut self, path: &str, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ConsumerError::processing(ID, path, "scan was not started"))?;
        let metadata = std::fs::metadata(root.join(path)).map_err(|source| ConsumerError::Io {
            path: path.to_string(),
            source,
        })?;

        let entry = ListingEntry {
            path: path.to_string(),
            size: metadata.len(),
            modified: metadata
                .modified()
                .ok()
                .map(|m| DateTime::<Utc>::from(m).to_rfc3339()),
        };
        self.entries
            .lock()
            .map_err(|_| ConsumerError::processing(ID, path, "listing lock poisoned"))?
            .push(entry);
        Ok(())
    }

    fn complete_scan(&mut self, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ConsumerError::lifecycle(ID, "complete-scan", "listing lock poisoned"))?
            .clone();
        log::info!("Listed {} artifacts", entries.len());
        self.write_listing(&entries)
            .map_err(|e| ConsumerError::lifecycle(ID, "complete-scan", e.to_string()))
    }
}

impl KnownContentConsumer for ArtifactListingConsumer {
    fn includes(&self) -> Vec<String> {
        self.file_types.file_type_patterns(ARTIFACTS)
    }

    fn process_unmodified(&self) -> bool {
        true
    }
}
