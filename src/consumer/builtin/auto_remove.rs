//! Removes editor backups and other leftovers matching the `auto-remove` file type

use crate::consumer::error::{ConsumerError, ConsumerResult};
use crate::consumer::traits::{Consumer, KnownContentConsumer};
use crate::filetypes::{FileTypes, AUTO_REMOVE};
use crate::scanner::RepositoryDescriptor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

pub const ID: &str = "auto-remove";

pub struct AutoRemoveConsumer {
    file_types: Arc<FileTypes>,
    root: Option<PathBuf>,
    dry_run: bool,
    removed: Vec<String>,
}

impl AutoRemoveConsumer {
    pub fn new(file_types: Arc<FileTypes>) -> Self {
        Self {
            file_types,
            root: None,
            dry_run: false,
            removed: Vec::new(),
        }
    }

    /// Log what would be removed without deleting anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Paths removed (or that would be removed) during the last scan
    pub fn removed(&self) -> &[String] {
        &self.removed
    }
}

impl Consumer for AutoRemoveConsumer {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> &str {
        "Automatically remove backup and temporary files"
    }

    fn begin_scan(
        &mut self,
        repository: &RepositoryDescriptor,
        _when: SystemTime,
        _execute_on_entire_repo: bool,
    ) -> ConsumerResult<()> {
        self.root = Some(repository.location.clone());
        self.removed.clear();
        Ok(())
    }

    fn process_file(&mut self, path: &str, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ConsumerError::processing(ID, path, "scan was not started"))?;

        if self.dry_run {
            log::info!("Would remove {}", path);
        } else {
            std::fs::remove_file(root.join(path)).map_err(|source| ConsumerError::Io {
                path: path.to_string(),
                source,
            })?;
            log::info!("Removed {}", path);
        }
        self.removed.push(path.to_string());
        Ok(())
    }

    fn complete_scan(&mut self, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        if !self.removed.is_empty() {
            log::info!("Auto-removed {} files", self.removed.len());
        }
        self.root = None;
        Ok(())
    }
}

impl KnownContentConsumer for AutoRemoveConsumer {
    fn includes(&self) -> Vec<String> {
        self.file_types.file_type_patterns(AUTO_REMOVE)
    }

    fn process_unmodified(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, ConfigurationRegistry};
    use crate::consumer::WantsFilePredicate;

    fn consumer() -> AutoRemoveConsumer {
        let registry = Arc::new(ConfigurationRegistry::new(Configuration::default()));
        AutoRemoveConsumer::new(FileTypes::new(registry))
    }

    #[test]
    fn test_wants_backup_files_only() {
        let predicate = WantsFilePredicate::for_consumer(&consumer());
        assert!(predicate.wants("org/a/a-1.0.pom.bak"));
        assert!(predicate.wants("org/a/a-1.0.pom~"));
        assert!(!predicate.wants("org/a/a-1.0.pom"));
    }

    #[test]
    fn test_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pom.bak"), b"old").unwrap();
        let repo = RepositoryDescriptor::new("internal", dir.path().to_path_buf());

        let mut remover = consumer();
        remover.begin_scan(&repo, SystemTime::now(), true).unwrap();
        remover.process_file("a.pom.bak", true).unwrap();
        remover.complete_scan(true).unwrap();

        assert!(!dir.path().join("a.pom.bak").exists());
        assert_eq!(remover.removed(), ["a.pom.bak".to_string()]);
    }

    #[test]
    fn test_dry_run_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pom.bak"), b"old").unwrap();
        let repo = RepositoryDescriptor::new("internal", dir.path().to_path_buf());

        let mut remover = consumer().dry_run(true);
        remover.begin_scan(&repo, SystemTime::now(), true).unwrap();
        remover.process_file("a.pom.bak", true).unwrap();

        assert!(dir.path().join("a.pom.bak").exists());
        assert_eq!(remover.removed().len(), 1);
    }
}
