//! Consumer that hands indexing work to the task queue
//!
//! Nothing is indexed on the scan thread. Each delivered file becomes an ADD
//! task and the end of the scan becomes a FINISH task; an [`IndexingExecutor`]
//! on another thread applies them in order.
//!
//! [`IndexingExecutor`]: crate::indexing::IndexingExecutor

use crate::consumer::{Consumer, ConsumerError, ConsumerResult, KnownContentConsumer};
use crate::filetypes::{FileTypes, ARTIFACTS, DEFAULT_EXCLUSIONS, INDEXABLE_CONTENT};
use crate::indexing::context::IndexingContext;
use crate::indexing::task::IndexingTask;
use crate::indexing::index_ignore_pattern;
use crate::queue::QueuePublisher;
use crate::scanner::RepositoryDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

pub const ID: &str = "index-content";

pub struct IndexingTaskConsumer {
    file_types: Arc<FileTypes>,
    publisher: QueuePublisher<IndexingTask>,
    index_directory: String,
    contexts: HashMap<String, Arc<IndexingContext>>,
    current: Option<Arc<IndexingContext>>,
}

impl IndexingTaskConsumer {
    pub fn new(
        file_types: Arc<FileTypes>,
        publisher: QueuePublisher<IndexingTask>,
        index_directory: impl Into<String>,
    ) -> Self {
        Self {
            file_types,
            publisher,
            index_directory: index_directory.into(),
            contexts: HashMap::new(),
            current: None,
        }
    }

    /// Context of the scan in progress
    pub fn current_context(&self) -> Option<&Arc<IndexingContext>> {
        self.current.as_ref()
    }

    /// Last context used for a repository
    pub fn context_for(&self, repository_id: &str) -> Option<&Arc<IndexingContext>> {
        self.contexts.get(repository_id)
    }

    /// Queue removal of a file from the current scan's index
    pub fn request_delete(&self, path: &str) -> ConsumerResult<u64> {
        let context = self.require_context(path)?;
        Ok(self.publisher.enqueue(IndexingTask::delete(context, path))?)
    }

    fn require_context(&self, path: &str) -> ConsumerResult<Arc<IndexingContext>> {
        self.current
            .clone()
            .ok_or_else(|| ConsumerError::processing(ID, path, "no indexing context is open"))
    }

    fn open_context(
        &self,
        repository: &RepositoryDescriptor,
        when: SystemTime,
        fresh: bool,
    ) -> ConsumerResult<IndexingContext> {
        let context = IndexingContext::open(
            &repository.id,
            &repository.location,
            &self.index_directory,
            when,
            fresh,
        );
        std::fs::create_dir_all(&context.index_dir).map_err(|e| {
            ConsumerError::lifecycle(
                ID,
                "begin-scan",
                format!("cannot create {}: {}", context.index_dir.display(), e),
            )
        })?;
        Ok(context)
    }
}

impl Consumer for IndexingTaskConsumer {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> &str {
        "Queue repository content for indexing"
    }

    fn begin_scan(
        &mut self,
        repository: &RepositoryDescriptor,
        when: SystemTime,
        execute_on_entire_repo: bool,
    ) -> ConsumerResult<()> {
        let context = match self.contexts.get(&repository.id) {
            Some(existing) if !execute_on_entire_repo => existing.refreshed(when),
            _ => self.open_context(repository, when, execute_on_entire_repo)?,
        };
        log::debug!(
            "Indexing context {} for '{}' (fresh: {})",
            context.id,
            repository.id,
            context.fresh
        );

        let context = Arc::new(context);
        self.contexts.insert(repository.id.clone(), Arc::clone(&context));
        self.current = Some(context);
        Ok(())
    }

    fn process_file(&mut self, path: &str, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        let context = self.require_context(path)?;
        self.publisher.enqueue(IndexingTask::add(context, path))?;
        Ok(())
    }

    fn complete_scan(&mut self, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        let context = self.current.take().ok_or_else(|| {
            ConsumerError::lifecycle(ID, "complete-scan", "no indexing context is open")
        })?;
        self.publisher
            .enqueue(IndexingTask::finish(context))
            .map_err(|e| ConsumerError::lifecycle(ID, "complete-scan", e.to_string()))?;
        Ok(())
    }
}

impl KnownContentConsumer for IndexingTaskConsumer {
    fn includes(&self) -> Vec<String> {
        let mut includes = self.file_types.file_type_patterns(INDEXABLE_CONTENT);
        for pattern in self.file_types.file_type_patterns(ARTIFACTS) {
            if !includes.contains(&pattern) {
                includes.push(pattern);
            }
        }
        includes
    }

    fn excludes(&self) -> Vec<String> {
        let mut excludes: Vec<String> =
            DEFAULT_EXCLUSIONS.iter().map(|p| p.to_string()).collect();
        excludes.extend(index_ignore_pattern(&self.index_directory));
        excludes
    }
}
