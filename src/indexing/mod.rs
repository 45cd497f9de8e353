//! Indexing task dispatch
//!
//! The scan thread only produces tasks. [`IndexingTaskConsumer`] turns
//! delivered files into ADD tasks and the end of a scan into a FINISH task;
//! [`IndexingExecutor`] drains the queue on its own thread and applies them
//! to an [`IndexStore`].
//!
//! ```text
//! scanner ──► IndexingTaskConsumer ──enqueue──► TaskQueue
//!                                                   │
//!                                                   └──take──► IndexingExecutor ──► IndexStore
//! ```

mod consumer;
mod context;
mod executor;
mod store;
mod task;

pub use consumer::{IndexingTaskConsumer, ID as INDEXING_CONSUMER_ID};
pub use context::IndexingContext;
pub use executor::{ExecutorStats, IndexingExecutor};
pub use store::{
    read_index, DirectoryIndexStore, IndexDocument, IndexEntry, IndexError, IndexResult, IndexStore,
    INDEX_FILE_NAME,
};
pub use task::{IndexingAction, IndexingTask};

use crate::config::ScanSettings;
use crate::queue::TaskQueue;
use std::path::{Component, Path};
use std::sync::Arc;

/// Queue id used for indexing work
pub const INDEXING_QUEUE_ID: &str = "indexing";

/// Create the indexing queue sized from the scan settings
pub fn create_indexing_queue(settings: &ScanSettings) -> Arc<TaskQueue<IndexingTask>> {
    Arc::new(TaskQueue::new(
        INDEXING_QUEUE_ID,
        settings.queue_capacity,
        settings.overflow,
    ))
}

/// Scan ignore pattern covering an index directory kept inside the repository.
///
/// `None` for an absolute location or one that climbs out of the root.
pub fn index_ignore_pattern(index_directory: &str) -> Option<String> {
    let mut segments = Vec::new();
    for component in Path::new(index_directory).components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(format!("{}/**", segments.join("/")))
}
