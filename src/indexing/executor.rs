//! Indexing executor
//!
//! A single named worker thread drains the indexing queue and applies each
//! task to an [`IndexStore`]. One worker keeps tasks in submission order, so
//! a FINISH is always applied after every ADD queued before it.

use crate::indexing::store::{IndexError, IndexResult, IndexStore};
use crate::indexing::task::{IndexingAction, IndexingTask};
use crate::queue::TaskQueue;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Counters reported when the executor shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorStats {
    pub added: u64,
    pub deleted: u64,
    pub finished: u64,
    pub failed: u64,
}

pub struct IndexingExecutor {
    queue: Arc<TaskQueue<IndexingTask>>,
    worker: Option<JoinHandle<ExecutorStats>>,
}

impl IndexingExecutor {
    /// Spawn the worker thread
    pub fn start<S>(queue: Arc<TaskQueue<IndexingTask>>, store: S) -> IndexResult<Self>
    where
        S: IndexStore + 'static,
    {
        let worker_queue = Arc::clone(&queue);
        let worker = std::thread::Builder::new()
            .name("indexing-executor".to_string())
            .spawn(move || run_worker(worker_queue, store))
            .map_err(|source| IndexError::Io {
                path: std::path::PathBuf::from(queue.queue_id()),
                source,
            })?;

        log::debug!("Indexing executor started on queue '{}'", queue.queue_id());
        Ok(Self {
            queue,
            worker: Some(worker),
        })
    }

    /// Close the queue, let the worker drain it and wait for it to exit
    pub fn shutdown(mut self) -> ExecutorStats {
        self.stop()
    }

    fn stop(&mut self) -> ExecutorStats {
        self.queue.close();
        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(stats)) => {
                log::debug!("Indexing executor stopped: {:?}", stats);
                stats
            }
            Some(Err(_)) => {
                log::error!("Indexing executor thread panicked");
                ExecutorStats::default()
            }
            None => ExecutorStats::default(),
        }
    }
}

impl Drop for IndexingExecutor {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

fn run_worker<S: IndexStore>(queue: Arc<TaskQueue<IndexingTask>>, mut store: S) -> ExecutorStats {
    let mut stats = ExecutorStats::default();
    loop {
        let entry = match queue.take() {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                log::error!("Indexing queue failed: {}", e);
                break;
            }
        };

        let task = entry.item;
        log::trace!("#{} {}", entry.sequence, task);
        match apply(&mut store, &task) {
            Ok(()) => match task.action {
                IndexingAction::Add => stats.added += 1,
                IndexingAction::Delete => stats.deleted += 1,
                IndexingAction::Finish => stats.finished += 1,
            },
            Err(e) => {
                stats.failed += 1;
                log::error!("Indexing task {} failed: {}", task, e);
            }
        }
    }
    stats
}

fn apply<S: IndexStore>(store: &mut S, task: &IndexingTask) -> IndexResult<()> {
    let target = || {
        task.target_path
            .as_deref()
            .ok_or_else(|| IndexError::MissingTarget {
                action: task.action.to_string(),
            })
    };
    match task.action {
        IndexingAction::Add => store.add(&task.context, target()?),
        IndexingAction::Delete => store.delete(&task.context, target()?),
        IndexingAction::Finish => store.finish(&task.context),
    }
}
