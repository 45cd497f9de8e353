//! Indexing dispatch integration tests
//!
//! The indexing consumer runs inside a real scan while an executor drains
//! the queue on its own thread.

mod common;

use reposcan::config::{Configuration, ConfigurationRegistry};
use reposcan::consumer::{Consumer, KnownContentConsumer};
use reposcan::filetypes::FileTypes;
use reposcan::indexing::{
    read_index, DirectoryIndexStore, IndexResult, IndexStore, IndexingContext, IndexingExecutor,
    IndexingTask, IndexingTaskConsumer, INDEXING_CONSUMER_ID,
};
use reposcan::queue::{OverflowPolicy, TaskQueue};
use reposcan::scanner::{
    ProblemKind, RepositoryDescriptor, RepositoryScanner, ScanMode, ScanRequest, ScanState,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

const FILES: &[&str] = &[
    "org/example/app/1.0/app-1.0.jar",
    "org/example/app/1.0/app-1.0.pom",
    "org/example/app/1.0/app-1.0.jar.sha1",
    "org/example/app/maven-metadata.xml",
];

fn file_types() -> Arc<FileTypes> {
    FileTypes::new(Arc::new(ConfigurationRegistry::new(Configuration::default())))
}

fn queue(capacity: usize) -> Arc<TaskQueue<IndexingTask>> {
    Arc::new(TaskQueue::new("indexing", capacity, OverflowPolicy::Fail))
}

fn indexing_consumer(queue: &Arc<TaskQueue<IndexingTask>>) -> IndexingTaskConsumer {
    IndexingTaskConsumer::new(
        file_types(),
        queue.create_publisher(INDEXING_CONSUMER_ID),
        ".indexer",
    )
}

fn scan(
    consumer: &mut dyn KnownContentConsumer,
    repository: RepositoryDescriptor,
    mode: ScanMode,
) -> ScanState {
    let request = ScanRequest::new(repository).known_consumer(consumer).mode(mode);
    RepositoryScanner::new()
        .with_file_types(file_types())
        .scan(request)
        .unwrap()
        .state
}

/// Records the order in which tasks reach the store
#[derive(Default, Clone)]
struct OrderStore {
    applied: Arc<Mutex<Vec<String>>>,
}

impl IndexStore for OrderStore {
    fn add(&mut self, _context: &IndexingContext, path: &str) -> IndexResult<()> {
        // slow store: the scan finishes long before the executor does
        std::thread::sleep(Duration::from_millis(5));
        self.applied.lock().unwrap().push(format!("ADD {}", path));
        Ok(())
    }

    fn delete(&mut self, _context: &IndexingContext, path: &str) -> IndexResult<()> {
        self.applied.lock().unwrap().push(format!("DELETE {}", path));
        Ok(())
    }

    fn finish(&mut self, _context: &IndexingContext) -> IndexResult<()> {
        self.applied.lock().unwrap().push("FINISH".to_string());
        Ok(())
    }
}

#[test]
fn test_finish_is_applied_after_every_add() {
    let files: Vec<String> = (0..50).map(|i| format!("lib/{:02}/lib-{:02}.jar", i, i)).collect();
    let names: Vec<&str> = files.iter().map(String::as_str).collect();
    let repo = common::repository(&names);

    let queue = queue(1000);
    let store = OrderStore::default();
    let applied = Arc::clone(&store.applied);
    let executor = IndexingExecutor::start(Arc::clone(&queue), store).unwrap();

    let mut consumer = indexing_consumer(&queue);
    let repository = RepositoryDescriptor::new("internal", repo.path());
    let state = scan(&mut consumer, repository, ScanMode::Fresh);
    assert_eq!(state, ScanState::Completed);

    let stats = executor.shutdown();
    assert_eq!(stats.added, 50);
    assert_eq!(stats.finished, 1);

    let applied = applied.lock().unwrap();
    assert_eq!(applied.len(), 51);
    assert_eq!(applied.last().map(String::as_str), Some("FINISH"));
    let expected: Vec<String> = files.iter().map(|f| format!("ADD {}", f)).collect();
    assert_eq!(&applied[..50], expected.as_slice());
}

#[test]
fn test_fresh_scan_writes_index_document() {
    let repo = common::repository(FILES);
    let queue = queue(100);
    let executor = IndexingExecutor::start(Arc::clone(&queue), DirectoryIndexStore::new()).unwrap();

    let mut consumer = indexing_consumer(&queue);
    scan(&mut consumer, RepositoryDescriptor::new("internal", repo.path()), ScanMode::Fresh);
    executor.shutdown();

    let index = read_index(&repo.path().join(".indexer")).unwrap().unwrap();
    assert_eq!(index.repository_id, "internal");
    let paths: Vec<&str> = index.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["org/example/app/1.0/app-1.0.jar", "org/example/app/1.0/app-1.0.pom"]
    );
    assert!(index.entries.iter().all(|e| e.sha256.len() == 64));
}

#[test]
fn test_incremental_scan_extends_existing_index() {
    let repo = common::repository(FILES);
    let repository = RepositoryDescriptor::new("internal", repo.path());
    let queue = queue(100);
    let executor = IndexingExecutor::start(Arc::clone(&queue), DirectoryIndexStore::new()).unwrap();
    let mut consumer = indexing_consumer(&queue);

    scan(&mut consumer, repository.clone(), ScanMode::Fresh);
    let first = consumer.context_for("internal").unwrap().id.clone();

    let since = SystemTime::now() - Duration::from_secs(1);
    common::write_file(repo.path(), "org/example/app/1.1/app-1.1.jar", b"new release");
    scan(&mut consumer, repository, ScanMode::Incremental { since });
    assert_eq!(consumer.context_for("internal").unwrap().id, first);

    let stats = executor.shutdown();
    assert_eq!(stats.finished, 2);

    let index = read_index(&repo.path().join(".indexer")).unwrap().unwrap();
    let paths: Vec<&str> = index.entries.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"org/example/app/1.0/app-1.0.jar"));
    assert!(paths.contains(&"org/example/app/1.1/app-1.1.jar"));
}

#[test]
fn test_full_queue_is_reported_per_file() {
    let repo = common::repository(&["a.jar", "b.jar", "c.jar"]);
    // nothing drains the queue
    let queue = queue(1);
    let mut consumer = indexing_consumer(&queue);

    let request = ScanRequest::new(RepositoryDescriptor::new("internal", repo.path()))
        .known_consumer(&mut consumer);
    let report = RepositoryScanner::new().scan(request).unwrap();

    assert_eq!(report.state, ScanState::Completed);
    assert_eq!(report.statistics.total_file_count, 3);
    let failed: Vec<&str> = report
        .problems
        .iter()
        .filter(|p| p.kind == ProblemKind::ProcessFile)
        .filter_map(|p| p.path.as_deref())
        .collect();
    assert_eq!(failed, vec!["b.jar", "c.jar"]);
    assert_eq!(report.problems.for_consumer(INDEXING_CONSUMER_ID).count(), 3);
    assert_eq!(queue.size(), 1);
}

#[test]
fn test_delete_request_reaches_index() {
    let repo = common::repository(FILES);
    let repository = RepositoryDescriptor::new("internal", repo.path());
    let queue = queue(100);
    let executor = IndexingExecutor::start(Arc::clone(&queue), DirectoryIndexStore::new()).unwrap();
    let mut consumer = indexing_consumer(&queue);

    scan(&mut consumer, repository.clone(), ScanMode::Fresh);

    // a later pass that removes one artifact from the index
    consumer.begin_scan(&repository, SystemTime::now(), false).unwrap();
    consumer.request_delete("org/example/app/1.0/app-1.0.pom").unwrap();
    consumer.complete_scan(false).unwrap();

    let stats = executor.shutdown();
    assert_eq!(stats.deleted, 1);

    let index = read_index(&repo.path().join(".indexer")).unwrap().unwrap();
    let paths: Vec<&str> = index.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["org/example/app/1.0/app-1.0.jar"]);
}
