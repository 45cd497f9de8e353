//! Scan session wiring
//!
//! Builds the configuration registry, file types, consumer registry and the
//! indexing pipeline for one scan, runs the scan and shuts the indexing
//! executor down once every queued task has been applied.

use crate::app::cli::DateParseError;
use crate::config::{ConfigError, Configuration, ConfigurationRegistry};
use crate::consumer::builtin::{register_builtin_consumers, BuiltinOptions, ListingHandle};
use crate::consumer::{ConsumerDescriptor, ConsumerError, ConsumerRegistry};
use crate::core::cancellation::CancellationToken;
use crate::core::error_handling::ContextualError;
use crate::filetypes::FileTypes;
use crate::indexing::{
    create_indexing_queue, index_ignore_pattern, DirectoryIndexStore, ExecutorStats, IndexError,
    IndexingExecutor, IndexingTask, IndexingTaskConsumer, INDEXING_CONSUMER_ID,
};
use crate::queue::TaskQueue;
use crate::scanner::{
    RepositoryDescriptor, RepositoryScanner, ScanError, ScanMode, ScanReport, ScanRequest,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Consumer(#[from] ConsumerError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Date(#[from] DateParseError),

    /// The blocking scan task panicked or was aborted
    #[error("scan task failed: {0}")]
    Task(String),
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_actionable(),
            AppError::Scan(e) => e.is_user_actionable(),
            AppError::Consumer(ConsumerError::NotFound { .. }) => true,
            AppError::Consumer(_) | AppError::Index(_) | AppError::Task(_) => false,
            AppError::Date(_) => true,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Scan(e) => e.user_message(),
            other if other.is_user_actionable() => Some(other.to_string()),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// What to scan and with which consumers
#[derive(Debug, Clone, Default)]
pub struct ScanInvocation {
    pub repository: PathBuf,
    pub repository_id: Option<String>,
    /// Known consumers to run; empty means every enabled one
    pub known_consumers: Vec<String>,
    pub invalid_consumers: Vec<String>,
    pub mode: ScanMode,
    pub builtin: BuiltinOptions,
}

impl ScanInvocation {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    fn descriptor(&self) -> RepositoryDescriptor {
        match &self.repository_id {
            Some(id) => RepositoryDescriptor::new(id.clone(), self.repository.clone()),
            None => RepositoryDescriptor::from_path(&self.repository),
        }
    }
}

/// Everything a finished scan produced
#[derive(Debug)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub indexing: ExecutorStats,
    pub listing: ListingHandle,
}

/// Register the indexing consumer and the built-ins, then apply the configuration
pub fn build_registry(
    config: &ConfigurationRegistry,
    file_types: &Arc<FileTypes>,
    queue: &Arc<TaskQueue<IndexingTask>>,
    options: &BuiltinOptions,
) -> AppResult<(ConsumerRegistry, ListingHandle)> {
    let snapshot = config.snapshot();
    let mut registry = ConsumerRegistry::new();

    registry.register_known(Box::new(IndexingTaskConsumer::new(
        Arc::clone(file_types),
        queue.create_publisher(INDEXING_CONSUMER_ID),
        snapshot.scan.index_directory.clone(),
    )))?;
    let listing = register_builtin_consumers(&mut registry, file_types, options)?;
    registry.apply_configuration(&snapshot.repository_scanning);

    Ok((registry, listing))
}

/// Descriptors of every consumer available under this configuration
pub fn list_consumers(config: Configuration) -> AppResult<Vec<ConsumerDescriptor>> {
    let queue = create_indexing_queue(&config.scan);
    let config = Arc::new(ConfigurationRegistry::new(config));
    let file_types = FileTypes::new(Arc::clone(&config));
    let (registry, _listing) =
        build_registry(&config, &file_types, &queue, &BuiltinOptions::default())?;
    Ok(registry.descriptors())
}

/// Run one scan with a live indexing executor.
///
/// Blocks until the scan has finished and the executor has drained the queue.
pub fn run_scan(
    config: Configuration,
    invocation: ScanInvocation,
    cancellation: CancellationToken,
) -> AppResult<ScanOutcome> {
    let settings = config.scan.clone();
    let config = Arc::new(ConfigurationRegistry::new(config));
    let file_types = FileTypes::new(Arc::clone(&config));
    let queue = create_indexing_queue(&settings);

    let (mut registry, listing) =
        build_registry(&config, &file_types, &queue, &invocation.builtin)?;
    // consumers named on the command line run even when the configuration disables them
    for id in invocation.known_consumers.iter().chain(&invocation.invalid_consumers) {
        registry.set_enabled(id, true)?;
    }

    let executor = IndexingExecutor::start(Arc::clone(&queue), DirectoryIndexStore::new())?;

    let selection = if invocation.known_consumers.is_empty()
        && invocation.invalid_consumers.is_empty()
    {
        registry.select_enabled()
    } else {
        registry.select(&invocation.known_consumers, &invocation.invalid_consumers)?
    };
    log::debug!(
        "Selected known consumers {:?}, invalid consumers {:?}",
        selection.known_ids(),
        selection.invalid_ids()
    );

    let mut ignore_patterns = settings.ignore_patterns.clone();
    ignore_patterns.extend(index_ignore_pattern(&settings.index_directory));
    let request = ScanRequest::from_selection(invocation.descriptor(), selection)
        .ignore_patterns(ignore_patterns)
        .mode(invocation.mode);
    let result = RepositoryScanner::new()
        .with_file_types(file_types)
        .with_cancellation(cancellation)
        .scan(request);

    let indexing = executor.shutdown();
    log::info!(
        "Indexing applied {} additions, {} deletions, {} finishes ({} failed)",
        indexing.added,
        indexing.deleted,
        indexing.finished,
        indexing.failed
    );

    Ok(ScanOutcome {
        report: result?,
        indexing,
        listing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::builtin::{artifact_listing, invalid_report};
    use crate::indexing::read_index;

    fn repository() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("org/example/lib/1.0");
        std::fs::create_dir_all(&artifact).unwrap();
        std::fs::write(artifact.join("lib-1.0.jar"), b"jar").unwrap();
        std::fs::write(artifact.join("lib-1.0.pom"), b"<project/>").unwrap();
        std::fs::write(artifact.join("lib-1.0.jar.sha1"), b"abc").unwrap();
        dir
    }

    #[test]
    fn test_default_configuration_enables_indexing_only() {
        let descriptors = list_consumers(Configuration::default()).unwrap();
        let enabled: Vec<&str> = descriptors
            .iter()
            .filter(|d| d.enabled)
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(enabled, vec![INDEXING_CONSUMER_ID]);
        assert_eq!(descriptors.len(), 4);
    }

    #[test]
    fn test_run_scan_writes_index() {
        let dir = repository();
        let mut invocation = ScanInvocation::new(dir.path());
        invocation.repository_id = Some("internal".to_string());

        let outcome =
            run_scan(Configuration::default(), invocation, CancellationToken::new()).unwrap();

        assert!(outcome.report.is_clean());
        assert_eq!(outcome.report.statistics.repository_id, "internal");
        assert_eq!(outcome.report.statistics.total_file_count, 2);
        assert_eq!(outcome.indexing.added, 2);
        assert_eq!(outcome.indexing.finished, 1);

        let index = read_index(&dir.path().join(".indexer")).unwrap().unwrap();
        let paths: Vec<String> = index.entries.into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            vec!["org/example/lib/1.0/lib-1.0.jar", "org/example/lib/1.0/lib-1.0.pom"]
        );
    }

    #[test]
    fn test_configured_index_directory_is_not_rescanned() {
        let dir = repository();
        let mut config = Configuration::default();
        config.scan.index_directory = "index-data".to_string();
        config.repository_scanning.invalid_content_consumers =
            vec![invalid_report::ID.to_string()];

        let mut counts = Vec::new();
        for _ in 0..2 {
            let invocation = ScanInvocation::new(dir.path());
            let outcome = run_scan(config.clone(), invocation, CancellationToken::new()).unwrap();
            let stats = outcome.report.statistics;
            assert_eq!(stats.total_file_count, 2);
            counts.push((stats.visited_file_count, stats.invalid_file_count));
        }

        assert!(dir.path().join("index-data").join("index.json").is_file());
        // only the checksum sidecar goes unclaimed, on both passes
        assert_eq!(counts, vec![(3, 1), (3, 1)]);
    }

    #[test]
    fn test_named_consumer_runs_even_when_disabled() {
        let dir = repository();
        let listing_file = dir.path().join("listing.txt");
        let mut invocation = ScanInvocation::new(dir.path());
        invocation.known_consumers = vec![artifact_listing::ID.to_string()];
        invocation.builtin.listing_file = Some(listing_file.clone());

        let outcome =
            run_scan(Configuration::default(), invocation, CancellationToken::new()).unwrap();

        assert_eq!(outcome.listing.lock().unwrap().len(), 2);
        assert_eq!(outcome.indexing.added, 0);
        assert!(listing_file.exists());
    }

    #[test]
    fn test_unknown_consumer_is_actionable() {
        let dir = repository();
        let mut invocation = ScanInvocation::new(dir.path());
        invocation.known_consumers = vec!["no-such-consumer".to_string()];

        let err =
            run_scan(Configuration::default(), invocation, CancellationToken::new()).unwrap_err();
        assert!(matches!(err, AppError::Consumer(ConsumerError::NotFound { .. })));
        assert!(err.is_user_actionable());
    }

    #[test]
    fn test_missing_repository_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = ScanInvocation::new(dir.path().join("missing"));
        let err =
            run_scan(Configuration::default(), invocation, CancellationToken::new()).unwrap_err();
        assert!(matches!(err, AppError::Scan(ScanError::Setup { .. })));
    }
}
