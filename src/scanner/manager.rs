//! Repository Scanner
//!
//! Walks a repository root, offers each file to the consumers that want it
//! and gathers statistics. Consumer failures are isolated: they are recorded
//! in the [`ProblemReport`] and the scan carries on. Only an invalid root or
//! a failed directory enumeration ends a scan with an error.

use crate::consumer::{InvalidContentConsumer, KnownContentConsumer, WantsFilePredicate};
use crate::core::cancellation::CancellationToken;
use crate::filetypes::FileTypes;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::problems::{ProblemKind, ProblemReport};
use crate::scanner::types::{ScanReport, ScanRequest, ScanState, ScanStatistics};
use crate::scanner::walker::RepositoryWalker;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// A known consumer that passed `begin_scan`, with its patterns captured
struct ActiveConsumer<'a> {
    consumer: &'a mut dyn KnownContentConsumer,
    predicate: WantsFilePredicate,
    process_unmodified: bool,
}

/// Synchronous repository scanner
#[derive(Debug, Default, Clone)]
pub struct RepositoryScanner {
    file_types: Option<Arc<FileTypes>>,
    cancellation: Option<CancellationToken>,
}

impl RepositoryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the file type ignore list to every scan
    pub fn with_file_types(mut self, file_types: Arc<FileTypes>) -> Self {
        self.file_types = Some(file_types);
        self
    }

    /// Stop between files once the token is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Check the root exists, is a directory and can be listed
    pub fn validate_repository(&self, root: &Path) -> ScanResult<()> {
        let setup_error = |message: String| ScanError::Setup {
            path: root.to_path_buf(),
            message,
        };

        let metadata = std::fs::metadata(root).map_err(|e| setup_error(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(setup_error("not a directory".to_string()));
        }
        std::fs::read_dir(root).map_err(|e| setup_error(e.to_string()))?;
        Ok(())
    }

    fn ignore_patterns(&self, request_patterns: &[String]) -> Vec<String> {
        let mut patterns = request_patterns.to_vec();
        if let Some(file_types) = &self.file_types {
            for pattern in file_types.scan_ignore_patterns() {
                if !patterns.contains(&pattern) {
                    patterns.push(pattern);
                }
            }
        }
        patterns
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Run one scan.
    ///
    /// Returns `Err` only for [`ScanError::Setup`], before any consumer is
    /// called, and for [`ScanError::Enumeration`], after `complete_scan`
    /// has run for every begun consumer. The enumeration error carries the
    /// statistics and problems gathered up to the failure.
    pub fn scan(&self, request: ScanRequest<'_>) -> ScanResult<ScanReport> {
        let ScanRequest {
            repository,
            known_consumers,
            invalid_consumers,
            global_ignore_patterns,
            mode,
        } = request;

        let started = Instant::now();
        let when = SystemTime::now();
        let mut state = ScanState::NotStarted;
        log::debug!("Scan of '{}' is {}", repository.id, state);

        self.validate_repository(&repository.location)?;
        state = ScanState::Scanning;
        log::info!(
            "Scanning repository '{}' at {} ({})",
            repository.id,
            repository.location.display(),
            if mode.executes_on_entire_repo() {
                "fresh"
            } else {
                "incremental"
            }
        );

        let entire_repo = mode.executes_on_entire_repo();
        let mut problems = ProblemReport::new();

        let mut known: Vec<ActiveConsumer<'_>> = Vec::with_capacity(known_consumers.len());
        for consumer in known_consumers {
            match consumer.begin_scan(&repository, when, entire_repo) {
                Ok(()) => known.push(ActiveConsumer {
                    predicate: WantsFilePredicate::for_consumer(&*consumer),
                    process_unmodified: consumer.process_unmodified(),
                    consumer,
                }),
                Err(e) => {
                    problems.record(ProblemKind::BeginScan, consumer.id(), None, e.to_string())
                }
            }
        }

        let mut invalid: Vec<&mut dyn InvalidContentConsumer> =
            Vec::with_capacity(invalid_consumers.len());
        for consumer in invalid_consumers {
            match consumer.begin_scan(&repository, when, entire_repo) {
                Ok(()) => invalid.push(consumer),
                Err(e) => {
                    problems.record(ProblemKind::BeginScan, consumer.id(), None, e.to_string())
                }
            }
        }

        let walker = RepositoryWalker::new(
            repository.location.clone(),
            self.ignore_patterns(&global_ignore_patterns),
        );
        let mut stats = ScanStatistics::new(repository.id.clone(), DateTime::<Utc>::from(when));
        let mut failure = None;

        for item in walker.walk() {
            if self.is_cancelled() {
                log::warn!("Scan of '{}' cancelled", repository.id);
                state = ScanState::Cancelled;
                break;
            }
            let file = match item {
                Ok(file) => file,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };

            stats.visited_file_count += 1;
            let path = file.relative_path.as_str();
            let is_new = mode.is_new(file.modified);
            let mut wanted = false;

            for active in known.iter_mut() {
                if !active.predicate.wants(path) {
                    continue;
                }
                wanted = true;
                if !is_new && !active.process_unmodified {
                    continue;
                }
                let id = active.consumer.id().to_string();
                stats.delivered(&id);
                if let Err(e) = active.consumer.process_file(path, entire_repo) {
                    problems.record(ProblemKind::ProcessFile, &id, Some(path), e.to_string());
                }
            }

            if wanted {
                stats.total_file_count += 1;
                if is_new {
                    stats.new_file_count += 1;
                }
                continue;
            }

            stats.invalid_file_count += 1;
            for consumer in invalid.iter_mut() {
                let id = consumer.id().to_string();
                stats.delivered(&id);
                if let Err(e) = consumer.process_file(path, entire_repo) {
                    problems.record(ProblemKind::ProcessFile, &id, Some(path), e.to_string());
                }
            }
        }

        for active in known.iter_mut() {
            if let Err(e) = active.consumer.complete_scan(entire_repo) {
                let id = active.consumer.id().to_string();
                problems.record(ProblemKind::CompleteScan, &id, None, e.to_string());
            }
        }
        for consumer in invalid.iter_mut() {
            if let Err(e) = consumer.complete_scan(entire_repo) {
                problems.record(ProblemKind::CompleteScan, consumer.id(), None, e.to_string());
            }
        }

        stats.duration_millis = started.elapsed().as_millis() as u64;

        if let Some(error) = failure {
            state = ScanState::Failed;
            log::error!(
                "Scan of '{}' {} after {} files: {}",
                repository.id,
                state,
                stats.visited_file_count,
                error
            );
            return Err(match error {
                ScanError::Enumeration { path, message, .. } => ScanError::Enumeration {
                    path,
                    message,
                    partial: Some(Box::new(ScanReport {
                        statistics: stats,
                        problems,
                        state,
                    })),
                },
                other => other,
            });
        }
        if state == ScanState::Scanning {
            state = ScanState::Completed;
        }

        log::info!(
            "Scan of '{}' {} in {}ms: {} files, {} new, {} unclaimed, {} problems",
            repository.id,
            state,
            stats.duration_millis,
            stats.total_file_count,
            stats.new_file_count,
            stats.invalid_file_count,
            problems.len()
        );

        Ok(ScanReport {
            statistics: stats,
            problems,
            state,
        })
    }
}
