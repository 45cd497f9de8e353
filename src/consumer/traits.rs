//! Consumer Trait System
//!
//! A consumer is handed files during a repository scan. Every consumer has
//! an identity and a three-phase lifecycle: `begin_scan` once, `process_file`
//! per delivered file, and `complete_scan` once.
//!
//! - **Known content consumers** declare include/exclude patterns and receive
//!   the files those patterns select.
//! - **Invalid content consumers** receive the files no known consumer
//!   wanted.
//!
//! The scanner borrows consumers for the duration of one scan and never owns
//! them. Errors are returned, never panicked; the scanner records them and
//! moves on.

use crate::consumer::error::ConsumerResult;
use crate::scanner::RepositoryDescriptor;
use std::time::SystemTime;

/// Base consumer behaviour shared by both capabilities
pub trait Consumer: Send {
    /// Unique id used for selection and problem reports
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    /// Permanent consumers cannot be disabled
    fn is_permanent(&self) -> bool {
        false
    }

    /// Called once before any file is delivered.
    ///
    /// `execute_on_entire_repo` is true for a fresh scan of the whole
    /// repository and false for an incremental pass.
    fn begin_scan(
        &mut self,
        repository: &RepositoryDescriptor,
        when: SystemTime,
        execute_on_entire_repo: bool,
    ) -> ConsumerResult<()>;

    /// Handle one file; `path` is relative to the repository root with `/` separators
    fn process_file(&mut self, path: &str, execute_on_entire_repo: bool) -> ConsumerResult<()>;

    /// Called once after traversal, also when the scan was cancelled
    fn complete_scan(&mut self, execute_on_entire_repo: bool) -> ConsumerResult<()>;
}

/// A consumer of files recognised by its include patterns
pub trait KnownContentConsumer: Consumer {
    fn includes(&self) -> Vec<String>;

    fn excludes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether files unchanged since the incremental marker are still delivered
    fn process_unmodified(&self) -> bool {
        false
    }

    fn case_sensitive(&self) -> bool {
        true
    }
}

/// A consumer of files that no known consumer claimed
pub trait InvalidContentConsumer: Consumer {}
