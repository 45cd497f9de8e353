//! Repository Scanner
//!
//! Walks a repository tree, classifies each file against the selected
//! consumers' patterns and dispatches it. Files no known consumer wants go
//! to the invalid content consumers.
//!
//! ## Flow
//!
//! 1. Validate the root (fatal [`ScanError::Setup`] on failure)
//! 2. `begin_scan` on every consumer; failures drop that consumer
//! 3. Sorted walk, pruning ignored directories
//! 4. Per file: known consumers in request order, else invalid consumers
//! 5. `complete_scan` on every begun consumer, then the [`ScanReport`]

pub mod error;
pub mod manager;
pub mod problems;
pub mod types;
pub mod walker;

pub use error::{ScanError, ScanResult};
pub use manager::RepositoryScanner;
pub use problems::{ProblemKind, ProblemReport, ScanProblem};
pub use types::{
    RepositoryDescriptor, ScanMode, ScanReport, ScanRequest, ScanState, ScanStatistics,
};
