//! Scanner Error Types

use crate::scanner::types::ScanReport;
use std::path::PathBuf;

/// Failures that abort a scan. Consumer failures never appear here; they
/// are collected in the problem report.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Repository root missing, not a directory or unreadable
    #[error("repository not found or unreadable at {}: {message}", path.display())]
    Setup { path: PathBuf, message: String },

    /// Directory traversal failed part way through. `partial` holds what the
    /// scan gathered before the failure, once the scanner has attached it.
    #[error("failed to enumerate {}: {message}", path.display())]
    Enumeration {
        path: PathBuf,
        message: String,
        partial: Option<Box<ScanReport>>,
    },
}

impl ScanError {
    pub(crate) fn enumeration(path: PathBuf, message: impl Into<String>) -> Self {
        ScanError::Enumeration {
            path,
            message: message.into(),
            partial: None,
        }
    }

    /// Statistics and problems of a scan that failed during enumeration
    pub fn partial_report(&self) -> Option<&ScanReport> {
        match self {
            ScanError::Enumeration { partial, .. } => partial.as_deref(),
            ScanError::Setup { .. } => None,
        }
    }
}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::Setup { .. } => true,        // wrong path given
            ScanError::Enumeration { .. } => false, // filesystem trouble
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            ScanError::Setup { path, .. } => Some(format!(
                "Repository '{}' does not exist or is not a readable directory",
                path.display()
            )),
            ScanError::Enumeration { .. } => None,
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
