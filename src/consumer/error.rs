//! Consumer Error Types

use crate::queue::QueueError;

/// Result type alias for consumer operations
pub type ConsumerResult<T> = std::result::Result<T, ConsumerError>;

/// Failures reported by consumers and by consumer selection
#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    /// A file could not be processed
    #[error("consumer '{consumer_id}' failed on '{path}': {message}")]
    Processing {
        consumer_id: String,
        path: String,
        message: String,
    },

    /// `begin_scan` or `complete_scan` failed
    #[error("consumer '{consumer_id}' failed during {phase}: {message}")]
    Lifecycle {
        consumer_id: String,
        phase: String,
        message: String,
    },

    /// The task queue refused a task
    #[error("task queue rejected work: {0}")]
    Queue(#[from] QueueError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("consumer not found: {consumer_id}")]
    NotFound { consumer_id: String },

    #[error("consumer '{consumer_id}' is already registered")]
    Duplicate { consumer_id: String },
}

impl ConsumerError {
    pub fn processing(
        consumer_id: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConsumerError::Processing {
            consumer_id: consumer_id.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn lifecycle(
        consumer_id: impl Into<String>,
        phase: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConsumerError::Lifecycle {
            consumer_id: consumer_id.into(),
            phase: phase.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_converts() {
        let err: ConsumerError = QueueError::QueueFull { max_size: 4 }.into();
        assert!(matches!(err, ConsumerError::Queue(QueueError::QueueFull { max_size: 4 })));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_display_names_consumer_and_path() {
        let err = ConsumerError::processing("index-content", "org/a.jar", "boom");
        assert_eq!(
            err.to_string(),
            "consumer 'index-content' failed on 'org/a.jar': boom"
        );
    }
}
