//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (max size: {max_size})")]
    QueueFull { max_size: usize },

    #[error("Queue '{queue_id}' is closed")]
    Closed { queue_id: String },

    #[error("Queue is no longer available to producer '{producer_id}'")]
    Unavailable { producer_id: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
