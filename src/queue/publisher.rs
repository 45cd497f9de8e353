//! Queue Publisher for submitting tasks
//!
//! Publishers hold only a weak reference to the queue, so a producer that
//! outlives the queue gets `Unavailable` instead of keeping it alive.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::internal::TaskQueue;
use std::sync::Weak;

/// Publisher handle for sending tasks to a [`TaskQueue`]
pub struct QueuePublisher<T> {
    producer_id: String,
    queue: Weak<TaskQueue<T>>,
}

impl<T> QueuePublisher<T> {
    pub(crate) fn new(producer_id: String, queue: Weak<TaskQueue<T>>) -> Self {
        Self { producer_id, queue }
    }

    pub fn producer_id(&self) -> &str {
        &self.producer_id
    }

    /// Submit a task, returning its sequence number
    pub fn enqueue(&self, item: T) -> QueueResult<u64> {
        let queue = self.queue.upgrade().ok_or_else(|| QueueError::Unavailable {
            producer_id: self.producer_id.clone(),
        })?;

        let sequence = queue.publish(item)?;
        log::trace!(
            "{} enqueued task #{} on '{}'",
            self.producer_id,
            sequence,
            queue.queue_id()
        );
        Ok(sequence)
    }

    /// True while the queue exists and accepts tasks
    pub fn is_available(&self) -> bool {
        self.queue.upgrade().is_some_and(|q| !q.is_closed())
    }
}

impl<T> Clone for QueuePublisher<T> {
    fn clone(&self) -> Self {
        Self {
            producer_id: self.producer_id.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<T> std::fmt::Debug for QueuePublisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePublisher")
            .field("producer_id", &self.producer_id)
            .field("available", &self.is_available())
            .finish()
    }
}
