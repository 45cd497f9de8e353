//! Bounded Task Queue
//!
//! A FIFO hand-off between producers running on the scan thread and a worker
//! that drains tasks asynchronously. Every accepted task receives a monotonic
//! sequence number, so a worker draining the queue observes tasks in exactly
//! the order they were submitted.
//!
//! ```text
//! ┌──────────────┐ enqueue  ┌───────────────────────────────┐  take  ┌──────────┐
//! │ QueuePublisher├────────►│ TaskQueue  [1][2][3][4] ...   ├───────►│  worker  │
//! └──────────────┘          └───────────────────────────────┘        └──────────┘
//! ```
//!
//! When the queue is full the [`OverflowPolicy`] decides whether `enqueue`
//! fails immediately with [`QueueError::QueueFull`] or waits for space.
//! Closing the queue wakes every waiter; workers drain what is left and then
//! see the end of the stream.

mod error;
mod internal;
mod publisher;

pub use error::{QueueError, QueueResult};
pub use internal::{QueueEntry, QueueStats, TaskQueue};
pub use publisher::QueuePublisher;

use serde::{Deserialize, Serialize};

/// What `enqueue` does when the queue is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Reject the task with `QueueFull`
    #[default]
    Fail,
    /// Wait until a worker frees a slot or the queue is closed
    Block,
}

/// Default capacity for queues created from configuration
pub const DEFAULT_QUEUE_CAPACITY: usize = 10000;
