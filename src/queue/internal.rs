//! TaskQueue implementation with sequence-based ordering

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::publisher::QueuePublisher;
use crate::queue::OverflowPolicy;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::SystemTime;

/// An accepted task together with its queue metadata
#[derive(Debug, Clone)]
pub struct QueueEntry<T> {
    /// Monotonic sequence number assigned on enqueue, starting at 1
    pub sequence: u64,
    pub enqueued_at: SystemTime,
    pub item: T,
}

/// Counters maintained by the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued: u64,
    pub dequeued: u64,
    pub rejected: u64,
}

#[derive(Debug)]
struct QueueState<T> {
    entries: VecDeque<QueueEntry<T>>,
    next_sequence: u64,
    closed: bool,
    stats: QueueStats,
}

/// Bounded FIFO queue shared between producers and a draining worker
#[derive(Debug)]
pub struct TaskQueue<T> {
    queue_id: String,
    max_size: usize,
    policy: OverflowPolicy,
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> TaskQueue<T> {
    pub fn new(queue_id: impl Into<String>, max_size: usize, policy: OverflowPolicy) -> Self {
        Self {
            queue_id: queue_id.into(),
            max_size: max_size.max(1),
            policy,
            state: Mutex::new(QueueState {
                entries: VecDeque::new(),
                next_sequence: 1,
                closed: false,
                stats: QueueStats::default(),
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Create a publisher handle; it fails with `Unavailable` once the queue is dropped
    pub fn create_publisher(self: &Arc<Self>, producer_id: impl Into<String>) -> QueuePublisher<T> {
        QueuePublisher::new(producer_id.into(), Arc::downgrade(self))
    }

    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, QueueState<T>>> {
        self.state.lock().map_err(|_| QueueError::OperationFailed {
            message: format!("queue '{}' lock poisoned", self.queue_id),
        })
    }

    /// Append a task, returning its sequence number
    pub fn publish(&self, item: T) -> QueueResult<u64> {
        let mut state = self.lock()?;

        loop {
            if state.closed {
                state.stats.rejected += 1;
                return Err(QueueError::Closed {
                    queue_id: self.queue_id.clone(),
                });
            }
            if state.entries.len() < self.max_size {
                break;
            }
            match self.policy {
                OverflowPolicy::Fail => {
                    state.stats.rejected += 1;
                    return Err(QueueError::QueueFull {
                        max_size: self.max_size,
                    });
                }
                OverflowPolicy::Block => {
                    state = self
                        .not_full
                        .wait(state)
                        .map_err(|_| QueueError::OperationFailed {
                            message: format!("queue '{}' lock poisoned", self.queue_id),
                        })?;
                }
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.push_back(QueueEntry {
            sequence,
            enqueued_at: SystemTime::now(),
            item,
        });
        state.stats.enqueued += 1;
        drop(state);

        self.not_empty.notify_one();
        Ok(sequence)
    }

    /// Take the oldest task, waiting while the queue is empty.
    ///
    /// Returns `Ok(None)` once the queue is closed and fully drained.
    pub fn take(&self) -> QueueResult<Option<QueueEntry<T>>> {
        let mut state = self.lock()?;

        loop {
            if let Some(entry) = state.entries.pop_front() {
                state.stats.dequeued += 1;
                drop(state);
                self.not_full.notify_one();
                return Ok(Some(entry));
            }
            if state.closed {
                return Ok(None);
            }
            state = self
                .not_empty
                .wait(state)
                .map_err(|_| QueueError::OperationFailed {
                    message: format!("queue '{}' lock poisoned", self.queue_id),
                })?;
        }
    }

    /// Take the oldest task without waiting
    pub fn try_take(&self) -> QueueResult<Option<QueueEntry<T>>> {
        let mut state = self.lock()?;
        let entry = state.entries.pop_front();
        if entry.is_some() {
            state.stats.dequeued += 1;
            drop(state);
            self.not_full.notify_one();
        }
        Ok(entry)
    }

    /// Stop accepting tasks and wake every waiter. Queued tasks remain takeable.
    pub fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().map(|s| s.closed).unwrap_or(true)
    }

    /// Number of tasks currently waiting
    pub fn size(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    /// Sequence number the next accepted task will receive
    pub fn head_sequence(&self) -> u64 {
        self.state.lock().map(|s| s.next_sequence).unwrap_or(0)
    }

    pub fn stats(&self) -> QueueStats {
        self.state.lock().map(|s| s.stats).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_queue_creation() {
        let queue: TaskQueue<String> = TaskQueue::new("test-queue", 1000, OverflowPolicy::Fail);

        assert_eq!(queue.queue_id(), "test-queue");
        assert_eq!(queue.size(), 0);
        assert_eq!(queue.head_sequence(), 1);
        assert!(!queue.is_closed());
    }

    #[test]
    fn test_sequence_based_publish() {
        let queue = TaskQueue::new("test-queue", 1000, OverflowPolicy::Fail);

        let seq1 = queue.publish("file1.jar".to_string()).unwrap();
        let seq2 = queue.publish("file2.jar".to_string()).unwrap();

        assert_eq!(seq1, 1);
        assert_eq!(seq2, 2);
        assert_eq!(queue.size(), 2);
        assert_eq!(queue.head_sequence(), 3);
    }

    #[test]
    fn test_fifo_order() {
        let queue = TaskQueue::new("test-queue", 10, OverflowPolicy::Fail);
        for i in 0..5 {
            queue.publish(i).unwrap();
        }

        let drained: Vec<i32> = std::iter::from_fn(|| queue.try_take().unwrap())
            .map(|entry| entry.item)
            .collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert_eq!(queue.stats().dequeued, 5);
    }

    #[test]
    fn test_queue_size_limit() {
        let queue = TaskQueue::new("test-queue", 2, OverflowPolicy::Fail);

        assert!(queue.publish("a").is_ok());
        assert!(queue.publish("b").is_ok());

        match queue.publish("c") {
            Err(QueueError::QueueFull { max_size }) => assert_eq!(max_size, 2),
            other => panic!("Expected QueueFull error, got {:?}", other),
        }
        assert_eq!(queue.stats().rejected, 1);
        assert_eq!(queue.head_sequence(), 3);
    }

    #[test]
    fn test_closed_queue_rejects_but_drains() {
        let queue = TaskQueue::new("test-queue", 10, OverflowPolicy::Fail);
        queue.publish(1).unwrap();
        queue.close();

        assert!(matches!(queue.publish(2), Err(QueueError::Closed { .. })));
        assert_eq!(queue.take().unwrap().map(|e| e.item), Some(1));
        assert!(queue.take().unwrap().is_none());
    }

    #[test]
    fn test_take_waits_for_publish() {
        let queue = Arc::new(TaskQueue::new("test-queue", 10, OverflowPolicy::Fail));
        let worker_queue = Arc::clone(&queue);

        let worker = std::thread::spawn(move || worker_queue.take().unwrap().map(|e| e.item));
        std::thread::sleep(Duration::from_millis(20));
        queue.publish("late").unwrap();

        assert_eq!(worker.join().unwrap(), Some("late"));
    }

    #[test]
    fn test_blocking_policy_waits_for_space() {
        let queue = Arc::new(TaskQueue::new("test-queue", 1, OverflowPolicy::Block));
        queue.publish(1).unwrap();

        let producer_queue = Arc::clone(&queue);
        let producer = std::thread::spawn(move || producer_queue.publish(2));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(queue.take().unwrap().map(|e| e.item), Some(1));
        assert_eq!(producer.join().unwrap(), Ok(2));
        assert_eq!(queue.take().unwrap().map(|e| e.item), Some(2));
    }

    #[test]
    fn test_close_releases_blocked_producer() {
        let queue = Arc::new(TaskQueue::new("test-queue", 1, OverflowPolicy::Block));
        queue.publish(1).unwrap();

        let producer_queue = Arc::clone(&queue);
        let producer = std::thread::spawn(move || producer_queue.publish(2));

        std::thread::sleep(Duration::from_millis(20));
        queue.close();
        assert!(matches!(
            producer.join().unwrap(),
            Err(QueueError::Closed { .. })
        ));
    }
}
