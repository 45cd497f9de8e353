//! Cooperative cancellation for long-running scans
//!
//! The scanner checks the token between file visits. The CLI wires ctrl-c to
//! [`CancellationToken::cancel`] through [`CancellationToken::cancel_on_ctrl_c`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        // Release pairs with the Acquire load in is_cancelled
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Spawn a task on the current tokio runtime that cancels this token on ctrl-c
    pub fn cancel_on_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let token = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::warn!("Interrupt received, stopping scan after the current file");
                    token.cancel();
                }
                Err(e) => log::debug!("Unable to listen for ctrl-c: {}", e),
            }
        })
    }
}
