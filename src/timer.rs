//! Single-slot cancellable timers.
//!
//! The original client leaned on ad-hoc debounced closures; here the
//! pattern is explicit: a slot holds at most one pending action, and
//! arming it again cancels the predecessor. The same primitive covers the
//! periodic status re-poll (debounce-style, not fixed-rate) and the
//! coalescing of rapid volume and seek input.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A slot for at most one delayed action.
#[derive(Debug, Default)]
pub struct DebounceSlot {
    pending: Option<JoinHandle<()>>,
}

impl DebounceSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to run after `delay`, cancelling whatever was
    /// armed before. Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Cancels the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
