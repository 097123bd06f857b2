//! Cancellable waits
//!
//! A [`CancelToken`] is a shared flag with a condition variable, so a
//! thread sleeping in [`CancelToken::wait`] wakes as soon as another
//! thread cancels rather than at the end of its sleep.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Inner {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

/// Shared cancellation flag
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: Mutex::new(false),
                signal: Condvar::new(),
            }),
        }
    }

    /// Set the flag and wake every waiter
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        *cancelled = true;
        self.inner.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Sleep for `duration` unless cancelled first
    ///
    /// Returns true if the token is cancelled when the wait ends.
    pub fn wait(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            if self
                .inner
                .signal
                .wait_until(&mut cancelled, deadline)
                .timed_out()
            {
                break;
            }
        }
        *cancelled
    }
}
