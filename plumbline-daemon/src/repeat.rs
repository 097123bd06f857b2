//! Long-press repeat trigger
//!
//! Holding a jog button first waits out an initial delay, then repeats
//! the jog at a fixed rate until the button is released. Each arm runs
//! on its own named thread and is stopped through a [`CancelToken`], so
//! a release takes effect immediately instead of after the current
//! interval.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::cancel::CancelToken;
use crate::error::Result;

/// Action run on every fire
pub type RepeatAction = Arc<dyn Fn() + Send + Sync>;

struct Arm {
    token: CancelToken,
    handle: JoinHandle<()>,
}

/// Fires an action repeatedly while held
pub struct RepeatTrigger {
    name: String,
    initial_delay: Duration,
    interval: Duration,
    action: RepeatAction,
    arm: Mutex<Option<Arm>>,
}

impl RepeatTrigger {
    pub fn new(
        name: impl Into<String>,
        initial_delay: Duration,
        interval: Duration,
        action: RepeatAction,
    ) -> Self {
        Self {
            name: name.into(),
            initial_delay,
            interval,
            action,
            arm: Mutex::new(None),
        }
    }

    /// Start repeating
    ///
    /// Returns false (and changes nothing) if already armed.
    pub fn press(&self) -> Result<bool> {
        let mut arm = self.arm.lock();
        if arm.as_ref().is_some_and(|a| !a.handle.is_finished()) {
            return Ok(false);
        }

        let token = CancelToken::new();
        let worker_token = token.clone();
        let action = Arc::clone(&self.action);
        let initial_delay = self.initial_delay;
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name(format!("repeat-{}", self.name))
            .spawn(move || {
                // Fixed-rate schedule: a late fire does not shift later ones
                let mut next = Instant::now() + initial_delay;
                loop {
                    let remaining = next.saturating_duration_since(Instant::now());
                    if worker_token.wait(remaining) {
                        break;
                    }
                    action();
                    next += interval;
                }
            })?;

        log::debug!("{}: armed", self.name);
        *arm = Some(Arm { token, handle });
        Ok(true)
    }

    /// Stop repeating
    ///
    /// A fire already in progress is allowed to finish; no fire starts
    /// after this returns. Releasing an idle trigger does nothing.
    pub fn release(&self) {
        let Some(arm) = self.arm.lock().take() else {
            return;
        };
        arm.token.cancel();
        // The action itself may release its own trigger
        if arm.handle.thread().id() != thread::current().id() {
            let _ = arm.handle.join();
        }
        log::debug!("{}: released", self.name);
    }

    /// Stop repeating on shutdown; same effect as [`release`](Self::release)
    pub fn cancel(&self) {
        self.release();
    }

    pub fn is_armed(&self) -> bool {
        self.arm
            .lock()
            .as_ref()
            .is_some_and(|a| !a.handle.is_finished())
    }
}

impl Drop for RepeatTrigger {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_trigger(delay_ms: u64, interval_ms: u64) -> (RepeatTrigger, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let trigger = RepeatTrigger::new(
            "test",
            Duration::from_millis(delay_ms),
            Duration::from_millis(interval_ms),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (trigger, count)
    }

    #[test]
    fn test_fires_until_released() {
        // Fires at 200, 300, 400; released at 450
        let (trigger, count) = counting_trigger(200, 100);
        assert!(trigger.press().unwrap());
        thread::sleep(Duration::from_millis(450));
        trigger.release();
        assert_eq!(count.load(Ordering::SeqCst), 3);

        thread::sleep(Duration::from_millis(250));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!trigger.is_armed());
    }

    #[test]
    fn test_release_before_delay_never_fires() {
        let (trigger, count) = counting_trigger(200, 100);
        trigger.press().unwrap();
        thread::sleep(Duration::from_millis(50));
        trigger.release();
        thread::sleep(Duration::from_millis(300));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_press_while_armed_is_noop() {
        let (trigger, count) = counting_trigger(200, 100);
        assert!(trigger.press().unwrap());
        assert!(!trigger.press().unwrap());
        assert!(trigger.is_armed());
        thread::sleep(Duration::from_millis(250));
        trigger.release();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (trigger, count) = counting_trigger(200, 100);
        trigger.cancel();
        trigger.press().unwrap();
        trigger.cancel();
        trigger.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // Can be pressed again after a release
        assert!(trigger.press().unwrap());
        trigger.release();
    }
}
