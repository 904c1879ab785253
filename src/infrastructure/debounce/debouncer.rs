//! Trailing-edge debounce controller

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::trace;

const DEFAULT_DELAY_MS: u64 = 300;

/// Quiet period that must elapse after the last trigger
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DebounceConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl DebounceConfig {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// The pending scheduling, if any.
///
/// `ticket` identifies the latest `schedule`/`cancel`; a timer only fires if
/// its ticket is still the current one when it wakes up.
#[derive(Debug, Default)]
struct Slot {
    ticket: u64,
    timer: Option<JoinHandle<()>>,
}

/// Coalesces bursts of triggers into a single trailing invocation.
///
/// Each [`Debouncer::schedule`] restarts the timer and replaces the pending
/// function; only the last one registered runs, once `delay` has elapsed
/// without another trigger. The controller decides *when* something runs and
/// keeps no result state. Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Debouncer {
    pub fn new(config: &DebounceConfig) -> Self {
        Self::with_delay(config.delay())
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer with `f` as the function to run when it elapses
    pub fn schedule<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slot = lock(&self.slot);
        slot.ticket += 1;
        let ticket = slot.ticket;

        if let Some(previous) = slot.timer.take() {
            previous.abort();
            trace!(ticket, "Debounce timer restarted");
        }

        let shared = Arc::clone(&self.slot);
        let delay = self.delay;

        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut slot = lock(&shared);
                if slot.ticket != ticket {
                    return;
                }
                slot.timer = None;
            }

            f();
        }));
    }

    /// Drops the pending function, if any. Returns whether one was pending.
    ///
    /// Once this returns, the dropped function is guaranteed never to run;
    /// a later `schedule` starts a fresh cycle.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.ticket += 1;

        match slot.timer.take() {
            Some(timer) => {
                timer.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a function is waiting for the timer to elapse
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).timer.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// Critical sections never panic mid-update, so a poisoned slot is still valid.
fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
