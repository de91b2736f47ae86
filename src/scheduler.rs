//! Periodic background jobs with explicit start/stop control.
//!
//! A [`PeriodicTask`] owns at most one running Tokio task. Starting an
//! already running task is a no-op, so callers can wire it to a button or a
//! signal handler without tracking state themselves.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

// ---

#[derive(Debug, Default)]
pub struct PeriodicTask {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PeriodicTask {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` every `period`, the first run one full period from now.
    ///
    /// Returns `false` and leaves the current schedule untouched when a job
    /// is already running. Runs never overlap: the next tick waits for the
    /// previous job to finish.
    pub fn start<F, Fut>(&self, period: Duration, mut job: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // ---
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            tracing::debug!("Periodic task already running, start ignored");
            return false;
        }

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                job().await;
            }
        });

        tracing::debug!("Periodic task started, period {:?}", period);
        *slot = Some(handle);
        true
    }

    /// Cancel the running job. Returns `false` if nothing was running.
    pub fn stop(&self) -> bool {
        // ---
        match self.lock().take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                tracing::debug!("Periodic task stopped");
                was_running
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // A panic while holding the lock cannot leave the slot inconsistent.
        self.handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }
}
