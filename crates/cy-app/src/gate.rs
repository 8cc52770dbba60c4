//! Runtime wrapper around [`SyncLock`]: a scoped guard for the happy path and
//! an auto-release timer for the hung one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, warn};

use cy_core::ports::ClockPort;
use cy_core::{LockAttempt, SyncLock};

struct GateInner {
    lock: SyncLock,
    /// Bumped on every acquisition so a stale guard or timer cannot release
    /// a newer holder.
    generation: u64,
    timer: Option<AbortHandle>,
}

pub struct ProcessingGate {
    inner: Arc<Mutex<GateInner>>,
    clock: Arc<dyn ClockPort>,
}

impl ProcessingGate {
    pub fn new(timeout_ms: u64, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GateInner {
                lock: SyncLock::new(i64::try_from(timeout_ms).unwrap_or(i64::MAX)),
                generation: 0,
                timer: None,
            })),
            clock,
        }
    }

    pub fn is_processing(&self) -> bool {
        lock_inner(&self.inner).lock.is_processing()
    }

    /// Never waits. `None` means another operation holds the gate and the
    /// caller should drop this cycle.
    pub fn try_enter(&self) -> Option<ProcessingGuard> {
        let mut inner = lock_inner(&self.inner);

        match inner.lock.try_acquire(self.clock.now_ms()) {
            LockAttempt::Acquired => {}
            LockAttempt::Recovered { held_for_ms } => {
                warn!(held_for_ms, "Forced release of stale sync lock");
                if let Some(timer) = inner.timer.take() {
                    timer.abort();
                }
            }
            LockAttempt::Busy { held_for_ms } => {
                debug!(held_for_ms, "Sync lock busy");
                return None;
            }
        }

        inner.generation += 1;
        let generation = inner.generation;
        let timeout = Duration::from_millis(u64::try_from(inner.lock.timeout_ms()).unwrap_or(0));

        let shared = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut inner = lock_inner(&shared);
            if inner.generation == generation && inner.lock.is_processing() {
                warn!(
                    timeout_ms = inner.lock.timeout_ms(),
                    "Sync lock auto-released after timeout"
                );
                inner.lock.release();
                inner.timer = None;
            }
        });
        inner.timer = Some(timer.abort_handle());

        Some(ProcessingGuard {
            inner: Arc::clone(&self.inner),
            generation,
        })
    }
}

/// Releases the gate when dropped, including on early return and panic.
pub struct ProcessingGuard {
    inner: Arc<Mutex<GateInner>>,
    generation: u64,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        let mut inner = lock_inner(&self.inner);
        if inner.generation != self.generation {
            return;
        }
        inner.lock.release();
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
    }
}

fn lock_inner(inner: &Mutex<GateInner>) -> MutexGuard<'_, GateInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
