/// Timed mutual-exclusion flag guarding every sync operation.
///
/// State transitions:
///
/// ```text
/// Idle ──try_acquire──→ Processing ──release──→ Idle
///                          │
///                          └── try_acquire after timeout ──→ Processing (recovered)
/// ```
///
/// The lock never blocks: a caller that sees [`LockAttempt::Busy`] skips its cycle.
/// Scheduling the auto-release timer is the caller's job; this type only decides.
#[derive(Debug, Clone)]
pub struct SyncLock {
    state: LockState,
    timeout_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockState {
    Idle,
    Processing { started_at_ms: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAttempt {
    /// The lock was idle and is now held.
    Acquired,
    /// The previous holder exceeded the timeout; it was force-released and the
    /// lock is now held by the new caller.
    Recovered { held_for_ms: i64 },
    /// Held by someone else, still within the timeout.
    Busy { held_for_ms: i64 },
}

impl LockAttempt {
    pub fn is_acquired(self) -> bool {
        !matches!(self, LockAttempt::Busy { .. })
    }
}

impl SyncLock {
    pub fn new(timeout_ms: i64) -> Self {
        Self {
            state: LockState::Idle,
            timeout_ms,
        }
    }

    pub fn timeout_ms(&self) -> i64 {
        self.timeout_ms
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, LockState::Processing { .. })
    }

    pub fn started_at_ms(&self) -> Option<i64> {
        match self.state {
            LockState::Idle => None,
            LockState::Processing { started_at_ms } => Some(started_at_ms),
        }
    }

    pub fn try_acquire(&mut self, now_ms: i64) -> LockAttempt {
        match self.state {
            LockState::Idle => {
                self.state = LockState::Processing {
                    started_at_ms: now_ms,
                };
                LockAttempt::Acquired
            }
            LockState::Processing { started_at_ms } => {
                let held_for_ms = now_ms.saturating_sub(started_at_ms);
                if held_for_ms > self.timeout_ms {
                    self.release();
                    self.state = LockState::Processing {
                        started_at_ms: now_ms,
                    };
                    LockAttempt::Recovered { held_for_ms }
                } else {
                    LockAttempt::Busy { held_for_ms }
                }
            }
        }
    }

    /// Idempotent.
    pub fn release(&mut self) {
        self.state = LockState::Idle;
    }
}
