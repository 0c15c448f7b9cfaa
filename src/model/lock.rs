//! Advisory lock state.
//!
//! Shared records (multitenant databases today, clusters and installations
//! tomorrow) carry an optimistic advisory lock: a locker identity plus a
//! locked flag. Acquisition never blocks and never queues; a second locker
//! simply observes `false` and retries later. There is no lease expiry: a
//! crashed holder leaves the lock in place until an operator or recovery
//! process force-releases it. Expiry heuristics could race with a
//! slow-but-alive holder, so recovery stays explicit.

use serde::{Deserialize, Serialize};

/// Lock state recorded on a lockable entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    /// Whether the lock is currently held.
    pub locked: bool,

    /// Identity of the current holder, if any.
    pub acquired_by: Option<String>,

    /// Milliseconds since epoch at acquisition time. Zero when unlocked.
    pub acquired_at_ms: u64,
}

impl LockState {
    /// Attempt to acquire the lock for `locker_id`.
    ///
    /// Succeeds only when the lock is currently free. Returns `false` when
    /// the lock is held (including when it is held by `locker_id` itself),
    /// which callers must treat as "retry later", not as a fault.
    pub fn try_acquire(&mut self, locker_id: &str, now_ms: u64) -> bool {
        if self.locked {
            return false;
        }

        self.locked = true;
        self.acquired_by = Some(locker_id.to_string());
        self.acquired_at_ms = now_ms;
        true
    }

    /// Release the lock.
    ///
    /// Succeeds when `locker_id` matches the current holder, or
    /// unconditionally when `force` is set. Force-release exists for
    /// operator recovery from crashed workers.
    pub fn release(&mut self, locker_id: &str, force: bool) -> bool {
        if !self.locked {
            return false;
        }

        let owned = self.acquired_by.as_deref() == Some(locker_id);
        if !owned && !force {
            return false;
        }

        self.locked = false;
        self.acquired_by = None;
        self.acquired_at_ms = 0;
        true
    }

    /// Identity of the current holder, if the lock is held.
    pub fn holder(&self) -> Option<&str> {
        if self.locked {
            self.acquired_by.as_deref()
        } else {
            None
        }
    }

    /// Check if the lock is currently held.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
