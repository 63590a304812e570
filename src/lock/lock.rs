use std::sync::Arc;
use std::time::Duration;

use super::LockError;

/// Trait for a single lock instance.
///
/// Implementations provide blocking lock, bounded-wait lock, non-blocking
/// try-lock, and unlock. In-memory locks use `Mutex` + `Condvar`;
/// distributed locks might use Redis, Postgres advisory locks, etc.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Acquire the lock, waiting at most `timeout`.
    ///
    /// Returns [`LockError::Timeout`] if the lock is still held when the
    /// wait elapses.
    fn lock_timeout(&self, timeout: Duration) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Scoped lock acquisition: holds the lock from `acquire` until drop.
///
/// The guard releases the lock when dropped, including on early returns
/// and panic unwind.
pub struct LockGuard {
    lock: Arc<dyn Lock>,
}

impl LockGuard {
    /// Acquire `lock` with a bounded wait, returning a guard that releases
    /// it on drop.
    pub fn acquire(lock: Arc<dyn Lock>, timeout: Duration) -> Result<Self, LockError> {
        lock.lock_timeout(timeout)?;
        Ok(LockGuard { lock })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // A failed release means the primitive is poisoned; nothing useful
        // can be done from a destructor.
        let _ = self.lock.unlock();
    }
}
