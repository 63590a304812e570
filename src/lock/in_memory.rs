use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{Lock, LockError, LockManager};

/// In-memory lock on a `Mutex<bool>` held-flag plus a `Condvar`.
///
/// The bounded wait in [`Lock::lock_timeout`] is deadline-based: spurious
/// condvar wakeups re-check the remaining time instead of restarting it.
pub struct InMemoryLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    fn flag(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.held
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let mut held = self.flag()?;
        while *held {
            held = self
                .released
                .wait(held)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
        }
        *held = true;
        Ok(())
    }

    fn lock_timeout(&self, timeout: Duration) -> Result<(), LockError> {
        let deadline = Instant::now() + timeout;
        let mut held = self.flag()?;
        while *held {
            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Timeout(timeout));
            }
            let (flag, wait) = self
                .released
                .wait_timeout(held, deadline - now)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
            held = flag;
            if wait.timed_out() && *held {
                return Err(LockError::Timeout(timeout));
            }
        }
        *held = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut held = self.flag()?;
        if *held {
            return Ok(false);
        }
        *held = true;
        Ok(true)
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut held = self.flag()?;
        if *held {
            *held = false;
            self.released.notify_one();
        }
        Ok(())
    }
}

/// Lock registry keyed by name. One lock is lazily created per unique name
/// and the same `Arc` comes back on every repeated lookup.
pub struct InMemoryLockManager {
    by_name: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            by_name: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager for InMemoryLockManager {
    fn get_lock(&self, id: &str) -> Result<Arc<dyn Lock>, LockError> {
        let mut by_name = self
            .by_name
            .lock()
            .map_err(|_| LockError::Poisoned("lock registry poisoned".into()))?;
        let lock = Arc::clone(
            by_name
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(InMemoryLock::new())),
        );
        Ok(lock)
    }
}
