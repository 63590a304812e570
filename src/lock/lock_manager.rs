use std::sync::Arc;

use super::{Lock, LockError};

/// Factory trait for obtaining named locks.
///
/// The cellar service uses one well-known name (`schema::CELLAR_LOCK`) for
/// its critical sections. Repeated calls with the same `id` must return the
/// same logical lock (the same `Arc` for in-memory, or the same distributed
/// key).
pub trait LockManager: Send + Sync {
    /// Get (or create) the lock for the given identifier.
    fn get_lock(&self, id: &str) -> Result<Arc<dyn Lock>, LockError>;
}
