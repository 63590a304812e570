//! Process-wide named mutual exclusion.
//!
//! The sheet store has no native transactions, so every check-then-append
//! sequence with a correctness dependency on a prior read (overselling
//! guard, duplicate-wine check) runs under one named lock, acquired with a
//! bounded wait and released on every exit path via [`LockGuard`].
//!
//! `InMemoryLock` (Mutex + Condvar) is the default implementation;
//! distributed deployments could put Redis or advisory locks behind the
//! same traits.

mod error;
mod in_memory;
mod lock;
mod lock_manager;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::{Lock, LockGuard};
pub use lock_manager::LockManager;
