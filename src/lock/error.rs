use std::fmt;
use std::time::Duration;

/// Failures of the named-lock layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// The lock was not acquired within the bounded wait. Retriable.
    Timeout(Duration),
    /// A thread panicked while holding the underlying primitive.
    Poisoned(String),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Timeout(waited) => {
                write!(f, "lock not acquired within {}ms", waited.as_millis())
            }
            LockError::Poisoned(msg) => write!(f, "lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for LockError {}
