//! This module provides a Lock implementation.
use portable_atomic::{AtomicBool, Ordering};

/// A basic locking object.
///
/// A `Lock` behaves like a Mutex, but carries no data.
/// There is no scheduler to park a waiting context on, so a contended
/// [`Lock::acquire`] spins until the holder releases.
pub struct Lock {
    state: AtomicBool,
}

impl Lock {
    /// Creates new **unlocked** Lock
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicBool::new(false),
        }
    }

    /// Creates new **locked** Lock
    #[must_use]
    pub const fn new_locked() -> Self {
        Self {
            state: AtomicBool::new(true),
        }
    }

    /// Returns the current lock state
    ///
    /// true if locked, false otherwise
    pub fn is_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed)
    }

    /// Get this lock (blocking)
    ///
    /// If the lock was unlocked, it will be locked and the function returns.
    /// If the lock was locked, spins until the lock gets released elsewhere.
    pub fn acquire(&self) {
        while !self.try_acquire() {
            core::hint::spin_loop();
        }
    }

    /// Get the lock (non-blocking)
    ///
    /// If the lock was unlocked, it will be locked and the function returns true.
    /// If the lock was locked, the function returns false
    pub fn try_acquire(&self) -> bool {
        self.state
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Releases the lock.
    ///
    /// If the lock was not locked, the function just returns.
    pub fn release(&self) {
        self.state.store(false, Ordering::Release);
    }
}

impl Default for Lock {
    fn default() -> Self {
        Self::new()
    }
}
