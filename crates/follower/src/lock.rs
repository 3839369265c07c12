//! Locking disciplines guarding a follower and its queue.

use std::cell::{RefCell, RefMut};
use std::ops::DerefMut;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

/// Lock acquisition failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LockError {
    /// Already held by the current call chain
    #[error("lock is already held")]
    Busy,
    /// A previous holder panicked
    #[error("lock poisoned")]
    Poisoned,
}

/// Owns a value and serializes mutable access to it
pub trait LockPolicy<T> {
    type Guard<'a>: DerefMut<Target = T>
    where
        Self: 'a,
        T: 'a;

    fn new(value: T) -> Self;

    fn lock(&self) -> Result<Self::Guard<'_>, LockError>;

    fn into_inner(self) -> Result<T, LockError>;
}

/// Single-threaded discipline
///
/// No synchronization; only catches re-entrant access.
#[derive(Debug, Default)]
pub struct NoLock<T>(RefCell<T>);

impl<T> LockPolicy<T> for NoLock<T> {
    type Guard<'a>
        = RefMut<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn new(value: T) -> Self {
        Self(RefCell::new(value))
    }

    fn lock(&self) -> Result<RefMut<'_, T>, LockError> {
        self.0.try_borrow_mut().map_err(|_| LockError::Busy)
    }

    fn into_inner(self) -> Result<T, LockError> {
        Ok(self.0.into_inner())
    }
}

/// Mutex discipline for followers shared across threads/tasks
#[derive(Debug, Default)]
pub struct MutexLock<T>(Mutex<T>);

impl<T> LockPolicy<T> for MutexLock<T> {
    type Guard<'a>
        = MutexGuard<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn new(value: T) -> Self {
        Self(Mutex::new(value))
    }

    fn lock(&self) -> Result<MutexGuard<'_, T>, LockError> {
        self.0.lock().map_err(|_| LockError::Poisoned)
    }

    fn into_inner(self) -> Result<T, LockError> {
        self.0.into_inner().map_err(|_| LockError::Poisoned)
    }
}
