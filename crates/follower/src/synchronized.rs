//! Follower guarded by a locking discipline.
//!
//! Each operation runs under a single lock acquisition, so a capture or
//! abort is atomic with respect to concurrent injections from the feed.

use std::marker::PhantomData;

use contracts::{CaptureRange, ContractError, DispatchSink, StampOf, State};

use crate::lock::{LockError, LockPolicy, MutexLock};
use crate::Follower;

/// Shared follower handle
///
/// Lock failures are the only errors surfaced here; the wrapped policy
/// itself never fails.
#[derive(Debug)]
pub struct Synchronized<F, L = MutexLock<F>> {
    id: String,
    inner: L,
    _follower: PhantomData<fn() -> F>,
}

impl<F, L> Synchronized<F, L>
where
    F: Follower,
    L: LockPolicy<F>,
{
    pub fn new(follower: F) -> Self {
        Self {
            id: follower.id().to_string(),
            inner: L::new(follower),
            _follower: PhantomData,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock(&self) -> Result<L::Guard<'_>, ContractError> {
        self.inner.lock().map_err(|e| self.lock_error(e))
    }

    fn lock_error(&self, error: LockError) -> ContractError {
        tracing::error!(follower = %self.id, %error, "follower lock acquisition failed");
        match error {
            LockError::Busy => ContractError::queue_busy(&self.id),
            LockError::Poisoned => ContractError::lock_poisoned(&self.id),
        }
    }

    pub fn inject(&self, element: F::Element) -> Result<(), ContractError> {
        self.lock()?.inject(element);
        Ok(())
    }

    pub fn capture<O>(
        &self,
        output: O,
        range: &CaptureRange<StampOf<F::Element>>,
    ) -> Result<State, ContractError>
    where
        O: DispatchSink<F::Element>,
    {
        Ok(self.lock()?.capture(output, range))
    }

    pub fn dry_capture(
        &self,
        range: &CaptureRange<StampOf<F::Element>>,
    ) -> Result<State, ContractError> {
        Ok(self.lock()?.dry_capture(range))
    }

    pub fn abort(&self, t_abort: StampOf<F::Element>) -> Result<(), ContractError> {
        self.lock()?.abort(t_abort);
        Ok(())
    }

    pub fn reset(&self) -> Result<(), ContractError> {
        self.lock()?.reset();
        Ok(())
    }

    pub fn len(&self) -> Result<usize, ContractError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ContractError> {
        Ok(self.lock()?.is_empty())
    }

    pub fn available_range(
        &self,
    ) -> Result<Option<CaptureRange<StampOf<F::Element>>>, ContractError> {
        Ok(self.lock()?.available_range())
    }

    /// Run `f` with exclusive access to the follower
    pub fn with<R>(&self, f: impl FnOnce(&mut F) -> R) -> Result<R, ContractError> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }

    pub fn into_inner(self) -> Result<F, ContractError> {
        let id = self.id;
        self.inner.into_inner().map_err(|e| match e {
            LockError::Busy => ContractError::queue_busy(id),
            LockError::Poisoned => ContractError::lock_poisoned(id),
        })
    }
}
