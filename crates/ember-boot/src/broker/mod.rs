// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The lock broker.
//!
//! Creates and owns kernel mutexes on behalf of library subsystems.
//! A fixed set of well-known locks is created once on the bootstrap
//! thread before any other thread exists; further subsystems can
//! request anonymous locks on demand afterwards. Callers only ever
//! hold [`LockHandle`]s, the broker exclusively owns the underlying
//! kernel mutex objects.
//!
//! The handle table has a fixed capacity ([`MAX_LOCKS`]); dynamic
//! creation claims the first free entry and reports
//! [`BrokerError::OutOfMemory`] when none remains. That failure is
//! returned to the caller, never treated as fatal here - only the
//! well-known set is load-bearing for boot.

use ember_abi::config::MAX_LOCKS;
use ember_abi::{MutexAttrs, Timeout};

use crate::kernel::{Kernel, KernelError};

/// Number of well-known locks created during bootstrap.
pub const WELL_KNOWN_COUNT: usize = 8;

// The well-known set must fit the handle table with room for at least
// one dynamic lock.
const _: () = assert!(MAX_LOCKS > WELL_KNOWN_COUNT);

/// Handle to a lock owned by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockHandle(usize);

impl LockHandle {
    /// Returns the handle's table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The locks every boot creates for the C runtime.
///
/// Recursive flavors cover subsystems whose call graphs may re-enter
/// the same lock on the same thread; the rest are plain. All are
/// priority-inheriting and robust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum WellKnownLock {
    /// Lazy singleton construction.
    Singleton = 0,
    /// Stdio stream-table initialization.
    Sinit = 1,
    /// Stdio file-pointer allocation.
    Sfp = 2,
    /// Heap allocator global state.
    Malloc = 3,
    /// Environment variables.
    Env = 4,
    /// `at_quick_exit` handler registration.
    AtQuickExit = 5,
    /// Time-zone state.
    Tz = 6,
    /// Randomness state.
    Arc4random = 7,
}

impl WellKnownLock {
    /// All well-known locks in creation order.
    pub const ALL: [Self; WELL_KNOWN_COUNT] = [
        Self::Singleton,
        Self::Sinit,
        Self::Sfp,
        Self::Malloc,
        Self::Env,
        Self::AtQuickExit,
        Self::Tz,
        Self::Arc4random,
    ];

    /// Returns the creation attributes for this lock.
    #[must_use]
    pub const fn attrs(self) -> MutexAttrs {
        match self {
            Self::Singleton => MutexAttrs::recursive("singleton_mutex"),
            Self::Sinit => MutexAttrs::recursive("sinit_mutex"),
            Self::Sfp => MutexAttrs::recursive("sfp_mutex"),
            Self::Malloc => MutexAttrs::recursive("malloc_mutex"),
            Self::Env => MutexAttrs::recursive("env_mutex"),
            Self::AtQuickExit => MutexAttrs::plain("at_quick_exit_mutex"),
            Self::Tz => MutexAttrs::plain("tz_mutex"),
            Self::Arc4random => MutexAttrs::plain("arc4random_mutex"),
        }
    }

    /// Returns the handle this lock occupies after bootstrap.
    #[inline]
    #[must_use]
    pub const fn handle(self) -> LockHandle {
        LockHandle(self as usize)
    }
}

/// Error reported by the lock broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    /// Neither the handle table nor the kernel could back another lock.
    OutOfMemory,
    /// The handle does not refer to a live lock.
    InvalidHandle,
    /// The mutex is held and the wait timed out (or was non-blocking).
    Timeout,
    /// Other kernel failure.
    Kernel(KernelError),
}

const fn creation_error(error: KernelError) -> BrokerError {
    match error {
        KernelError::NoMemory | KernelError::Resource => BrokerError::OutOfMemory,
        other => BrokerError::Kernel(other),
    }
}

const fn delegation_error(error: KernelError) -> BrokerError {
    match error {
        KernelError::Timeout => BrokerError::Timeout,
        other => BrokerError::Kernel(other),
    }
}

/// Broker owning up to [`MAX_LOCKS`] kernel mutexes.
///
/// Entries `0..WELL_KNOWN_COUNT` belong to the well-known set, the
/// rest to dynamic consumers. Mutation (create/destroy) requires
/// `&mut self`; the process-wide instance serializes it behind a lock.
pub struct LockBroker<K: Kernel> {
    locks: [Option<K::Mutex>; MAX_LOCKS],
}

impl<K: Kernel> LockBroker<K> {
    /// Creates an empty broker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locks: [const { None }; MAX_LOCKS],
        }
    }

    /// Creates the well-known lock set.
    ///
    /// Called exactly once, on the bootstrap thread, before any other
    /// thread exists. Failure here is fatal for the boot sequence.
    pub fn create_well_known(&mut self, kernel: &K) -> Result<(), BrokerError> {
        for lock in WellKnownLock::ALL {
            debug_assert!(self.locks[lock as usize].is_none());
            let attrs = lock.attrs();
            let mutex = kernel.create_mutex(&attrs).map_err(creation_error)?;
            self.locks[lock as usize] = Some(mutex);
        }
        Ok(())
    }

    /// Creates a lock for a dynamic consumer.
    ///
    /// Claims the first free table entry above the well-known range.
    /// The returned error is reported to the caller; correctness
    /// without the lock is the caller's problem to judge.
    pub fn create(&mut self, kernel: &K, attrs: &MutexAttrs) -> Result<LockHandle, BrokerError> {
        let mut index = WELL_KNOWN_COUNT;
        while index < MAX_LOCKS && self.locks[index].is_some() {
            index += 1;
        }
        if index == MAX_LOCKS {
            return Err(BrokerError::OutOfMemory);
        }
        let mutex = kernel.create_mutex(attrs).map_err(creation_error)?;
        self.locks[index] = Some(mutex);
        Ok(LockHandle(index))
    }

    /// Acquires a lock, waiting at most `timeout`.
    pub fn acquire(
        &self,
        kernel: &K,
        handle: LockHandle,
        timeout: Timeout,
    ) -> Result<(), BrokerError> {
        let mutex = self.mutex(handle)?;
        kernel.acquire_mutex(mutex, timeout).map_err(delegation_error)
    }

    /// Non-blocking acquire.
    pub fn try_acquire(&self, kernel: &K, handle: LockHandle) -> Result<(), BrokerError> {
        self.acquire(kernel, handle, Timeout::Immediate)
    }

    /// Releases a lock held by the calling thread.
    pub fn release(&self, kernel: &K, handle: LockHandle) -> Result<(), BrokerError> {
        let mutex = self.mutex(handle)?;
        kernel.release_mutex(mutex).map_err(delegation_error)
    }

    /// Destroys a lock and frees its table entry.
    pub fn destroy(&mut self, kernel: &K, handle: LockHandle) -> Result<(), BrokerError> {
        let mutex = self.mutex(handle)?;
        kernel.delete_mutex(mutex).map_err(delegation_error)?;
        self.locks[handle.0] = None;
        Ok(())
    }

    /// Returns the number of live locks.
    #[must_use]
    pub fn live(&self) -> usize {
        self.locks.iter().filter(|lock| lock.is_some()).count()
    }

    pub(crate) fn mutex(&self, handle: LockHandle) -> Result<K::Mutex, BrokerError> {
        match self.locks.get(handle.0) {
            Some(&Some(mutex)) => Ok(mutex),
            _ => Err(BrokerError::InvalidHandle),
        }
    }
}

impl<K: Kernel> Default for LockBroker<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod broker_test;
