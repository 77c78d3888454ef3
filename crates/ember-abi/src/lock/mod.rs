// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Mutex attribute and timeout types.
//!
//! The boot core creates two flavors of kernel mutex:
//! - **Recursive** locks for subsystems whose call graphs may re-enter
//!   the same lock on the same thread (heap allocator, environment)
//! - **Plain** locks for subsystems with no re-entrant call pattern
//!   (time-zone state, randomness state)
//!
//! Both flavors are priority-inheriting and robust: a waiter's higher
//! priority is lent to the holder, and the kernel recovers the lock if
//! the holder terminates abnormally.

/// Re-entrancy class of a kernel mutex.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LockClass {
    /// Same-thread re-acquisition deadlocks or errors.
    Plain,

    /// Same-thread re-acquisition nests; each acquire needs a matching
    /// release before the lock becomes available to other threads.
    Recursive,
}

/// Attributes for creating a kernel mutex.
#[derive(Clone, Copy, Debug)]
pub struct MutexAttrs {
    /// Diagnostic name of the mutex.
    pub name: &'static str,
    /// Re-entrancy class.
    pub class: LockClass,
    /// Lend a higher-priority waiter's priority to the holder.
    pub priority_inherit: bool,
    /// Recoverable if the holder terminates while holding the lock.
    pub robust: bool,
}

impl MutexAttrs {
    /// Attributes for a plain, priority-inheriting, robust mutex.
    #[inline]
    #[must_use]
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            class: LockClass::Plain,
            priority_inherit: true,
            robust: true,
        }
    }

    /// Attributes for a recursive, priority-inheriting, robust mutex.
    #[inline]
    #[must_use]
    pub const fn recursive(name: &'static str) -> Self {
        Self {
            name,
            class: LockClass::Recursive,
            priority_inherit: true,
            robust: true,
        }
    }

    /// Returns true for the recursive flavor.
    #[inline]
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        matches!(self.class, LockClass::Recursive)
    }
}

/// How long a mutex acquisition may wait.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Timeout {
    /// Block until the mutex becomes available.
    Infinite,

    /// Non-blocking try; fail immediately if the mutex is held.
    Immediate,

    /// Block for at most the given number of kernel ticks.
    Ticks(u32),
}

#[cfg(test)]
mod lock_test;
