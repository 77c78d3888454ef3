// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Thread identity and priority types.

use core::fmt;

/// Opaque identity of a kernel thread.
///
/// Thread IDs are assigned by the kernel collaborator; on most RTOS
/// backends they are the address of the thread control block. ID 0 is
/// reserved/invalid and doubles as "no thread" before the kernel runs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ThreadId(usize);

impl ThreadId {
    /// The invalid/null thread ID.
    pub const NULL: Self = Self(0);

    /// Creates a new thread ID.
    #[inline]
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Checks if this is the null/invalid thread ID.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThreadId(0x{:x})", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread:0x{:x}", self.0)
    }
}

/// Scheduling priority of a kernel thread.
///
/// The bootstrap thread always runs at [`ThreadPriority::Normal`];
/// the other levels exist for adapters that create further threads.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[repr(u8)]
pub enum ThreadPriority {
    /// Background work.
    Low = 0,

    /// Below the bootstrap thread.
    BelowNormal = 1,

    /// Default priority, used for the bootstrap thread.
    #[default]
    Normal = 2,

    /// Above the bootstrap thread.
    AboveNormal = 3,

    /// Time-critical work.
    High = 4,
}

#[cfg(test)]
mod thread_test;
