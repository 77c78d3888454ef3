// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Per-thread runtime-state pool.
//!
//! C-library-style functions keep mutable scratch state (errno, rand
//! state, formatting buffers) that is not otherwise thread-safe. This
//! module arbitrates a bounded pool of such state blocks between
//! kernel threads: each distinct thread claims one block on first use
//! and keeps it for the life of the process.
//!
//! A distinguished **global block** lives outside the pool. It serves
//! every caller before the kernel runs, and the bootstrap thread
//! itself afterwards - the bootstrap thread simply keeps using the
//! state it already touched during early boot.
//!
//! Slot claiming is first-fit and monotonic: slots are never returned
//! to the pool, even if the owning thread terminates. Exhaustion is a
//! sizing error ([`ember_abi::config::LIBSPACE_SLOTS`]), reported with
//! the offending thread identity and treated as fatal by callers -
//! handing out a shared fallback block would corrupt state under
//! concurrency.

use ember_abi::ThreadId;

/// Length of the time-formatting scratch buffer (fits `asctime`
/// output).
const TIME_BUF_LEN: usize = 26;

/// Reentrancy scratch state for one thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReentBlock {
    /// Last library error code.
    pub errno: i32,
    /// State of the pseudo-random generator.
    pub rand_state: u64,
    /// Resume address of an in-progress string tokenization, 0 when
    /// none.
    pub strtok_cursor: usize,
    /// Scratch buffer for time formatting.
    pub time_buf: [u8; TIME_BUF_LEN],
}

impl ReentBlock {
    /// A freshly initialized block.
    pub const FRESH: Self = Self {
        errno: 0,
        rand_state: 1, // classic rand() seed
        strtok_cursor: 0,
        time_buf: [0; TIME_BUF_LEN],
    };
}

impl Default for ReentBlock {
    fn default() -> Self {
        Self::FRESH
    }
}

/// Error reported by the runtime-state pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibSpaceError {
    /// No free slot remains for a new thread. Fatal: continuing would
    /// corrupt shared state.
    PoolExhausted {
        /// The thread that could not be served.
        thread: ThreadId,
    },
}

/// Bounded pool of reentrancy-state blocks.
///
/// Pure and single-threaded; the process-wide [`LibSpace`] wrapper
/// adds the mutual exclusion the claim step requires.
pub struct ReentPool<const N: usize> {
    owners: [Option<ThreadId>; N],
    blocks: [ReentBlock; N],
    global: ReentBlock,
    boot_thread: Option<ThreadId>,
}

impl<const N: usize> ReentPool<N> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            owners: [None; N],
            blocks: [ReentBlock::FRESH; N],
            global: ReentBlock::FRESH,
            boot_thread: None,
        }
    }

    /// Marks the kernel as running and records the bootstrap thread.
    ///
    /// Until this is called every request resolves to the global
    /// block; afterwards only the bootstrap thread does.
    pub const fn start(&mut self, boot_thread: ThreadId) {
        self.boot_thread = Some(boot_thread);
    }

    /// Returns true once [`Self::start`] was called.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.boot_thread.is_some()
    }

    /// Returns the state block for the given thread, claiming a slot
    /// on first use.
    ///
    /// Repeated calls for the same thread return the same block. The
    /// caller must serialize invocations; see [`LibSpace`].
    pub fn get(&mut self, thread: ThreadId) -> Result<&mut ReentBlock, LibSpaceError> {
        let Some(boot_thread) = self.boot_thread else {
            return Ok(&mut self.global);
        };
        if thread == boot_thread {
            return Ok(&mut self.global);
        }

        let mut free = None;
        for (index, owner) in self.owners.iter().enumerate() {
            match *owner {
                Some(id) if id == thread => return Ok(&mut self.blocks[index]),
                None if free.is_none() => free = Some(index),
                _ => {}
            }
        }

        match free {
            Some(index) => {
                self.owners[index] = Some(thread);
                self.blocks[index] = ReentBlock::FRESH;
                Ok(&mut self.blocks[index])
            }
            None => Err(LibSpaceError::PoolExhausted { thread }),
        }
    }

    /// Returns the number of claimed slots.
    #[must_use]
    pub fn claimed(&self) -> usize {
        self.owners.iter().filter(|owner| owner.is_some()).count()
    }

    /// Returns the pool capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for ReentPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide runtime-state pool with serialized slot claiming.
///
/// Two threads racing the scan-and-claim step could otherwise claim
/// the same empty slot; the internal spinlock makes the step atomic.
pub struct LibSpace<const N: usize> {
    pool: spin::Mutex<ReentPool<N>>,
}

impl<const N: usize> LibSpace<N> {
    /// Creates an empty pool wrapper.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pool: spin::Mutex::new(ReentPool::new()),
        }
    }

    /// Marks the kernel as running and records the bootstrap thread.
    pub fn start(&self, boot_thread: ThreadId) {
        self.pool.lock().start(boot_thread);
    }

    /// Runs `f` with the state block of the given thread.
    ///
    /// The block is borrowed under the internal lock; `f` must not
    /// call back into this pool.
    pub fn with<R>(
        &self,
        thread: ThreadId,
        f: impl FnOnce(&mut ReentBlock) -> R,
    ) -> Result<R, LibSpaceError> {
        let mut pool = self.pool.lock();
        let block = pool.get(thread)?;
        Ok(f(block))
    }

    /// Returns the number of claimed slots.
    #[must_use]
    pub fn claimed(&self) -> usize {
        self.pool.lock().claimed()
    }
}

impl<const N: usize> Default for LibSpace<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod libspace_test;
