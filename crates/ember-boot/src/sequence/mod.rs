// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The bootstrap sequencer.
//!
//! One linear state machine orders the boot steps exactly once:
//!
//! ```text
//! Reset
//!   -> LayoutComputed        compute heap/ISR-stack partition
//!   -> HardwareInitialized   board hook
//!   -> KernelInitialized     kernel init with the layout
//!   -> BootThreadStarted     create the bootstrap thread
//!   -> KernelRunning         scheduler takes over (start does not return)
//!   -> PreMainComplete       locks + runtime init, inside the bootstrap thread
//!   -> EntryPointInvoked     application entry point
//! ```
//!
//! Transitions are irreversible and never rolled back. Boot-time
//! failures are fatal: they are returned to the platform adapter,
//! which routes them to [`BoardHooks::fatal`] - there is no partial or
//! degraded boot, and no retry logic anywhere.

use core::sync::atomic::{AtomicU8, Ordering};

use ember_abi::config::MAIN_THREAD_NAME;
use ember_abi::{MemoryLayout, MemoryRegion, ThreadId, ThreadPriority};

use crate::broker::{BrokerError, LockBroker};
use crate::hooks::BoardHooks;
use crate::kernel::{Kernel, KernelError};
use crate::libspace::{LibSpace, LibSpaceError};
use crate::partition;

/// Stage of the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum BootStage {
    /// Nothing has happened yet.
    Reset = 0,
    /// The memory partition was computed.
    LayoutComputed = 1,
    /// The board hook ran.
    HardwareInitialized = 2,
    /// The kernel accepted the layout.
    KernelInitialized = 3,
    /// The bootstrap thread exists.
    BootThreadStarted = 4,
    /// The scheduler took over.
    KernelRunning = 5,
    /// Locks and runtime initializers ran inside the bootstrap thread.
    PreMainComplete = 6,
    /// The application entry point was called.
    EntryPointInvoked = 7,
}

impl BootStage {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::LayoutComputed,
            2 => Self::HardwareInitialized,
            3 => Self::KernelInitialized,
            4 => Self::BootThreadStarted,
            5 => Self::KernelRunning,
            6 => Self::PreMainComplete,
            7 => Self::EntryPointInvoked,
            _ => Self::Reset,
        }
    }
}

/// Unrecoverable boot failure.
///
/// Every variant halts the system; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// The kernel rejected initialization.
    KernelInit(KernelError),
    /// The bootstrap thread could not be created.
    BootThread(KernelError),
    /// A well-known lock could not be created.
    WellKnownLock(BrokerError),
    /// The scheduler failed to start.
    KernelStart(KernelError),
    /// The runtime-state pool has no free slot for a new thread.
    PoolExhausted {
        /// The thread that could not be served.
        thread: ThreadId,
    },
}

impl From<LibSpaceError> for BootError {
    fn from(error: LibSpaceError) -> Self {
        match error {
            LibSpaceError::PoolExhausted { thread } => Self::PoolExhausted { thread },
        }
    }
}

/// Process-wide boot state, advancing monotonically through
/// [`BootStage`].
pub struct BootState {
    stage: AtomicU8,
}

impl BootState {
    /// Creates the state at [`BootStage::Reset`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: AtomicU8::new(BootStage::Reset as u8),
        }
    }

    /// Returns the current stage.
    #[must_use]
    pub fn stage(&self) -> BootStage {
        BootStage::from_u8(self.stage.load(Ordering::Acquire))
    }

    fn advance(&self, to: BootStage) {
        let previous = self.stage.swap(to as u8, Ordering::AcqRel);
        debug_assert!(
            previous + 1 == to as u8,
            "boot stages advance one step at a time"
        );
    }
}

impl Default for BootState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the boot sequence over a kernel collaborator.
///
/// All methods take `&self`: the stage lives in an atomic and the
/// layout in a write-once cell, so a platform adapter can keep one
/// `Sequencer` in a plain static shared between the pre-kernel path
/// and the bootstrap thread.
pub struct Sequencer<K: Kernel> {
    kernel: K,
    state: BootState,
    layout: spin::Once<MemoryLayout>,
}

impl<K: Kernel> Sequencer<K> {
    /// Creates a sequencer at [`BootStage::Reset`].
    #[must_use]
    pub const fn new(kernel: K) -> Self {
        Self {
            kernel,
            state: BootState::new(),
            layout: spin::Once::new(),
        }
    }

    /// Returns the kernel collaborator.
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Returns the current boot stage.
    #[must_use]
    pub fn stage(&self) -> BootStage {
        self.state.stage()
    }

    /// Returns the computed memory layout, once it exists.
    #[must_use]
    pub fn layout(&self) -> Option<MemoryLayout> {
        self.layout.get().copied()
    }

    /// Phase 1: everything up to scheduler start.
    ///
    /// Runs single-threaded, before any thread exists. On success the
    /// bootstrap thread is created (but not yet scheduled) and the
    /// caller must invoke [`Self::run`].
    pub fn start<H: BoardHooks + ?Sized>(
        &self,
        hooks: &H,
        free: MemoryRegion,
        isr_override: Option<MemoryRegion>,
        main_stack: MemoryRegion,
        entry: fn(),
    ) -> Result<(), BootError> {
        let layout = *self
            .layout
            .call_once(|| partition::compute_layout(free, isr_override));
        self.state.advance(BootStage::LayoutComputed);

        hooks.board_init();
        self.state.advance(BootStage::HardwareInitialized);

        self.kernel.init(&layout).map_err(BootError::KernelInit)?;
        self.state.advance(BootStage::KernelInitialized);

        self.kernel
            .create_thread(MAIN_THREAD_NAME, entry, main_stack, ThreadPriority::Normal)
            .map_err(BootError::BootThread)?;
        self.state.advance(BootStage::BootThreadStarted);

        Ok(())
    }

    /// Phase 2: hand control to the scheduler.
    ///
    /// Does not return under normal operation; a return value is the
    /// fatal failure that prevented the scheduler from taking over.
    pub fn run(&self) -> BootError {
        self.state.advance(BootStage::KernelRunning);
        BootError::KernelStart(self.kernel.start())
    }

    /// Phase 3a: create the well-known locks, inside the bootstrap
    /// thread, before any runtime initializer runs.
    ///
    /// The borrow of `broker` ends here so that the runtime
    /// initializers ([`Self::pre_main`]) and the entry point
    /// ([`Self::enter`]) can create dynamic locks of their own.
    pub fn create_runtime_locks(&self, broker: &mut LockBroker<K>) -> Result<(), BootError> {
        broker
            .create_well_known(&self.kernel)
            .map_err(BootError::WellKnownLock)
    }

    /// Phase 3b: pre-entry-point initialization, inside the bootstrap
    /// thread, after [`Self::create_runtime_locks`].
    ///
    /// Registers the bootstrap thread with the runtime-state pool and
    /// runs the runtime and application hooks. Callers must not hold a
    /// guard on the lock broker here: C-runtime static initializers
    /// create their own locks through the broker.
    pub fn pre_main<H: BoardHooks + ?Sized, const N: usize>(
        &self,
        hooks: &H,
        libspace: &LibSpace<N>,
    ) {
        debug_assert!(self.kernel.is_running());
        libspace.start(self.kernel.current_thread());

        hooks.rt_init();
        hooks.app_init();
        self.state.advance(BootStage::PreMainComplete);
    }

    /// Invokes the application entry point exactly once.
    ///
    /// The return value is the process's terminal outcome; there is no
    /// restart.
    pub fn enter(&self, entry: fn() -> i32) -> i32 {
        self.state.advance(BootStage::EntryPointInvoked);
        entry()
    }
}
