// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The kernel collaborator trait.
//!
//! The boot core never talks to an RTOS directly; it consumes a fixed
//! set of kernel calls through [`Kernel`]. Bare-metal builds implement
//! it over CMSIS-RTOS2 FFI (see the `cmsis` module), host builds use
//! [`MockKernel`].

use ember_abi::{MemoryLayout, MemoryRegion, MutexAttrs, ThreadId, ThreadPriority, Timeout};

/// Error reported by a kernel call.
///
/// The variants mirror the status codes of CMSIS-style kernels; other
/// backends map their own codes onto the nearest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Unspecified kernel failure.
    Unspecified,
    /// The wait timed out, or a non-blocking acquire found the mutex held.
    Timeout,
    /// A kernel resource was not available.
    Resource,
    /// A parameter was invalid.
    Parameter,
    /// The kernel could not allocate a control block.
    NoMemory,
    /// The call is not allowed from interrupt context.
    Isr,
}

/// The fixed set of kernel calls the boot core relies on.
///
/// Mutex and thread handles are opaque associated types owned by the
/// backend; the boot core only stores and compares them.
pub trait Kernel {
    /// Opaque kernel mutex handle.
    type Mutex: Copy + PartialEq;

    /// Opaque kernel thread handle.
    type Thread: Copy + PartialEq;

    /// Initializes the kernel with the computed memory layout.
    ///
    /// Called exactly once, single-threaded, before any thread exists.
    fn init(&self, layout: &MemoryLayout) -> Result<(), KernelError>;

    /// Starts the scheduler.
    ///
    /// Does not return under normal operation; a return value is the
    /// failure that prevented the scheduler from taking over.
    fn start(&self) -> KernelError;

    /// Creates a thread on the given stack region.
    fn create_thread(
        &self,
        name: &'static str,
        entry: fn(),
        stack: MemoryRegion,
        priority: ThreadPriority,
    ) -> Result<Self::Thread, KernelError>;

    /// Creates a mutex with the given attributes.
    fn create_mutex(&self, attrs: &MutexAttrs) -> Result<Self::Mutex, KernelError>;

    /// Acquires a mutex, waiting at most `timeout`.
    fn acquire_mutex(&self, mutex: Self::Mutex, timeout: Timeout) -> Result<(), KernelError>;

    /// Releases a mutex held by the calling thread.
    fn release_mutex(&self, mutex: Self::Mutex) -> Result<(), KernelError>;

    /// Deletes a mutex. The handle must not be used afterwards.
    fn delete_mutex(&self, mutex: Self::Mutex) -> Result<(), KernelError>;

    /// Returns the identity of the calling thread.
    fn current_thread(&self) -> ThreadId;

    /// Returns true once the scheduler is running.
    ///
    /// Lock delegation is a no-op before that: the system is still
    /// single-threaded.
    fn is_running(&self) -> bool;
}

#[cfg(any(test, feature = "std"))]
mod mock;

#[cfg(any(test, feature = "std"))]
pub use mock::{MockCall, MockKernel};
