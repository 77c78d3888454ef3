// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Compile-time configuration constants.
//!
//! These are the sizing knobs of the bring-up layer. Targets that need
//! different values change them here (or in a target-specific fork of
//! this module); everything is fixed at compile time because the values
//! are consumed before any allocator exists.

/// One kilobyte in bytes.
const KB: usize = 1024;

/// Size of the interrupt stack carved from the free block when no
/// explicit override region is configured.
pub const ISR_STACK_SIZE: usize = KB;

/// Stack size of the bootstrap thread.
pub const MAIN_STACK_SIZE: usize = 4 * KB;

/// Diagnostic name of the bootstrap thread.
pub const MAIN_THREAD_NAME: &str = "main_thread";

/// Number of per-thread runtime-state slots.
///
/// Every kernel thread other than the bootstrap thread that touches
/// library runtime state permanently claims one slot. Exhaustion is a
/// sizing error and halts the system.
pub const LIBSPACE_SLOTS: usize = 4;

/// Capacity of the lock broker's handle table, including the
/// well-known locks created during bootstrap.
pub const MAX_LOCKS: usize = 16;

// Compile-time sanity checks on the configuration
const _: () = {
    assert!(ISR_STACK_SIZE > 0);
    assert!(ISR_STACK_SIZE % 8 == 0); // AAPCS stack alignment
    assert!(MAIN_STACK_SIZE >= 512);
    assert!(MAIN_STACK_SIZE % 8 == 0);
    assert!(LIBSPACE_SLOTS >= 1);
    assert!(MAX_LOCKS >= 1);
};
