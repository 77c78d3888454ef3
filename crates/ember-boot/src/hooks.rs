// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Overridable board and application hooks.
//!
//! A capability trait with provided no-op defaults: a platform adapter
//! substitutes its own implementation at configuration time, everyone
//! else gets [`DefaultHooks`].

use crate::sequence::BootError;

/// Hooks invoked at fixed points of the boot sequence.
///
/// Each hook runs exactly once. None of them return values; a board
/// that cannot initialize has no one to report to this early and must
/// halt on its own.
pub trait BoardHooks {
    /// Board/SDK initialization, before kernel init.
    ///
    /// Runs single-threaded; must complete before the kernel starts.
    fn board_init(&self) {}

    /// C-runtime static initializers, inside the bootstrap thread,
    /// after the well-known locks exist.
    fn rt_init(&self) {}

    /// Application pre-entry hook, right before the entry point.
    fn app_init(&self) {}

    /// Terminal error sink for unrecoverable boot failures.
    ///
    /// The default parks the CPU; boards typically log the error to a
    /// serial port or blink an LED first.
    fn fatal(&self, error: &BootError) -> ! {
        let _ = error;
        loop {
            core::hint::spin_loop();
        }
    }
}

/// The no-op hook set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl BoardHooks for DefaultHooks {}
