// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Ember Boot Core
//!
//! The bring-up layer between power-on reset and the application entry
//! point on an RTOS-hosting microcontroller. It:
//! - Carves the free memory block into heap and interrupt-stack regions
//! - Brings the kernel up and starts the bootstrap thread
//! - Creates the well-known runtime locks on behalf of the C runtime
//! - Hands out per-thread reentrancy state to kernel threads
//! - Invokes the application entry point exactly once
//!
//! The kernel itself is an external collaborator consumed through the
//! [`kernel::Kernel`] trait. The default build is host-testable with
//! [`kernel::MockKernel`]; bare-metal targets enable the `cmsis`
//! feature for the CMSIS-RTOS2 backend.
//!
//! # Modules
//!
//! - [`partition`]: heap/ISR-stack memory partitioning
//! - [`broker`]: kernel mutex lifecycle on behalf of library subsystems
//! - [`libspace`]: per-thread reentrancy-state pool
//! - [`sequence`]: the bootstrap state machine
//! - [`kernel`]: the kernel collaborator trait
//! - [`hooks`]: overridable board/application hooks

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod broker;
#[cfg(all(feature = "cmsis", target_os = "none"))]
pub mod cmsis;
pub mod hooks;
pub mod kernel;
pub mod libspace;
pub mod partition;
pub mod sequence;
