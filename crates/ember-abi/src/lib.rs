// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Shared definitions between the Ember boot core and platform adapters.
//!
//! This crate defines the contract between the bring-up layer and the
//! per-target adapter that wires it to a concrete RTOS and toolchain:
//! - Memory region and boot layout types
//! - Thread identity and priority types
//! - Mutex attribute and timeout types
//! - Compile-time configuration constants
//!
//! # Design Principles
//!
//! - **No dependencies**: Pure data types, 100% host-testable
//! - **No allocation**: Everything here is usable before a heap exists
//! - **Const-friendly**: Layout math runs in const context where possible
//!
//! # Modules
//!
//! - [`region`]: [`MemoryRegion`] and [`MemoryLayout`]
//! - [`thread`]: [`ThreadId`] and [`ThreadPriority`]
//! - [`lock`]: [`MutexAttrs`], [`LockClass`] and [`Timeout`]
//! - [`config`]: compile-time sizing constants

#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod lock;
pub mod region;
pub mod thread;

// Re-export commonly used types at crate root
pub use lock::{LockClass, MutexAttrs, Timeout};
pub use region::{MemoryLayout, MemoryRegion};
pub use thread::{ThreadId, ThreadPriority};
