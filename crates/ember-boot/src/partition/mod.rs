// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Memory partitioning.
//!
//! Splits the single free memory block into the heap region and the
//! interrupt-stack region. The split happens exactly once, before any
//! heap allocator exists, so the computation is a pure function of its
//! inputs with no allocation and no failure path.
//!
//! Without an override, the interrupt stack is carved from the **high
//! end** of the free block and the heap gets the low remainder. With an
//! explicit override region the heap gets the whole free block; making
//! the override not overlap the free block is the link-time
//! configuration's responsibility, not checked here.

use ember_abi::config::ISR_STACK_SIZE;
use ember_abi::{MemoryLayout, MemoryRegion};

/// Computes the boot memory layout with the configured interrupt-stack
/// size.
#[inline]
#[must_use]
pub const fn compute_layout(
    free: MemoryRegion,
    isr_override: Option<MemoryRegion>,
) -> MemoryLayout {
    compute_layout_with(free, isr_override, ISR_STACK_SIZE)
}

/// Computes the boot memory layout with an explicit interrupt-stack
/// size.
///
/// The interrupt stack is sized `min(isr_stack_size, free.size())`, so
/// a degenerate zero-sized heap is valid when the stack consumes the
/// entire free block.
#[must_use]
pub const fn compute_layout_with(
    free: MemoryRegion,
    isr_override: Option<MemoryRegion>,
    isr_stack_size: usize,
) -> MemoryLayout {
    match isr_override {
        Some(isr_stack) => MemoryLayout {
            heap: free,
            isr_stack,
        },
        None => {
            let (heap, isr_stack) = free.carve_high(isr_stack_size);
            MemoryLayout { heap, isr_stack }
        }
    }
}

#[cfg(test)]
mod partition_test;
