// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Memory region and boot layout types.
//!
//! A [`MemoryRegion`] describes one contiguous byte range of raw memory.
//! The boot sequence derives a [`MemoryLayout`] from a single free block
//! exactly once; the layout is immutable afterwards and is read by the
//! heap allocator and the kernel.

use core::fmt;

/// A contiguous range of raw memory.
///
/// Regions are plain address/size pairs. They carry no ownership or
/// mapping semantics; validity of the range is the configuration's
/// responsibility.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryRegion {
    start: usize,
    size: usize,
}

impl MemoryRegion {
    /// The empty region at address zero.
    pub const EMPTY: Self = Self { start: 0, size: 0 };

    /// Creates a new region.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// Returns the first address of the region.
    #[inline]
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// Returns the size of the region in bytes.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        self.size
    }

    /// Returns one past the last address of the region.
    #[inline]
    #[must_use]
    pub const fn end(self) -> usize {
        self.start + self.size
    }

    /// Returns true if the region is zero-sized.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.size == 0
    }

    /// Returns true if the address lies within the region.
    #[inline]
    #[must_use]
    pub const fn contains(self, addr: usize) -> bool {
        addr >= self.start && addr < self.end()
    }

    /// Splits off up to `size` bytes from the high end of the region.
    ///
    /// Returns `(low, high)` where `high` is the carved range (clamped
    /// to the region size) and `low` is the remainder. The two halves
    /// cover the region exactly.
    #[must_use]
    pub const fn carve_high(self, size: usize) -> (Self, Self) {
        let carved = if size < self.size { size } else { self.size };
        let low = Self::new(self.start, self.size - carved);
        let high = Self::new(self.start + self.size - carved, carved);
        (low, high)
    }
}

impl fmt::Debug for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryRegion(0x{:x}..0x{:x})", self.start, self.end())
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}+{}", self.start, self.size)
    }
}

/// The memory layout derived at boot.
///
/// Computed exactly once from the free block before any allocator
/// exists. The heap region is handed to the heap allocator, the ISR
/// stack region to the CPU's interrupt stack setup.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MemoryLayout {
    /// Region available to the heap allocator. May be zero-sized.
    pub heap: MemoryRegion,
    /// Region reserved for the interrupt stack.
    pub isr_stack: MemoryRegion,
}

#[cfg(test)]
mod region_test;
