// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for memory partitioning.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use super::*;

#[test]
fn default_split() {
    let free = MemoryRegion::new(0x1000, 4096);
    let layout = compute_layout_with(free, None, 256);

    assert_eq!(layout.heap, MemoryRegion::new(0x1000, 3840));
    assert_eq!(layout.isr_stack, MemoryRegion::new(0x1000 + 3840, 256));
}

#[test]
fn stack_larger_than_free_block() {
    let free = MemoryRegion::new(0x1000, 4096);
    let layout = compute_layout_with(free, None, 8192);

    assert_eq!(layout.isr_stack.size(), 4096);
    assert_eq!(layout.isr_stack.start(), 0x1000);
    assert!(layout.heap.is_empty());
}

#[test]
fn explicit_override_leaves_heap_untouched() {
    let free = MemoryRegion::new(0x2000_0000, 0x8000);
    let isr = MemoryRegion::new(0x2004_0000, 0x400);
    let layout = compute_layout_with(free, Some(isr), 256);

    assert_eq!(layout.heap, free);
    assert_eq!(layout.isr_stack, isr);
}

#[test]
fn zero_sized_free_block() {
    let free = MemoryRegion::new(0x1000, 0);
    let layout = compute_layout_with(free, None, 1024);

    assert!(layout.heap.is_empty());
    assert!(layout.isr_stack.is_empty());
}

#[test]
fn configured_default_is_used() {
    let free = MemoryRegion::new(0x2000_0000, 64 * 1024);
    let layout = compute_layout(free, None);

    assert_eq!(layout.isr_stack.size(), ISR_STACK_SIZE);
    assert_eq!(layout.heap.size() + layout.isr_stack.size(), free.size());
}

proptest! {
    /// Heap and ISR stack always cover the free block exactly.
    #[test]
    fn split_is_exact(
        start in 0usize..0x4000_0000,
        size in 0usize..0x0100_0000,
        isr in 0usize..0x0100_0000,
    ) {
        let free = MemoryRegion::new(start, size);
        let layout = compute_layout_with(free, None, isr);

        prop_assert_eq!(layout.heap.size() + layout.isr_stack.size(), size);
        prop_assert_eq!(layout.isr_stack.size(), isr.min(size));
        prop_assert_eq!(layout.heap.start(), free.start());
        prop_assert_eq!(layout.heap.end(), layout.isr_stack.start());
        prop_assert_eq!(layout.isr_stack.end(), free.end());
    }
}
