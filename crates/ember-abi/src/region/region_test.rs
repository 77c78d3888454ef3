// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for memory region arithmetic.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn region_bounds() {
    let region = MemoryRegion::new(0x2000_0000, 4096);
    assert_eq!(region.start(), 0x2000_0000);
    assert_eq!(region.size(), 4096);
    assert_eq!(region.end(), 0x2000_1000);
    assert!(!region.is_empty());
}

#[test]
fn empty_region() {
    assert!(MemoryRegion::EMPTY.is_empty());
    assert_eq!(MemoryRegion::EMPTY.start(), MemoryRegion::EMPTY.end());
    assert!(MemoryRegion::new(0x1000, 0).is_empty());
}

#[test]
fn contains_is_half_open() {
    let region = MemoryRegion::new(0x1000, 0x100);
    assert!(region.contains(0x1000));
    assert!(region.contains(0x10ff));
    assert!(!region.contains(0x1100));
    assert!(!region.contains(0xfff));
}

#[test]
fn carve_high_splits_exactly() {
    let region = MemoryRegion::new(0x1000, 4096);
    let (low, high) = region.carve_high(256);

    assert_eq!(low, MemoryRegion::new(0x1000, 3840));
    assert_eq!(high, MemoryRegion::new(0x1000 + 3840, 256));
    assert_eq!(low.size() + high.size(), region.size());
    assert_eq!(low.end(), high.start());
    assert_eq!(high.end(), region.end());
}

#[test]
fn carve_high_clamps_to_region() {
    let region = MemoryRegion::new(0x1000, 4096);
    let (low, high) = region.carve_high(8192);

    assert!(low.is_empty());
    assert_eq!(low.start(), region.start());
    assert_eq!(high, region);
}

#[test]
fn carve_high_zero() {
    let region = MemoryRegion::new(0x1000, 4096);
    let (low, high) = region.carve_high(0);

    assert_eq!(low, region);
    assert!(high.is_empty());
    assert_eq!(high.start(), region.end());
}

#[test]
fn display_and_debug() {
    let region = MemoryRegion::new(0x1000, 16);
    assert_eq!(std::format!("{region}"), "0x1000+16");
    assert_eq!(std::format!("{region:?}"), "MemoryRegion(0x1000..0x1010)");
}
