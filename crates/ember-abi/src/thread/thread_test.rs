// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for thread identity types.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn null_thread_id() {
    assert!(ThreadId::NULL.is_null());
    assert!(ThreadId::new(0).is_null());
    assert!(!ThreadId::new(0x2000_1234).is_null());
}

#[test]
fn thread_id_roundtrip() {
    let id = ThreadId::new(0xdead_beef);
    assert_eq!(id.as_usize(), 0xdead_beef);
    assert_eq!(id, ThreadId::new(0xdead_beef));
    assert_ne!(id, ThreadId::NULL);
}

#[test]
fn priorities_are_ordered() {
    assert!(ThreadPriority::Low < ThreadPriority::BelowNormal);
    assert!(ThreadPriority::BelowNormal < ThreadPriority::Normal);
    assert!(ThreadPriority::Normal < ThreadPriority::AboveNormal);
    assert!(ThreadPriority::AboveNormal < ThreadPriority::High);
}

#[test]
fn default_priority_is_normal() {
    assert_eq!(ThreadPriority::default(), ThreadPriority::Normal);
}
