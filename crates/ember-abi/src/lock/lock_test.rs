// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for mutex attribute types.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn plain_attrs() {
    let attrs = MutexAttrs::plain("tz_mutex");
    assert_eq!(attrs.name, "tz_mutex");
    assert_eq!(attrs.class, LockClass::Plain);
    assert!(!attrs.is_recursive());
    assert!(attrs.priority_inherit);
    assert!(attrs.robust);
}

#[test]
fn recursive_attrs() {
    let attrs = MutexAttrs::recursive("malloc_mutex");
    assert_eq!(attrs.class, LockClass::Recursive);
    assert!(attrs.is_recursive());
    assert!(attrs.priority_inherit);
    assert!(attrs.robust);
}

#[test]
fn timeout_variants_are_distinct() {
    assert_ne!(Timeout::Infinite, Timeout::Immediate);
    assert_ne!(Timeout::Immediate, Timeout::Ticks(0));
    assert_eq!(Timeout::Ticks(100), Timeout::Ticks(100));
}
