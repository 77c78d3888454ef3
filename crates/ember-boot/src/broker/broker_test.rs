// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the lock broker.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ember_abi::ThreadId;

use crate::kernel::{KernelError, MockKernel};

use super::*;

#[test]
fn well_known_set_is_created_in_order() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();

    broker.create_well_known(&kernel).unwrap();

    assert_eq!(broker.live(), WELL_KNOWN_COUNT);
    let created: std::vec::Vec<_> = kernel
        .calls()
        .iter()
        .filter_map(|call| match call {
            crate::kernel::MockCall::CreateMutex(name) => Some(*name),
            _ => None,
        })
        .collect();
    assert_eq!(
        created,
        [
            "singleton_mutex",
            "sinit_mutex",
            "sfp_mutex",
            "malloc_mutex",
            "env_mutex",
            "at_quick_exit_mutex",
            "tz_mutex",
            "arc4random_mutex",
        ]
    );
}

#[test]
fn well_known_handles_are_stable() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();
    broker.create_well_known(&kernel).unwrap();

    let malloc = WellKnownLock::Malloc.handle();
    broker.acquire(&kernel, malloc, Timeout::Infinite).unwrap();
    broker.release(&kernel, malloc).unwrap();
}

#[test]
fn well_known_creation_failure_propagates() {
    let kernel = MockKernel::new();
    kernel.deny_mutex_creation(KernelError::NoMemory);
    let mut broker = LockBroker::<MockKernel>::new();

    assert_eq!(
        broker.create_well_known(&kernel),
        Err(BrokerError::OutOfMemory)
    );
}

#[test]
fn acquire_release_roundtrip() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();
    let handle = broker
        .create(&kernel, &MutexAttrs::plain("test_mutex"))
        .unwrap();

    broker.acquire(&kernel, handle, Timeout::Infinite).unwrap();
    broker.release(&kernel, handle).unwrap();

    // Available again, for any thread
    kernel.set_current_thread(ThreadId::new(2));
    broker.acquire(&kernel, handle, Timeout::Infinite).unwrap();
    broker.release(&kernel, handle).unwrap();
}

#[test]
fn plain_lock_blocks_other_threads() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();
    let handle = broker
        .create(&kernel, &MutexAttrs::plain("contended_mutex"))
        .unwrap();

    kernel.set_current_thread(ThreadId::new(1));
    broker.acquire(&kernel, handle, Timeout::Infinite).unwrap();

    kernel.set_current_thread(ThreadId::new(2));
    assert_eq!(
        broker.try_acquire(&kernel, handle),
        Err(BrokerError::Timeout)
    );
}

#[test]
fn recursive_lock_nests_on_one_thread() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();
    let handle = broker
        .create(&kernel, &MutexAttrs::recursive("nested_mutex"))
        .unwrap();

    kernel.set_current_thread(ThreadId::new(1));
    broker.acquire(&kernel, handle, Timeout::Infinite).unwrap();
    broker.acquire(&kernel, handle, Timeout::Infinite).unwrap();

    // Still held after one release
    broker.release(&kernel, handle).unwrap();
    kernel.set_current_thread(ThreadId::new(2));
    assert_eq!(
        broker.try_acquire(&kernel, handle),
        Err(BrokerError::Timeout)
    );

    // Released for good after the matching release
    kernel.set_current_thread(ThreadId::new(1));
    broker.release(&kernel, handle).unwrap();
    kernel.set_current_thread(ThreadId::new(2));
    broker.try_acquire(&kernel, handle).unwrap();
}

#[test]
fn dynamic_creation_fills_table() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();
    broker.create_well_known(&kernel).unwrap();

    let attrs = MutexAttrs::plain("dynamic_mutex");
    for _ in WELL_KNOWN_COUNT..ember_abi::config::MAX_LOCKS {
        broker.create(&kernel, &attrs).unwrap();
    }
    assert_eq!(broker.create(&kernel, &attrs), Err(BrokerError::OutOfMemory));
}

#[test]
fn kernel_allocation_failure_is_reported_not_fatal() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::<MockKernel>::new();
    kernel.deny_mutex_creation(KernelError::NoMemory);

    assert_eq!(
        broker.create(&kernel, &MutexAttrs::plain("doomed_mutex")),
        Err(BrokerError::OutOfMemory)
    );
    assert_eq!(broker.live(), 0);
}

#[test]
fn destroy_frees_the_entry_for_reuse() {
    let kernel = MockKernel::new();
    let mut broker = LockBroker::new();
    let attrs = MutexAttrs::plain("short_lived_mutex");

    let handle = broker.create(&kernel, &attrs).unwrap();
    broker.destroy(&kernel, handle).unwrap();
    assert_eq!(broker.live(), 0);
    assert_eq!(
        broker.acquire(&kernel, handle, Timeout::Infinite),
        Err(BrokerError::InvalidHandle)
    );

    // First-fit hands the freed entry out again
    let reused = broker.create(&kernel, &attrs).unwrap();
    assert_eq!(reused, handle);
}

#[test]
fn stale_handle_is_rejected() {
    let kernel = MockKernel::new();
    let broker = LockBroker::<MockKernel>::new();

    assert_eq!(
        broker.release(&kernel, WellKnownLock::Tz.handle()),
        Err(BrokerError::InvalidHandle)
    );
}
