// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the per-thread runtime-state pool.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

const BOOT: ThreadId = ThreadId::new(0x1000);

#[test]
fn global_block_before_kernel_start() {
    let mut pool = ReentPool::<4>::new();
    assert!(!pool.is_started());

    // Any identity resolves to the global block while single-threaded
    pool.get(ThreadId::new(7)).unwrap().errno = 42;
    assert_eq!(pool.get(ThreadId::NULL).unwrap().errno, 42);
    assert_eq!(pool.claimed(), 0);
}

#[test]
fn bootstrap_thread_keeps_the_global_block() {
    let mut pool = ReentPool::<4>::new();
    pool.get(BOOT).unwrap().errno = 13;

    pool.start(BOOT);
    assert!(pool.is_started());

    // Same state as during early boot, no slot claimed
    assert_eq!(pool.get(BOOT).unwrap().errno, 13);
    assert_eq!(pool.claimed(), 0);
}

#[test]
fn distinct_threads_get_distinct_stable_blocks() {
    let mut pool = ReentPool::<4>::new();
    pool.start(BOOT);

    let t1 = ThreadId::new(0x2000);
    let t2 = ThreadId::new(0x3000);

    pool.get(t1).unwrap().errno = 1;
    pool.get(t2).unwrap().errno = 2;

    assert_eq!(pool.get(t1).unwrap().errno, 1);
    assert_eq!(pool.get(t2).unwrap().errno, 2);
    assert_eq!(pool.claimed(), 2);

    // Repeated calls have no side effects
    let _ = pool.get(t1).unwrap();
    assert_eq!(pool.claimed(), 2);
}

#[test]
fn fresh_block_on_claim() {
    let mut pool = ReentPool::<4>::new();
    pool.start(BOOT);

    let block = pool.get(ThreadId::new(0x2000)).unwrap();
    assert_eq!(*block, ReentBlock::FRESH);
    assert_eq!(block.rand_state, 1);
}

#[test]
fn pool_exhaustion_is_an_error() {
    let mut pool = ReentPool::<2>::new();
    pool.start(BOOT);

    pool.get(ThreadId::new(0x2000)).unwrap();
    pool.get(ThreadId::new(0x3000)).unwrap();

    let unlucky = ThreadId::new(0x4000);
    assert_eq!(
        pool.get(unlucky),
        Err(LibSpaceError::PoolExhausted { thread: unlucky })
    );

    // Existing owners and the bootstrap thread are still served
    assert!(pool.get(ThreadId::new(0x2000)).is_ok());
    assert!(pool.get(BOOT).is_ok());
}

#[test]
fn slots_are_never_reclaimed() {
    let mut pool = ReentPool::<1>::new();
    pool.start(BOOT);

    pool.get(ThreadId::new(0x2000)).unwrap();

    // Even if thread 0x2000 terminated, its slot stays claimed
    let late = ThreadId::new(0x3000);
    assert_eq!(
        pool.get(late),
        Err(LibSpaceError::PoolExhausted { thread: late })
    );
    assert_eq!(pool.claimed(), 1);
}

#[test]
fn wrapper_serializes_and_delegates() {
    let libspace = LibSpace::<2>::new();
    libspace.start(BOOT);

    let t1 = ThreadId::new(0x2000);
    libspace.with(t1, |block| block.errno = 99).unwrap();
    let errno = libspace.with(t1, |block| block.errno).unwrap();
    assert_eq!(errno, 99);
    assert_eq!(libspace.claimed(), 1);
}

#[test]
fn concurrent_first_claims_get_distinct_blocks() {
    const THREADS: usize = 8;
    let libspace = LibSpace::<THREADS>::new();
    libspace.start(BOOT);

    // Race the scan-and-claim step from real threads; every identity
    // must end up with its own stable block
    let addresses: std::vec::Vec<usize> = std::thread::scope(|scope| {
        let workers: std::vec::Vec<_> = (0..THREADS)
            .map(|i| {
                let libspace = &libspace;
                scope.spawn(move || {
                    let thread = ThreadId::new(0x2000 + i);
                    let claim = |block: &mut ReentBlock| core::ptr::from_mut(block) as usize;
                    let first = libspace.with(thread, claim).unwrap();
                    let again = libspace.with(thread, claim).unwrap();
                    assert_eq!(first, again);
                    first
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect()
    });

    let distinct: std::collections::BTreeSet<usize> = addresses.iter().copied().collect();
    assert_eq!(distinct.len(), THREADS);
    assert_eq!(libspace.claimed(), THREADS);
}

#[test]
fn wrapper_reports_exhaustion() {
    let libspace = LibSpace::<1>::new();
    libspace.start(BOOT);

    libspace.with(ThreadId::new(0x2000), |_| ()).unwrap();
    let unlucky = ThreadId::new(0x3000);
    assert_eq!(
        libspace.with(unlucky, |_| ()),
        Err(LibSpaceError::PoolExhausted { thread: unlucky })
    );
}
