// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! In-memory kernel for host tests.
//!
//! Records every call, tracks mutex ownership including recursion
//! depth, and lets tests impersonate different threads via
//! [`MockKernel::set_current_thread`]. The mock cannot block: a
//! contended acquire fails with [`KernelError::Timeout`] regardless of
//! the requested timeout, so tests must arrange contention explicitly.

use std::sync::Mutex;
use std::vec::Vec;

use ember_abi::{MemoryLayout, MemoryRegion, MutexAttrs, ThreadId, ThreadPriority, Timeout};

use super::{Kernel, KernelError};

/// One recorded kernel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    /// `init` with the computed layout.
    Init,
    /// `create_thread` with the thread's name.
    CreateThread(&'static str),
    /// `start`.
    Start,
    /// `create_mutex` with the mutex's name.
    CreateMutex(&'static str),
    /// `acquire_mutex` on the given handle.
    AcquireMutex(usize),
    /// `release_mutex` on the given handle.
    ReleaseMutex(usize),
    /// `delete_mutex` on the given handle.
    DeleteMutex(usize),
}

/// Opaque mock mutex handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockMutexId(usize);

/// Opaque mock thread handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockThreadId(usize);

/// A recorded thread-creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRequest {
    /// Requested thread name.
    pub name: &'static str,
    /// Requested stack region.
    pub stack: MemoryRegion,
    /// Requested priority.
    pub priority: ThreadPriority,
}

struct MutexState {
    recursive: bool,
    owner: Option<ThreadId>,
    depth: u32,
}

struct Inner {
    calls: Vec<MockCall>,
    layout: Option<MemoryLayout>,
    mutexes: Vec<Option<MutexState>>,
    threads: Vec<ThreadRequest>,
    current: ThreadId,
    running: bool,
    deny_mutexes: Option<KernelError>,
    deny_threads: Option<KernelError>,
    start_status: KernelError,
}

/// In-memory [`Kernel`] implementation for host tests.
pub struct MockKernel {
    inner: Mutex<Inner>,
}

impl MockKernel {
    /// Creates a fresh mock kernel.
    ///
    /// The calling thread starts out as `ThreadId::new(1)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                calls: Vec::new(),
                layout: None,
                mutexes: Vec::new(),
                threads: Vec::new(),
                current: ThreadId::new(1),
                running: false,
                deny_mutexes: None,
                deny_threads: None,
                start_status: KernelError::Unspecified,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Impersonates another thread for subsequent calls.
    pub fn set_current_thread(&self, thread: ThreadId) {
        self.lock().current = thread;
    }

    /// Makes all further `create_mutex` calls fail with `error`.
    pub fn deny_mutex_creation(&self, error: KernelError) {
        self.lock().deny_mutexes = Some(error);
    }

    /// Makes all further `create_thread` calls fail with `error`.
    pub fn deny_thread_creation(&self, error: KernelError) {
        self.lock().deny_threads = Some(error);
    }

    /// Returns all recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Returns the layout passed to `init`, if `init` was called.
    #[must_use]
    pub fn layout(&self) -> Option<MemoryLayout> {
        self.lock().layout
    }

    /// Returns all recorded thread-creation requests.
    #[must_use]
    pub fn thread_requests(&self) -> Vec<ThreadRequest> {
        self.lock().threads.clone()
    }

    /// Returns the number of live (created, not deleted) mutexes.
    #[must_use]
    pub fn live_mutexes(&self) -> usize {
        self.lock().mutexes.iter().filter(|m| m.is_some()).count()
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    type Mutex = MockMutexId;
    type Thread = MockThreadId;

    fn init(&self, layout: &MemoryLayout) -> Result<(), KernelError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::Init);
        inner.layout = Some(*layout);
        Ok(())
    }

    fn start(&self) -> KernelError {
        let mut inner = self.lock();
        inner.calls.push(MockCall::Start);
        inner.running = true;
        inner.start_status
    }

    fn create_thread(
        &self,
        name: &'static str,
        _entry: fn(),
        stack: MemoryRegion,
        priority: ThreadPriority,
    ) -> Result<Self::Thread, KernelError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::CreateThread(name));
        if let Some(error) = inner.deny_threads {
            return Err(error);
        }
        inner.threads.push(ThreadRequest {
            name,
            stack,
            priority,
        });
        Ok(MockThreadId(inner.threads.len() - 1))
    }

    fn create_mutex(&self, attrs: &MutexAttrs) -> Result<Self::Mutex, KernelError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::CreateMutex(attrs.name));
        if let Some(error) = inner.deny_mutexes {
            return Err(error);
        }
        inner.mutexes.push(Some(MutexState {
            recursive: attrs.is_recursive(),
            owner: None,
            depth: 0,
        }));
        Ok(MockMutexId(inner.mutexes.len() - 1))
    }

    fn acquire_mutex(&self, mutex: Self::Mutex, _timeout: Timeout) -> Result<(), KernelError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::AcquireMutex(mutex.0));
        let current = inner.current;
        let state = inner
            .mutexes
            .get_mut(mutex.0)
            .and_then(Option::as_mut)
            .ok_or(KernelError::Parameter)?;
        match state.owner {
            None => {
                state.owner = Some(current);
                state.depth = 1;
                Ok(())
            }
            Some(owner) if owner == current && state.recursive => {
                state.depth += 1;
                Ok(())
            }
            Some(_) => Err(KernelError::Timeout),
        }
    }

    fn release_mutex(&self, mutex: Self::Mutex) -> Result<(), KernelError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::ReleaseMutex(mutex.0));
        let current = inner.current;
        let state = inner
            .mutexes
            .get_mut(mutex.0)
            .and_then(Option::as_mut)
            .ok_or(KernelError::Parameter)?;
        if state.owner != Some(current) {
            return Err(KernelError::Resource);
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
        }
        Ok(())
    }

    fn delete_mutex(&self, mutex: Self::Mutex) -> Result<(), KernelError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::DeleteMutex(mutex.0));
        let slot = inner
            .mutexes
            .get_mut(mutex.0)
            .ok_or(KernelError::Parameter)?;
        if slot.take().is_none() {
            return Err(KernelError::Parameter);
        }
        Ok(())
    }

    fn current_thread(&self) -> ThreadId {
        self.lock().current
    }

    fn is_running(&self) -> bool {
        self.lock().running
    }
}
