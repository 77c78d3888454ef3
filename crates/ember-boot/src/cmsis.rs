// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! CMSIS-RTOS2 platform backend.
//!
//! Implements the [`Kernel`] trait over the CMSIS-RTOS2 C API and owns
//! the process-wide boot singletons: the sequencer, the lock broker,
//! the runtime-state pool and the bootstrap thread's stack.
//!
//! The per-toolchain startup adapter calls [`boot`] once with the free
//! memory block; everything after that runs inside the bootstrap
//! thread. The application provides `ember_main` as its entry point:
//!
//! ```ignore
//! #[unsafe(no_mangle)]
//! fn ember_main() -> i32 {
//!     // application code
//!     0
//! }
//! ```
//!
//! Only compiled for bare-metal targets with the `cmsis` feature; host
//! builds use [`crate::kernel::MockKernel`] instead.

use core::cell::UnsafeCell;
use core::ffi::c_void;
use core::ptr;

use ember_abi::config::{LIBSPACE_SLOTS, MAIN_STACK_SIZE};
use ember_abi::{MemoryLayout, MemoryRegion, MutexAttrs, ThreadId, ThreadPriority, Timeout};

use crate::broker::{BrokerError, LockBroker, LockHandle, WellKnownLock};
use crate::hooks::{BoardHooks, DefaultHooks};
use crate::kernel::{Kernel, KernelError};
use crate::libspace::{LibSpace, ReentBlock};
use crate::sequence::{BootError, Sequencer};

// =============================================================================
// CMSIS-RTOS2 API surface
// =============================================================================

/// osStatus_t: operation completed.
const OS_OK: i32 = 0;
/// osStatus_t: wait timed out.
const OS_ERROR_TIMEOUT: i32 = -2;
/// osStatus_t: resource not available.
const OS_ERROR_RESOURCE: i32 = -3;
/// osStatus_t: parameter error.
const OS_ERROR_PARAMETER: i32 = -4;
/// osStatus_t: out of memory.
const OS_ERROR_NO_MEMORY: i32 = -5;
/// osStatus_t: not allowed in ISR context.
const OS_ERROR_ISR: i32 = -6;

/// osKernelState_t: scheduler is running.
const OS_KERNEL_RUNNING: i32 = 2;

/// osMutexAttr_t attr_bits.
const OS_MUTEX_RECURSIVE: u32 = 0x0000_0001;
const OS_MUTEX_PRIO_INHERIT: u32 = 0x0000_0002;
const OS_MUTEX_ROBUST: u32 = 0x0000_0008;

/// Infinite timeout sentinel.
const OS_WAIT_FOREVER: u32 = 0xFFFF_FFFF;

#[repr(C)]
struct OsThreadAttr {
    name: *const u8,
    attr_bits: u32,
    cb_mem: *mut c_void,
    cb_size: u32,
    stack_mem: *mut c_void,
    stack_size: u32,
    priority: i32,
    tz_module: u32,
    reserved: u32,
}

#[repr(C)]
struct OsMutexAttr {
    name: *const u8,
    attr_bits: u32,
    cb_mem: *mut c_void,
    cb_size: u32,
}

unsafe extern "C" {
    fn osKernelInitialize() -> i32;
    fn osKernelStart() -> i32;
    fn osKernelGetState() -> i32;
    fn osThreadNew(
        func: extern "C" fn(*mut c_void),
        argument: *mut c_void,
        attr: *const OsThreadAttr,
    ) -> *mut c_void;
    fn osThreadGetId() -> *mut c_void;
    fn osMutexNew(attr: *const OsMutexAttr) -> *mut c_void;
    fn osMutexAcquire(mutex: *mut c_void, timeout: u32) -> i32;
    fn osMutexRelease(mutex: *mut c_void) -> i32;
    fn osMutexDelete(mutex: *mut c_void) -> i32;
}

unsafe extern "Rust" {
    /// Application entry point, provided by the application crate.
    fn ember_main() -> i32;
}

const fn status_error(status: i32) -> KernelError {
    match status {
        OS_ERROR_TIMEOUT => KernelError::Timeout,
        OS_ERROR_RESOURCE => KernelError::Resource,
        OS_ERROR_PARAMETER => KernelError::Parameter,
        OS_ERROR_NO_MEMORY => KernelError::NoMemory,
        OS_ERROR_ISR => KernelError::Isr,
        _ => KernelError::Unspecified,
    }
}

const fn status_result(status: i32) -> Result<(), KernelError> {
    if status == OS_OK {
        Ok(())
    } else {
        Err(status_error(status))
    }
}

const fn priority_bits(priority: ThreadPriority) -> i32 {
    // osPriority_t steps of 8 around osPriorityNormal (24)
    match priority {
        ThreadPriority::Low => 8,
        ThreadPriority::BelowNormal => 16,
        ThreadPriority::Normal => 24,
        ThreadPriority::AboveNormal => 32,
        ThreadPriority::High => 40,
    }
}

const fn timeout_ticks(timeout: Timeout) -> u32 {
    match timeout {
        Timeout::Infinite => OS_WAIT_FOREVER,
        Timeout::Immediate => 0,
        Timeout::Ticks(ticks) => ticks,
    }
}

// =============================================================================
// Kernel implementation
// =============================================================================

/// Opaque CMSIS mutex handle (the control block address).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsMutexId(usize);

/// Opaque CMSIS thread handle (the control block address).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsThreadId(usize);

/// The CMSIS-RTOS2 kernel collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmsisKernel;

extern "C" fn thread_trampoline(argument: *mut c_void) {
    // The argument is the entry fn pointer smuggled through the C ABI
    let entry: fn() = unsafe { core::mem::transmute::<*mut c_void, fn()>(argument) };
    entry();
}

impl Kernel for CmsisKernel {
    type Mutex = OsMutexId;
    type Thread = OsThreadId;

    /// CMSIS kernels size their own control structures statically; the
    /// layout is published to the heap allocator via
    /// [`memory_layout`] instead.
    fn init(&self, _layout: &MemoryLayout) -> Result<(), KernelError> {
        status_result(unsafe { osKernelInitialize() })
    }

    fn start(&self) -> KernelError {
        status_error(unsafe { osKernelStart() })
    }

    fn create_thread(
        &self,
        _name: &'static str,
        entry: fn(),
        stack: MemoryRegion,
        priority: ThreadPriority,
    ) -> Result<Self::Thread, KernelError> {
        // CMSIS names must be NUL-terminated C strings; they are
        // diagnostic only and omitted here.
        let attr = OsThreadAttr {
            name: ptr::null(),
            attr_bits: 0,
            cb_mem: ptr::null_mut(),
            cb_size: 0,
            stack_mem: stack.start() as *mut c_void,
            stack_size: stack.size() as u32,
            priority: priority_bits(priority),
            tz_module: 0,
            reserved: 0,
        };
        let argument = entry as usize as *mut c_void;
        let handle = unsafe { osThreadNew(thread_trampoline, argument, &raw const attr) };
        if handle.is_null() {
            Err(KernelError::NoMemory)
        } else {
            Ok(OsThreadId(handle as usize))
        }
    }

    fn create_mutex(&self, attrs: &MutexAttrs) -> Result<Self::Mutex, KernelError> {
        let mut attr_bits = 0;
        if attrs.is_recursive() {
            attr_bits |= OS_MUTEX_RECURSIVE;
        }
        if attrs.priority_inherit {
            attr_bits |= OS_MUTEX_PRIO_INHERIT;
        }
        if attrs.robust {
            attr_bits |= OS_MUTEX_ROBUST;
        }
        let attr = OsMutexAttr {
            name: ptr::null(),
            attr_bits,
            cb_mem: ptr::null_mut(), // kernel allocates the control block
            cb_size: 0,
        };
        let handle = unsafe { osMutexNew(&raw const attr) };
        if handle.is_null() {
            Err(KernelError::NoMemory)
        } else {
            Ok(OsMutexId(handle as usize))
        }
    }

    fn acquire_mutex(&self, mutex: Self::Mutex, timeout: Timeout) -> Result<(), KernelError> {
        status_result(unsafe { osMutexAcquire(mutex.0 as *mut c_void, timeout_ticks(timeout)) })
    }

    fn release_mutex(&self, mutex: Self::Mutex) -> Result<(), KernelError> {
        status_result(unsafe { osMutexRelease(mutex.0 as *mut c_void) })
    }

    fn delete_mutex(&self, mutex: Self::Mutex) -> Result<(), KernelError> {
        status_result(unsafe { osMutexDelete(mutex.0 as *mut c_void) })
    }

    fn current_thread(&self) -> ThreadId {
        ThreadId::new(unsafe { osThreadGetId() } as usize)
    }

    fn is_running(&self) -> bool {
        unsafe { osKernelGetState() } == OS_KERNEL_RUNNING
    }
}

// =============================================================================
// Boot singletons
// =============================================================================

#[repr(align(8))]
struct MainStack(UnsafeCell<[u8; MAIN_STACK_SIZE]>);

// The stack memory is handed to the kernel once and never touched from
// Rust again.
unsafe impl Sync for MainStack {}

static MAIN_STACK: MainStack = MainStack(UnsafeCell::new([0; MAIN_STACK_SIZE]));

static SEQUENCER: Sequencer<CmsisKernel> = Sequencer::new(CmsisKernel);

static BROKER: spin::Mutex<LockBroker<CmsisKernel>> = spin::Mutex::new(LockBroker::new());

static LIBSPACE: LibSpace<LIBSPACE_SLOTS> = LibSpace::new();

static HOOKS: spin::Once<&'static (dyn BoardHooks + Sync)> = spin::Once::new();

fn hooks() -> &'static (dyn BoardHooks + Sync) {
    HOOKS.get().copied().unwrap_or(&DefaultHooks)
}

fn main_stack_region() -> MemoryRegion {
    MemoryRegion::new(MAIN_STACK.0.get() as usize, MAIN_STACK_SIZE)
}

fn pre_main_entry() {
    let hooks = hooks();
    {
        let mut broker = BROKER.lock();
        if let Err(error) = SEQUENCER.create_runtime_locks(&mut broker) {
            hooks.fatal(&error);
        }
    }
    // Guard dropped: the runtime initializers call lock_create
    SEQUENCER.pre_main(hooks, &LIBSPACE);
    let _exit_code = SEQUENCER.enter(|| unsafe { ember_main() });
    // The entry point returned; that is the terminal outcome
    loop {
        core::hint::spin_loop();
    }
}

// =============================================================================
// Adapter entry points
// =============================================================================

/// Runs the boot sequence. Called exactly once by the per-toolchain
/// startup adapter, single-threaded, right after data/bss init.
///
/// Does not return: either the scheduler takes over or the failure is
/// routed to `hooks.fatal`.
pub fn boot(
    hooks: &'static (dyn BoardHooks + Sync),
    free: MemoryRegion,
    isr_override: Option<MemoryRegion>,
) -> ! {
    let hooks = *HOOKS.call_once(|| hooks);
    if let Err(error) = SEQUENCER.start(
        hooks,
        free,
        isr_override,
        main_stack_region(),
        pre_main_entry,
    ) {
        hooks.fatal(&error);
    }
    let error = SEQUENCER.run();
    hooks.fatal(&error)
}

/// Returns the memory layout computed at boot.
///
/// The heap allocator reads its region from here; `None` only before
/// [`boot`] ran.
#[must_use]
pub fn memory_layout() -> Option<MemoryLayout> {
    SEQUENCER.layout()
}

/// Returns the handle of a well-known lock.
#[must_use]
pub const fn well_known_lock(lock: WellKnownLock) -> LockHandle {
    lock.handle()
}

/// Creates a lock for a dynamic consumer (retarget-style lock init).
pub fn lock_create(attrs: &MutexAttrs) -> Result<LockHandle, BrokerError> {
    BROKER.lock().create(&CmsisKernel, attrs)
}

/// Acquires a broker-owned lock, blocking until available.
pub fn lock_acquire(handle: LockHandle) -> Result<(), BrokerError> {
    // Single-threaded before the scheduler runs, nothing to exclude
    if !CmsisKernel.is_running() {
        return Ok(());
    }
    // Copy the kernel handle out so the broker table is not held
    // across the (potentially blocking) kernel wait
    let mutex = BROKER.lock().mutex(handle)?;
    match CmsisKernel.acquire_mutex(mutex, Timeout::Infinite) {
        Ok(()) => Ok(()),
        Err(KernelError::Timeout) => Err(BrokerError::Timeout),
        Err(error) => Err(BrokerError::Kernel(error)),
    }
}

/// Non-blocking acquire of a broker-owned lock.
pub fn lock_try_acquire(handle: LockHandle) -> Result<(), BrokerError> {
    if !CmsisKernel.is_running() {
        return Ok(());
    }
    let mutex = BROKER.lock().mutex(handle)?;
    match CmsisKernel.acquire_mutex(mutex, Timeout::Immediate) {
        Ok(()) => Ok(()),
        Err(KernelError::Timeout) => Err(BrokerError::Timeout),
        Err(error) => Err(BrokerError::Kernel(error)),
    }
}

/// Releases a broker-owned lock.
pub fn lock_release(handle: LockHandle) -> Result<(), BrokerError> {
    if !CmsisKernel.is_running() {
        return Ok(());
    }
    let broker = BROKER.lock();
    broker.release(&CmsisKernel, handle)
}

/// Destroys a dynamically created lock (retarget-style lock close).
pub fn lock_destroy(handle: LockHandle) -> Result<(), BrokerError> {
    BROKER.lock().destroy(&CmsisKernel, handle)
}

/// Returns the calling thread's reentrancy-state block for the C
/// runtime.
///
/// Pool exhaustion is a sizing error and halts the system; the global
/// block is never handed out as a fallback.
pub fn perthread_libspace() -> *mut ReentBlock {
    let thread = CmsisKernel.current_thread();
    match LIBSPACE.with(thread, ptr::from_mut) {
        Ok(block) => block,
        Err(error) => hooks().fatal(&BootError::from(error)),
    }
}
