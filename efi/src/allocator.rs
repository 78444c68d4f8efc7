//! Hybrid global allocator
//!
//! While boot services are registered, allocations come from UEFI
//! `allocate_pool`. Before that, and after `release_boot_services()`, they
//! come from a small static arena managed by `linked_list_allocator`.
//! Frees are routed by address, so either side can release memory the
//! other handed out.

use core::alloc::{GlobalAlloc, Layout};
use core::mem::size_of;
use core::ptr::{self, addr_of_mut, NonNull};
use core::sync::atomic::{AtomicPtr, Ordering};

use linked_list_allocator::Heap;
use spin::Mutex;

use crate::uefi::boot_services::{BootServices, LOADER_DATA};

/// UEFI Boot Services pointer - set by efi_main
static BOOT_SERVICES: AtomicPtr<BootServices> = AtomicPtr::new(ptr::null_mut());

/// Fallback arena: 192 KiB
const ARENA_SIZE: usize = 192 * 1024;

/// Pool memory is 8-byte aligned
const POOL_ALIGN: usize = 8;

#[repr(C, align(4096))]
struct AlignedArena([u8; ARENA_SIZE]);

static mut ARENA: AlignedArena = AlignedArena([0u8; ARENA_SIZE]);

/// Initialized on first use
static ARENA_HEAP: Mutex<Heap> = Mutex::new(Heap::empty());

/// Route allocations to UEFI pool memory.
pub fn set_boot_services(bs: *mut BootServices) {
    BOOT_SERVICES.store(bs, Ordering::SeqCst);
}

/// Stop using pool memory; later allocations come from the arena.
pub fn release_boot_services() {
    BOOT_SERVICES.store(ptr::null_mut(), Ordering::SeqCst);
}

fn arena_range() -> (usize, usize) {
    let start = unsafe { addr_of_mut!(ARENA) } as usize;
    (start, start + ARENA_SIZE)
}

fn in_arena(ptr: *mut u8) -> bool {
    let (start, end) = arena_range();
    (start..end).contains(&(ptr as usize))
}

pub struct HybridAllocator;

unsafe impl GlobalAlloc for HybridAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let bs = BOOT_SERVICES.load(Ordering::SeqCst);
        if bs.is_null() {
            alloc_arena(layout)
        } else {
            alloc_pool(&*bs, layout)
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if ptr.is_null() {
            return;
        }

        if in_arena(ptr) {
            if let Some(nn) = NonNull::new(ptr) {
                ARENA_HEAP.lock().deallocate(nn, layout);
            }
            return;
        }

        let bs = BOOT_SERVICES.load(Ordering::SeqCst);
        if !bs.is_null() {
            dealloc_pool(&*bs, ptr, layout);
        }
        // Pool memory freed after release is leaked; the image is exiting
    }
}

unsafe fn alloc_arena(layout: Layout) -> *mut u8 {
    let mut heap = ARENA_HEAP.lock();
    if heap.size() == 0 {
        heap.init(addr_of_mut!(ARENA) as *mut u8, ARENA_SIZE);
    }
    heap.allocate_first_fit(layout)
        .map(|nn| nn.as_ptr())
        .unwrap_or(ptr::null_mut())
}

unsafe fn alloc_pool(bs: &BootServices, layout: Layout) -> *mut u8 {
    let align = layout.align();
    let size = layout.size();

    if align <= POOL_ALIGN {
        let mut buffer: *mut u8 = ptr::null_mut();
        let status = (bs.allocate_pool)(LOADER_DATA, size, &mut buffer);
        return if status.is_success() { buffer } else { ptr::null_mut() };
    }

    // Over-allocate and stash the pool pointer just below the aligned block
    let total = size + align + size_of::<usize>();
    let mut buffer: *mut u8 = ptr::null_mut();
    let status = (bs.allocate_pool)(LOADER_DATA, total, &mut buffer);
    if !status.is_success() {
        return ptr::null_mut();
    }

    let raw = buffer as usize;
    let aligned = (raw + size_of::<usize>() + align - 1) & !(align - 1);
    *((aligned - size_of::<usize>()) as *mut usize) = raw;
    aligned as *mut u8
}

unsafe fn dealloc_pool(bs: &BootServices, ptr: *mut u8, layout: Layout) {
    let original = if layout.align() <= POOL_ALIGN {
        ptr
    } else {
        *((ptr as usize - size_of::<usize>()) as *const usize) as *mut u8
    };
    let _ = (bs.free_pool)(original);
}
