//! Allocation services used by node storage.
//!
//! Mirrors the teacher lineage's manual `std::alloc` calls in its own
//! reference-counted node bodies (alloc, write fields, later
//! `drop_in_place` + `dealloc` on last release) but factored behind a
//! trait so the branching-factor/refcount [`crate::policy::Policy`] can
//! swap the allocation strategy without touching node code.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr::NonNull;

/// A raw allocation strategy for node bodies.
///
/// The engine never runs constructors through a `Heap`; callers write
/// the value into the returned storage themselves (see
/// [`crate::node::alloc_node`]).
pub trait Heap {
    /// Returns uninitialized storage for `layout`. Aborts the process on
    /// allocation failure, matching `std::alloc`'s own contract.
    fn allocate(layout: Layout) -> NonNull<u8>;

    /// Releases storage previously returned by `allocate` with the same
    /// layout.
    ///
    /// # Safety
    /// `ptr` must have been produced by `allocate(layout)` on this same
    /// heap and not already deallocated.
    unsafe fn deallocate(ptr: NonNull<u8>, layout: Layout);
}

/// Allocates directly through the global system allocator.
pub struct SystemHeap;

impl Heap for SystemHeap {
    fn allocate(layout: Layout) -> NonNull<u8> {
        // SAFETY: layout is non-zero sized for every node body we allocate.
        let raw = unsafe { alloc(layout) };
        match NonNull::new(raw) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    unsafe fn deallocate(ptr: NonNull<u8>, layout: Layout) {
        unsafe { dealloc(ptr.as_ptr(), layout) };
    }
}

thread_local! {
    static FREE_LISTS: RefCell<HashMap<Layout, Vec<NonNull<u8>>>> = RefCell::new(HashMap::new());
}

/// A thread-local free list keyed by object size/alignment.
///
/// Recycles blocks of matching [`Layout`] instead of returning them to
/// the system allocator immediately. Blocks left in the free list at
/// thread exit are never reclaimed by the process allocator; call
/// [`PooledHeap::drain`] before a thread tears down if that matters.
pub struct PooledHeap;

impl Heap for PooledHeap {
    fn allocate(layout: Layout) -> NonNull<u8> {
        let recycled = FREE_LISTS.with(|lists| {
            lists
                .borrow_mut()
                .get_mut(&layout)
                .and_then(|free| free.pop())
        });
        match recycled {
            Some(ptr) => ptr,
            None => SystemHeap::allocate(layout),
        }
    }

    unsafe fn deallocate(ptr: NonNull<u8>, layout: Layout) {
        FREE_LISTS.with(|lists| {
            lists.borrow_mut().entry(layout).or_default().push(ptr);
        });
    }
}

impl PooledHeap {
    /// Returns every block currently held by this thread's free lists to
    /// the system allocator.
    pub fn drain() {
        FREE_LISTS.with(|lists| {
            for (layout, blocks) in lists.borrow_mut().drain() {
                for ptr in blocks {
                    // SAFETY: every block in the free list was allocated
                    // by the system allocator with this exact layout and
                    // is not aliased elsewhere.
                    unsafe { dealloc(ptr.as_ptr(), layout) };
                }
            }
        });
    }
}
