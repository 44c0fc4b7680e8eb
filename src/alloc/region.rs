//! Shared bump-cursor region backing both [`BumpAllocator`](super::BumpAllocator)
//! and [`MonotonicAllocator`](super::MonotonicAllocator). The two allocators
//! only differ in what `deallocate` does once a block is returned; the
//! allocate-from-region-or-fall-back-to-the-heap path is identical, so it
//! lives here once.

use super::debug_fill;
use std::cell::{Cell, UnsafeCell};
use std::mem::MaybeUninit;
use std::ptr::NonNull;

pub(crate) struct Region<V> {
    storage: UnsafeCell<Box<[MaybeUninit<V>]>>,
    cursor: Cell<usize>,
    capacity: usize,
}

impl<V> Region<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let storage: Box<[MaybeUninit<V>]> =
            (0..capacity).map(|_| MaybeUninit::uninit()).collect();
        Self { storage: UnsafeCell::new(storage), cursor: Cell::new(0), capacity }
    }

    pub(crate) fn max_size(&self) -> usize {
        self.capacity
    }

    pub(crate) fn used(&self) -> usize {
        self.cursor.get()
    }

    pub(crate) fn reset(&self) {
        self.cursor.set(0);
    }

    fn base_ptr(&self) -> *mut V {
        unsafe { (*self.storage.get()).as_mut_ptr() as *mut V }
    }

    pub(crate) fn pointer_in_region(&self, p: NonNull<V>) -> bool {
        let base = self.base_ptr();
        let end = unsafe { base.add(self.capacity) };
        let p = p.as_ptr();
        base <= p && p < end
    }

    /// Serves `n` elements from the region if there's room, otherwise falls
    /// back to a fresh heap allocation. Either path is sentinel-filled in
    /// debug builds so use-before-write is visible.
    pub(crate) fn allocate(&self, n: usize) -> NonNull<V> {
        if n == 0 {
            return NonNull::dangling();
        }
        let cursor = self.cursor.get();
        let ptr = if n <= self.capacity - cursor {
            let p = unsafe { self.base_ptr().add(cursor) };
            self.cursor.set(cursor + n);
            NonNull::new(p).expect("region pointer is never null")
        } else {
            log::trace!(
                "bump region exhausted (requested {n}, {} available); falling back to the heap",
                self.capacity - cursor
            );
            let heap: Box<[MaybeUninit<V>]> = (0..n).map(|_| MaybeUninit::uninit()).collect();
            let raw = Box::into_raw(heap) as *mut V;
            NonNull::new(raw).expect("heap fallback pointer is never null")
        };
        unsafe { debug_fill(ptr, n) };
        ptr
    }

    /// Frees a heap-fallback block. Only call this for a pointer already
    /// established to lie outside the region.
    ///
    /// # Safety
    /// `ptr` must have come from this region's heap fallback path via
    /// `allocate`, with the same `n`.
    pub(crate) unsafe fn free_heap_fallback(&self, ptr: NonNull<V>, n: usize) {
        let slice = std::ptr::slice_from_raw_parts_mut(ptr.as_ptr() as *mut MaybeUninit<V>, n);
        drop(Box::from_raw(slice));
    }

    /// Retract the cursor by `n` if `ptr` is exactly the top of the region;
    /// otherwise the block becomes inert until the next `reset()`.
    pub(crate) fn retract_if_top(&self, ptr: NonNull<V>, n: usize) {
        let cursor = self.cursor.get();
        let top = unsafe { self.base_ptr().add(cursor) };
        if unsafe { ptr.as_ptr().add(n) } == top {
            self.cursor.set(cursor - n);
        }
    }
}
