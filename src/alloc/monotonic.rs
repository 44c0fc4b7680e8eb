use super::region::Region;
use super::BufferAllocator;
use std::ptr::NonNull;

/// Same allocate path as [`BumpAllocator`](super::BumpAllocator), but
/// `deallocate` is always a no-op: storage is only reclaimed in bulk by
/// [`reset`](Self::reset). Useful for a scope whose containers are all the
/// same lifetime (e.g. one time step) and never individually shrunk.
pub struct MonotonicAllocator<V> {
    region: Region<V>,
}

impl<V> MonotonicAllocator<V> {
    pub fn new(capacity: usize) -> Self {
        Self { region: Region::new(capacity) }
    }
}

impl<V> BufferAllocator<V> for MonotonicAllocator<V> {
    fn max_size(&self) -> usize {
        self.region.max_size()
    }

    fn used(&self) -> usize {
        self.region.used()
    }

    fn reset(&self) {
        self.region.reset();
    }

    fn allocate(&self, n: usize) -> NonNull<V> {
        self.region.allocate(n)
    }

    unsafe fn deallocate(&self, _ptr: NonNull<V>, _n: usize) {
        // Monotonic allocators never individually release.
    }
}
