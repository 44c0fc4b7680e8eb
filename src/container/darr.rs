use super::{Lenable, MaybeResizable};
use crate::alloc::{debug_fill, BufferAllocator};
use crate::expr::{impl_expr_ops, Term};
use num_traits::Float;
use std::ptr::NonNull;

/// A dynamically sized, allocator-backed container.
///
/// Holds a *borrowed* allocator (`&'a A`), not an owned one, so several
/// `DArr`s can share one region. `cap` is the element count actually handed
/// out by the allocator — distinct from the logical `len`, since
/// [`leaky_resize`](Self::leaky_resize) can shrink the visible length without
/// giving the storage back.
pub struct DArr<'a, V, A: BufferAllocator<V>> {
    alloc: &'a A,
    ptr: Option<NonNull<V>>,
    len: usize,
    cap: usize,
}

impl<'a, V, A: BufferAllocator<V>> DArr<'a, V, A> {
    /// An empty array over `alloc`. No storage is requested until the first
    /// resize.
    pub fn new(alloc: &'a A) -> Self {
        DArr { alloc, ptr: None, len: 0, cap: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    fn as_ptr(&self) -> *const V {
        self.ptr.map_or(core::ptr::null(), |p| p.as_ptr())
    }

    fn as_mut_ptr(&mut self) -> *mut V {
        self.ptr.map_or(core::ptr::null_mut(), |p| p.as_ptr())
    }

    pub fn data(&self) -> &[V] {
        if self.len == 0 {
            &[]
        } else {
            unsafe { core::slice::from_raw_parts(self.as_ptr(), self.len) }
        }
    }

    pub fn data_mut(&mut self) -> &mut [V] {
        if self.len == 0 {
            &mut []
        } else {
            unsafe { core::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
        }
    }

    #[inline]
    fn assert_in_bounds(&self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds for DArr of length {}", self.len);
    }

    /// Deallocates the current block (sized by `cap`, not `len`) and
    /// allocates a fresh one of `n` elements; `len` and `cap` both become
    /// `n`. The new storage is uninitialized except for the debug sentinel
    /// fill.
    pub fn resize(&mut self, n: usize)
    where
        V: Copy + Default,
    {
        if let Some(old) = self.ptr.take() {
            unsafe { self.alloc.deallocate(old, self.cap) };
        }
        if n == 0 {
            self.len = 0;
            self.cap = 0;
            return;
        }
        let fresh = self.alloc.allocate(n);
        unsafe {
            debug_fill(fresh, n);
            for i in 0..n {
                fresh.as_ptr().add(i).write(V::default());
            }
        }
        self.ptr = Some(fresh);
        self.len = n;
        self.cap = n;
    }

    /// Shrinks without touching storage ("leaky": the freed tail stays
    /// allocated until the next [`resize`](Self::resize) or drop), or grows
    /// by delegating to `resize`.
    pub fn leaky_resize(&mut self, n: usize)
    where
        V: Copy + Default,
    {
        if n <= self.len {
            self.len = n;
        } else {
            self.resize(n);
        }
    }

    pub fn filled(alloc: &'a A, n: usize, value: V) -> Self
    where
        V: Copy + Default,
    {
        let mut d = Self::new(alloc);
        d.resize(n);
        d.data_mut().fill(value);
        d
    }

    pub fn from_values(alloc: &'a A, values: &[V]) -> Self
    where
        V: Copy + Default,
    {
        let mut d = Self::new(alloc);
        d.resize(values.len());
        d.data_mut().copy_from_slice(values);
        d
    }

    pub fn from_expr<T: Term<V>>(alloc: &'a A, n: usize, src: T) -> Self
    where
        V: Float,
    {
        let mut d = Self::new(alloc);
        d.resize(n);
        d.assign(src);
        d
    }
}

impl<'a, V: Float, A: BufferAllocator<V>> DArr<'a, V, A> {
    pub fn assign<T: Term<V>>(&mut self, src: T) {
        if let Some(n) = src.term_len() {
            debug_assert_eq!(n, self.len, "expression length does not match DArr length");
        }
        for i in 0..self.len {
            self.data_mut()[i] = src.term_at(i);
        }
    }

    fn in_place(&mut self, rhs: impl Term<V>, op: impl Fn(V, V) -> V) {
        if let Some(n) = rhs.term_len() {
            debug_assert_eq!(n, self.len, "operand length does not match DArr length");
        }
        for i in 0..self.len {
            let cur = self.data()[i];
            self.data_mut()[i] = op(cur, rhs.term_at(i));
        }
    }
}

impl<'a, V: Float, A: BufferAllocator<V>, T: Term<V>> core::ops::AddAssign<T> for DArr<'a, V, A> {
    fn add_assign(&mut self, rhs: T) {
        self.in_place(rhs, |a, b| a + b);
    }
}

impl<'a, V: Float, A: BufferAllocator<V>, T: Term<V>> core::ops::SubAssign<T> for DArr<'a, V, A> {
    fn sub_assign(&mut self, rhs: T) {
        self.in_place(rhs, |a, b| a - b);
    }
}

impl<'a, V: Float, A: BufferAllocator<V>, T: Term<V>> core::ops::MulAssign<T> for DArr<'a, V, A> {
    fn mul_assign(&mut self, rhs: T) {
        self.in_place(rhs, |a, b| a * b);
    }
}

impl<'a, V, A: BufferAllocator<V>> core::ops::Index<usize> for DArr<'a, V, A>
where
    V: Copy,
{
    type Output = V;
    fn index(&self, idx: usize) -> &V {
        self.assert_in_bounds(idx);
        &self.data()[idx]
    }
}

impl<'a, V, A: BufferAllocator<V>> core::ops::IndexMut<usize> for DArr<'a, V, A>
where
    V: Copy,
{
    fn index_mut(&mut self, idx: usize) -> &mut V {
        self.assert_in_bounds(idx);
        &mut self.data_mut()[idx]
    }
}

impl<'a, V: Copy, A: BufferAllocator<V>> Lenable for DArr<'a, V, A> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, V: Copy + Default, A: BufferAllocator<V>> MaybeResizable for DArr<'a, V, A> {
    fn try_resize(&mut self, n: usize) {
        self.resize(n);
    }
}

impl<'a, V: Copy, A: BufferAllocator<V>> Term<V> for DArr<'a, V, A> {
    fn term_at(&self, i: usize) -> V {
        self[i]
    }

    fn term_len(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl<'a, V: Copy + Default, A: BufferAllocator<V>> Clone for DArr<'a, V, A> {
    /// Deep copy through the same allocator — a new block the length of
    /// `self`, sharing nothing.
    fn clone(&self) -> Self {
        let mut out = DArr::new(self.alloc);
        out.resize(self.len);
        out.data_mut().copy_from_slice(self.data());
        out
    }
}

impl<'a, V, A: BufferAllocator<V>> Drop for DArr<'a, V, A> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            unsafe { self.alloc.deallocate(ptr, self.cap) };
        }
    }
}

impl_expr_ops!(DArr<'a, V, A>, 'a, A: BufferAllocator<V>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::BumpAllocator;

    #[test]
    fn resize_reallocates_and_default_fills() {
        let alloc = BumpAllocator::<f64>::new(32);
        let mut d = DArr::new(&alloc);
        d.resize(4);
        assert_eq!(d.len(), 4);
        assert_eq!(d.data(), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn leaky_resize_shrink_keeps_capacity_but_hides_the_tail() {
        let alloc = BumpAllocator::<f64>::new(32);
        let mut d = DArr::filled(&alloc, 6, 1.0);
        d.leaky_resize(2);
        assert_eq!(d.len(), 2);
        assert_eq!(d.capacity(), 6, "leaky shrink must not touch the underlying allocation");
    }

    #[test]
    fn leaky_resize_grow_delegates_to_a_real_resize() {
        let alloc = BumpAllocator::<f64>::new(32);
        let mut d = DArr::filled(&alloc, 2, 3.0);
        d.leaky_resize(5);
        assert_eq!(d.len(), 5);
        assert_eq!(d.capacity(), 5);
    }

    #[test]
    fn drop_releases_storage_back_to_the_allocator() {
        let alloc = BumpAllocator::<f64>::new(8);
        {
            let _d = DArr::filled(&alloc, 8, 0.0);
            assert_eq!(alloc.used(), 8);
        }
        assert_eq!(alloc.used(), 0);
    }

    #[test]
    fn assign_materializes_an_expression_over_the_logical_length() {
        let alloc = BumpAllocator::<f64>::new(32);
        let a = DArr::filled(&alloc, 3, 1.0);
        let b = DArr::filled(&alloc, 3, 2.0);
        let mut target = DArr::new(&alloc);
        target.resize(3);
        target.assign(&a + &b);
        assert_eq!(target.data(), &[3.0, 3.0, 3.0]);
    }

    #[test]
    fn clone_is_a_deep_copy_through_the_same_allocator() {
        let alloc = BumpAllocator::<f64>::new(32);
        let a = DArr::filled(&alloc, 3, 7.0);
        let mut b = a.clone();
        b[0] = 1.0;
        assert_eq!(a[0], 7.0);
    }
}
