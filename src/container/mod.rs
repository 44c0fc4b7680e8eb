//! The container layer: `SArr` (fixed length), `DArr` (dynamically sized,
//! allocator-backed) and `Buf` (2-D, row/column major, optionally padded).
//!
//! Rather than a trait-object hierarchy, the steppers are polymorphic over
//! a capability set: [`Lenable`] (has a length), `Index`/`IndexMut` (checked
//! element access), and [`MaybeResizable`] (can be resized, a no-op for the
//! fixed-size containers). Dispatch is resolved entirely at compile time.

mod buf;
mod darr;
mod sarr;

pub use buf::Buf;
pub use darr::DArr;
pub use sarr::SArr;

/// The "Sized" capability from the container contract.
pub trait Lenable {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The "Resizable" capability. Only [`DArr`] overrides `try_resize`; fixed
/// containers accept the default no-op, which is how a stepper generic over
/// an arbitrary state type chooses the right branch at compile time (per
/// the "polymorphism over capabilities, not inheritance" design note).
pub trait MaybeResizable {
    fn try_resize(&mut self, _n: usize) {}
}
