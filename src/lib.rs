//! Allocation-free Runge–Kutta integration over a custom container layer.
//!
//! Three pieces work together to keep an integrator's inner loop free of
//! allocation and temporaries:
//!
//! - [`container`]: fixed-length (`SArr`), allocator-backed dynamic
//!   (`DArr`), and 2-D (`Buf`) containers, all sharing the same element-wise
//!   arithmetic.
//! - [`expr`]: a lazy evaluator — `a + b` over containers builds a composite
//!   that is evaluated one element at a time at the assignment site, never
//!   materializing an intermediate container.
//! - [`step`]: the integrators themselves, [`step::GenericRungeKutta`] and
//!   [`step::AdaptiveRungeKutta`], both generic over any container
//!   satisfying the capability traits in [`container`].
//!
//! Shape/size mismatches are programming errors, checked by `debug_assert`
//! and not recoverable; see the allocator and container modules for the
//! allocation-failure and out-of-bounds contracts.

pub mod alloc;
pub mod container;
pub mod expr;
pub mod ops;
pub mod step;
pub mod tableau;

pub mod prelude {
    pub use crate::alloc::{BufferAllocator, BumpAllocator, MonotonicAllocator};
    pub use crate::container::{Buf, DArr, Lenable, MaybeResizable, SArr};
    pub use crate::expr::{expr_reduce, Term};
    pub use crate::ops::{distance, l2_norm, l2_norm_sq, linfinity_norm, normalize};
    pub use crate::step::{AdaptiveRungeKutta, ExplicitEuler, GenericRungeKutta};
    pub use crate::tableau::{BT, EBT};
}
