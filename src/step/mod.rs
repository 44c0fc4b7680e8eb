//! Integrator state machines: fixed-step generic Runge–Kutta and embedded
//! adaptive Runge–Kutta. Both are polymorphic over any container that is
//! `Clone + Lenable + MaybeResizable` and indexable by `f64` — a fixed
//! `SArr`, an allocator-backed `DArr`, or a `Buf` all satisfy this without
//! any of the steppers knowing which.

mod adaptive;
mod fixed;

pub use adaptive::AdaptiveRungeKutta;
pub use fixed::{ExplicitEuler, GenericRungeKutta};
