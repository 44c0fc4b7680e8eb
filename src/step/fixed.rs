use crate::container::{Lenable, MaybeResizable};
use crate::expr::{Reduce, Term};
use crate::tableau::BT;
use num_traits::Float;

/// Generic explicit Runge–Kutta: `S` stages driven by a `BT<V, S>`, `V` the
/// scalar kind (`f32` or `f64`) shared by the tableau and the state `C`.
///
/// Internal buffers (`x_tmp`, the `S` stage derivatives) are allocated once,
/// by cloning a shape `template`, and reused by every subsequent
/// [`do_step`](Self::do_step) — the stepper itself never allocates.
pub struct GenericRungeKutta<V, C, const S: usize> {
    tableau: BT<V, S>,
    x_tmp: C,
    k: [C; S],
}

impl<V, C, const S: usize> GenericRungeKutta<V, C, S>
where
    V: Float,
    C: Clone + Lenable + MaybeResizable + Term<V> + core::ops::Index<usize, Output = V> + core::ops::IndexMut<usize>,
{
    pub fn new(tableau: BT<V, S>, template: &C) -> Self {
        GenericRungeKutta { tableau, x_tmp: template.clone(), k: core::array::from_fn(|_| template.clone()) }
    }

    pub fn order(&self) -> usize {
        self.tableau.order()
    }

    pub fn stages(&self) -> usize {
        S
    }

    /// Resizes every internal buffer to shape `n`. A no-op for containers
    /// (like `SArr`) whose shape is a compile-time constant.
    pub fn resize_internals(&mut self, n: usize) {
        self.x_tmp.try_resize(n);
        for k_i in self.k.iter_mut() {
            k_i.try_resize(n);
        }
    }

    /// Advances `y` by one step of size `h` starting at `t`, calling `f(y_in,
    /// dy_out, t)` once per stage.
    pub fn do_step<F: FnMut(&C, &mut C, V)>(&mut self, mut f: F, y: &mut C, t: V, h: V) {
        let n = y.len();
        f(&*y, &mut self.k[0], t);

        for j in 1..S {
            let tj = t + self.tableau.c(j) * h;
            let combo = {
                let k_ref = &self.k;
                let weights: [V; S] = core::array::from_fn(|i| if i < j { self.tableau.a(j, i) * h } else { V::zero() });
                let refs: [&C; S] = core::array::from_fn(|i| &k_ref[i]);
                Reduce::new(refs, weights)
            };
            for idx in 0..n {
                self.x_tmp[idx] = y[idx] + combo.term_at(idx);
            }
            f(&self.x_tmp, &mut self.k[j], tj);
        }

        let combo = {
            let k_ref = &self.k;
            let weights: [V; S] = core::array::from_fn(|i| self.tableau.b(i) * h);
            let refs: [&C; S] = core::array::from_fn(|i| &k_ref[i]);
            Reduce::new(refs, weights)
        };
        for idx in 0..n {
            y[idx] += combo.term_at(idx);
        }
    }
}

/// Explicit Euler as the degenerate one-stage Runge–Kutta: the stage loop
/// (`j = 1..s-1`) never runs, so a step is exactly `y += h * f(y, t)`.
pub struct ExplicitEuler<V, C>(GenericRungeKutta<V, C, 1>);

impl<V, C> ExplicitEuler<V, C>
where
    V: Float,
    C: Clone + Lenable + MaybeResizable + Term<V> + core::ops::Index<usize, Output = V> + core::ops::IndexMut<usize>,
{
    pub fn new(template: &C) -> Self {
        ExplicitEuler(GenericRungeKutta::new(crate::tableau::euler(), template))
    }

    pub fn order(&self) -> usize {
        self.0.order()
    }

    pub fn resize_internals(&mut self, n: usize) {
        self.0.resize_internals(n);
    }

    pub fn do_step<F: FnMut(&C, &mut C, V)>(&mut self, f: F, y: &mut C, t: V, h: V) {
        self.0.do_step(f, y, t, h);
    }
}
