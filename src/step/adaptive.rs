use crate::container::{Lenable, MaybeResizable};
use crate::expr::{Reduce, Term};
use crate::tableau::EBT;
use num_traits::Float;

/// Phase of a single [`AdaptiveRungeKutta::do_step`] call. Not exposed —
/// purely a bookkeeping aid for the trace logging below.
enum Phase {
    EvaluatingK0,
    Trying,
    EvaluatingError,
    RejectedShrink,
    Accepted,
}

/// Embedded Runge–Kutta with L∞-normalized step-size control, generic over
/// the scalar kind `V` (`f32` or `f64`) shared by the tableau and state `C`.
///
/// Owns its stage derivatives, scratch state, and error/result accumulators;
/// `do_step` reuses them across calls and never allocates.
pub struct AdaptiveRungeKutta<V, C, const S: usize> {
    tableau: EBT<V, S>,
    x_tmp: C,
    k: [C; S],
    k_err: C,
    k_tmp: C,
    h: V,
    eps_abs: V,
    eps_rel: V,
    a_x: V,
    a_k: V,
}

impl<V, C, const S: usize> AdaptiveRungeKutta<V, C, S>
where
    V: Float,
    C: Clone + Lenable + MaybeResizable + Term<V> + core::ops::Index<usize, Output = V> + core::ops::IndexMut<usize>,
{
    pub fn new(tableau: EBT<V, S>, template: &C) -> Self {
        AdaptiveRungeKutta {
            tableau,
            x_tmp: template.clone(),
            k: core::array::from_fn(|_| template.clone()),
            k_err: template.clone(),
            k_tmp: template.clone(),
            h: V::from(0.1).expect("0.1 representable in V"),
            eps_abs: V::from(1e-5).expect("1e-5 representable in V"),
            eps_rel: V::from(1e-7).expect("1e-7 representable in V"),
            a_x: V::one(),
            a_k: V::one(),
        }
    }

    pub fn order(&self) -> usize {
        self.tableau.order()
    }

    pub fn step_size(&self) -> V {
        self.h
    }

    pub fn set_step_size(&mut self, h: V) {
        self.h = h;
    }

    pub fn with_tolerances(mut self, eps_abs: V, eps_rel: V) -> Self {
        self.eps_abs = eps_abs;
        self.eps_rel = eps_rel;
        self
    }

    pub fn resize_internals(&mut self, n: usize) {
        self.x_tmp.try_resize(n);
        self.k_err.try_resize(n);
        self.k_tmp.try_resize(n);
        for k_i in self.k.iter_mut() {
            k_i.try_resize(n);
        }
    }

    fn try_step<F: FnMut(&C, &mut C, V)>(&mut self, mut f: F, y: &C, t: V, h: V) {
        let n = y.len();
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
    }

    /// Advances `(y, t)` by one accepted step of adaptive size.
    pub fn do_step<F: FnMut(&C, &mut C, V)>(&mut self, mut f: F, y: &mut C, t: &mut V) {
        let n = y.len();
        let mut phase = Phase::EvaluatingK0;
        log::trace!("adaptive step starting at t = {:?}, h = {:?}", t.to_f64(), self.h.to_f64());
        f(&*y, &mut self.k[0], *t);
        phase = Phase::Trying;

        let one_half = V::from(0.5).expect("0.5 representable in V");
        let point_nine = V::from(0.9).expect("0.9 representable in V");
        let point_two = V::from(0.2).expect("0.2 representable in V");
        let five = V::from(5.0).expect("5.0 representable in V");

        loop {
            self.try_step(&mut f, &*y, *t, self.h);
            phase = Phase::EvaluatingError;

            {
                let k_ref = &self.k;
                let err_weights: [V; S] = core::array::from_fn(|i| self.tableau.delta_b(i));
                let err_refs: [&C; S] = core::array::from_fn(|i| &k_ref[i]);
                let err_combo = Reduce::new(err_refs, err_weights);
                let sum_weights: [V; S] = core::array::from_fn(|i| self.tableau.b(i));
                let sum_refs: [&C; S] = core::array::from_fn(|i| &k_ref[i]);
                let sum_combo = Reduce::new(sum_refs, sum_weights);
                for idx in 0..n {
                    self.k_err[idx] = err_combo.term_at(idx);
                    self.k_tmp[idx] = sum_combo.term_at(idx);
                }
            }

            for idx in 0..n {
                let denom = self.eps_abs + self.eps_rel * (self.a_x * y[idx].abs() + self.a_k * self.k_tmp[idx].abs());
                self.k_err[idx] = self.k_err[idx] / denom;
            }
            let e = (0..n).map(|idx| self.k_err[idx].abs()).fold(V::zero(), V::max);

            let p = V::from(self.order()).expect("order fits in V");
            if e > V::one() {
                phase = Phase::RejectedShrink;
                let shrink = (point_nine * e.powf(-V::one() / (p - V::one()))).max(point_two);
                self.h = self.h * shrink;
                log::trace!("step rejected (e = {:?}), shrinking h to {:?}", e.to_f64(), self.h.to_f64());
                phase = Phase::Trying;
                continue;
            } else if e < one_half {
                let grow = (point_nine * e.powf(-V::one() / p)).min(five);
                self.h = self.h * grow;
            }
            phase = Phase::Accepted;
            break;
        }

        let h = self.h;
        for idx in 0..n {
            y[idx] += h * self.k_tmp[idx];
        }
        *t = *t + h;
        debug_assert!(matches!(phase, Phase::Accepted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SArr;

    fn harmonic(y: &SArr<f64, 2>, dy: &mut SArr<f64, 2>, _t: f64) {
        dy[0] = y[1];
        dy[1] = -y[0];
    }

    #[test]
    fn adaptive_stepper_produces_a_finite_bounded_trajectory() {
        let template = SArr::<f64, 2>::default();
        let mut stepper = AdaptiveRungeKutta::new(crate::tableau::dormand_prince(), &template);
        let mut y = SArr::<f64, 2>::filled_with(|i| if i == 1 { 1.0 } else { 0.0 });
        let mut t = 0.0_f64;
        let t_end = 10.0 * std::f64::consts::PI;
        let mut steps = 0;
        while t < t_end {
            stepper.do_step(harmonic, &mut y, &mut t);
            steps += 1;
            assert!(y[0].is_finite() && y[1].is_finite());
            assert!(steps < 1_000_000, "runaway step count");
        }
    }

    #[test]
    fn tighter_tolerance_reduces_the_eventual_error() {
        let template = SArr::<f64, 2>::default();
        let run = |eps_rel: f64| {
            let mut stepper = AdaptiveRungeKutta::new(crate::tableau::dormand_prince(), &template).with_tolerances(1e-9, eps_rel);
            let mut y = SArr::<f64, 2>::filled_with(|i| if i == 1 { 1.0 } else { 0.0 });
            let mut t = 0.0_f64;
            let t_end = std::f64::consts::PI;
            while t < t_end {
                stepper.do_step(harmonic, &mut y, &mut t);
            }
            (y[0] - t.sin()).abs()
        };
        assert!(run(1e-10) <= run(1e-4));
    }

    #[test]
    fn adaptive_stepper_also_drives_a_single_precision_state() {
        fn harmonic32(y: &SArr<f32, 2>, dy: &mut SArr<f32, 2>, _t: f32) {
            dy[0] = y[1];
            dy[1] = -y[0];
        }
        let template = SArr::<f32, 2>::default();
        let mut stepper = AdaptiveRungeKutta::new(crate::tableau::dormand_prince(), &template);
        let mut y = SArr::<f32, 2>::filled_with(|i| if i == 1 { 1.0 } else { 0.0 });
        let mut t = 0.0_f32;
        for _ in 0..20 {
            stepper.do_step(harmonic32, &mut y, &mut t);
        }
        assert!(y[0].is_finite() && y[1].is_finite());
    }
}
