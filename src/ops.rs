//! Norms, distance, and normalization over any sized, indexable container.

use crate::container::Lenable;
use crate::expr::{Expr, SubOp, Term};
use num_traits::Float;

/// `p2 - p1`, lazily — the caller assigns the result into a concrete
/// container (or another expression), matching the evaluation-site
/// discipline the rest of the arithmetic layer follows.
pub fn distance<'a, V: Float, C: Term<V>>(p1: &'a C, p2: &'a C) -> Expr<SubOp, &'a C, &'a C> {
    Expr::new(p2, p1)
}

pub fn l2_norm_sq<V: Float, C: Lenable + Term<V>>(v: &C) -> V {
    let mut acc = V::zero();
    for i in 0..v.len() {
        let x = v.term_at(i);
        acc = acc + x * x;
    }
    acc
}

pub fn l2_norm<V: Float, C: Lenable + Term<V>>(v: &C) -> V {
    l2_norm_sq(v).sqrt()
}

pub fn linfinity_norm<V: Float, C: Lenable + Term<V>>(v: &C) -> V {
    let mut m = V::zero();
    for i in 0..v.len() {
        let a = v.term_at(i).abs();
        if a > m {
            m = a;
        }
    }
    m
}

/// Divides `v` in place by its L2 norm and returns the (pre-normalization)
/// norm. A zero-norm vector is a programming error, asserted in debug only.
pub fn normalize<V, C>(v: &mut C) -> V
where
    V: Float,
    C: Lenable + Term<V> + core::ops::Index<usize, Output = V> + core::ops::IndexMut<usize>,
{
    let norm = l2_norm(v);
    debug_assert!(norm != V::zero(), "normalize of a zero-norm vector is a programming error");
    for i in 0..v.len() {
        v[i] = v[i] / norm;
    }
    norm
}
