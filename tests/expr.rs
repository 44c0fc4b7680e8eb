use approx::assert_relative_eq;
use rk_engine::prelude::*;

#[test]
fn scalar_broadcast_matches_elementwise_addition_subtraction_and_scaling() {
    let v = SArr::<f64, 4>::filled_with(|i| i as f64 + 1.0);
    let added = &v + 10.0_f64;
    let subbed = &v - 2.0_f64;
    let scaled = &v * 3.0_f64;
    for i in 0..4 {
        assert_relative_eq!(added.get(i), v[i] + 10.0);
        assert_relative_eq!(subbed.get(i), v[i] - 2.0);
        assert_relative_eq!(scaled.get(i), v[i] * 3.0);
    }
}

#[test]
fn addition_and_multiplication_are_commutative_elementwise() {
    let a = SArr::<f64, 5>::filled_with(|i| (i as f64) * 0.5 + 1.0);
    let b = SArr::<f64, 5>::filled_with(|i| (i as f64 + 1.0).sqrt());
    let ab = &a + &b;
    let ba = &b + &a;
    let amb = &a * &b;
    let bma = &b * &a;
    for i in 0..5 {
        assert_relative_eq!(ab.get(i), ba.get(i));
        assert_relative_eq!(amb.get(i), bma.get(i));
    }
}

#[test]
fn expr_reduce_computes_a_weighted_sum_in_one_pass() {
    let a = SArr::<f64, 3>::filled(1.0);
    let b = SArr::<f64, 3>::filled(2.0);
    let c = SArr::<f64, 3>::filled(3.0);
    let combo = expr_reduce([&a, &b, &c], [0.5, 1.0, 2.0]);
    let mut target = SArr::<f64, 3>::default();
    target.assign(combo);
    for i in 0..3 {
        assert_relative_eq!(target.data()[i], 0.5 * 1.0 + 1.0 * 2.0 + 2.0 * 3.0);
    }
}

#[test]
fn nested_expressions_compose_depth_first() {
    let a = SArr::<f64, 3>::filled(2.0);
    let b = SArr::<f64, 3>::filled(3.0);
    let c = SArr::<f64, 3>::filled(4.0);
    let expr = (&a + &b) * 2.0_f64 - &c;
    for i in 0..3 {
        assert_relative_eq!(expr.get(i), (a[i] + b[i]) * 2.0 - c[i]);
    }
}
