use rk_engine::prelude::*;

fn growth(y: &SArr<f64, 1>, dy: &mut SArr<f64, 1>, _t: f64) {
    dy[0] = y[0];
}

fn main() {
    let template = SArr::<f64, 1>::default();
    let mut stepper = AdaptiveRungeKutta::new(rk_engine::tableau::dormand_prince(), &template);

    let mut y = SArr::<f64, 1>::filled(1.0);
    let mut t = 0.0;

    for _ in 0..100 {
        stepper.do_step(growth, &mut y, &mut t);
        println!("t={t:.6} y={:.6} exp(t)={:.6} h={:.6}", y[0], t.exp(), stepper.step_size());
    }
}
