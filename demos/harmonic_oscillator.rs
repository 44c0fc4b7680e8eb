use rk_engine::prelude::*;

fn harmonic(y: &SArr<f64, 2>, dy: &mut SArr<f64, 2>, _t: f64) {
    dy[0] = y[1];
    dy[1] = -y[0];
}

fn main() {
    let template = SArr::<f64, 2>::default();
    let mut stepper = GenericRungeKutta::new(rk_engine::tableau::rk4(), &template);

    let mut y = SArr::<f64, 2>::filled_with(|i| if i == 1 { 1.0 } else { 0.0 });
    let dt = 0.1;
    let mut t = 0.0;

    for _ in 0..100 {
        stepper.do_step(harmonic, &mut y, t, dt);
        t += dt;
        println!("t={t:.3} y0={:.6} y1={:.6} sin(t)={:.6}", y[0], y[1], t.sin());
    }
}
