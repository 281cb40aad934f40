// tests/solver_convergence_test.rs
use ndarray::{array, Array1, Array2, Axis};
use popdyn_sde::models::model::Coefficients;
use popdyn_sde::noise::gaussian_increments;
use popdyn_sde::rng;
use popdyn_sde::sim::{SimConfig, Simulator};
use popdyn_sde::solvers::SchemeKind;

const MU: [f64; 2] = [0.05, 0.1];
const SIGMA: [f64; 2] = [0.3, 0.2];
const T_END: f64 = 1.0;
const FINE_STEPS: usize = 256;
const LEVELS: [usize; 4] = [16, 32, 64, 128];

// Componentwise geometric Brownian motion: f = μ x, g = σ x, g' = σ
fn linear_diffusion() -> Coefficients {
    Coefficients::new(
        |x: &Array1<f64>, _t: f64| array![MU[0] * x[0], MU[1] * x[1]],
        |x: &Array1<f64>, _t: f64| array![SIGMA[0] * x[0], SIGMA[1] * x[1]],
    )
    .with_diffusion_derivative(|_x: &Array1<f64>, _t: f64| array![SIGMA[0], SIGMA[1]])
}

// Exact terminal value driven by the same Brownian path
fn gbm_exact_terminal(x0: &Array1<f64>, w_t: &Array1<f64>) -> Array1<f64> {
    Array1::from_shape_fn(2, |j| {
        x0[j] * ((MU[j] - 0.5 * SIGMA[j] * SIGMA[j]) * T_END + SIGMA[j] * w_t[j]).exp()
    })
}

// Sum consecutive blocks of fine increments into a coarser path
fn coarsen(dw_fine: &Array2<f64>, steps: usize) -> Array2<f64> {
    let block = dw_fine.nrows() / steps;
    let mut dw = Array2::zeros((steps, dw_fine.ncols()));
    for (k, mut row) in dw.outer_iter_mut().enumerate() {
        let chunk = dw_fine.slice(ndarray::s![k * block..(k + 1) * block, ..]);
        row.assign(&chunk.sum_axis(Axis(0)));
    }
    dw
}

/// RMS terminal error per level for one scheme, every level seeing the same
/// Brownian paths
fn strong_errors(kind: SchemeKind, num_paths: u64) -> Vec<f64> {
    let x0 = array![1.0, 2.0];
    let simulators: Vec<Simulator> = LEVELS
        .iter()
        .map(|&steps| {
            let config = SimConfig {
                x0: x0.clone(),
                t: T_END,
                steps,
                seed: Some(0),
                quiet: true,
            };
            Simulator::new(config, linear_diffusion(), kind).unwrap()
        })
        .collect();

    let mut sum_sq = vec![0.0; LEVELS.len()];
    for i in 0..num_paths {
        let mut rng = rng::seed_rng_from_u64(42 + i);
        let dw_fine =
            gaussian_increments(&mut rng, T_END / FINE_STEPS as f64, 2, FINE_STEPS).unwrap();
        let exact = gbm_exact_terminal(&x0, &dw_fine.sum_axis(Axis(0)));

        for (level, sim) in simulators.iter().enumerate() {
            let dw = coarsen(&dw_fine, LEVELS[level]);
            let traj = sim.simulate_with_noise(&dw).unwrap();
            let diff = &traj.last_state() - &exact;
            sum_sq[level] += diff.dot(&diff);
        }
    }

    sum_sq
        .iter()
        .map(|s| (s / num_paths as f64).sqrt())
        .collect()
}

fn assert_ratios(name: &str, errors: &[f64], lo: f64, hi: f64) {
    for i in 0..(errors.len() - 1) {
        let ratio = errors[i] / errors[i + 1];
        assert!(
            ratio > lo && ratio < hi,
            "{} strong convergence ratio not as expected at level {}: {}",
            name,
            i,
            ratio
        );
    }
}

#[test]
fn test_euler_maruyama_strong_order_half() {
    let errors = strong_errors(SchemeKind::EulerMaruyama, 1_000);
    println!("\nEuler-Maruyama strong RMSEs: {:?}", errors);

    // Halving dt should shrink the error by about √2
    assert_ratios("Euler-Maruyama", &errors, 1.15, 1.7);
    assert!(*errors.last().unwrap() < 0.05);
}

#[test]
fn test_milstein_strong_order_one() {
    let errors = strong_errors(SchemeKind::Milstein, 1_000);
    println!("\nMilstein strong RMSEs: {:?}", errors);

    assert_ratios("Milstein", &errors, 1.6, 2.5);
}

#[test]
fn test_runge_kutta_strong_order_one() {
    let errors = strong_errors(SchemeKind::RungeKutta, 1_000);
    println!("\nStochastic Runge-Kutta strong RMSEs: {:?}", errors);

    assert_ratios("Stochastic Runge-Kutta", &errors, 1.6, 2.5);
}

#[test]
fn test_first_order_schemes_beat_euler_maruyama() {
    let em = strong_errors(SchemeKind::EulerMaruyama, 300);
    let milstein = strong_errors(SchemeKind::Milstein, 300);
    let srk = strong_errors(SchemeKind::RungeKutta, 300);

    for level in 0..LEVELS.len() {
        assert!(milstein[level] < em[level], "level {}", level);
        assert!(srk[level] < em[level], "level {}", level);
    }
    let finest = LEVELS.len() - 1;
    assert!(milstein[finest] < em[finest] / 3.0);
    assert!(srk[finest] < em[finest] / 3.0);
}
