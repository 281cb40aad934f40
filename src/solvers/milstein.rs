// src/solvers/milstein.rs
//! Milstein Scheme for Higher-Order SDE Integration
//!
//! # Mathematical Framework
//!
//! Componentwise, with diagonal diffusion:
//! ```text
//! X_{n+1} = X_n + f Δt + g ΔW_n + ½ g g' [(ΔW_n)² - Δt]
//! ```
//!
//! Where:
//! - `g' = ∂g/∂x` is the caller-supplied derivative of the diffusion term
//! - `(ΔW_n)² - Δt` is the Itô correction term
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 1.0 (vs 0.5 for Euler-Maruyama)
//! - **Cost**: one extra evaluation of `g'` per step

use crate::error::{validation::validate_dim, SdeResult};
use crate::models::model::{CoefficientFn, Coefficients};
use ndarray::{Array1, ArrayView1};

/// Milstein numerical scheme for SDE integration
#[derive(Clone, Copy, Debug, Default)]
pub struct Milstein;

impl Milstein {
    /// Single Milstein step with Itô correction
    ///
    /// The term `½ g g' [(ΔW)² - Δt]` corrects for the state dependence of
    /// the diffusion coefficient, dropped by Euler-Maruyama.
    pub fn step(
        coefficients: &Coefficients,
        diffusion_derivative: &CoefficientFn,
        x: &Array1<f64>,
        t: f64,
        dw: ArrayView1<'_, f64>,
        dt: f64,
    ) -> SdeResult<Array1<f64>> {
        let n = x.len();
        let drift = coefficients.drift(x, t);
        validate_dim("drift f(x, t)", n, drift.len())?;
        let diffusion = coefficients.diffusion(x, t);
        validate_dim("diffusion g(x, t)", n, diffusion.len())?;
        let derivative = diffusion_derivative(x, t);
        validate_dim("diffusion derivative g'(x, t)", n, derivative.len())?;

        Ok(Array1::from_shape_fn(n, |i| {
            x[i] + drift[i] * dt
                + diffusion[i] * dw[i]
                + 0.5 * diffusion[i] * derivative[i] * (dw[i] * dw[i] - dt)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::euler_maruyama::EulerMaruyama;
    use ndarray::array;
    use std::sync::Arc;

    #[test]
    fn test_correction_term() {
        let sigma = 0.3;
        let c = Coefficients::new(
            |x: &Array1<f64>, _t: f64| Array1::zeros(x.len()),
            move |x: &Array1<f64>, _t: f64| x * sigma,
        );
        let dg: CoefficientFn = Arc::new(move |x: &Array1<f64>, _t: f64| {
            Array1::from_elem(x.len(), sigma)
        });

        let x = array![2.0];
        let dw = array![0.2];
        let dt = 0.01;
        let next = Milstein::step(&c, &dg, &x, 0.0, dw.view(), dt).unwrap();

        let g = sigma * 2.0;
        let expected = 2.0 + g * 0.2 + 0.5 * g * sigma * (0.04 - dt);
        assert!((next[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_derivative_matches_euler() {
        let c = Coefficients::new(
            |x: &Array1<f64>, _t: f64| -x,
            |x: &Array1<f64>, _t: f64| Array1::from_elem(x.len(), 0.4),
        );
        let dg: CoefficientFn = Arc::new(|x: &Array1<f64>, _t: f64| Array1::zeros(x.len()));

        let x = array![1.0, 4.0];
        let dw = array![0.1, -0.3];
        let milstein = Milstein::step(&c, &dg, &x, 0.0, dw.view(), 0.05).unwrap();
        let euler = EulerMaruyama::step(&c, &x, 0.0, dw.view(), 0.05).unwrap();
        assert_eq!(milstein, euler);
    }
}
