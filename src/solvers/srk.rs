// src/solvers/srk.rs
//! Stochastic Runge-Kutta (SRK) Scheme for SDE Integration
//!
//! # Mathematical Framework
//!
//! Derivative-free order-1.0 scheme. The Milstein product `g g'` is replaced
//! by a finite difference of `g` along a supporting value:
//!
//! 1. **Support value**:
//!    ```text
//!    X̂ = X_n + f(X_n, t_n) Δt + g(X_n, t_n) √Δt
//!    ```
//!
//! 2. **Update**:
//!    ```text
//!    X_{n+1} = X_n + f Δt + g ΔW_n + ½ [g(X̂, t_n) − g(X_n, t_n)] [(ΔW_n)² − Δt] / √Δt
//!    ```
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 1.0
//! - **Cost**: one extra evaluation of `g`, no `g'` needed
//!
//! # Degenerate step
//!
//! For `Δt = 0` the finite difference is undefined. The step then returns the
//! Euler-Maruyama update, which is the limit of the correction-free part.

use super::euler_maruyama::EulerMaruyama;
use crate::error::{validation::validate_dim, SdeResult};
use crate::models::model::Coefficients;
use ndarray::{Array1, ArrayView1};

/// Stochastic Runge-Kutta numerical scheme
#[derive(Clone, Copy, Debug, Default)]
pub struct Srk;

impl Srk {
    /// Single SRK step
    pub fn step(
        coefficients: &Coefficients,
        x: &Array1<f64>,
        t: f64,
        dw: ArrayView1<'_, f64>,
        dt: f64,
    ) -> SdeResult<Array1<f64>> {
        if !(dt > 0.0) {
            return EulerMaruyama::step(coefficients, x, t, dw, dt);
        }

        let n = x.len();
        let sqrt_dt = dt.sqrt();
        let drift = coefficients.drift(x, t);
        validate_dim("drift f(x, t)", n, drift.len())?;
        let diffusion = coefficients.diffusion(x, t);
        validate_dim("diffusion g(x, t)", n, diffusion.len())?;

        let x_hat = Array1::from_shape_fn(n, |i| x[i] + drift[i] * dt + diffusion[i] * sqrt_dt);
        let diffusion_hat = coefficients.diffusion(&x_hat, t);
        validate_dim("diffusion g(x̂, t)", n, diffusion_hat.len())?;

        Ok(Array1::from_shape_fn(n, |i| {
            x[i] + drift[i] * dt
                + diffusion[i] * dw[i]
                + 0.5 * (diffusion_hat[i] - diffusion[i]) * (dw[i] * dw[i] - dt) / sqrt_dt
        }))
    }
}
