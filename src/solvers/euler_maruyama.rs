// src/solvers/euler_maruyama.rs
//! Euler-Maruyama Scheme for SDE Integration
//!
//! # Mathematical Framework
//!
//! For a system of SDEs:
//! ```text
//! dX_t = f(X_t, t) dt + g(X_t, t) dW_t
//! ```
//!
//! The Euler-Maruyama scheme provides the discretization:
//! ```text
//! X_{n+1} = X_n + f(X_n, t_n) Δt + g(X_n, t_n) ΔW_n
//! ```
//!
//! applied componentwise. `ΔW_n` is whatever increment the driver feeds in:
//! a Gaussian draw, a caller-supplied value or a shot-noise impulse.
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 0.5 in step size
//! - **Weak convergence**: Order 1.0 in step size
//! - Cheapest scheme, least accurate when `g` depends on the state

use crate::error::{validation::validate_dim, SdeResult};
use crate::models::model::Coefficients;
use ndarray::{Array1, ArrayView1};

/// Euler-Maruyama numerical scheme for SDE integration
#[derive(Clone, Copy, Debug, Default)]
pub struct EulerMaruyama;

impl EulerMaruyama {
    /// Single Euler-Maruyama step
    ///
    /// # Parameters
    /// - `coefficients`: drift and diffusion callables
    /// - `x`: Current state
    /// - `t`: Current time
    /// - `dw`: Increment for this step
    /// - `dt`: Time step size
    ///
    /// Fails with `DimensionMismatch` when a coefficient does not return an
    /// n-vector at `(x, t)`.
    pub fn step(
        coefficients: &Coefficients,
        x: &Array1<f64>,
        t: f64,
        dw: ArrayView1<'_, f64>,
        dt: f64,
    ) -> SdeResult<Array1<f64>> {
        let drift = coefficients.drift(x, t);
        validate_dim("drift f(x, t)", x.len(), drift.len())?;
        let diffusion = coefficients.diffusion(x, t);
        validate_dim("diffusion g(x, t)", x.len(), diffusion.len())?;
        Ok(Array1::from_shape_fn(x.len(), |i| {
            x[i] + drift[i] * dt + diffusion[i] * dw[i]
        }))
    }
}
