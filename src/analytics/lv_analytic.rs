// src/analytics/lv_analytic.rs
//! Closed-form quantities of the deterministic Lotka-Volterra system
//!
//! # Mathematical Foundation
//!
//! Without noise the model reduces to
//! ```text
//! du/dt = α u − β u v
//! dv/dt = γ u v − δ v
//! ```
//!
//! which has a coexistence equilibrium and a conserved first integral, so
//! every positive orbit is closed. These are the reference values used to
//! check the deterministic companion run and to read stochastic trajectories
//! against the noise-free cycle.

use crate::models::lotka_volterra::LotkaVolterraParams;
use nalgebra::Matrix2;
use ndarray::{array, Array1};
use std::f64::consts::PI;

/// Coexistence equilibrium `(u*, v*) = (δ/γ, α/β)`
pub fn coexistence_equilibrium(p: &LotkaVolterraParams) -> Array1<f64> {
    array![p.delta / p.gamma, p.alpha / p.beta]
}

/// First integral conserved along deterministic orbits
///
/// # Formula
/// ```text
/// H(u, v) = γ u − δ ln u + β v − α ln v
/// ```
///
/// Defined for `u, v > 0`; returns `None` otherwise.
pub fn first_integral(p: &LotkaVolterraParams, x: &Array1<f64>) -> Option<f64> {
    let (u, v) = (x[0], x[1]);
    if !(u > 0.0 && v > 0.0) {
        return None;
    }
    Some(p.gamma * u - p.delta * u.ln() + p.beta * v - p.alpha * v.ln())
}

/// Jacobian of the drift at `x`
///
/// ```text
/// J = | α − β v     −β u   |
///     |   γ v     γ u − δ  |
/// ```
pub fn jacobian(p: &LotkaVolterraParams, x: &Array1<f64>) -> Matrix2<f64> {
    let (u, v) = (x[0], x[1]);
    Matrix2::new(
        p.alpha - p.beta * v,
        -p.beta * u,
        p.gamma * v,
        p.gamma * u - p.delta,
    )
}

/// Eigenvalues of a 2×2 real matrix as `(re, im)` pairs, ordered by
/// descending real part, then descending imaginary part
pub fn eigenvalues(m: &Matrix2<f64>) -> [(f64, f64); 2] {
    let lambda = m.complex_eigenvalues();
    let mut pairs = [(lambda[0].re, lambda[0].im), (lambda[1].re, lambda[1].im)];
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.total_cmp(&a.1)));
    pairs
}

/// Period of small oscillations around the equilibrium, `2π / √(αδ)`
pub fn linear_period(p: &LotkaVolterraParams) -> f64 {
    2.0 * PI / (p.alpha * p.delta).sqrt()
}
