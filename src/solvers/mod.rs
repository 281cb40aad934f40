//! Integration schemes
//!
//! [`SchemeKind`] is the caller's choice of scheme. [`Scheme::resolve`] turns
//! it into a [`Scheme`] that carries whatever extra callable the variant needs
//! (only Milstein needs one), failing with a configuration error when that
//! callable is missing.

pub mod euler_maruyama;
pub mod milstein;
pub mod ode;
pub mod srk;

use crate::error::{SdeError, SdeResult};
use crate::models::model::{CoefficientFn, Coefficients};
use euler_maruyama::EulerMaruyama;
use milstein::Milstein;
use ndarray::{Array1, ArrayView1};
use srk::Srk;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    EulerMaruyama,
    Milstein,
    RungeKutta,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 3] = [
        SchemeKind::EulerMaruyama,
        SchemeKind::Milstein,
        SchemeKind::RungeKutta,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchemeKind::EulerMaruyama => "Euler-Maruyama",
            SchemeKind::Milstein => "Milstein",
            SchemeKind::RungeKutta => "Stochastic Runge-Kutta",
        }
    }

    /// Strong convergence order
    pub fn strong_order(&self) -> f64 {
        match self {
            SchemeKind::EulerMaruyama => 0.5,
            SchemeKind::Milstein | SchemeKind::RungeKutta => 1.0,
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved scheme, ready to step
#[derive(Clone)]
pub enum Scheme {
    EulerMaruyama,
    Milstein { diffusion_derivative: CoefficientFn },
    RungeKutta,
}

impl Scheme {
    pub fn resolve(kind: SchemeKind, coefficients: &Coefficients) -> SdeResult<Self> {
        match kind {
            SchemeKind::EulerMaruyama => Ok(Scheme::EulerMaruyama),
            SchemeKind::RungeKutta => Ok(Scheme::RungeKutta),
            SchemeKind::Milstein => match coefficients.diffusion_derivative_fn() {
                Some(dg) => Ok(Scheme::Milstein {
                    diffusion_derivative: Arc::clone(dg),
                }),
                None => Err(SdeError::InvalidConfiguration {
                    field: "diffusion_derivative".to_string(),
                    reason: "Milstein scheme requires the derivative of the diffusion term"
                        .to_string(),
                }),
            },
        }
    }

    pub fn kind(&self) -> SchemeKind {
        match self {
            Scheme::EulerMaruyama => SchemeKind::EulerMaruyama,
            Scheme::Milstein { .. } => SchemeKind::Milstein,
            Scheme::RungeKutta => SchemeKind::RungeKutta,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn strong_order(&self) -> f64 {
        self.kind().strong_order()
    }

    /// One memoryless transition `x_n -> x_{n+1}`
    pub fn step(
        &self,
        coefficients: &Coefficients,
        x: &Array1<f64>,
        t: f64,
        dw: ArrayView1<'_, f64>,
        dt: f64,
    ) -> SdeResult<Array1<f64>> {
        match self {
            Scheme::EulerMaruyama => EulerMaruyama::step(coefficients, x, t, dw, dt),
            Scheme::Milstein {
                diffusion_derivative,
            } => Milstein::step(coefficients, diffusion_derivative, x, t, dw, dt),
            Scheme::RungeKutta => Srk::step(coefficients, x, t, dw, dt),
        }
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scheme").field(&self.kind()).finish()
    }
}
