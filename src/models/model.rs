// src/models/model.rs
//! Drift/Diffusion Contract
//!
//! For a system of `n` coupled SDEs
//! ```text
//! dX_t = f(X_t, t) dt + g(X_t, t) dW_t
//! ```
//! the caller supplies `f` and `g` as functions of `(state, time)` returning an
//! n-vector. Diffusion is diagonal: component `i` of `g` scales component `i`
//! of the increment. Milstein additionally needs `g'`, the elementwise
//! derivative of `g` with respect to the state.
//!
//! All callables must be pure and defined on every state reachable during a
//! run, including the clamped non-negative region.

use crate::error::SdeResult;
use ndarray::Array1;
use std::fmt;
use std::sync::Arc;

/// Shared, thread-safe coefficient callable `(x, t) -> n-vector`
pub type CoefficientFn = Arc<dyn Fn(&Array1<f64>, f64) -> Array1<f64> + Send + Sync>;

/// Model-side view of the contract
pub trait SdeModel: Send + Sync {
    fn drift(&self, x: &Array1<f64>, t: f64) -> Array1<f64>;
    fn diffusion(&self, x: &Array1<f64>, t: f64) -> Array1<f64>;

    /// Reject states the model cannot evaluate, before any coefficient call
    fn validate_state(&self, _x: &Array1<f64>) -> SdeResult<()> {
        Ok(())
    }
}

/// Models whose diffusion has an analytic state derivative (needed by Milstein)
pub trait DifferentiableDiffusion: SdeModel {
    fn diffusion_derivative(&self, x: &Array1<f64>, t: f64) -> Array1<f64>;
}

/// Immutable bundle of drift, diffusion and optional diffusion derivative
#[derive(Clone)]
pub struct Coefficients {
    drift: CoefficientFn,
    diffusion: CoefficientFn,
    diffusion_derivative: Option<CoefficientFn>,
}

impl Coefficients {
    pub fn new<F, G>(drift: F, diffusion: G) -> Self
    where
        F: Fn(&Array1<f64>, f64) -> Array1<f64> + Send + Sync + 'static,
        G: Fn(&Array1<f64>, f64) -> Array1<f64> + Send + Sync + 'static,
    {
        Coefficients {
            drift: Arc::new(drift),
            diffusion: Arc::new(diffusion),
            diffusion_derivative: None,
        }
    }

    pub fn with_diffusion_derivative<H>(mut self, derivative: H) -> Self
    where
        H: Fn(&Array1<f64>, f64) -> Array1<f64> + Send + Sync + 'static,
    {
        self.diffusion_derivative = Some(Arc::new(derivative));
        self
    }

    /// Wrap a model's drift and diffusion
    pub fn from_model<M: SdeModel + 'static>(model: Arc<M>) -> Self {
        let m_drift = Arc::clone(&model);
        let m_diffusion = model;
        Coefficients::new(
            move |x: &Array1<f64>, t: f64| m_drift.drift(x, t),
            move |x: &Array1<f64>, t: f64| m_diffusion.diffusion(x, t),
        )
    }

    /// Wrap a model's drift, diffusion and diffusion derivative
    pub fn from_differentiable_model<M: DifferentiableDiffusion + 'static>(model: Arc<M>) -> Self {
        let m_derivative = Arc::clone(&model);
        Coefficients::from_model(model).with_diffusion_derivative(
            move |x: &Array1<f64>, t: f64| m_derivative.diffusion_derivative(x, t),
        )
    }

    pub fn drift(&self, x: &Array1<f64>, t: f64) -> Array1<f64> {
        (self.drift)(x, t)
    }

    pub fn diffusion(&self, x: &Array1<f64>, t: f64) -> Array1<f64> {
        (self.diffusion)(x, t)
    }

    pub fn drift_fn(&self) -> &CoefficientFn {
        &self.drift
    }

    pub fn diffusion_derivative_fn(&self) -> Option<&CoefficientFn> {
        self.diffusion_derivative.as_ref()
    }
}

impl fmt::Debug for Coefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coefficients")
            .field("drift", &"<fn>")
            .field("diffusion", &"<fn>")
            .field(
                "diffusion_derivative",
                &self.diffusion_derivative.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}
