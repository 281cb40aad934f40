// src/solvers/ode.rs
//! Deterministic Companion Solver
//!
//! Integrates the noise-free system `dx/dt = f(x, t)` over one grid interval
//! at a time, so a stochastic trajectory can be plotted against its
//! deterministic counterpart on the same grid.
//!
//! The adaptive Runge-Kutta pairs come from [`ode_solvers`]: [`DormandPrince`]
//! wraps `Dopri5` (5th order with an embedded 4th-order estimate) and
//! [`DormandPrince853`] wraps `Dop853`. Both accept a step when the scaled
//! error norm `‖ err / (atol + rtol · |y|) ‖_rms` stays at or below one.

use crate::error::{validation::*, SdeError, SdeResult};
use crate::models::model::CoefficientFn;
use ndarray::Array1;
use ode_solvers::dop_shared::IntegrationError;
use ode_solvers::{DVector, Dop853, Dopri5, System};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Solver for the deterministic part of the system over `[t0, t1]`
pub trait OdeSolver {
    fn advance(&self, f: &CoefficientFn, x: &Array1<f64>, t0: f64, t1: f64)
        -> SdeResult<Array1<f64>>;
}

/// Tolerances mirror the usual `odeint` defaults.
const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

#[derive(Clone, Copy, Debug)]
pub struct DormandPrince {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for DormandPrince {
    fn default() -> Self {
        DormandPrince {
            rtol: DEFAULT_TOLERANCE,
            atol: DEFAULT_TOLERANCE,
        }
    }
}

impl DormandPrince {
    pub fn validate(&self) -> SdeResult<()> {
        validate_positive("rtol", self.rtol)?;
        validate_positive("atol", self.atol)
    }
}

impl OdeSolver for DormandPrince {
    fn advance(
        &self,
        f: &CoefficientFn,
        x: &Array1<f64>,
        t0: f64,
        t1: f64,
    ) -> SdeResult<Array1<f64>> {
        self.validate()?;
        integrate_drift("Dormand-Prince", f, x, t0, t1, |system, y0| {
            let mut stepper = Dopri5::new(system, t0, t1, t1 - t0, y0, self.rtol, self.atol);
            stepper.integrate()?;
            Ok(stepper.y_out().last().cloned())
        })
    }
}

/// 8th-order Dormand-Prince pair, for tighter reference solutions
#[derive(Clone, Copy, Debug)]
pub struct DormandPrince853 {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for DormandPrince853 {
    fn default() -> Self {
        DormandPrince853 {
            rtol: 1e-10,
            atol: 1e-10,
        }
    }
}

impl OdeSolver for DormandPrince853 {
    fn advance(
        &self,
        f: &CoefficientFn,
        x: &Array1<f64>,
        t0: f64,
        t1: f64,
    ) -> SdeResult<Array1<f64>> {
        validate_positive("rtol", self.rtol)?;
        validate_positive("atol", self.atol)?;
        integrate_drift("Dormand-Prince 8(5,3)", f, x, t0, t1, |system, y0| {
            let mut stepper = Dop853::new(system, t0, t1, t1 - t0, y0, self.rtol, self.atol);
            stepper.integrate()?;
            Ok(stepper.y_out().last().cloned())
        })
    }
}

/// State shared between a [`DriftSystem`] and the caller that handed it to a stepper.
#[derive(Default)]
struct Progress {
    last: Option<DVector<f64>>,
    failure: Option<SdeError>,
}

struct DriftSystem {
    f: CoefficientFn,
    dim: usize,
    progress: Rc<RefCell<Progress>>,
}

impl System<f64, DVector<f64>> for DriftSystem {
    fn system(&self, t: f64, y: &DVector<f64>, dy: &mut DVector<f64>) {
        let x = Array1::from_iter(y.iter().copied());
        let rate = (self.f)(&x, t);

        if let Err(err) = validate_dim("drift", self.dim, rate.len()) {
            let mut progress = self.progress.borrow_mut();
            if progress.failure.is_none() {
                progress.failure = Some(err);
            }
            // Zero rate lets the stepper accept a step and reach `solout`, which stops it
            dy.fill(0.0);
            return;
        }

        for (d, r) in dy.iter_mut().zip(rate.iter()) {
            *d = *r;
        }
    }

    // Called after every accepted step; the final call lands on `t1`.
    fn solout(&mut self, _t: f64, y: &DVector<f64>, _dy: &DVector<f64>) -> bool {
        let mut progress = self.progress.borrow_mut();
        progress.last = Some(y.clone());
        progress.failure.is_some()
    }
}

fn integrate_drift<R>(
    method: &str,
    f: &CoefficientFn,
    x: &Array1<f64>,
    t0: f64,
    t1: f64,
    run: R,
) -> SdeResult<Array1<f64>>
where
    R: FnOnce(DriftSystem, DVector<f64>) -> Result<Option<DVector<f64>>, IntegrationError>,
{
    let span = t1 - t0;
    if span == 0.0 {
        return Ok(x.clone());
    }
    if !(span > 0.0) {
        return Err(SdeError::InvalidParameters {
            parameter: "t1 - t0".to_string(),
            value: span,
            constraint: "integration interval must run forward in time".to_string(),
        });
    }

    let progress = Rc::new(RefCell::new(Progress::default()));
    let system = DriftSystem {
        f: Arc::clone(f),
        dim: x.len(),
        progress: Rc::clone(&progress),
    };
    let y0 = DVector::from_iterator(x.len(), x.iter().copied());

    let outcome = run(system, y0);
    let Progress { last, failure } = progress.take();
    if let Some(err) = failure {
        return Err(err);
    }
    let dense_end = outcome.map_err(|e| SdeError::NumericalInstability {
        method: method.to_string(),
        reason: format!("integrating [{}, {}]: {}", t0, t1, e),
    })?;

    let end = last.or(dense_end).ok_or_else(|| SdeError::NumericalInstability {
        method: method.to_string(),
        reason: format!("no accepted step on [{}, {}]", t0, t1),
    })?;
    Ok(Array1::from_iter(end.iter().copied()))
}
