// src/models/lotka_volterra.rs
//! Stochastic Lotka-Volterra predator-prey model
//!
//! ```text
//! du = (α u − β u v) dt + σ_u u dW¹
//! dv = (γ u v − δ v) dt + σ_v v dW²
//! ```
//!
//! `u` is the prey density, `v` the predator density. The noise is
//! multiplicative, so the diffusion derivative is the constant vector
//! `(σ_u, σ_v)`.

use super::model::{DifferentiableDiffusion, SdeModel};
use crate::error::{validation::*, SdeError, SdeResult};
use ndarray::{array, Array1};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LotkaVolterraParams {
    pub alpha: f64,   // Prey growth rate
    pub beta: f64,    // Predation rate
    pub gamma: f64,   // Predator growth per prey consumed
    pub delta: f64,   // Predator death rate
    pub sigma_u: f64, // Prey noise scale
    pub sigma_v: f64, // Predator noise scale
}

impl Default for LotkaVolterraParams {
    fn default() -> Self {
        LotkaVolterraParams {
            alpha: 0.5,
            beta: 0.02,
            gamma: 0.01,
            delta: 0.3,
            sigma_u: 0.1,
            sigma_v: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LotkaVolterra {
    pub params: LotkaVolterraParams,
}

impl LotkaVolterra {
    pub fn new(params: LotkaVolterraParams) -> SdeResult<Self> {
        Self::validate_params(&params)?;
        Ok(LotkaVolterra { params })
    }

    fn validate_params(params: &LotkaVolterraParams) -> SdeResult<()> {
        validate_positive("alpha", params.alpha)?;
        validate_positive("beta", params.beta)?;
        validate_positive("gamma", params.gamma)?;
        validate_positive("delta", params.delta)?;
        validate_non_negative("sigma_u", params.sigma_u)?;
        validate_non_negative("sigma_v", params.sigma_v)?;
        validate_finite("sigma_u", params.sigma_u)?;
        validate_finite("sigma_v", params.sigma_v)?;
        Ok(())
    }

    /// Same deterministic part, diffusion switched off
    pub fn without_noise(&self) -> Self {
        LotkaVolterra {
            params: LotkaVolterraParams {
                sigma_u: 0.0,
                sigma_v: 0.0,
                ..self.params
            },
        }
    }

    fn check_dim(x: &Array1<f64>) -> SdeResult<()> {
        if x.len() != 2 {
            return Err(SdeError::DimensionMismatch {
                what: "Lotka-Volterra state".to_string(),
                expected: "length 2".to_string(),
                found: format!("length {}", x.len()),
            });
        }
        Ok(())
    }
}

impl SdeModel for LotkaVolterra {
    fn validate_state(&self, x: &Array1<f64>) -> SdeResult<()> {
        Self::check_dim(x)?;
        validate_state("x", x)
    }

    fn drift(&self, x: &Array1<f64>, _t: f64) -> Array1<f64> {
        let p = &self.params;
        let (u, v) = (x[0], x[1]);
        array![p.alpha * u - p.beta * u * v, p.gamma * u * v - p.delta * v]
    }

    fn diffusion(&self, x: &Array1<f64>, _t: f64) -> Array1<f64> {
        array![self.params.sigma_u * x[0], self.params.sigma_v * x[1]]
    }
}

impl DifferentiableDiffusion for LotkaVolterra {
    fn diffusion_derivative(&self, _x: &Array1<f64>, _t: f64) -> Array1<f64> {
        array![self.params.sigma_u, self.params.sigma_v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_scenario() {
        let lv = LotkaVolterra::new(LotkaVolterraParams::default()).unwrap();
        let x = array![10.0, 5.0];

        // f(x) = [0.5·u − 0.02·u·v, −0.3·v + 0.01·u·v]
        let f = lv.drift(&x, 0.0);
        assert!((f[0] - (5.0 - 1.0)).abs() < 1e-12);
        assert!((f[1] - (-1.5 + 0.5)).abs() < 1e-12);

        assert_eq!(lv.diffusion(&x, 0.0), array![1.0, 0.5]);
        assert_eq!(lv.diffusion_derivative(&x, 0.0), array![0.1, 0.1]);
    }

    #[test]
    fn test_invalid_params() {
        let params = LotkaVolterraParams {
            beta: 0.0,
            ..Default::default()
        };
        assert!(LotkaVolterra::new(params).is_err());

        let params = LotkaVolterraParams {
            sigma_v: -0.1,
            ..Default::default()
        };
        assert!(LotkaVolterra::new(params).is_err());
    }

    #[test]
    fn test_without_noise() {
        let lv = LotkaVolterra::new(LotkaVolterraParams::default()).unwrap();
        let quiet = lv.without_noise();
        assert_eq!(quiet.diffusion(&array![10.0, 5.0], 0.0), array![0.0, 0.0]);
        assert_eq!(quiet.params.alpha, lv.params.alpha);
    }

    #[test]
    fn test_validate_state_dimension() {
        let lv = LotkaVolterra::new(LotkaVolterraParams::default()).unwrap();
        assert!(lv.validate_state(&array![1.0, 2.0]).is_ok());
        assert!(matches!(
            lv.validate_state(&array![1.0, 2.0, 3.0]),
            Err(SdeError::DimensionMismatch { .. })
        ));
    }
}
