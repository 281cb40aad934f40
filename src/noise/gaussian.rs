// src/noise/gaussian.rs
//! Gaussian increment paths
//!
//! The whole path `ΔW ∈ ℝ^{N×n}` is drawn before the step loop starts, so one
//! seed fixes the full sample path and the same path can be replayed through
//! every scheme for a like-for-like comparison.

use crate::error::{validation::*, SdeError, SdeResult};
use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draw `steps` independent n-vectors with components ~ N(0, dt)
pub fn gaussian_increments<R: Rng + ?Sized>(
    rng: &mut R,
    dt: f64,
    dim: usize,
    steps: usize,
) -> SdeResult<Array2<f64>> {
    validate_non_negative("dt", dt)?;
    validate_finite("dt", dt)?;
    let normal = Normal::new(0.0, dt.sqrt()).map_err(|e| SdeError::RandomGenerationError {
        reason: e.to_string(),
    })?;
    Ok(Array2::from_shape_fn((steps, dim), |_| normal.sample(rng)))
}

/// Check that an externally supplied increment sequence has shape (steps, dim)
pub fn validate_noise_shape(dw: &Array2<f64>, steps: usize, dim: usize) -> SdeResult<()> {
    let (rows, cols) = dw.dim();
    if rows != steps || cols != dim {
        return Err(SdeError::DimensionMismatch {
            what: "noise sequence".to_string(),
            expected: format!("shape ({}, {})", steps, dim),
            found: format!("shape ({}, {})", rows, cols),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seed_rng_from_u64;

    #[test]
    fn test_shape_and_reproducibility() {
        let mut a = seed_rng_from_u64(11);
        let mut b = seed_rng_from_u64(11);
        let dw1 = gaussian_increments(&mut a, 0.01, 2, 50).unwrap();
        let dw2 = gaussian_increments(&mut b, 0.01, 2, 50).unwrap();
        assert_eq!(dw1.dim(), (50, 2));
        assert_eq!(dw1, dw2);
    }

    #[test]
    fn test_variance_scales_with_dt() {
        let mut rng = seed_rng_from_u64(3);
        let dt = 0.04;
        let dw = gaussian_increments(&mut rng, dt, 2, 20_000).unwrap();
        let n = dw.len() as f64;
        let mean = dw.sum() / n;
        let var = dw.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.005, "mean {}", mean);
        assert!((var - dt).abs() < 0.002, "variance {}", var);
    }

    #[test]
    fn test_zero_dt_gives_zero_increments() {
        let mut rng = seed_rng_from_u64(5);
        let dw = gaussian_increments(&mut rng, 0.0, 3, 4).unwrap();
        assert!(dw.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_negative_dt_rejected() {
        let mut rng = seed_rng_from_u64(5);
        assert!(gaussian_increments(&mut rng, -0.1, 2, 4).is_err());
    }

    #[test]
    fn test_validate_noise_shape() {
        let dw = Array2::<f64>::zeros((10, 2));
        assert!(validate_noise_shape(&dw, 10, 2).is_ok());
        assert!(matches!(
            validate_noise_shape(&dw, 9, 2),
            Err(SdeError::DimensionMismatch { .. })
        ));
        assert!(validate_noise_shape(&dw, 10, 3).is_err());
    }
}
