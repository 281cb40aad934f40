//! Noise generators feeding the integration schemes
//!
//! - [`gaussian`]: freshly sampled Brownian increments, or validation of a
//!   caller-supplied increment sequence
//! - [`shot`]: impulsive compound-Poisson forcing aligned to the time grid

pub mod gaussian;
pub mod shot;

pub use gaussian::{gaussian_increments, validate_noise_shape};
pub use shot::{ShotNoise, ShotNoisePath};
