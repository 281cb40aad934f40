// src/error.rs
use std::fmt;

/// Custom error types for the popdyn-sde library
#[derive(Debug, Clone, PartialEq)]
pub enum SdeError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration (e.g. Milstein without a diffusion derivative)
    InvalidConfiguration { field: String, reason: String },

    /// Array length or per-step dimension disagrees with the configured (N, n)
    DimensionMismatch {
        what: String,
        expected: String,
        found: String,
    },

    /// Non-finite state or solver failure
    NumericalInstability { method: String, reason: String },

    /// RNG or random number generation error
    RandomGenerationError { reason: String },
}

impl fmt::Display for SdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdeError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            SdeError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            SdeError::DimensionMismatch {
                what,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, found {}",
                    what, expected, found
                )
            }
            SdeError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
            SdeError::RandomGenerationError { reason } => {
                write!(f, "Random number generation error: {}", reason)
            }
        }
    }
}

impl std::error::Error for SdeError {}

/// Result type alias for popdyn-sde operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities
pub mod validation {
    use super::{SdeError, SdeResult};
    use ndarray::Array1;

    /// Upper bound on the number of discretization steps of a single run
    pub const MAX_STEPS: usize = 50_000_000;

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        if !(value > 0.0) {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SdeResult<()> {
        if !(value >= 0.0) {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> SdeResult<()> {
        if steps == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > MAX_STEPS {
            Err(SdeError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_STEPS),
            })
        } else {
            Ok(())
        }
    }

    /// Validate an initial state: non-empty and every component finite
    pub fn validate_state(name: &str, x: &Array1<f64>) -> SdeResult<()> {
        if x.is_empty() {
            return Err(SdeError::InvalidConfiguration {
                field: name.to_string(),
                reason: "state vector must have at least one component".to_string(),
            });
        }
        for (i, &value) in x.iter().enumerate() {
            validate_finite(&format!("{}[{}]", name, i), value)?;
        }
        Ok(())
    }

    /// Validate that a coefficient evaluation returned an n-vector
    pub fn validate_dim(what: &str, expected: usize, found: usize) -> SdeResult<()> {
        if expected != found {
            Err(SdeError::DimensionMismatch {
                what: what.to_string(),
                expected: format!("length {}", expected),
                found: format!("length {}", found),
            })
        } else {
            Ok(())
        }
    }
}
