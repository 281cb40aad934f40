//! # popdyn-sde: Stochastic Integration for Two-State Population Dynamics
//!
//! A Rust library for simulating coupled stochastic differential equations of
//! densities that cannot go negative, such as predator-prey systems.
//!
//! ## Key Features
//!
//! - **Three schemes**: Euler-Maruyama, Milstein and derivative-free stochastic Runge-Kutta
//! - **Three noise sources**: Gaussian increments, caller-supplied increments, white shot noise
//! - **Shared sample paths**: replay one increment path through every scheme
//! - **Deterministic companion**: adaptive Dormand-Prince run on the same grid
//! - **Isolated randomness**: every simulator owns its random source
//!
//! ## Quick Start
//!
//! ```rust
//! use popdyn_sde::models::model::Coefficients;
//! use popdyn_sde::sim::{SimConfig, Simulator};
//! use popdyn_sde::solvers::SchemeKind;
//! use ndarray::{array, Array1};
//!
//! let coefficients = Coefficients::new(
//!     |x: &Array1<f64>, _t: f64| {
//!         array![0.5 * x[0] - 0.02 * x[0] * x[1], -0.3 * x[1] + 0.01 * x[0] * x[1]]
//!     },
//!     |x: &Array1<f64>, _t: f64| array![0.1 * x[0], 0.1 * x[1]],
//! );
//!
//! let config = SimConfig {
//!     x0: array![10.0, 5.0],
//!     t: 1.0,
//!     steps: 100,
//!     ..Default::default()
//! };
//!
//! let mut sim = Simulator::new(config, coefficients, SchemeKind::EulerMaruyama)
//!     .expect("Valid configuration");
//! let trajectory = sim.simulate().expect("Finite trajectory");
//! assert_eq!(trajectory.states.dim(), (101, 2));
//! ```
//!
//! ## Mathematical Foundation
//!
//! For `dX_t = f(X_t, t) dt + g(X_t, t) dW_t` on a uniform grid of `N` steps
//! over `[0, T]`, each scheme maps `(x_n, t_n, ΔW_n, Δt)` to `x_{n+1}`. After
//! every step the first two components are clamped to be non-negative.

// Module declarations
pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod models;
pub mod noise;
pub mod output;
pub mod rng;
pub mod sim;
pub mod solvers;

// Re-export commonly used types for convenience
pub use error::{SdeError, SdeResult};
pub use models::model::Coefficients;
pub use sim::{SimConfig, Simulator, Trajectory};
pub use solvers::{Scheme, SchemeKind};
