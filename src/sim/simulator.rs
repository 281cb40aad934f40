// src/sim/simulator.rs
use crate::error::{validation::*, SdeError, SdeResult};
use crate::math_utils::{
    clamp_densities, is_close, uniform_time_grid, CLAMPED_COMPONENTS, ZERO_DURATION_ATOL,
};
use crate::models::model::{Coefficients, DifferentiableDiffusion, SdeModel};
use crate::noise::{gaussian_increments, validate_noise_shape, ShotNoise, ShotNoisePath};
use crate::rng;
use crate::solvers::ode::{DormandPrince, OdeSolver};
use crate::solvers::{Scheme, SchemeKind};
use ndarray::{array, Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub x0: Array1<f64>, // Initial state, fixes the dimension n
    pub t: f64,          // Total duration T
    pub steps: usize,    // Number of steps N
    pub seed: Option<u64>, // None seeds from OS entropy
    pub quiet: bool,     // Suppress warnings on stderr
}

impl SimConfig {
    /// Validate the simulation configuration
    pub fn validate(&self) -> SdeResult<()> {
        validate_state("x0", &self.x0)?;
        validate_finite("t", self.t)?;
        if !self.is_zero_duration() {
            validate_positive("t", self.t)?;
        }
        validate_steps(self.steps)?;
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.x0.len()
    }

    pub fn dt(&self) -> f64 {
        self.t / self.steps as f64
    }

    /// `T ≈ 0` within an absolute tolerance of 1e-6
    pub fn is_zero_duration(&self) -> bool {
        is_close(self.t, 0.0, ZERO_DURATION_ATOL)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            x0: array![10.0, 5.0],
            t: 1.0,
            steps: 100,
            seed: Some(12345),
            quiet: false,
        }
    }
}

/// States on the time grid: `states` is (N+1, n), `times` is (N+1,)
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub states: Array2<f64>,
    pub times: Array1<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.states.nrows() == 0
    }

    pub fn dim(&self) -> usize {
        self.states.ncols()
    }

    pub fn state(&self, i: usize) -> ArrayView1<'_, f64> {
        self.states.row(i)
    }

    pub fn last_state(&self) -> ArrayView1<'_, f64> {
        self.states.row(self.states.nrows() - 1)
    }

    /// Time series of one state component
    pub fn component(&self, j: usize) -> ArrayView1<'_, f64> {
        self.states.column(j)
    }
}

/// Simulation driver
///
/// Owns the configuration, the resolved scheme and its own random source.
/// Distinct instances share no mutable state and can run on separate threads.
pub struct Simulator {
    config: SimConfig,
    coefficients: Coefficients,
    scheme: Scheme,
    rng: StdRng,
    shot_noise: Option<ShotNoisePath>,
}

impl Simulator {
    /// Build a driver, failing fast on configuration errors
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` / `InvalidConfiguration` for a bad config, or
    ///   Milstein without a diffusion derivative
    /// - `DimensionMismatch` when a coefficient does not return an n-vector
    pub fn new(config: SimConfig, coefficients: Coefficients, kind: SchemeKind) -> SdeResult<Self> {
        config.validate()?;
        let scheme = Scheme::resolve(kind, &coefficients)?;
        Self::check_coefficient_dims(&config, &coefficients)?;

        if !config.quiet
            && config
                .x0
                .iter()
                .take(CLAMPED_COMPONENTS)
                .any(|&v| v < 0.0)
        {
            eprintln!(
                "WARNING!: initial state {} has a negative density; it will be clamped to 0 from the first step on.",
                config.x0
            );
        }

        let rng = rng::driver_rng(config.seed);
        Ok(Simulator {
            config,
            coefficients,
            scheme,
            rng,
            shot_noise: None,
        })
    }

    pub fn from_model<M: SdeModel + 'static>(
        config: SimConfig,
        model: Arc<M>,
        kind: SchemeKind,
    ) -> SdeResult<Self> {
        model.validate_state(&config.x0)?;
        Self::new(config, Coefficients::from_model(model), kind)
    }

    /// Like [`Simulator::from_model`], also wiring up the diffusion derivative
    pub fn from_differentiable_model<M: DifferentiableDiffusion + 'static>(
        config: SimConfig,
        model: Arc<M>,
        kind: SchemeKind,
    ) -> SdeResult<Self> {
        model.validate_state(&config.x0)?;
        Self::new(config, Coefficients::from_differentiable_model(model), kind)
    }

    /// Evaluate every coefficient once at (x0, 0) and check it returns an n-vector
    fn check_coefficient_dims(config: &SimConfig, coefficients: &Coefficients) -> SdeResult<()> {
        let n = config.dim();
        validate_dim("drift f(x0, 0)", n, coefficients.drift(&config.x0, 0.0).len())?;
        validate_dim(
            "diffusion g(x0, 0)",
            n,
            coefficients.diffusion(&config.x0, 0.0).len(),
        )?;
        if let Some(dg) = coefficients.diffusion_derivative_fn() {
            validate_dim("diffusion derivative g'(x0, 0)", n, dg(&config.x0, 0.0).len())?;
        }
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn dim(&self) -> usize {
        self.config.dim()
    }

    pub fn dt(&self) -> f64 {
        self.config.dt()
    }

    pub fn time_grid(&self) -> Array1<f64> {
        uniform_time_grid(self.config.t, self.config.steps)
    }

    /// Impulse array (N+1, n) of the last shot-noise run
    pub fn impulses(&self) -> Option<&Array2<f64>> {
        self.shot_noise.as_ref().map(|path| &path.impulses)
    }

    /// Full shot-noise realisation of the last shot-noise run
    pub fn shot_noise(&self) -> Option<&ShotNoisePath> {
        self.shot_noise.as_ref()
    }

    fn zero_duration_trajectory(&self) -> Trajectory {
        Trajectory {
            states: self.config.x0.clone().insert_axis(Axis(0)),
            times: array![0.0],
        }
    }

    /// Step loop shared by every stochastic entry point; row `i - 1` of `dw`
    /// drives step `i`
    fn integrate(&self, grid: &Array1<f64>, dw: &Array2<f64>) -> SdeResult<Array2<f64>> {
        let steps = self.config.steps;
        let dt = self.config.dt();

        let mut states = Array2::zeros((steps + 1, self.dim()));
        states.row_mut(0).assign(&self.config.x0);
        let mut x = self.config.x0.clone();

        for i in 1..=steps {
            let mut next = self
                .scheme
                .step(&self.coefficients, &x, grid[i - 1], dw.row(i - 1), dt)?;
            self.check_finite(&next, i, grid[i])?;
            clamp_densities(&mut next);
            states.row_mut(i).assign(&next);
            x = next;
        }
        Ok(states)
    }

    // Runs before clamping: f64::max(NaN, 0.0) would hide a NaN
    fn check_finite(&self, x: &Array1<f64>, step: usize, t: f64) -> SdeResult<()> {
        if let Some(j) = x.iter().position(|v| !v.is_finite()) {
            return Err(SdeError::NumericalInstability {
                method: self.scheme.name().to_string(),
                reason: format!(
                    "state component {} became {} at step {} (t = {})",
                    j, x[j], step, t
                ),
            });
        }
        Ok(())
    }

    /// Simulate one path driven by freshly sampled Gaussian increments
    ///
    /// The full (N, n) increment path is drawn up front from the driver's
    /// random source, then the scheme is applied once per step.
    pub fn simulate(&mut self) -> SdeResult<Trajectory> {
        if self.config.is_zero_duration() {
            return Ok(self.zero_duration_trajectory());
        }

        let (dt, dim, steps) = (self.config.dt(), self.dim(), self.config.steps);
        let dw = gaussian_increments(&mut self.rng, dt, dim, steps)?;
        let grid = self.time_grid();
        let states = self.integrate(&grid, &dw)?;
        Ok(Trajectory {
            states,
            times: grid,
        })
    }

    /// Simulate one path driven by a caller-supplied (N, n) increment sequence
    ///
    /// Same `dw` and same configuration give bit-identical trajectories, which
    /// is what makes cross-scheme comparisons on one sample path possible.
    pub fn simulate_with_noise(&self, dw: &Array2<f64>) -> SdeResult<Trajectory> {
        if self.config.is_zero_duration() {
            return Ok(self.zero_duration_trajectory());
        }

        validate_noise_shape(dw, self.config.steps, self.dim())?;
        let grid = self.time_grid();
        let states = self.integrate(&grid, dw)?;
        Ok(Trajectory {
            states,
            times: grid,
        })
    }

    /// Simulate one path driven by white shot noise
    ///
    /// `rate` is the event rate λ, `intensity` the half-width of the uniform
    /// mark distribution. The generated realisation stays available through
    /// [`Simulator::impulses`] and [`Simulator::shot_noise`].
    pub fn simulate_shot_noise(&mut self, rate: f64, intensity: f64) -> SdeResult<Trajectory> {
        let shot = ShotNoise::new(rate, intensity)?;

        if self.config.is_zero_duration() {
            self.shot_noise = Some(ShotNoisePath {
                event_times: Vec::new(),
                marks: Array2::zeros((0, self.dim())),
                event_indices: Vec::new(),
                impulses: Array2::zeros((1, self.dim())),
                candidates: 0,
            });
            return Ok(self.zero_duration_trajectory());
        }

        let grid = self.time_grid();
        let dim = self.dim();
        let path = shot.generate(&mut self.rng, &grid, dim)?;

        let collisions = path.collisions();
        if collisions > 0 && !self.config.quiet {
            eprintln!(
                "WARNING!: {} of {} shot-noise events share a grid index with a later event; only the last mark per index is kept.",
                collisions,
                path.event_count()
            );
        }

        let states = self.integrate(&grid, &path.impulses)?;
        self.shot_noise = Some(path);
        Ok(Trajectory {
            states,
            times: grid,
        })
    }

    /// Noise-free companion run with the default Dormand-Prince solver
    pub fn simulate_deterministic(&self) -> SdeResult<Trajectory> {
        self.simulate_deterministic_with(&DormandPrince::default())
    }

    /// Noise-free companion run: the solver integrates `dx/dt = f(x, t)` over
    /// each grid interval, then the same clamping as the stochastic runs applies
    pub fn simulate_deterministic_with<S: OdeSolver + ?Sized>(
        &self,
        solver: &S,
    ) -> SdeResult<Trajectory> {
        if self.config.is_zero_duration() {
            return Ok(self.zero_duration_trajectory());
        }

        let grid = self.time_grid();
        let steps = self.config.steps;
        let mut states = Array2::zeros((steps + 1, self.dim()));
        states.row_mut(0).assign(&self.config.x0);
        let mut x = self.config.x0.clone();

        for i in 1..=steps {
            let mut next = solver.advance(self.coefficients.drift_fn(), &x, grid[i - 1], grid[i])?;
            validate_dim("deterministic solver output", self.dim(), next.len())?;
            self.check_finite(&next, i, grid[i])?;
            clamp_densities(&mut next);
            states.row_mut(i).assign(&next);
            x = next;
        }

        Ok(Trajectory {
            states,
            times: grid,
        })
    }
}
