// src/math_utils.rs
use ndarray::Array1;

/// Absolute tolerance under which a total duration counts as zero
pub const ZERO_DURATION_ATOL: f64 = 1e-6;

/// Number of leading state components that are densities and must stay ≥ 0
pub const CLAMPED_COMPONENTS: usize = 2;

/// `|a - b| <= atol + rtol * |b|` with rtol = 1e-5
pub fn is_close(a: f64, b: f64, atol: f64) -> bool {
    (a - b).abs() <= atol + 1e-5 * b.abs()
}

/// Uniform grid of `steps + 1` points over [0, t_end]
///
/// The last point is `t_end` exactly so that lower-bound searches over the
/// grid never run past the end for times strictly below `t_end`.
pub fn uniform_time_grid(t_end: f64, steps: usize) -> Array1<f64> {
    let n = steps as f64;
    let mut grid = Array1::from_shape_fn(steps + 1, |i| t_end * (i as f64) / n);
    grid[steps] = t_end;
    grid
}

/// Replace components 0 and 1 by `max(0, value)`; later components are untouched
pub fn clamp_densities(x: &mut Array1<f64>) {
    for value in x.iter_mut().take(CLAMPED_COMPONENTS) {
        *value = value.max(0.0);
    }
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
