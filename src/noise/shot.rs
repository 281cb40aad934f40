// src/noise/shot.rs
//! White shot noise: impulsive forcing from a marked point process
//!
//! # Construction
//!
//! 1. Candidate arrivals: cumulative sums of `⌊2·T·λ⌋` i.i.d. `Exp(λ)`
//!    inter-arrival times (twice the expected event count on [0, T]).
//! 2. Arrivals at or after `T` are discarded.
//! 3. Each retained event gets an n-dimensional mark, every component
//!    `~ Uniform[−intensity, +intensity]`.
//! 4. Each event is placed on the first grid point `≥` its arrival time.
//!
//! The result is an (N+1, n) impulse array aligned with the time grid: zero
//! everywhere except at event-bearing rows.
//!
//! # Collisions
//!
//! When several events land on the same grid index, the mark of the latest
//! event overwrites the earlier ones (keep-last). Marks are not summed.
//! [`ShotNoisePath::collisions`] reports how many marks were overwritten.

use crate::error::{validation::*, SdeError, SdeResult};
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution, Exp, Uniform};

/// Upper bound on the number of candidate events drawn for one path
pub const MAX_CANDIDATE_EVENTS: usize = 50_000_000;

/// Parameters of the impulsive generator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotNoise {
    pub rate: f64,      // λ, events per unit time
    pub intensity: f64, // Half-width of the mark distribution
}

/// One realisation of shot noise on a time grid
#[derive(Clone, Debug, PartialEq)]
pub struct ShotNoisePath {
    /// Arrival times in [0, T), increasing
    pub event_times: Vec<f64>,
    /// One mark per event, shape (events, n)
    pub marks: Array2<f64>,
    /// Grid index each event snapped to
    pub event_indices: Vec<usize>,
    /// Grid-aligned impulses, shape (N+1, n)
    pub impulses: Array2<f64>,
    /// Candidate arrivals drawn before truncation at T
    pub candidates: usize,
}

impl ShotNoisePath {
    pub fn event_count(&self) -> usize {
        self.event_times.len()
    }

    /// Number of marks lost to the keep-last collision policy
    pub fn collisions(&self) -> usize {
        let mut indices = self.event_indices.clone();
        indices.dedup();
        self.event_indices.len() - indices.len()
    }

    /// Rows of the impulse array with at least one nonzero component
    pub fn nonzero_rows(&self) -> Vec<usize> {
        self.impulses
            .outer_iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|&v| v != 0.0))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Index of the first grid point `≥ value` (lower-bound search)
pub fn lower_bound(grid: &Array1<f64>, value: f64) -> usize {
    let (mut lo, mut hi) = (0, grid.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if grid[mid] < value {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

impl ShotNoise {
    pub fn new(rate: f64, intensity: f64) -> SdeResult<Self> {
        let shot = ShotNoise { rate, intensity };
        shot.validate()?;
        Ok(shot)
    }

    /// `rate ≤ 0` is accepted and produces no events
    pub fn validate(&self) -> SdeResult<()> {
        validate_finite("rate", self.rate)?;
        validate_finite("intensity", self.intensity)?;
        validate_non_negative("intensity", self.intensity)?;
        if !(2.0 * self.intensity).is_finite() {
            return Err(SdeError::InvalidParameters {
                parameter: "intensity".to_string(),
                value: self.intensity,
                constraint: "mark range [-intensity, intensity] must have a finite width"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Number of inter-arrival times drawn for a horizon `t_end`
    pub fn candidate_count(&self, t_end: f64) -> SdeResult<usize> {
        if !(self.rate > 0.0) || !(t_end > 0.0) {
            return Ok(0);
        }
        let expected = (2.0 * t_end * self.rate).floor();
        if !(expected <= MAX_CANDIDATE_EVENTS as f64) {
            return Err(SdeError::InvalidParameters {
                parameter: "rate".to_string(),
                value: self.rate,
                constraint: format!(
                    "2·T·rate = {} exceeds the candidate event limit ({})",
                    expected, MAX_CANDIDATE_EVENTS
                ),
            });
        }
        Ok(expected as usize)
    }

    /// Arrival times in [0, t_end), plus the candidate count before truncation
    pub fn event_times<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        t_end: f64,
    ) -> SdeResult<(Vec<f64>, usize)> {
        self.validate()?;
        let candidates = self.candidate_count(t_end)?;
        if candidates == 0 {
            return Ok((Vec::new(), 0));
        }

        let exp = Exp::new(self.rate).map_err(|e| SdeError::RandomGenerationError {
            reason: e.to_string(),
        })?;
        let mut arrival = 0.0;
        let mut times = Vec::with_capacity(candidates);
        for _ in 0..candidates {
            arrival += exp.sample(rng);
            times.push(arrival);
        }
        times.retain(|&t| t < t_end);
        Ok((times, candidates))
    }

    /// Generate events, marks and the grid-aligned impulse array
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        grid: &Array1<f64>,
        dim: usize,
    ) -> SdeResult<ShotNoisePath> {
        let t_end = match grid.iter().last() {
            Some(&t) => t,
            None => {
                return Err(SdeError::DimensionMismatch {
                    what: "time grid".to_string(),
                    expected: "at least one point".to_string(),
                    found: "empty grid".to_string(),
                })
            }
        };

        let (event_times, candidates) = self.event_times(rng, t_end)?;

        let marks = if event_times.is_empty() {
            Array2::zeros((0, dim))
        } else {
            let uniform = Uniform::new_inclusive(-self.intensity, self.intensity);
            Array2::from_shape_fn((event_times.len(), dim), |_| uniform.sample(rng))
        };

        let mut impulses = Array2::zeros((grid.len(), dim));
        let mut event_indices = Vec::with_capacity(event_times.len());
        for (k, &t_event) in event_times.iter().enumerate() {
            let idx = lower_bound(grid, t_event);
            impulses.row_mut(idx).assign(&marks.row(k));
            event_indices.push(idx);
        }

        Ok(ShotNoisePath {
            event_times,
            marks,
            event_indices,
            impulses,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math_utils::uniform_time_grid;
    use crate::rng::seed_rng_from_u64;
    use ndarray::array;

    #[test]
    fn test_lower_bound() {
        let grid = array![0.0, 0.25, 0.5, 0.75, 1.0];
        assert_eq!(lower_bound(&grid, 0.0), 0);
        assert_eq!(lower_bound(&grid, 0.1), 1);
        assert_eq!(lower_bound(&grid, 0.25), 1);
        assert_eq!(lower_bound(&grid, 0.99), 4);
    }

    #[test]
    fn test_candidate_count() {
        let shot = ShotNoise::new(3.0, 1.0).unwrap();
        assert_eq!(shot.candidate_count(2.0).unwrap(), 12);
        assert_eq!(shot.candidate_count(0.1).unwrap(), 0);
        assert_eq!(shot.candidate_count(0.0).unwrap(), 0);
        assert_eq!(ShotNoise::new(0.0, 1.0).unwrap().candidate_count(5.0).unwrap(), 0);
        assert_eq!(ShotNoise::new(-2.0, 1.0).unwrap().candidate_count(5.0).unwrap(), 0);
        assert!(ShotNoise::new(1e12, 1.0).unwrap().candidate_count(1e3).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(ShotNoise::new(f64::NAN, 1.0).is_err());
        assert!(ShotNoise::new(1.0, -1.0).is_err());
        assert!(ShotNoise::new(1.0, f64::INFINITY).is_err());
        assert!(ShotNoise::new(1.0, f64::MAX).is_err());
    }

    #[test]
    fn test_events_within_horizon_and_sorted() {
        let mut rng = seed_rng_from_u64(17);
        let shot = ShotNoise::new(20.0, 0.5).unwrap();
        let (times, candidates) = shot.event_times(&mut rng, 2.0).unwrap();
        assert_eq!(candidates, 80);
        assert!(times.len() <= candidates);
        assert!(!times.is_empty());
        assert!(times.iter().all(|&t| t > 0.0 && t < 2.0));
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_impulses_only_at_event_rows() {
        let mut rng = seed_rng_from_u64(99);
        let grid = uniform_time_grid(5.0, 500);
        let path = ShotNoise::new(4.0, 2.0)
            .unwrap()
            .generate(&mut rng, &grid, 2)
            .unwrap();

        assert_eq!(path.impulses.dim(), (501, 2));
        assert_eq!(path.marks.dim(), (path.event_count(), 2));
        assert!(path.marks.iter().all(|&m| (-2.0..=2.0).contains(&m)));

        for &row in &path.nonzero_rows() {
            assert!(path.event_indices.contains(&row));
        }
        assert!(path.nonzero_rows().len() <= path.candidates);

        // Each event sits on the first grid point at or after its arrival
        for (&t, &idx) in path.event_times.iter().zip(&path.event_indices) {
            assert!(grid[idx] >= t);
            assert!(idx == 0 || grid[idx - 1] < t);
        }
    }

    #[test]
    fn test_collision_keeps_last_mark() {
        // Coarse grid and a high rate force several events into one slot
        let mut rng = seed_rng_from_u64(1);
        let grid = uniform_time_grid(1.0, 2);
        let path = ShotNoise::new(50.0, 1.0)
            .unwrap()
            .generate(&mut rng, &grid, 2)
            .unwrap();

        assert!(path.collisions() > 0);
        for idx in 0..grid.len() {
            if let Some(last) = path.event_indices.iter().rposition(|&i| i == idx) {
                assert_eq!(path.impulses.row(idx), path.marks.row(last));
            }
        }
    }

    #[test]
    fn test_no_events_gives_zero_impulses() {
        let mut rng = seed_rng_from_u64(8);
        let grid = uniform_time_grid(3.0, 30);
        let path = ShotNoise::new(0.0, 1.0)
            .unwrap()
            .generate(&mut rng, &grid, 2)
            .unwrap();
        assert_eq!(path.event_count(), 0);
        assert_eq!(path.collisions(), 0);
        assert!(path.impulses.iter().all(|&v| v == 0.0));
        assert_eq!(path.impulses.dim(), (31, 2));
    }
}
