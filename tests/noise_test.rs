// tests/noise_test.rs
use ndarray::array;
use popdyn_sde::math_utils::uniform_time_grid;
use popdyn_sde::models::model::Coefficients;
use popdyn_sde::noise::{gaussian_increments, ShotNoise};
use popdyn_sde::rng;
use popdyn_sde::sim::{SimConfig, Simulator};
use popdyn_sde::solvers::SchemeKind;
use statrs::distribution::{ContinuousCDF, Exp};
use statrs::statistics::Statistics;

#[test]
fn test_gaussian_increment_moments() {
    let mut rng = rng::seed_rng_from_u64(42);
    let dt = 0.01;
    let dw = gaussian_increments(&mut rng, dt, 2, 100_000).unwrap();

    for j in 0..2 {
        let column: Vec<f64> = dw.column(j).to_vec();
        let mean = column.iter().mean();
        let variance = column.iter().variance();
        assert!(mean.abs() < 1.5e-3, "component {} mean {}", j, mean);
        assert!(
            (variance - dt).abs() / dt < 0.03,
            "component {} variance {}",
            j,
            variance
        );
    }

    // Components are drawn independently
    let a: Vec<f64> = dw.column(0).to_vec();
    let b: Vec<f64> = dw.column(1).to_vec();
    let covariance = a.iter().covariance(b.iter());
    assert!(covariance.abs() / dt < 0.03);
}

#[test]
fn test_shot_noise_event_rate() {
    let mut rng = rng::seed_rng_from_u64(7);
    let (rate, t_end) = (4.0, 5_000.0);
    let (times, candidates) = ShotNoise::new(rate, 1.0)
        .unwrap()
        .event_times(&mut rng, t_end)
        .unwrap();

    assert_eq!(candidates, 40_000);
    let expected = rate * t_end;
    assert!(
        (times.len() as f64 - expected).abs() / expected < 0.03,
        "{} events, expected about {}",
        times.len(),
        expected
    );
}

#[test]
fn test_shot_noise_inter_arrival_times_are_exponential() {
    let mut rng = rng::seed_rng_from_u64(11);
    let rate = 4.0;
    let (times, _) = ShotNoise::new(rate, 1.0)
        .unwrap()
        .event_times(&mut rng, 5_000.0)
        .unwrap();

    let mut gaps: Vec<f64> = std::iter::once(times[0])
        .chain(times.windows(2).map(|w| w[1] - w[0]))
        .collect();
    let mean_gap = gaps.iter().mean();
    assert!((mean_gap - 1.0 / rate).abs() < 0.01, "mean gap {}", mean_gap);

    // Kolmogorov-Smirnov distance against Exp(rate)
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let exp = Exp::new(rate).unwrap();
    let n = gaps.len() as f64;
    let ks = gaps
        .iter()
        .enumerate()
        .map(|(i, &g)| {
            let cdf = exp.cdf(g);
            (cdf - i as f64 / n).abs().max(((i + 1) as f64 / n - cdf).abs())
        })
        .fold(0.0, f64::max);
    assert!(ks < 0.02, "KS distance {}", ks);
}

#[test]
fn test_shot_noise_marks_are_uniform() {
    let mut rng = rng::seed_rng_from_u64(23);
    let intensity = 2.0;
    let grid = uniform_time_grid(5_000.0, 5_000);
    let path = ShotNoise::new(4.0, intensity)
        .unwrap()
        .generate(&mut rng, &grid, 2)
        .unwrap();

    let marks: Vec<f64> = path.marks.iter().cloned().collect();
    assert!(marks.iter().all(|&m| (-intensity..=intensity).contains(&m)));

    let mean = marks.iter().mean();
    let variance = marks.iter().variance();
    let expected_variance = intensity * intensity / 3.0;
    assert!(mean.abs() < 0.05, "mark mean {}", mean);
    assert!(
        (variance - expected_variance).abs() / expected_variance < 0.03,
        "mark variance {}",
        variance
    );
}

#[test]
fn test_zero_intensity_gives_silent_impulses() {
    let mut rng = rng::seed_rng_from_u64(3);
    let grid = uniform_time_grid(10.0, 100);
    let path = ShotNoise::new(5.0, 0.0)
        .unwrap()
        .generate(&mut rng, &grid, 2)
        .unwrap();

    assert!(path.event_count() > 0);
    assert!(path.impulses.iter().all(|&v| v == 0.0));
    assert!(path.nonzero_rows().is_empty());
}

#[test]
fn test_shot_noise_reproducible_per_seed() {
    let coefficients = Coefficients::new(
        |x: &ndarray::Array1<f64>, _t: f64| x * 0.1,
        |x: &ndarray::Array1<f64>, _t: f64| x * 0.2,
    );
    let run = |seed| {
        let config = SimConfig {
            x0: array![10.0, 5.0],
            t: 5.0,
            steps: 500,
            seed: Some(seed),
            quiet: true,
        };
        let mut sim =
            Simulator::new(config, coefficients.clone(), SchemeKind::EulerMaruyama).unwrap();
        let traj = sim.simulate_shot_noise(3.0, 0.5).unwrap();
        (traj, sim.impulses().unwrap().clone())
    };

    assert_eq!(run(19), run(19));
    assert_ne!(run(19).1, run(20).1);
}

#[test]
fn test_negative_rate_produces_no_events() {
    let coefficients = Coefficients::new(
        |x: &ndarray::Array1<f64>, _t: f64| x * 0.0,
        |x: &ndarray::Array1<f64>, _t: f64| x * 1.0,
    );
    let config = SimConfig {
        x0: array![1.0, 2.0],
        t: 3.0,
        steps: 30,
        seed: Some(1),
        quiet: true,
    };
    let mut sim = Simulator::new(config, coefficients, SchemeKind::EulerMaruyama).unwrap();
    let traj = sim.simulate_shot_noise(-1.0, 1.0).unwrap();

    assert_eq!(sim.shot_noise().unwrap().event_count(), 0);
    for row in traj.states.outer_iter() {
        assert_eq!(row, array![1.0, 2.0].view());
    }
}
