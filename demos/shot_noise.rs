// demos/shot_noise.rs
use popdyn_sde::models::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use popdyn_sde::models::model::Coefficients;
use popdyn_sde::output;
use popdyn_sde::sim::{SimConfig, Simulator};
use popdyn_sde::solvers::SchemeKind;
use ndarray::array;
use std::sync::Arc;

fn main() {
    println!("Running popdyn-sde Shot Noise Demo\n");

    let model = LotkaVolterra::new(LotkaVolterraParams::default()).expect("Valid parameters");
    let coefficients = Coefficients::from_differentiable_model(Arc::new(model));

    let config = SimConfig {
        x0: array![10.0, 5.0],
        t: 100.0,
        steps: 10_000,
        seed: Some(7),
        quiet: false,
    };

    let rate = 0.5;
    for &(intensity, label) in &[(0.5, "mild"), (2.0, "strong")] {
        let mut sim = Simulator::new(config.clone(), coefficients.clone(), SchemeKind::EulerMaruyama)
            .expect("Valid configuration");

        let traj = match sim.simulate_shot_noise(rate, intensity) {
            Ok(traj) => traj,
            Err(e) => {
                eprintln!("Shot-noise run failed: {}", e);
                continue;
            }
        };

        let Some(path) = sim.shot_noise() else {
            continue;
        };
        println!("--- {} shocks (rate = {}, intensity = {}) ---", label, rate, intensity);
        println!("Candidate arrivals drawn: {}", path.candidates);
        println!("Events before T:          {}", path.event_count());
        println!("Grid rows hit:            {}", path.nonzero_rows().len());
        println!("Overwritten marks:        {}", path.collisions());

        let min_prey = traj.component(0).fold(f64::INFINITY, |a, &b| a.min(b));
        let min_predator = traj.component(1).fold(f64::INFINITY, |a, &b| a.min(b));
        println!("Minimum prey:     {:.4}", min_prey);
        println!("Minimum predator: {:.4}\n", min_predator);

        let traj_file = format!("shot_noise_{}_trajectory.csv", label);
        let impulse_file = format!("shot_noise_{}_impulses.csv", label);
        if let Err(e) = output::write_trajectory_to_csv(&traj_file, &traj) {
            eprintln!("Failed to write {}: {}", traj_file, e);
        }
        if let Err(e) = output::write_impulses_to_csv(&impulse_file, &traj.times, &path.impulses) {
            eprintln!("Failed to write {}: {}", impulse_file, e);
        }
    }
}
