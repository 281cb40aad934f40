// demos/predator_prey.rs
use popdyn_sde::analytics::lv_analytic;
use popdyn_sde::math_utils::Timer;
use popdyn_sde::models::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use popdyn_sde::models::model::Coefficients;
use popdyn_sde::noise::gaussian_increments;
use popdyn_sde::output;
use popdyn_sde::rng;
use popdyn_sde::sim::{SimConfig, Simulator};
use popdyn_sde::solvers::SchemeKind;
use ndarray::array;
use std::sync::Arc;

fn main() {
    println!("Running popdyn-sde Predator-Prey Demo\n");

    let params = LotkaVolterraParams::default();
    let model = LotkaVolterra::new(params).expect("Valid parameters");
    let coefficients = Coefficients::from_differentiable_model(Arc::new(model));

    let config = SimConfig {
        x0: array![10.0, 5.0],
        t: 50.0,
        steps: 5_000,
        seed: Some(12345),
        quiet: false,
    };

    let eq = lv_analytic::coexistence_equilibrium(&params);
    println!("--- Deterministic reference ---");
    println!("Coexistence equilibrium: prey = {:.2}, predator = {:.2}", eq[0], eq[1]);
    println!(
        "Linearised cycle period: {:.4}",
        lv_analytic::linear_period(&params)
    );
    let [(re, im), _] = lv_analytic::eigenvalues(&lv_analytic::jacobian(&params, &eq));
    println!("Eigenvalues at equilibrium: {:.4} ± {:.4}i", re, im.abs());

    // One Brownian path shared by all three schemes
    let mut path_rng = rng::seed_rng_from_u64(2024);
    let dw = gaussian_increments(&mut path_rng, config.dt(), config.dim(), config.steps)
        .expect("Valid increment parameters");

    println!("\n--- Shared sample path ---");
    for kind in SchemeKind::ALL {
        let sim = Simulator::new(config.clone(), coefficients.clone(), kind)
            .expect("Valid configuration");

        let mut timer = Timer::new();
        timer.start();
        let traj = match sim.simulate_with_noise(&dw) {
            Ok(traj) => traj,
            Err(e) => {
                eprintln!("{} failed: {}", kind, e);
                continue;
            }
        };
        let elapsed = timer.elapsed_ms();

        let last = traj.last_state();
        let h_end = lv_analytic::first_integral(&params, &last.to_owned());
        println!(
            "{:<24} prey(T) = {:>8.4}, predator(T) = {:>8.4}, H(T) = {}, strong order {}, ({:.2} ms)",
            kind.to_string(),
            last[0],
            last[1],
            h_end.map(|h| format!("{:.6}", h)).unwrap_or_else(|| "extinct".to_string()),
            kind.strong_order(),
            elapsed
        );

        let filename = format!("trajectory_{}.csv", kind.name().to_lowercase().replace(' ', "_"));
        if let Err(e) = output::write_trajectory_to_csv(&filename, &traj) {
            eprintln!("Failed to write {}: {}", filename, e);
        }
    }

    println!("\n--- Noise-free companion ---");
    let sim = Simulator::new(config.clone(), coefficients.clone(), SchemeKind::EulerMaruyama)
        .expect("Valid configuration");
    match sim.simulate_deterministic() {
        Ok(traj) => {
            let h0 = lv_analytic::first_integral(&params, &config.x0);
            let h_end = lv_analytic::first_integral(&params, &traj.last_state().to_owned());
            println!(
                "Dormand-Prince prey(T) = {:.4}, predator(T) = {:.4}",
                traj.last_state()[0],
                traj.last_state()[1]
            );
            if let (Some(h0), Some(h_end)) = (h0, h_end) {
                println!("First integral drift: {:.3e}", (h_end - h0).abs());
            }
            if let Err(e) = output::write_trajectory_to_csv("trajectory_deterministic.csv", &traj) {
                eprintln!("Failed to write deterministic trajectory: {}", e);
            }
        }
        Err(e) => eprintln!("Deterministic run failed: {}", e),
    }

    println!("\n--- Fresh noise per run ---");
    let mut sim = Simulator::new(config, coefficients, SchemeKind::Milstein)
        .expect("Valid configuration");
    for run in 0..3 {
        match sim.simulate() {
            Ok(traj) => println!(
                "Run {}: prey(T) = {:.4}, predator(T) = {:.4}",
                run,
                traj.last_state()[0],
                traj.last_state()[1]
            ),
            Err(e) => eprintln!("Run {} failed: {}", run, e),
        }
    }

    let summary = [
        ("model", "Lotka-Volterra"),
        ("equilibrium_prey", "30"),
        ("equilibrium_predator", "25"),
    ];
    if let Err(e) = output::write_summary_to_csv("predator_prey_summary.csv", &summary) {
        eprintln!("Failed to write summary: {}", e);
    }
}
