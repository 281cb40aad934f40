// scripts/benchmark.rs
use popdyn_sde::math_utils::Timer;
use popdyn_sde::models::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use popdyn_sde::models::model::Coefficients;
use popdyn_sde::rng::RngFactory;
use popdyn_sde::sim::{SimConfig, Simulator};
use popdyn_sde::solvers::SchemeKind;
use ndarray::array;
use rayon::prelude::*;
use std::env;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use std::sync::Arc;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rust_version: Command::new("rustc")
                .arg("--version")
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown Rust version".to_string()),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    steps: usize,
    runs: usize,
    time_ms: f64,
    throughput_steps_per_sec: f64,
    value: f64,
    reference: Option<f64>,
}

fn lotka_volterra() -> Coefficients {
    let model = LotkaVolterra::new(LotkaVolterraParams::default()).expect("Valid parameters");
    Coefficients::from_differentiable_model(Arc::new(model))
}

fn config(steps: usize, seed: u64) -> SimConfig {
    SimConfig {
        x0: array![10.0, 5.0],
        t: 50.0,
        steps,
        seed: Some(seed),
        quiet: true,
    }
}

fn run_scheme_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    for &steps in &[1_000, 10_000, 100_000] {
        println!("Running single-path benchmarks with {} steps...", steps);

        let reference = Simulator::new(config(steps, 0), lotka_volterra(), SchemeKind::EulerMaruyama)
            .and_then(|sim| sim.simulate_deterministic())
            .map(|traj| traj.last_state()[0])
            .ok();

        for kind in SchemeKind::ALL {
            let mut sim =
                Simulator::new(config(steps, 42), lotka_volterra(), kind).expect("Valid configuration");

            let mut timer = Timer::new();
            timer.start();
            let traj = sim.simulate().expect("Finite trajectory");
            let time_ms = timer.elapsed_ms();

            results.push(BenchmarkResult {
                name: format!("{} ({}k steps)", kind, steps / 1000),
                steps,
                runs: 1,
                time_ms,
                throughput_steps_per_sec: steps as f64 / (time_ms / 1000.0),
                value: traj.last_state()[0],
                reference,
            });
        }
    }

    results
}

fn run_ensemble_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let runs = 2_000;
    let steps = 5_000;
    let factory = RngFactory::new(42);

    let final_prey = |id: u64| -> f64 {
        let mut sim = Simulator::new(
            config(steps, factory.seed_for(id)),
            lotka_volterra(),
            SchemeKind::Milstein,
        )
        .expect("Valid configuration");
        sim.simulate().map(|traj| traj.last_state()[0]).unwrap_or(f64::NAN)
    };

    for parallel in [false, true] {
        let label = if parallel { "parallel" } else { "sequential" };
        println!("Running {} ensemble of {} runs...", label, runs);

        let mut timer = Timer::new();
        timer.start();
        let values: Vec<f64> = if parallel {
            (0..runs as u64).into_par_iter().map(final_prey).collect()
        } else {
            (0..runs as u64).map(final_prey).collect()
        };
        let time_ms = timer.elapsed_ms();

        results.push(BenchmarkResult {
            name: format!("Milstein ensemble ({})", label),
            steps,
            runs,
            time_ms,
            throughput_steps_per_sec: (runs * steps) as f64 / (time_ms / 1000.0),
            value: values.iter().sum::<f64>() / runs as f64,
            reference: None,
        });
    }

    println!("Running shot-noise benchmark...");
    let mut sim = Simulator::new(config(100_000, 7), lotka_volterra(), SchemeKind::RungeKutta)
        .expect("Valid configuration");
    let mut timer = Timer::new();
    timer.start();
    let traj = sim
        .simulate_shot_noise(20.0, 0.5)
        .expect("Finite trajectory");
    let time_ms = timer.elapsed_ms();
    results.push(BenchmarkResult {
        name: "Shot noise, SRK (100k steps)".to_string(),
        steps: 100_000,
        runs: 1,
        time_ms,
        throughput_steps_per_sec: 100_000.0 / (time_ms / 1000.0),
        value: traj.last_state()[0],
        reference: None,
    });

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Steps,Runs,Time_ms,Throughput_steps_per_sec,Final_prey,Deterministic_prey"
    )?;
    for result in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{}",
            result.name,
            result.steps,
            result.runs,
            result.time_ms,
            result.throughput_steps_per_sec,
            result.value,
            result
                .reference
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
    }

    println!("Results written to {}", filename);
    Ok(())
}

fn main() {
    println!("popdyn-sde Benchmark Suite");
    println!("==========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut all_results = run_scheme_benchmarks();
    all_results.extend(run_ensemble_benchmarks());

    println!("\n{:=<96}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<96}", "");
    println!(
        "{:<36} {:>8} {:>6} {:>12} {:>15} {:>10} {:>10}",
        "Benchmark", "Steps", "Runs", "Time (ms)", "Steps/sec", "Prey(T)", "ODE"
    );
    println!("{:-<96}", "");
    for result in &all_results {
        println!(
            "{:<36} {:>8} {:>6} {:>12.2} {:>15.0} {:>10.4} {:>10}",
            result.name,
            result.steps,
            result.runs,
            result.time_ms,
            result.throughput_steps_per_sec,
            result.value,
            result
                .reference
                .map(|v| format!("{:.4}", v))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }
    println!("{:=<96}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    if let Err(e) = write_results_to_csv(&all_results, &system_info, &filename) {
        eprintln!("WARNING!: could not write {}: {}", filename, e);
    }

    println!("\nTo reproduce these results:");
    println!("1. Use Rust version: {}", system_info.rust_version);
    println!("2. Run: cargo run --bin benchmark --release");
}
