// demos/error_handling_demo.rs
use popdyn_sde::error::SdeError;
use popdyn_sde::models::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use popdyn_sde::models::model::Coefficients;
use popdyn_sde::sim::{SimConfig, Simulator};
use popdyn_sde::solvers::SchemeKind;
use ndarray::{array, Array1, Array2};
use std::sync::Arc;

fn lotka_volterra() -> Coefficients {
    let model = LotkaVolterra::new(LotkaVolterraParams::default()).expect("Valid parameters");
    Coefficients::from_differentiable_model(Arc::new(model))
}

fn main() {
    println!("Error Handling Demo for popdyn-sde");
    println!("==================================\n");

    // Test 1: Invalid model parameters
    println!("1. Testing invalid Lotka-Volterra parameters...");
    let invalid_params = LotkaVolterraParams {
        alpha: -0.5, // Negative growth rate
        ..Default::default()
    };
    match LotkaVolterra::new(invalid_params) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Invalid duration
    println!("\n2. Testing negative duration...");
    let bad_duration = SimConfig {
        t: -1.0,
        ..Default::default()
    };
    match Simulator::new(bad_duration, lotka_volterra(), SchemeKind::EulerMaruyama) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Milstein without a diffusion derivative
    println!("\n3. Testing Milstein without a diffusion derivative...");
    let no_derivative = Coefficients::new(
        |x: &Array1<f64>, _t: f64| x * 0.1,
        |x: &Array1<f64>, _t: f64| x * 0.2,
    );
    match Simulator::new(SimConfig::default(), no_derivative, SchemeKind::Milstein) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SdeError::InvalidConfiguration { field, reason }) => {
            println!("   ✓ Caught InvalidConfiguration: {} ({})", field, reason);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 4: Noise sequence with the wrong shape
    println!("\n4. Testing a noise sequence with the wrong shape...");
    let sim = Simulator::new(SimConfig::default(), lotka_volterra(), SchemeKind::RungeKutta)
        .expect("Valid configuration");
    match sim.simulate_with_noise(&Array2::zeros((99, 2))) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SdeError::DimensionMismatch {
            what,
            expected,
            found,
        }) => println!(
            "   ✓ Caught DimensionMismatch: {} expected {}, found {}",
            what, expected, found
        ),
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 5: Zero duration is not an error
    println!("\n5. Testing zero duration...");
    let zero = SimConfig {
        t: 0.0,
        ..Default::default()
    };
    let mut sim = Simulator::new(zero, lotka_volterra(), SchemeKind::EulerMaruyama)
        .expect("Valid configuration");
    match sim.simulate() {
        Ok(traj) => println!("   ✓ Single-row trajectory: {}", traj.states),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 6: Negative initial density warns, then clamps
    println!("\n6. Testing a negative initial density...");
    let negative = SimConfig {
        x0: array![-1.0, 5.0],
        ..Default::default()
    };
    match Simulator::new(negative, lotka_volterra(), SchemeKind::EulerMaruyama) {
        Ok(mut sim) => match sim.simulate() {
            Ok(traj) => println!("   ✓ Prey after first step: {}", traj.state(1)[0]),
            Err(e) => println!("   Unexpected error: {}", e),
        },
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 7: Blow-up is reported instead of clamped away
    println!("\n7. Testing a diverging drift...");
    let explosive = Coefficients::new(
        |x: &Array1<f64>, _t: f64| x.mapv(|v| v * v * 1e300),
        |x: &Array1<f64>, _t: f64| Array1::zeros(x.len()),
    );
    let sim = Simulator::new(SimConfig::default(), explosive, SchemeKind::EulerMaruyama)
        .expect("Valid configuration");
    match sim.simulate_with_noise(&Array2::zeros((100, 2))) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SdeError::NumericalInstability { method, reason }) => {
            println!("   ✓ Caught NumericalInstability in {}: {}", method, reason);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 8: Invalid shot-noise intensity
    println!("\n8. Testing a negative shot-noise intensity...");
    let mut sim = Simulator::new(SimConfig::default(), lotka_volterra(), SchemeKind::EulerMaruyama)
        .expect("Valid configuration");
    match sim.simulate_shot_noise(1.0, -0.5) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    println!("\n✓ Error handling demo complete!");
    println!("All error cases were properly caught and handled.");
}
