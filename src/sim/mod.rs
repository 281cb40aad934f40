pub mod simulator;

pub use simulator::{SimConfig, Simulator, Trajectory};
