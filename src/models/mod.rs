pub mod lotka_volterra;
pub mod model;
