//! Application systems
//!
//! Per-frame systems driving the demo scene.

mod simulation;

pub use simulation::{SimulationResult, SimulationSystem};
