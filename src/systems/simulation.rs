//! Vehicle simulation system
//!
//! Runs one fixed step of the demo:
//! - Input → active vehicle (with vehicle switching and wake-up)
//! - Controller update for every vehicle
//! - Physics stepping
//! - Transform sync back to the scene
//! - Camera follow

use servo_input::{CameraRig, VehicleInputController};
use servo_math::Mat4;
use servo_physics::StepReport;
use servo_vehicle::{ControlOutputs, VehicleError};

use crate::scene::DemoScene;

/// Result of a simulation update
#[derive(Debug, Clone, Copy)]
pub struct SimulationResult {
    /// Step counter after this update
    pub step: u32,
    /// Broad-phase counts of the physics step
    pub report: StepReport,
    /// Targets written to the active vehicle
    pub controls: Option<ControlOutputs>,
    /// Camera frame after following the active vehicle
    pub camera: Mat4,
}

/// Manages the fixed-step simulation loop
pub struct SimulationSystem {
    timestep: f32,
    step: u32,
}

impl SimulationSystem {
    /// Create a simulation system advancing `timestep` seconds per update
    pub fn new(timestep: f32) -> Self {
        Self { timestep, step: 0 }
    }

    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Number of completed updates
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Run one simulation step
    pub fn update(
        &mut self,
        scene: &mut DemoScene,
        input: &mut VehicleInputController,
        camera: &mut CameraRig,
    ) -> Result<SimulationResult, VehicleError> {
        // 1. Vehicle switching
        if input.take_next_vehicle() {
            if let Some(handle) = scene.vehicles.cycle_active() {
                log::info!("Switched to vehicle {:?}", handle);
            }
        }

        // 2. Input → active vehicle
        let active = scene.vehicles.active();
        if let Some(handle) = active {
            scene.vehicles.set_input(handle, input.record())?;
            if input.take_wake_request() {
                if let Some(vehicle) = scene.vehicles.get(handle) {
                    vehicle.wake(&mut scene.world)?;
                }
            }
        }

        // 3. Controllers
        let outputs = scene.vehicles.pre_update_all(&mut scene.world)?;
        let controls = active.and_then(|handle| {
            let index = scene.vehicles.handles().iter().position(|h| *h == handle)?;
            outputs.get(index).copied()
        });

        // 4. Physics
        let report = scene.world.step(self.timestep)?;

        // 5. Scene sync
        scene.vehicles.sync_all(&scene.world, &mut scene.graph)?;

        // 6. Camera follow
        camera.set_cockpit(input.cockpit_view());
        let camera_matrix = match active.and_then(|h| scene.vehicles.get(h)) {
            Some(vehicle) => camera.update(&vehicle.chassis_matrix(&scene.world)?),
            None => camera.matrix(),
        };

        self.step += 1;
        Ok(SimulationResult {
            step: self.step,
            report,
            controls,
            camera: camera_matrix,
        })
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
