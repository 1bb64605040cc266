//! Per-step vehicle controller
//!
//! A [`ServoVehicle`] owns the bone tree and joint slots of one built
//! forklift. Before every physics step [`ServoVehicle::pre_update`] turns the
//! current [`InputRecord`] into joint targets, and after the step
//! [`ServoVehicle::sync_transforms`] copies body frames back to the scene.

use serde::{Deserialize, Serialize};
use servo_core::{EntityKey, SceneGraph};
use servo_input::InputRecord;
use servo_math::{Mat4, DEG_TO_RAD};
use servo_physics::{BodyKey, PhysicsWorld};

use crate::error::VehicleError;
use crate::skeleton::Skeleton;
use crate::slots::VehicleJoints;

/// Rear wheel steering angle at full lock (radians)
pub const STEER_ANGLE: f32 = 30.0 * DEG_TO_RAD;
/// Brake torque applied to the traction wheels when the throttle is idle
pub const IDLE_BRAKE_TORQUE: f32 = 2000.0;

/// Engine tuning for a vehicle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Engine motor speed at full throttle (radians per second)
    pub max_engine_speed: f32,
    /// Engine motor torque
    pub engine_torque: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_engine_speed: 20.0,
            engine_torque: 1000.0,
        }
    }
}

/// Joint targets written by one controller update
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlOutputs {
    /// Target steer angle of both rear wheels
    pub steer_angle: f32,
    /// Engine motor speed
    pub engine_speed: f32,
    /// Brake torque on the front wheels
    pub brake_torque: f32,
    /// Fork hinge target
    pub fork_angle: f32,
    /// Target of every lift slider
    pub lift: f32,
    /// Target of both palette sliders
    pub palette: f32,
}

/// One articulated forklift
#[derive(Debug)]
pub struct ServoVehicle {
    skeleton: Skeleton,
    joints: VehicleJoints,
    input: InputRecord,
    config: VehicleConfig,
    model_root: EntityKey,
}

impl ServoVehicle {
    pub fn new(skeleton: Skeleton, joints: VehicleJoints, config: VehicleConfig, model_root: EntityKey) -> Self {
        Self {
            skeleton,
            joints,
            input: InputRecord::neutral(),
            config,
            model_root,
        }
    }

    /// Replace the control input used by the next update
    pub fn set_input(&mut self, input: InputRecord) {
        self.input = input;
    }

    pub fn input(&self) -> &InputRecord {
        &self.input
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn joints(&self) -> &VehicleJoints {
        &self.joints
    }

    /// Scene entity the model was instantiated under
    pub fn model_root(&self) -> EntityKey {
        self.model_root
    }

    /// Body of the chassis bone
    pub fn chassis_body(&self) -> Option<BodyKey> {
        self.skeleton.root().map(|b| b.body)
    }

    /// Global frame of the chassis
    pub fn chassis_matrix(&self, world: &PhysicsWorld) -> Result<Mat4, VehicleError> {
        let chassis = self.chassis_body().ok_or(VehicleError::UnknownVehicle)?;
        Ok(world.body_matrix(chassis)?)
    }

    /// Clear the chassis sleep state so the vehicle reacts to new targets
    pub fn wake(&self, world: &mut PhysicsWorld) -> Result<(), VehicleError> {
        if let Some(chassis) = self.chassis_body() {
            world.set_sleep_state(chassis, false)?;
        }
        Ok(())
    }

    /// Write joint targets for the current input
    ///
    /// With no steering input the rear wheels keep their last target rather
    /// than recentering.
    pub fn pre_update(&mut self, world: &mut PhysicsWorld) -> Result<ControlOutputs, VehicleError> {
        let input = self.input;
        let rear = *self.joints.rear_tires();

        let steer_angle = match input.steer {
            s if s > 0 => STEER_ANGLE,
            s if s < 0 => -STEER_ANGLE,
            _ => world.wheel(rear[0])?.target_steer_angle(),
        };
        for key in rear {
            world.wheel_mut(key)?.set_target_steer_angle(steer_angle);
        }

        world
            .hinge_actuator_mut(self.joints.fork_base())?
            .set_target_angle(input.tilt);
        for &key in self.joints.lifts() {
            world.slider_actuator_mut(key)?.set_target_posit(input.lift);
        }
        for &key in self.joints.palettes() {
            world.slider_actuator_mut(key)?.set_target_posit(input.palette);
        }

        let (engine_speed, brake_torque) = match input.throttle {
            t if t > 0 => (-self.config.max_engine_speed, 0.0),
            t if t < 0 => (self.config.max_engine_speed, 0.0),
            _ => (0.0, IDLE_BRAKE_TORQUE),
        };
        world.motor_mut(self.joints.engine_motor())?.set_speed(engine_speed);
        for &key in self.joints.front_tires() {
            world.wheel_mut(key)?.set_brake_torque(brake_torque);
        }

        let outputs = ControlOutputs {
            steer_angle,
            engine_speed,
            brake_torque,
            fork_angle: input.tilt,
            lift: input.lift,
            palette: input.palette,
        };
        log::trace!("Vehicle controls: {:?}", outputs);
        Ok(outputs)
    }

    /// Copy body frames back to the scene entities they were built from
    pub fn sync_transforms(&self, world: &PhysicsWorld, graph: &mut SceneGraph) -> Result<(), VehicleError> {
        for (_, bone) in self.skeleton.iter() {
            let Some(entity) = bone.entity else {
                continue;
            };
            let body = world.body_matrix(bone.body)?;

            let local = match bone.parent.and_then(|p| self.skeleton.get(p)) {
                Some(parent) => {
                    let parent_body = world.body_matrix(parent.body)?;
                    (body * parent_body.inverse()) * bone.bind
                }
                None => {
                    let parent_global = graph
                        .parent(entity)
                        .and_then(|p| graph.global_matrix(p))
                        .unwrap_or(Mat4::IDENTITY);
                    body * parent_global.inverse()
                }
            };
            graph.set_local_matrix(entity, local);
        }
        Ok(())
    }

    /// Remove every body and joint this vehicle created, and its model
    pub fn destroy(self, world: &mut PhysicsWorld, graph: &mut SceneGraph) {
        for body in self.skeleton.bodies() {
            world.remove_body(body);
        }
        let removed = graph.remove_subtree(self.model_root);
        log::debug!("Destroyed vehicle ({} scene entities)", removed);
    }
}
