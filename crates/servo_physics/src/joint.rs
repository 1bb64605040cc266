//! Joint types
//!
//! Joints are created from a global pin frame. The world stores that frame in
//! each body's local space (`local0` for the child, `local1` for the parent)
//! so the joint follows the bodies when they move.

use servo_math::{Mat4, Vec3};
use slotmap::new_key_type;

use crate::body::BodyKey;

new_key_type! {
    /// Key to a joint in the physics world
    pub struct JointKey;
}

/// Move `current` toward `target` by at most `max_step`
fn move_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(delta)
    }
}

/// Position-controlled hinge that turns toward a target angle at a fixed rate
#[derive(Clone, Debug, PartialEq)]
pub struct HingeActuator {
    angle: f32,
    target_angle: f32,
    angular_rate: f32,
    min_angle: f32,
    max_angle: f32,
}

impl HingeActuator {
    /// Create an actuator resting at angle zero
    pub fn new(angular_rate: f32, min_angle: f32, max_angle: f32) -> Self {
        Self {
            angle: 0.0,
            target_angle: 0.0,
            angular_rate,
            min_angle,
            max_angle,
        }
    }

    /// Set the commanded angle, clamped to the limits
    pub fn set_target_angle(&mut self, angle: f32) {
        self.target_angle = angle.clamp(self.min_angle, self.max_angle);
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn angular_rate(&self) -> f32 {
        self.angular_rate
    }

    pub fn min_angle(&self) -> f32 {
        self.min_angle
    }

    pub fn max_angle(&self) -> f32 {
        self.max_angle
    }

    fn advance(&mut self, dt: f32) {
        self.angle = move_toward(self.angle, self.target_angle, self.angular_rate * dt);
    }
}

/// Position-controlled slider that travels toward a target position at a fixed rate
#[derive(Clone, Debug, PartialEq)]
pub struct SliderActuator {
    posit: f32,
    target_posit: f32,
    linear_rate: f32,
    min_posit: f32,
    max_posit: f32,
}

impl SliderActuator {
    /// Create an actuator resting at position zero
    pub fn new(linear_rate: f32, min_posit: f32, max_posit: f32) -> Self {
        Self {
            posit: 0.0,
            target_posit: 0.0,
            linear_rate,
            min_posit,
            max_posit,
        }
    }

    /// Set the commanded position, clamped to the limits
    pub fn set_target_posit(&mut self, posit: f32) {
        self.target_posit = posit.clamp(self.min_posit, self.max_posit);
    }

    pub fn target_posit(&self) -> f32 {
        self.target_posit
    }

    pub fn posit(&self) -> f32 {
        self.posit
    }

    pub fn linear_rate(&self) -> f32 {
        self.linear_rate
    }

    pub fn min_posit(&self) -> f32 {
        self.min_posit
    }

    pub fn max_posit(&self) -> f32 {
        self.max_posit
    }

    fn advance(&mut self, dt: f32) {
        self.posit = move_toward(self.posit, self.target_posit, self.linear_rate * dt);
    }
}

/// Wheel joint: spins freely about the pin frame's up axis and steers
/// about its front axis, with a suspension travel range and a brake
#[derive(Clone, Debug, PartialEq)]
pub struct Wheel {
    steer_angle: f32,
    target_steer_angle: f32,
    steer_rate: f32,
    limits_enabled: bool,
    min_limit: f32,
    max_limit: f32,
    brake_torque: f32,
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}

impl Wheel {
    pub fn new() -> Self {
        Self {
            steer_angle: 0.0,
            target_steer_angle: 0.0,
            steer_rate: 0.0,
            limits_enabled: false,
            min_limit: 0.0,
            max_limit: 0.0,
            brake_torque: 0.0,
        }
    }

    /// Maximum steering speed in radians per second
    pub fn set_steer_rate(&mut self, rate: f32) {
        self.steer_rate = rate;
    }

    pub fn steer_rate(&self) -> f32 {
        self.steer_rate
    }

    /// Enable the suspension travel limits
    pub fn enable_limits(&mut self, enabled: bool) {
        self.limits_enabled = enabled;
    }

    /// Suspension travel range
    pub fn set_limits(&mut self, min: f32, max: f32) {
        self.min_limit = min;
        self.max_limit = max;
    }

    pub fn limits_enabled(&self) -> bool {
        self.limits_enabled
    }

    pub fn limits(&self) -> (f32, f32) {
        (self.min_limit, self.max_limit)
    }

    pub fn set_target_steer_angle(&mut self, angle: f32) {
        self.target_steer_angle = angle;
    }

    pub fn target_steer_angle(&self) -> f32 {
        self.target_steer_angle
    }

    pub fn steer_angle(&self) -> f32 {
        self.steer_angle
    }

    /// Friction torque resisting spin
    pub fn set_brake_torque(&mut self, torque: f32) {
        self.brake_torque = torque;
    }

    pub fn brake_torque(&self) -> f32 {
        self.brake_torque
    }

    fn advance(&mut self, dt: f32) {
        self.steer_angle = move_toward(self.steer_angle, self.target_steer_angle, self.steer_rate * dt);
    }
}

/// Two-axis hinge (used to hang the engine node off the chassis)
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleHinge {
    limits0_enabled: bool,
    limits1_enabled: bool,
}

impl Default for DoubleHinge {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleHinge {
    /// Create a double hinge with both angular limits enabled
    pub fn new() -> Self {
        Self {
            limits0_enabled: true,
            limits1_enabled: true,
        }
    }

    /// Enable or disable the limits of the first axis
    pub fn enable_limits(&mut self, enabled: bool) {
        self.limits0_enabled = enabled;
    }

    /// Enable or disable the limits of the second axis
    pub fn enable_limits1(&mut self, enabled: bool) {
        self.limits1_enabled = enabled;
    }

    pub fn limits0_enabled(&self) -> bool {
        self.limits0_enabled
    }

    pub fn limits1_enabled(&self) -> bool {
        self.limits1_enabled
    }
}

/// Single-body rotational motor about a pin
#[derive(Clone, Debug, PartialEq)]
pub struct Motor {
    pin: Vec3,
    speed: f32,
    torque: f32,
    angle: f32,
}

impl Motor {
    /// Create an idle motor about `pin` (global direction at creation)
    pub fn new(pin: Vec3) -> Self {
        Self {
            pin,
            speed: 0.0,
            torque: 0.0,
            angle: 0.0,
        }
    }

    pub fn pin(&self) -> Vec3 {
        self.pin
    }

    /// Target angular speed in radians per second
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Maximum torque the motor may apply
    pub fn set_torque(&mut self, torque: f32) {
        self.torque = torque;
    }

    pub fn torque(&self) -> f32 {
        self.torque
    }

    /// Accumulated rotation
    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn advance(&mut self, dt: f32) {
        self.angle += self.speed * dt;
    }
}

/// Gear coupling a tire's spin to the engine's spin, relative to the chassis
#[derive(Clone, Debug, PartialEq)]
pub struct DifferentialGear {
    gear_ratio: f32,
    child_pin: Vec3,
    parent_pin: Vec3,
    reference_pin: Vec3,
    reference_body: BodyKey,
}

impl DifferentialGear {
    /// Pins are global directions at creation time
    pub fn new(
        gear_ratio: f32,
        child_pin: Vec3,
        parent_pin: Vec3,
        reference_pin: Vec3,
        reference_body: BodyKey,
    ) -> Self {
        Self {
            gear_ratio,
            child_pin,
            parent_pin,
            reference_pin,
            reference_body,
        }
    }

    pub fn gear_ratio(&self) -> f32 {
        self.gear_ratio
    }

    pub fn child_pin(&self) -> Vec3 {
        self.child_pin
    }

    pub fn parent_pin(&self) -> Vec3 {
        self.parent_pin
    }

    pub fn reference_pin(&self) -> Vec3 {
        self.reference_pin
    }

    pub fn reference_body(&self) -> BodyKey {
        self.reference_body
    }
}

/// The kind-specific part of a joint
#[derive(Clone, Debug, PartialEq)]
pub enum JointKind {
    HingeActuator(HingeActuator),
    SliderActuator(SliderActuator),
    Wheel(Wheel),
    DoubleHinge(DoubleHinge),
    Motor(Motor),
    DifferentialGear(DifferentialGear),
}

impl JointKind {
    /// Short name for logging and error messages
    pub fn name(&self) -> &'static str {
        match self {
            JointKind::HingeActuator(_) => "hinge actuator",
            JointKind::SliderActuator(_) => "slider actuator",
            JointKind::Wheel(_) => "wheel",
            JointKind::DoubleHinge(_) => "double hinge",
            JointKind::Motor(_) => "motor",
            JointKind::DifferentialGear(_) => "differential gear",
        }
    }

    /// Move the joint coordinate toward its target for one step
    pub(crate) fn advance(&mut self, dt: f32) {
        match self {
            JointKind::HingeActuator(j) => j.advance(dt),
            JointKind::SliderActuator(j) => j.advance(dt),
            JointKind::Wheel(j) => j.advance(dt),
            JointKind::Motor(j) => j.advance(dt),
            JointKind::DoubleHinge(_) | JointKind::DifferentialGear(_) => {}
        }
    }
}

/// A joint between a child body and an optional parent (world when `None`)
#[derive(Clone, Debug)]
pub struct Joint {
    pub child: BodyKey,
    pub parent: Option<BodyKey>,
    /// Pin frame in the child's body space
    pub local0: Mat4,
    /// Pin frame in the parent's body space (global space when there is no parent)
    pub local1: Mat4,
    pub kind: JointKind,
}

impl Joint {
    /// Check whether the joint attaches to `body`
    pub fn connects(&self, body: BodyKey) -> bool {
        self.child == body
            || self.parent == Some(body)
            || matches!(&self.kind, JointKind::DifferentialGear(g) if g.reference_body == body)
    }
}
