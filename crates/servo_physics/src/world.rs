//! Physics world and simulation step

use servo_math::{Mat4, Vec3};
use slotmap::SlotMap;

use crate::body::{BodyKey, ForceCallback, RigidBody};
use crate::collision::{ContactFilter, PairDecision};
use crate::error::PhysicsError;
use crate::joint::{
    DifferentialGear, DoubleHinge, HingeActuator, Joint, JointKey, JointKind, Motor, SliderActuator, Wheel,
};

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration (applied to Y-axis, negative = down)
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: -10.0 }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

/// Broad-phase counts from one step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Overlapping pairs the filter let through
    pub processed_pairs: usize,
    /// Overlapping pairs the filter dropped
    pub skipped_pairs: usize,
}

/// The physics world containing all rigid bodies and joints
pub struct PhysicsWorld {
    bodies: SlotMap<BodyKey, RigidBody>,
    joints: SlotMap<JointKey, Joint>,
    contact_filter: Option<Box<dyn ContactFilter>>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

/// Generates a shared and a mutable accessor for one joint kind
macro_rules! joint_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty, $label:literal) => {
        #[doc = concat!("Borrow a ", $label, " joint")]
        pub fn $get(&self, key: JointKey) -> Result<&$ty, PhysicsError> {
            match &self.joint(key)?.kind {
                JointKind::$variant(j) => Ok(j),
                other => Err(PhysicsError::JointKindMismatch {
                    joint: key,
                    expected: $label,
                    found: other.name(),
                }),
            }
        }

        #[doc = concat!("Mutably borrow a ", $label, " joint")]
        pub fn $get_mut(&mut self, key: JointKey) -> Result<&mut $ty, PhysicsError> {
            match &mut self.joint_mut(key)?.kind {
                JointKind::$variant(j) => Ok(j),
                other => Err(PhysicsError::JointKindMismatch {
                    joint: key,
                    expected: $label,
                    found: other.name(),
                }),
            }
        }
    };
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            joints: SlotMap::with_key(),
            contact_filter: None,
            config,
        }
    }

    // ===== Bodies =====

    /// Add a rigid body to the world, returning its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body and every joint attached to it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let body = self.bodies.remove(key)?;
        self.joints.retain(|_, joint| !joint.connects(key));
        Some(body)
    }

    /// Get a reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get a body or fail with [`PhysicsError::UnknownBody`]
    pub fn body(&self, key: BodyKey) -> Result<&RigidBody, PhysicsError> {
        self.bodies.get(key).ok_or(PhysicsError::UnknownBody(key))
    }

    /// Mutable variant of [`PhysicsWorld::body`]
    pub fn body_mut(&mut self, key: BodyKey) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies.get_mut(key).ok_or(PhysicsError::UnknownBody(key))
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Global frame of a body
    pub fn body_matrix(&self, key: BodyKey) -> Result<Mat4, PhysicsError> {
        Ok(self.body(key)?.matrix)
    }

    /// Teleport a body
    pub fn set_body_matrix(&mut self, key: BodyKey, matrix: Mat4) -> Result<(), PhysicsError> {
        self.body_mut(key)?.matrix = matrix;
        Ok(())
    }

    pub fn center_of_mass(&self, key: BodyKey) -> Result<Vec3, PhysicsError> {
        Ok(self.body(key)?.center_of_mass)
    }

    pub fn set_center_of_mass(&mut self, key: BodyKey, com: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(key)?.center_of_mass = com;
        Ok(())
    }

    /// Put a body to sleep or wake it up
    pub fn set_sleep_state(&mut self, key: BodyKey, sleeping: bool) -> Result<(), PhysicsError> {
        self.body_mut(key)?.sleeping = sleeping;
        Ok(())
    }

    // ===== Joints =====

    /// Create a joint from a global pin frame
    ///
    /// The frame is stored relative to the child (`local0`) and to the parent
    /// (`local1`). A joint without a parent attaches the child to the world.
    pub fn add_joint(
        &mut self,
        pin_frame: &Mat4,
        child: BodyKey,
        parent: Option<BodyKey>,
        kind: JointKind,
    ) -> Result<JointKey, PhysicsError> {
        let local0 = *pin_frame * self.body_matrix(child)?.inverse();
        let local1 = match parent {
            Some(parent) => *pin_frame * self.body_matrix(parent)?.inverse(),
            None => *pin_frame,
        };
        if let JointKind::DifferentialGear(gear) = &kind {
            self.body(gear.reference_body())?;
        }

        log::debug!("Created {} joint", kind.name());
        Ok(self.joints.insert(Joint {
            child,
            parent,
            local0,
            local1,
            kind,
        }))
    }

    /// Remove a joint
    pub fn remove_joint(&mut self, key: JointKey) -> Option<Joint> {
        self.joints.remove(key)
    }

    /// Get a joint or fail with [`PhysicsError::UnknownJoint`]
    pub fn joint(&self, key: JointKey) -> Result<&Joint, PhysicsError> {
        self.joints.get(key).ok_or(PhysicsError::UnknownJoint(key))
    }

    /// Mutable variant of [`PhysicsWorld::joint`]
    pub fn joint_mut(&mut self, key: JointKey) -> Result<&mut Joint, PhysicsError> {
        self.joints.get_mut(key).ok_or(PhysicsError::UnknownJoint(key))
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joint_keys(&self) -> impl Iterator<Item = JointKey> + '_ {
        self.joints.keys()
    }

    /// Current global pin frames of a joint, as seen by the child and by the parent
    pub fn joint_global_frames(&self, key: JointKey) -> Result<(Mat4, Mat4), PhysicsError> {
        let joint = self.joint(key)?;
        let child_frame = joint.local0 * self.body_matrix(joint.child)?;
        let parent_frame = match joint.parent {
            Some(parent) => joint.local1 * self.body_matrix(parent)?,
            None => joint.local1,
        };
        Ok((child_frame, parent_frame))
    }

    joint_accessors!(hinge_actuator, hinge_actuator_mut, HingeActuator, HingeActuator, "hinge actuator");
    joint_accessors!(slider_actuator, slider_actuator_mut, SliderActuator, SliderActuator, "slider actuator");
    joint_accessors!(wheel, wheel_mut, Wheel, Wheel, "wheel");
    joint_accessors!(double_hinge, double_hinge_mut, DoubleHinge, DoubleHinge, "double hinge");
    joint_accessors!(motor, motor_mut, Motor, Motor, "motor");
    joint_accessors!(differential_gear, differential_gear_mut, DifferentialGear, DifferentialGear, "differential gear");

    // ===== Simulation =====

    /// Install the broad-phase contact filter (replaces any previous one)
    pub fn set_contact_filter(&mut self, filter: Box<dyn ContactFilter>) {
        self.contact_filter = Some(filter);
    }

    /// Remove the contact filter; every overlapping pair is then processed
    pub fn clear_contact_filter(&mut self) {
        self.contact_filter = None;
    }

    /// Step the simulation forward by `dt` seconds
    ///
    /// 1. Evaluate force callbacks on awake dynamic bodies
    /// 2. Run the broad phase, asking the contact filter about each overlapping pair
    /// 3. Advance joint coordinates toward their targets
    pub fn step(&mut self, dt: f32) -> Result<StepReport, PhysicsError> {
        let gravity = self.config.gravity;
        for body in self.bodies.values_mut() {
            body.force = match body.force_callback {
                ForceCallback::Gravity if !body.is_static() && !body.sleeping => {
                    Vec3::new(0.0, body.mass * gravity, 0.0)
                }
                _ => Vec3::ZERO,
            };
        }

        let report = self.broad_phase()?;

        for joint in self.joints.values_mut() {
            let asleep = self.bodies.get(joint.child).map_or(true, |b| b.sleeping);
            if !asleep {
                joint.kind.advance(dt);
            }
        }

        log::trace!(
            "Step: {} pairs processed, {} skipped",
            report.processed_pairs,
            report.skipped_pairs
        );
        Ok(report)
    }

    fn broad_phase(&self) -> Result<StepReport, PhysicsError> {
        let candidates: Vec<_> = self
            .bodies
            .values()
            .filter(|b| b.collidable)
            .map(|b| (b.world_aabb(), b.category, b.is_static()))
            .collect();

        let mut report = StepReport::default();
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (aabb_a, cat_a, static_a) = &candidates[i];
                let (aabb_b, cat_b, static_b) = &candidates[j];
                if (*static_a && *static_b) || !aabb_a.overlaps(aabb_b) {
                    continue;
                }

                let decision = match &self.contact_filter {
                    Some(filter) => filter.on_aabb_overlap(*cat_a, *cat_b)?,
                    None => PairDecision::Process,
                };
                match decision {
                    PairDecision::Process => report.processed_pairs += 1,
                    PairDecision::Skip => report.skipped_pairs += 1,
                }
            }
        }
        Ok(report)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
