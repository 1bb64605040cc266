//! Joint slots driven by the controller
//!
//! [`JointSlots`] collects joint keys while the skeleton is built. Each slot
//! is filled at most once. [`JointSlots::build`] turns a complete set into
//! an immutable [`VehicleJoints`].

use servo_physics::JointKey;

use crate::error::VehicleError;

/// Store `key` in the first empty slot
fn fill<const N: usize>(
    slots: &mut [Option<JointKey>; N],
    key: JointKey,
    name: &'static str,
) -> Result<usize, VehicleError> {
    match slots.iter().position(Option::is_none) {
        Some(index) => {
            slots[index] = Some(key);
            Ok(index)
        }
        None => Err(VehicleError::SlotCapacityExceeded { slot: name, capacity: N }),
    }
}

/// Take every slot of an array, failing on the first empty one
fn take_all<const N: usize>(
    slots: [Option<JointKey>; N],
    name: &'static str,
) -> Result<[JointKey; N], VehicleError> {
    let mut out = [JointKey::default(); N];
    for (dst, src) in out.iter_mut().zip(slots) {
        *dst = src.ok_or(VehicleError::MissingJoint(name))?;
    }
    Ok(out)
}

/// Mutable joint slots used during construction
#[derive(Clone, Debug, Default)]
pub struct JointSlots {
    engine_joint: Option<JointKey>,
    engine_motor: Option<JointKey>,
    fork_base: Option<JointKey>,
    front_tires: [Option<JointKey>; 2],
    front_differentials: [Option<JointKey>; 2],
    rear_tires: [Option<JointKey>; 2],
    lifts: [Option<JointKey>; 3],
    palettes: [Option<JointKey>; 2],
}

impl JointSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_engine_joint(&mut self, key: JointKey) -> Result<(), VehicleError> {
        fill(std::array::from_mut(&mut self.engine_joint), key, "engine").map(|_| ())
    }

    pub fn set_engine_motor(&mut self, key: JointKey) -> Result<(), VehicleError> {
        fill(std::array::from_mut(&mut self.engine_motor), key, "engine motor").map(|_| ())
    }

    pub fn set_fork_base(&mut self, key: JointKey) -> Result<(), VehicleError> {
        fill(std::array::from_mut(&mut self.fork_base), key, "fork hinge").map(|_| ())
    }

    /// Add a front wheel and its differential gear; returns the slot index
    pub fn add_front_tire(&mut self, wheel: JointKey, differential: JointKey) -> Result<usize, VehicleError> {
        let index = fill(&mut self.front_tires, wheel, "front tire")?;
        self.front_differentials[index] = Some(differential);
        Ok(index)
    }

    pub fn add_rear_tire(&mut self, wheel: JointKey) -> Result<usize, VehicleError> {
        fill(&mut self.rear_tires, wheel, "rear tire")
    }

    pub fn add_lift(&mut self, slider: JointKey) -> Result<usize, VehicleError> {
        fill(&mut self.lifts, slider, "lift")
    }

    pub fn add_palette(&mut self, slider: JointKey) -> Result<usize, VehicleError> {
        fill(&mut self.palettes, slider, "palette")
    }

    /// Engine double hinge, needed while linking front tires
    pub fn engine_joint(&self) -> Option<JointKey> {
        self.engine_joint
    }

    /// Finish construction; every slot must be filled
    pub fn build(self) -> Result<VehicleJoints, VehicleError> {
        Ok(VehicleJoints {
            engine_joint: self.engine_joint.ok_or(VehicleError::MissingJoint("engine"))?,
            engine_motor: self.engine_motor.ok_or(VehicleError::MissingJoint("engine motor"))?,
            fork_base: self.fork_base.ok_or(VehicleError::MissingJoint("fork hinge"))?,
            front_tires: take_all(self.front_tires, "front tire")?,
            front_differentials: take_all(self.front_differentials, "front differential")?,
            rear_tires: take_all(self.rear_tires, "rear tire")?,
            lifts: take_all(self.lifts, "lift")?,
            palettes: take_all(self.palettes, "palette")?,
        })
    }
}

/// The joints a vehicle drives, fixed after construction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleJoints {
    engine_joint: JointKey,
    engine_motor: JointKey,
    fork_base: JointKey,
    front_tires: [JointKey; 2],
    front_differentials: [JointKey; 2],
    rear_tires: [JointKey; 2],
    lifts: [JointKey; 3],
    palettes: [JointKey; 2],
}

impl VehicleJoints {
    pub fn engine_joint(&self) -> JointKey {
        self.engine_joint
    }

    pub fn engine_motor(&self) -> JointKey {
        self.engine_motor
    }

    pub fn fork_base(&self) -> JointKey {
        self.fork_base
    }

    pub fn front_tires(&self) -> &[JointKey; 2] {
        &self.front_tires
    }

    pub fn front_differentials(&self) -> &[JointKey; 2] {
        &self.front_differentials
    }

    pub fn rear_tires(&self) -> &[JointKey; 2] {
        &self.rear_tires
    }

    pub fn lifts(&self) -> &[JointKey; 3] {
        &self.lifts
    }

    pub fn palettes(&self) -> &[JointKey; 2] {
        &self.palettes
    }
}
