//! Joint linker
//!
//! Creates the joint connecting a freshly built part to its parent bone and
//! records it in the vehicle's joint slots.

use servo_math::{sign, Mat4, DEG_TO_RAD};
use servo_physics::{
    BodyKey, DifferentialGear, HingeActuator, JointKey, JointKind, PhysicsWorld, SliderActuator, Wheel,
};

use crate::definition::{ArticulationKind, PartDefinition};
use crate::error::VehicleError;
use crate::slots::JointSlots;

/// Fork hinge travel (radians)
pub const FORK_ANGLE_LIMIT: f32 = 20.0 * DEG_TO_RAD;
/// Fork hinge speed (radians per second)
pub const FORK_ANGULAR_RATE: f32 = 15.0 * DEG_TO_RAD;
/// Lift and palette slider travel
pub const SLIDER_MIN_POSIT: f32 = -2.0;
pub const SLIDER_MAX_POSIT: f32 = 2.5;
/// Lift and palette slider speed
pub const SLIDER_LINEAR_RATE: f32 = 0.20;
/// Wheel steering speed (radians per second)
pub const TIRE_STEER_RATE: f32 = 60.0 * DEG_TO_RAD;
/// Gear ratio between engine and front tires
pub const DIFFERENTIAL_GEAR_RATIO: f32 = 5.0;

/// Fork tilt hinge pinned at the child's current frame
pub fn link_hinge_actuator(
    world: &mut PhysicsWorld,
    parent: BodyKey,
    child: BodyKey,
) -> Result<JointKey, VehicleError> {
    let base = world.body_matrix(child)?;
    let hinge = HingeActuator::new(FORK_ANGULAR_RATE, -FORK_ANGLE_LIMIT, FORK_ANGLE_LIMIT);
    Ok(world.add_joint(&base, child, Some(parent), JointKind::HingeActuator(hinge))?)
}

/// Lift or palette slider pinned at the child's current frame
pub fn link_slider_actuator(
    world: &mut PhysicsWorld,
    parent: BodyKey,
    child: BodyKey,
) -> Result<JointKey, VehicleError> {
    let base = world.body_matrix(child)?;
    let slider = SliderActuator::new(SLIDER_LINEAR_RATE, SLIDER_MIN_POSIT, SLIDER_MAX_POSIT);
    Ok(world.add_joint(&base, child, Some(parent), JointKind::SliderActuator(slider))?)
}

/// Steerable wheel between chassis and tire
///
/// The pin frame is the chassis frame turned so its front axis is the
/// chassis' vertical (steering) axis and its up axis the lateral (spin)
/// axis, placed at the tire's origin.
pub fn link_tire(world: &mut PhysicsWorld, chassis: BodyKey, tire: BodyKey) -> Result<JointKey, VehicleError> {
    let tire_matrix = world.body_matrix(tire)?;
    let chassis_matrix = world.body_matrix(chassis)?;

    let frame = (Mat4::pitch(90.0 * DEG_TO_RAD) * Mat4::roll(90.0 * DEG_TO_RAD) * chassis_matrix)
        .with_posit(tire_matrix.posit);

    let mut wheel = Wheel::new();
    wheel.set_steer_rate(TIRE_STEER_RATE);
    wheel.enable_limits(true);
    wheel.set_limits(0.0, 0.0);
    Ok(world.add_joint(&frame, tire, Some(chassis), JointKind::Wheel(wheel))?)
}

/// Which way the engine must turn to drive a tire forward
///
/// `+1` when the tire hinge lies on the positive side of the engine frame's
/// up axis, `-1` on the negative side. A tire exactly on the plane counts
/// as positive.
pub fn differential_sign(engine_frame: &Mat4, tire_hinge: &Mat4) -> f32 {
    sign(engine_frame.up.dot(tire_hinge.posit - engine_frame.posit))
}

/// Front wheel plus a differential gear tying its spin to the engine
///
/// Returns `(wheel, differential)`.
pub fn link_front_tire(
    world: &mut PhysicsWorld,
    engine_joint: JointKey,
    chassis: BodyKey,
    tire: BodyKey,
    bone: &str,
) -> Result<(JointKey, JointKey), VehicleError> {
    let (engine, engine_parent) = {
        let joint = world.joint(engine_joint)?;
        (joint.child, joint.parent)
    };
    if engine_parent != Some(chassis) {
        return Err(VehicleError::DifferentialParentMismatch(bone.to_string()));
    }

    let wheel = link_tire(world, chassis, tire)?;

    let tire_matrix = world.body_matrix(tire)?;
    let tire_hinge = world.joint(wheel)?.local0 * tire_matrix;
    let (engine_frame, chassis_frame) = world.joint_global_frames(engine_joint)?;

    let sign = differential_sign(&engine_frame, &tire_hinge);
    let gear = DifferentialGear::new(
        DIFFERENTIAL_GEAR_RATIO,
        -tire_hinge.up,
        engine_frame.front * sign,
        chassis_frame.up,
        chassis,
    );
    log::debug!("Front tire '{}' geared to engine with sign {}", bone, sign);
    let differential = world.add_joint(&tire_hinge, tire, Some(engine), JointKind::DifferentialGear(gear))?;
    Ok((wheel, differential))
}

/// Create the joint for `def` and store it in its slot
///
/// Returns the joint connecting the child to its parent bone.
pub fn connect_body_part(
    world: &mut PhysicsWorld,
    slots: &mut JointSlots,
    parent: BodyKey,
    child: BodyKey,
    def: &PartDefinition,
) -> Result<JointKey, VehicleError> {
    match def.articulation {
        ArticulationKind::Root => Err(VehicleError::RootArticulationOnChild(def.bone_name.to_string())),
        ArticulationKind::FrontTire => {
            let engine_joint = slots.engine_joint().ok_or(VehicleError::MissingJoint("engine"))?;
            let (wheel, differential) = link_front_tire(world, engine_joint, parent, child, &def.bone_name)?;
            slots.add_front_tire(wheel, differential)?;
            Ok(wheel)
        }
        ArticulationKind::RearTire => {
            let wheel = link_tire(world, parent, child)?;
            slots.add_rear_tire(wheel)?;
            Ok(wheel)
        }
        ArticulationKind::HingeActuator => {
            let hinge = link_hinge_actuator(world, parent, child)?;
            slots.set_fork_base(hinge)?;
            Ok(hinge)
        }
        ArticulationKind::LiftActuator => {
            let lift = link_slider_actuator(world, parent, child)?;
            slots.add_lift(lift)?;
            Ok(lift)
        }
        ArticulationKind::PaletteActuator => {
            let palette = link_slider_actuator(world, parent, child)?;
            slots.add_palette(palette)?;
            Ok(palette)
        }
    }
}
