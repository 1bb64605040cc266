//! Physics contract for servo_joints
//!
//! This crate provides the rigid-body engine services the vehicle layer is
//! written against:
//! - Collision shapes (convex hulls, boxes, cylinders, chamfer cylinders)
//! - Rigid bodies with mass properties, category tags and force callbacks
//! - Joints (hinge/slider actuators, wheels, double hinges, motors, differential gears)
//! - A broad phase that asks a registered [`ContactFilter`] about each overlapping pair
//!
//! The world advances joint coordinates toward their targets each step. It
//! does not integrate body motion or resolve contacts.

pub mod body;
pub mod collision;
pub mod error;
pub mod joint;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, ForceCallback, RigidBody};
pub use collision::{CollisionCategory, ContactFilter, FilterError, PairDecision, ProcessAll};
pub use error::PhysicsError;
pub use joint::{
    DifferentialGear, DoubleHinge, HingeActuator, Joint, JointKey, JointKind, Motor, SliderActuator, Wheel,
};
pub use shapes::{CollisionShape, ConvexHull, ShapeError};
pub use world::{PhysicsConfig, PhysicsWorld, StepReport};
