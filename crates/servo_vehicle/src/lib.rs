//! Articulated vehicle layer
//!
//! Builds a forklift from a part definition table and a scene model:
//!
//! - [`definition`] - Part definitions ([`FORKLIFT_PARTS`], RON tables)
//! - [`part_factory`] - Collision shape and rigid body per part
//! - [`joint_linker`] - Joint per articulation kind, differential gears
//! - [`skeleton`] - Bone tree built by walking the model hierarchy
//! - [`controller`] - Per-step joint targets from an [`InputRecord`]
//! - [`collision_policy`] - Category pair filter for the broad phase
//! - [`manager`] - Entry point owning every vehicle instance
//! - [`model`] - Procedural forklift model matching the built-in table

pub mod collision_policy;
pub mod controller;
pub mod definition;
pub mod error;
pub mod joint_linker;
pub mod manager;
pub mod model;
pub mod part_factory;
pub mod skeleton;
pub mod slots;

pub use collision_policy::{classify_pair, ForkliftContactFilter};
pub use controller::{ControlOutputs, ServoVehicle, VehicleConfig};
pub use definition::{ArticulationKind, PartDefinition, PartTable, ShapeKind, FORKLIFT_PARTS};
pub use error::VehicleError;
pub use manager::{VehicleHandle, VehicleManager};
pub use model::forklift_template;
pub use skeleton::{Bone, BoneHandle, Skeleton};
pub use slots::{JointSlots, VehicleJoints};

pub use servo_input::InputRecord;
