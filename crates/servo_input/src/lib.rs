//! Vehicle input handling
//!
//! This crate turns keyboard events and UI slider values into the normalized
//! [`InputRecord`] the vehicle controller consumes, and positions the follow
//! camera behind (or inside) the active vehicle.

mod buttons;
mod camera_rig;
mod record;
mod vehicle_input;

pub use buttons::{PushButton, TriggerButton};
pub use camera_rig::{CameraMode, CameraRig};
pub use record::InputRecord;
pub use vehicle_input::{SliderRange, VehicleInputController, LIFT_RANGE, PALETTE_RANGE, TILT_RANGE_DEGREES};
