//! Per-frame control snapshot

/// Normalized control values for one frame
///
/// Produced by the input layer and consumed once per step by the vehicle
/// controller. Overwritten every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputRecord {
    /// Steering direction: -1, 0 or 1
    pub steer: i32,
    /// Throttle direction: -1, 0 or 1
    pub throttle: i32,
    /// Lift actuator target (length units)
    pub lift: f32,
    /// Fork tilt target (radians)
    pub tilt: f32,
    /// Palette actuator target (length units)
    pub palette: f32,
}

impl InputRecord {
    /// Neutral record: no steering, no throttle, actuators at zero
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Builder: set steering direction (clamped to -1..=1)
    pub fn with_steer(mut self, steer: i32) -> Self {
        self.steer = steer.clamp(-1, 1);
        self
    }

    /// Builder: set throttle direction (clamped to -1..=1)
    pub fn with_throttle(mut self, throttle: i32) -> Self {
        self.throttle = throttle.clamp(-1, 1);
        self
    }

    /// Builder: set lift target
    pub fn with_lift(mut self, lift: f32) -> Self {
        self.lift = lift;
        self
    }

    /// Builder: set tilt target in radians
    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    /// Builder: set palette target
    pub fn with_palette(mut self, palette: f32) -> Self {
        self.palette = palette;
        self
    }
}
