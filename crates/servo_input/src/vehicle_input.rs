//! Keyboard and slider input for the forklift
//!
//! Controls:
//! - D/A: Steer right/left
//! - W/S: Throttle forward/backward
//! - C: Toggle cockpit camera
//! - P: Switch to the next vehicle
//!
//! Lift, tilt and palette come from UI sliders with clamped ranges.

use servo_math::DEG_TO_RAD;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::buttons::{PushButton, TriggerButton};
use crate::record::InputRecord;

/// Inclusive value range of a UI slider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Lift slider range
pub const LIFT_RANGE: SliderRange = SliderRange::new(-0.5, 1.5);
/// Tilt slider range in degrees
pub const TILT_RANGE_DEGREES: SliderRange = SliderRange::new(-30.0, 30.0);
/// Palette slider range
pub const PALETTE_RANGE: SliderRange = SliderRange::new(-0.2, 0.6);

const HELP_LINES: &[&str] = &[
    "Vehicle driving keyboard control",
    "accelerator     : 'w'",
    "reverse         : 's'",
    "turn left       : 'a'",
    "turn right      : 'd'",
    "toggle camera   : 'c'",
    "next vehicle    : 'p'",
    "lift, tilt, palette: sliders",
];

/// Collects keyboard state and slider values into an [`InputRecord`]
#[derive(Debug, Default)]
pub struct VehicleInputController {
    steer_left: bool,
    steer_right: bool,
    throttle_forward: bool,
    throttle_reverse: bool,

    camera_button: PushButton,
    next_vehicle: TriggerButton,

    lift: f32,
    tilt_degrees: f32,
    palette: f32,
    sliders_changed: bool,
}

impl VehicleInputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process keyboard input; returns true if the key is handled here
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyD => { self.steer_right = pressed; true }
            KeyCode::KeyA => { self.steer_left = pressed; true }
            KeyCode::KeyW => { self.throttle_forward = pressed; true }
            KeyCode::KeyS => { self.throttle_reverse = pressed; true }
            KeyCode::KeyC => {
                let cockpit = self.camera_button.state();
                if self.camera_button.update(pressed) != cockpit {
                    log::debug!("Cockpit camera: {}", !cockpit);
                }
                true
            }
            KeyCode::KeyP => {
                self.next_vehicle.update(pressed);
                true
            }
            _ => false,
        }
    }

    /// Current lift slider value
    pub fn lift(&self) -> f32 {
        self.lift
    }

    /// Current tilt slider value in degrees
    pub fn tilt_degrees(&self) -> f32 {
        self.tilt_degrees
    }

    /// Current palette slider value
    pub fn palette(&self) -> f32 {
        self.palette
    }

    /// Move the lift slider (clamped to [`LIFT_RANGE`])
    pub fn set_lift(&mut self, value: f32) {
        let value = LIFT_RANGE.clamp(value);
        if value != self.lift {
            self.lift = value;
            self.sliders_changed = true;
        }
    }

    /// Move the tilt slider (clamped to [`TILT_RANGE_DEGREES`])
    pub fn set_tilt_degrees(&mut self, value: f32) {
        let value = TILT_RANGE_DEGREES.clamp(value);
        if value != self.tilt_degrees {
            self.tilt_degrees = value;
            self.sliders_changed = true;
        }
    }

    /// Move the palette slider (clamped to [`PALETTE_RANGE`])
    pub fn set_palette(&mut self, value: f32) {
        let value = PALETTE_RANGE.clamp(value);
        if value != self.palette {
            self.palette = value;
            self.sliders_changed = true;
        }
    }

    /// Check if any drive key is held
    pub fn is_driving(&self) -> bool {
        self.steer_left || self.steer_right || self.throttle_forward || self.throttle_reverse
    }

    /// Snapshot for this frame
    ///
    /// The palette slider opens the forks outward, so its value is negated.
    pub fn record(&self) -> InputRecord {
        InputRecord {
            steer: self.steer_right as i32 - self.steer_left as i32,
            throttle: self.throttle_forward as i32 - self.throttle_reverse as i32,
            lift: self.lift,
            tilt: self.tilt_degrees * DEG_TO_RAD,
            palette: -self.palette,
        }
    }

    /// Whether the vehicle should be woken up this frame
    ///
    /// True while a drive key is held or after a slider moved. Clears the
    /// slider flag.
    pub fn take_wake_request(&mut self) -> bool {
        let changed = self.sliders_changed;
        self.sliders_changed = false;
        changed || self.is_driving()
    }

    /// Whether the cockpit camera is selected
    pub fn cockpit_view(&self) -> bool {
        self.camera_button.state()
    }

    /// Consume a pending "next vehicle" press
    pub fn take_next_vehicle(&mut self) -> bool {
        self.next_vehicle.consume()
    }

    /// Key help text
    pub fn help_lines(&self) -> &'static [&'static str] {
        HELP_LINES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut VehicleInputController, key: KeyCode) {
        input.process_keyboard(key, ElementState::Pressed);
    }

    fn release(input: &mut VehicleInputController, key: KeyCode) {
        input.process_keyboard(key, ElementState::Released);
    }

    // ===== Keyboard Tests =====

    #[test]
    fn test_drive_keys_map_to_directions() {
        let mut input = VehicleInputController::new();
        press(&mut input, KeyCode::KeyD);
        press(&mut input, KeyCode::KeyW);
        let record = input.record();
        assert_eq!(record.steer, 1);
        assert_eq!(record.throttle, 1);

        release(&mut input, KeyCode::KeyD);
        press(&mut input, KeyCode::KeyA);
        release(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::KeyS);
        let record = input.record();
        assert_eq!(record.steer, -1);
        assert_eq!(record.throttle, -1);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = VehicleInputController::new();
        press(&mut input, KeyCode::KeyA);
        press(&mut input, KeyCode::KeyD);
        assert_eq!(input.record().steer, 0);
    }

    #[test]
    fn test_unhandled_key() {
        let mut input = VehicleInputController::new();
        assert!(!input.process_keyboard(KeyCode::KeyZ, ElementState::Pressed));
    }

    #[test]
    fn test_camera_toggle() {
        let mut input = VehicleInputController::new();
        assert!(!input.cockpit_view());
        press(&mut input, KeyCode::KeyC);
        press(&mut input, KeyCode::KeyC);
        assert!(input.cockpit_view());
        release(&mut input, KeyCode::KeyC);
        press(&mut input, KeyCode::KeyC);
        assert!(!input.cockpit_view());
    }

    #[test]
    fn test_next_vehicle_trigger() {
        let mut input = VehicleInputController::new();
        press(&mut input, KeyCode::KeyP);
        press(&mut input, KeyCode::KeyP);
        assert!(input.take_next_vehicle());
        assert!(!input.take_next_vehicle());
    }

    // ===== Slider Tests =====

    #[test]
    fn test_sliders_are_clamped() {
        let mut input = VehicleInputController::new();
        input.set_lift(5.0);
        input.set_tilt_degrees(-90.0);
        input.set_palette(-1.0);
        assert_eq!(input.lift(), 1.5);
        assert_eq!(input.tilt_degrees(), -30.0);
        assert_eq!(input.palette(), -0.2);
    }

    #[test]
    fn test_record_converts_slider_units() {
        let mut input = VehicleInputController::new();
        input.set_lift(1.0);
        input.set_tilt_degrees(30.0);
        input.set_palette(0.4);
        let record = input.record();
        assert_eq!(record.lift, 1.0);
        assert!((record.tilt - 30.0 * DEG_TO_RAD).abs() < 1e-6);
        assert_eq!(record.palette, -0.4);
    }

    #[test]
    fn test_wake_request() {
        let mut input = VehicleInputController::new();
        assert!(!input.take_wake_request());

        input.set_lift(0.5);
        assert!(input.take_wake_request());
        assert!(!input.take_wake_request());

        // Same value again is not a change
        input.set_lift(0.5);
        assert!(!input.take_wake_request());

        press(&mut input, KeyCode::KeyW);
        assert!(input.take_wake_request());
        assert!(input.take_wake_request());
    }

    #[test]
    fn test_help_lines() {
        let input = VehicleInputController::new();
        assert!(input.help_lines().iter().any(|l| l.contains("'w'")));
    }
}
