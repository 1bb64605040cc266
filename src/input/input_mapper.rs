//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to app-level actions like Exit and ShowHelp.
//! Driving keys (WASD, C, P) are NOT mapped here - they go directly to the
//! VehicleInputController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by app-level keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Stop the demo (Escape)
    Exit,
    /// Print the key help (F1)
    ShowHelp,
}

/// Maps raw key events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for app-level keys, `None` for driving keys
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::F1 => Some(InputAction::ShowHelp),
            _ => None,
        }
    }
}
