//! Input handling module
//!
//! Maps raw key events to app-level actions and replays scripted input for
//! the headless demo.

mod input_mapper;
mod script;

pub use input_mapper::{InputAction, InputMapper};
pub use script::{InputScript, ScriptAction, ScriptError, ScriptEvent, Slider};
