//! Servo joints demo
//!
//! Drives articulated forklifts through a headless fixed-step loop:
//!
//! - [`config`] - Layered TOML/env configuration
//! - [`input`] - App-level key actions and scripted input
//! - [`scene`] - Demo scene construction (terrain, lumber yards, forklifts)
//! - [`systems`] - Per-frame simulation

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
