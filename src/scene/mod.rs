//! Scene construction utilities
//!
//! This module provides a declarative API for building the forklift demo scene.

mod scene_builder;

pub use scene_builder::{DemoScene, DemoSceneBuilder};
