//! Core scene types for servo_joints
//!
//! - [`Mesh`] - Vertex cloud used for shape fitting (no rendering data)
//! - [`SceneEntity`] - Named node with a local matrix and an optional mesh
//! - [`SceneGraph`] - Container of entity trees keyed by [`EntityKey`]
//! - [`ModelTemplate`] - Serializable entity hierarchy, loadable from RON

mod mesh;
mod entity;
mod scene_graph;
mod template;

pub use mesh::Mesh;
pub use entity::SceneEntity;
pub use scene_graph::{EntityKey, SceneGraph};
pub use template::{ModelLoadError, ModelSaveError, ModelTemplate, NodeTemplate};

// Re-export commonly used types from servo_math for convenience
pub use servo_math::{Aabb, Mat4, Vec3};
