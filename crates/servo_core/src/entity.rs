//! Scene entities

use std::sync::Arc;

use servo_math::Mat4;

use crate::mesh::Mesh;
use crate::scene_graph::EntityKey;

/// A named node in the scene graph
///
/// `matrix` is relative to the parent entity. The mesh is shared between
/// clones of the same model.
#[derive(Clone, Debug)]
pub struct SceneEntity {
    /// Entity name, matched against part definitions
    pub name: String,
    /// Local matrix relative to the parent
    pub matrix: Mat4,
    /// Optional vertex data
    pub mesh: Option<Arc<Mesh>>,
    /// Placement of the mesh inside the entity
    pub mesh_matrix: Mat4,
    pub(crate) parent: Option<EntityKey>,
    pub(crate) children: Vec<EntityKey>,
}

impl SceneEntity {
    /// Create an entity with an identity matrix and no mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matrix: Mat4::IDENTITY,
            mesh: None,
            mesh_matrix: Mat4::IDENTITY,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder: set the local matrix
    pub fn with_matrix(mut self, matrix: Mat4) -> Self {
        self.matrix = matrix;
        self
    }

    /// Builder: attach a mesh
    pub fn with_mesh(mut self, mesh: Arc<Mesh>, mesh_matrix: Mat4) -> Self {
        self.mesh = Some(mesh);
        self.mesh_matrix = mesh_matrix;
        self
    }

    /// Parent entity, `None` for roots
    pub fn parent(&self) -> Option<EntityKey> {
        self.parent
    }

    /// Child entities in insertion order
    pub fn children(&self) -> &[EntityKey] {
        &self.children
    }
}
