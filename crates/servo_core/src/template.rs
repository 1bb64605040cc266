//! Model templates
//!
//! A [`ModelTemplate`] is a serializable entity hierarchy. It can be saved to
//! and loaded from RON files and instantiated into a [`SceneGraph`].

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use servo_math::Mat4;

use crate::entity::SceneEntity;
use crate::mesh::Mesh;
use crate::scene_graph::{EntityKey, SceneGraph};

/// One node of a model template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Entity name
    pub name: String,
    /// Local matrix relative to the parent node
    #[serde(default)]
    pub matrix: Mat4,
    /// Optional vertex data
    #[serde(default)]
    pub mesh: Option<Mesh>,
    /// Placement of the mesh inside the node
    #[serde(default)]
    pub mesh_matrix: Mat4,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    /// Create a node with no mesh and no children
    pub fn new(name: impl Into<String>, matrix: Mat4) -> Self {
        Self {
            name: name.into(),
            matrix,
            mesh: None,
            mesh_matrix: Mat4::IDENTITY,
            children: Vec::new(),
        }
    }

    /// Builder: attach a mesh
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Builder: set the mesh placement
    pub fn with_mesh_matrix(mut self, mesh_matrix: Mat4) -> Self {
        self.mesh_matrix = mesh_matrix;
        self
    }

    /// Builder: append a child node
    pub fn with_child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree (including itself)
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeTemplate::node_count).sum::<usize>()
    }

    fn to_entity(&self) -> SceneEntity {
        let mut entity = SceneEntity::new(self.name.clone()).with_matrix(self.matrix);
        if let Some(mesh) = &self.mesh {
            entity = entity.with_mesh(Arc::new(mesh.clone()), self.mesh_matrix);
        }
        entity
    }
}

/// A serializable model: a named tree of nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTemplate {
    /// Model name (for display/debugging)
    pub name: String,
    /// Root node
    pub root: NodeTemplate,
}

impl ModelTemplate {
    /// Create a model from its root node
    pub fn new(name: impl Into<String>, root: NodeTemplate) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Load a model from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let contents = fs::read_to_string(path)?;
        let model = ron::from_str(&contents)?;
        Ok(model)
    }

    /// Save a model to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Number of nodes in the model
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Create entities for every node, under `parent` or as a new root
    ///
    /// Returns the key of the instantiated root, or `None` if `parent` is not
    /// in the graph.
    pub fn instantiate(&self, graph: &mut SceneGraph, parent: Option<EntityKey>) -> Option<EntityKey> {
        let root = match parent {
            Some(p) => graph.add_child(p, self.root.to_entity())?,
            None => graph.add_root(self.root.to_entity()),
        };

        let mut stack: Vec<(&NodeTemplate, EntityKey)> = vec![(&self.root, root)];
        while let Some((node, key)) = stack.pop() {
            for child in &node.children {
                if let Some(child_key) = graph.add_child(key, child.to_entity()) {
                    stack.push((child, child_key));
                }
            }
        }

        log::debug!("Instantiated model '{}' ({} nodes)", self.name, self.node_count());
        Some(root)
    }
}

/// Error loading a model
#[derive(Debug)]
pub enum ModelLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for ModelLoadError {
    fn from(e: io::Error) -> Self {
        ModelLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ModelLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        ModelLoadError::Parse(e)
    }
}

impl std::fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoadError::Io(e) => write!(f, "IO error: {}", e),
            ModelLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ModelLoadError {}

/// Error saving a model
#[derive(Debug)]
pub enum ModelSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for ModelSaveError {
    fn from(e: io::Error) -> Self {
        ModelSaveError::Io(e)
    }
}

impl From<ron::Error> for ModelSaveError {
    fn from(e: ron::Error) -> Self {
        ModelSaveError::Serialize(e)
    }
}

impl std::fmt::Display for ModelSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSaveError::Io(e) => write!(f, "IO error: {}", e),
            ModelSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ModelSaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use servo_math::Vec3;

    fn sample_model() -> ModelTemplate {
        let tire = NodeTemplate::new("tire", Mat4::from_translation(Vec3::new(1.0, 0.0, 0.5)))
            .with_mesh(Mesh::disc("tire", 0.4, 0.2, 8));
        let body = NodeTemplate::new("body", Mat4::IDENTITY)
            .with_mesh(Mesh::cuboid("body", Vec3::ZERO, Vec3::splat(0.5)))
            .with_child(tire);
        ModelTemplate::new("cart", NodeTemplate::new("cart", Mat4::IDENTITY).with_child(body))
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample_model().node_count(), 3);
    }

    #[test]
    fn test_instantiate_builds_hierarchy() {
        let model = sample_model();
        let mut graph = SceneGraph::new();
        let root = model.instantiate(&mut graph, None).unwrap();
        assert_eq!(graph.len(), 3);

        let tire = graph.find(root, "tire").unwrap();
        let entity = graph.get(tire).unwrap();
        assert_eq!(entity.mesh.as_ref().map(|m| m.vertex_count()), Some(16));
        assert_eq!(graph.get(graph.parent(tire).unwrap()).unwrap().name, "body");
    }

    #[test]
    fn test_instantiate_under_missing_parent() {
        let model = sample_model();
        let mut other = SceneGraph::new();
        let stale = other.add_root(SceneEntity::new("stale"));
        other.remove_subtree(stale);

        let mut graph = SceneGraph::new();
        assert!(model.instantiate(&mut graph, Some(stale)).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_model_serialization() {
        let model = sample_model();
        let pretty = ron::ser::PrettyConfig::new().struct_names(true);
        let text = ron::ser::to_string_pretty(&model, pretty).expect("serialize");
        let parsed: ModelTemplate = ron::from_str(&text).expect("parse");
        assert_eq!(parsed.node_count(), 3);
        assert_eq!(parsed.root.children[0].children[0].name, "tire");
    }

    #[test]
    fn test_parse_minimal_node() {
        let text = r#"ModelTemplate(name: "bare", root: NodeTemplate(name: "root"))"#;
        let model: ModelTemplate = ron::from_str(text).expect("parse");
        assert_eq!(model.root.matrix, Mat4::IDENTITY);
        assert!(model.root.mesh.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ModelTemplate::load("/nonexistent/path/model.ron");
        assert!(matches!(result, Err(ModelLoadError::Io(_))));
    }
}
