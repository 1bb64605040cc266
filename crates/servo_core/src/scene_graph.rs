//! Scene graph container
//!
//! Entities form trees. Each entity stores a matrix relative to its parent;
//! global matrices are composed on demand by walking up the parent chain.

use servo_math::Mat4;
use slotmap::{new_key_type, SlotMap};

use crate::entity::SceneEntity;

new_key_type! {
    /// Generational key to an entity in the scene graph
    pub struct EntityKey;
}

/// Container of entity trees
#[derive(Default)]
pub struct SceneGraph {
    entities: SlotMap<EntityKey, SceneEntity>,
    roots: Vec<EntityKey>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level entity
    pub fn add_root(&mut self, mut entity: SceneEntity) -> EntityKey {
        entity.parent = None;
        entity.children.clear();
        let key = self.entities.insert(entity);
        self.roots.push(key);
        key
    }

    /// Add an entity under `parent`, or `None` if the parent does not exist
    pub fn add_child(&mut self, parent: EntityKey, mut entity: SceneEntity) -> Option<EntityKey> {
        if !self.entities.contains_key(parent) {
            return None;
        }
        entity.parent = Some(parent);
        entity.children.clear();
        let key = self.entities.insert(entity);
        self.entities[parent].children.push(key);
        Some(key)
    }

    /// Remove an entity and all of its descendants
    pub fn remove_subtree(&mut self, key: EntityKey) -> usize {
        let Some(entity) = self.entities.get(key) else {
            return 0;
        };
        match entity.parent {
            Some(parent) => {
                if let Some(p) = self.entities.get_mut(parent) {
                    p.children.retain(|c| *c != key);
                }
            }
            None => self.roots.retain(|r| *r != key),
        }

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(e) = self.entities.remove(k) {
                stack.extend(e.children);
                removed += 1;
            }
        }
        removed
    }

    /// Get a reference to an entity
    pub fn get(&self, key: EntityKey) -> Option<&SceneEntity> {
        self.entities.get(key)
    }

    /// Get a mutable reference to an entity
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut SceneEntity> {
        self.entities.get_mut(key)
    }

    /// Number of entities in the graph
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Top-level entities
    pub fn roots(&self) -> &[EntityKey] {
        &self.roots
    }

    /// Parent of an entity
    pub fn parent(&self, key: EntityKey) -> Option<EntityKey> {
        self.entities.get(key)?.parent
    }

    /// Children of an entity (empty for unknown keys)
    pub fn children(&self, key: EntityKey) -> &[EntityKey] {
        self.entities
            .get(key)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Depth-first search for `name` in `root` and its descendants
    pub fn find(&self, root: EntityKey, name: &str) -> Option<EntityKey> {
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            let entity = self.entities.get(key)?;
            if entity.name == name {
                return Some(key);
            }
            stack.extend(entity.children.iter().rev());
        }
        None
    }

    /// Local matrix of an entity
    pub fn local_matrix(&self, key: EntityKey) -> Option<Mat4> {
        self.entities.get(key).map(|e| e.matrix)
    }

    /// Replace the local matrix of an entity; returns false for unknown keys
    pub fn set_local_matrix(&mut self, key: EntityKey, matrix: Mat4) -> bool {
        match self.entities.get_mut(key) {
            Some(entity) => {
                entity.matrix = matrix;
                true
            }
            None => false,
        }
    }

    /// Global matrix of an entity
    pub fn global_matrix(&self, key: EntityKey) -> Option<Mat4> {
        self.global_matrix_relative_to(key, None)
    }

    /// Matrix of `key` relative to `ancestor`
    ///
    /// Composes local matrices from `key` upward, stopping before `ancestor`.
    /// If `ancestor` is `None` or not on the parent chain the full global
    /// matrix is returned. An entity relative to itself is the identity.
    pub fn global_matrix_relative_to(
        &self,
        key: EntityKey,
        ancestor: Option<EntityKey>,
    ) -> Option<Mat4> {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(key);
        while let Some(k) = current {
            if Some(k) == ancestor {
                break;
            }
            let entity = self.entities.get(k)?;
            matrix = matrix * entity.matrix;
            current = entity.parent;
        }
        Some(matrix)
    }

    /// Deep-copy the subtree at `source`, attaching the copy under `parent`
    /// (or as a new root). Meshes are shared with the original.
    pub fn clone_subtree(&mut self, source: EntityKey, parent: Option<EntityKey>) -> Option<EntityKey> {
        let root_copy = self.entities.get(source)?.clone();
        let new_root = match parent {
            Some(p) => self.add_child(p, root_copy)?,
            None => self.add_root(root_copy),
        };

        let mut stack = vec![(source, new_root)];
        while let Some((src, dst)) = stack.pop() {
            let children = self.children(src).to_vec();
            for child in children {
                if let Some(copy) = self.entities.get(child).cloned() {
                    if let Some(new_child) = self.add_child(dst, copy) {
                        stack.push((child, new_child));
                    }
                }
            }
        }
        log::debug!("Cloned subtree {:?} as {:?}", source, new_root);
        Some(new_root)
    }

    /// All descendants of `root` (excluding `root`) in depth-first order
    pub fn descendants(&self, root: EntityKey) -> Vec<EntityKey> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityKey> = self.children(root).iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.children(key).iter().rev());
        }
        out
    }
}
