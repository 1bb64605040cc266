//! Mesh vertex data
//!
//! Only vertex positions are kept: the physics side fits collision shapes
//! to them and nothing here is rendered.

use serde::{Serialize, Deserialize};
use servo_math::{Aabb, Vec3};

/// A named vertex cloud in the mesh's own space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh name (for logging)
    pub name: String,
    /// Vertex positions
    pub vertices: Vec<Vec3>,
}

impl Mesh {
    /// Create a mesh from its vertices
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }

    /// Eight corners of a box centered on `center`
    pub fn cuboid(name: impl Into<String>, center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents;
        let mut vertices = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    vertices.push(center + Vec3::new(h.x * sx, h.y * sy, h.z * sz));
                }
            }
        }
        Self::new(name, vertices)
    }

    /// Two rings of `segments` points forming a disc along the X axis
    pub fn disc(name: impl Into<String>, radius: f32, width: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity(segments * 2);
        for x in [-width * 0.5, width * 0.5] {
            for i in 0..segments {
                let a = std::f32::consts::TAU * i as f32 / segments as f32;
                let (s, c) = a.sin_cos();
                vertices.push(Vec3::new(x, radius * c, radius * s));
            }
        }
        Self::new(name, vertices)
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh has no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounding box of the raw vertices, `None` when empty
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_bounds() {
        let mesh = Mesh::cuboid("box", Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(mesh.vertex_count(), 8);
        let aabb = mesh.aabb().unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.5, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn test_disc_extent() {
        let mesh = Mesh::disc("tire", 0.5, 0.3, 16);
        assert_eq!(mesh.vertex_count(), 32);
        let aabb = mesh.aabb().unwrap();
        assert!((aabb.extent().x - 0.3).abs() < 1e-5);
        assert!((aabb.max.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = Mesh::new("empty", Vec::new());
        assert!(mesh.is_empty());
        assert!(mesh.aabb().is_none());
    }
}
