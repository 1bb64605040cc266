//! Collision shape types

use std::collections::HashSet;

use servo_math::{Aabb, Mat4, Vec3};

/// Error building a collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A convex hull was requested from zero points
    EmptyPointCloud,
    /// A convex hull was requested from more points than the builder accepts
    TooManyPoints { count: usize, max: usize },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::EmptyPointCloud => write!(f, "Convex hull needs at least one point"),
            ShapeError::TooManyPoints { count, max } => {
                write!(f, "Convex hull has {} points (limit is below {})", count, max)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Point cloud handed to the engine's hull builder
///
/// Points closer than the weld tolerance (sharing a tolerance-sized grid
/// cell) are merged, keeping the first one seen.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexHull {
    points: Vec<Vec3>,
    tolerance: f32,
}

impl ConvexHull {
    /// Point capacity of the hull builder; clouds must stay strictly below it
    pub const MAX_POINTS: usize = 16 * 1024;

    /// Build a hull from a point cloud
    pub fn new(points: &[Vec3], tolerance: f32) -> Result<Self, ShapeError> {
        if points.is_empty() {
            return Err(ShapeError::EmptyPointCloud);
        }
        if points.len() >= Self::MAX_POINTS {
            return Err(ShapeError::TooManyPoints {
                count: points.len(),
                max: Self::MAX_POINTS,
            });
        }

        let cell = if tolerance > 0.0 { tolerance } else { f32::EPSILON };
        let mut seen = HashSet::with_capacity(points.len());
        let mut welded = Vec::with_capacity(points.len());
        for p in points {
            let key = (
                (p.x / cell).round() as i64,
                (p.y / cell).round() as i64,
                (p.z / cell).round() as i64,
            );
            if seen.insert(key) {
                welded.push(*p);
            }
        }

        Ok(Self {
            points: welded,
            tolerance,
        })
    }

    /// Welded hull points in the body's local frame
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Weld tolerance the hull was built with
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }
}

/// Collision shape attached to a rigid body (expressed in body space)
#[derive(Clone, Debug, PartialEq)]
pub enum CollisionShape {
    /// Convex hull around a point cloud
    ConvexHull(ConvexHull),
    /// Box with full `size`, placed by `offset`
    Box { size: Vec3, offset: Mat4 },
    /// Cylinder along the local X axis
    Cylinder { radius0: f32, radius1: f32, height: f32 },
    /// Disc with rounded rim along the local X axis
    ChamferCylinder { radius: f32, width: f32 },
}

impl CollisionShape {
    /// Bounding box in body space
    pub fn local_aabb(&self) -> Aabb {
        match self {
            CollisionShape::ConvexHull(hull) => {
                // Hulls are never empty (checked in ConvexHull::new)
                Aabb::from_points(hull.points()).unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO))
            }
            CollisionShape::Box { size, offset } => {
                Aabb::from_center_half_extents(Vec3::ZERO, *size * 0.5).transformed(offset)
            }
            CollisionShape::Cylinder { radius0, radius1, height } => {
                let r = radius0.max(*radius1);
                Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(height * 0.5, r, r))
            }
            CollisionShape::ChamferCylinder { radius, width } => {
                let half = width * 0.5;
                let r = radius + half;
                Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(half, r, r))
            }
        }
    }

    /// Geometric center in body space (used as the default center of mass)
    pub fn centroid(&self) -> Vec3 {
        match self {
            CollisionShape::ConvexHull(hull) => {
                let sum = hull
                    .points()
                    .iter()
                    .fold(Vec3::ZERO, |acc, p| acc + *p);
                sum / hull.points().len() as f32
            }
            CollisionShape::Box { offset, .. } => offset.posit,
            CollisionShape::Cylinder { .. } | CollisionShape::ChamferCylinder { .. } => Vec3::ZERO,
        }
    }

    /// Principal inertia for `mass`, approximated by the solid box of the bounds
    pub fn inertia(&self, mass: f32) -> Vec3 {
        let e = self.local_aabb().extent();
        let k = mass / 12.0;
        Vec3::new(
            k * (e.y * e.y + e.z * e.z),
            k * (e.x * e.x + e.z * e.z),
            k * (e.x * e.x + e.y * e.y),
        )
    }

    /// Short name for logging
    pub fn kind_name(&self) -> &'static str {
        match self {
            CollisionShape::ConvexHull(_) => "convex hull",
            CollisionShape::Box { .. } => "box",
            CollisionShape::Cylinder { .. } => "cylinder",
            CollisionShape::ChamferCylinder { .. } => "chamfer cylinder",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_keeps_distinct_points() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let hull = ConvexHull::new(&points, 1.0e-3).expect("valid hull");
        assert_eq!(hull.points(), &points);
    }

    #[test]
    fn test_hull_welds_duplicates() {
        let points = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.00001, 1.0, 1.0),
            Vec3::new(2.0, 1.0, 1.0),
        ];
        let hull = ConvexHull::new(&points, 1.0e-3).expect("valid hull");
        assert_eq!(hull.points().len(), 2);
    }

    #[test]
    fn test_hull_rejects_empty() {
        assert_eq!(ConvexHull::new(&[], 1.0e-3), Err(ShapeError::EmptyPointCloud));
    }

    #[test]
    fn test_hull_rejects_capacity() {
        let points = vec![Vec3::ZERO; ConvexHull::MAX_POINTS];
        match ConvexHull::new(&points, 1.0e-3) {
            Err(ShapeError::TooManyPoints { count, max }) => {
                assert_eq!(count, ConvexHull::MAX_POINTS);
                assert_eq!(max, ConvexHull::MAX_POINTS);
            }
            other => panic!("Expected TooManyPoints, got {:?}", other),
        }
    }

    #[test]
    fn test_box_aabb_follows_offset() {
        let shape = CollisionShape::Box {
            size: Vec3::new(2.0, 1.0, 4.0),
            offset: Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        };
        let aabb = shape.local_aabb();
        assert!(aabb.min.approx_eq(Vec3::new(-1.0, -1.5, -2.0), 1e-5));
        assert!(aabb.max.approx_eq(Vec3::new(1.0, -0.5, 2.0), 1e-5));
        assert_eq!(shape.centroid(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_chamfer_cylinder_aabb() {
        let shape = CollisionShape::ChamferCylinder { radius: 0.3, width: 0.2 };
        let aabb = shape.local_aabb();
        assert!(aabb.max.approx_eq(Vec3::new(0.1, 0.4, 0.4), 1e-5));
    }

    #[test]
    fn test_inertia_of_unit_cube() {
        let shape = CollisionShape::Box {
            size: Vec3::splat(1.0),
            offset: Mat4::IDENTITY,
        };
        let inertia = shape.inertia(12.0);
        assert!(inertia.approx_eq(Vec3::splat(2.0), 1e-5));
    }
}
