//! Body-part factory
//!
//! Fits a collision shape to a part's mesh and creates the rigid body for it.

use servo_core::{EntityKey, Mesh, SceneEntity, SceneGraph};
use servo_math::{Aabb, Mat4, Vec3};
use servo_physics::{BodyKey, CollisionShape, ConvexHull, ForceCallback, PhysicsWorld, RigidBody};

use crate::definition::{PartDefinition, ShapeKind};
use crate::error::VehicleError;

/// Weld tolerance for part hulls
pub const HULL_TOLERANCE: f32 = 1.0e-3;

fn part_mesh<'a>(entity: &'a SceneEntity, def: &PartDefinition) -> Result<&'a Mesh, VehicleError> {
    let mesh = entity
        .mesh
        .as_deref()
        .ok_or_else(|| VehicleError::MissingMesh(def.bone_name.to_string()))?;
    if mesh.is_empty() {
        return Err(VehicleError::EmptyMesh(def.bone_name.to_string()));
    }
    Ok(mesh)
}

/// Chamfer cylinder fitted to the wheel mesh in part space
///
/// The width runs along X and the radius is taken from the highest vertex,
/// less half the width (the chamfer). Extents start at zero, so the part
/// origin always lies inside the measured range.
pub fn tire_shape(mesh: &Mesh, mesh_matrix: &Mat4) -> CollisionShape {
    let mut radius = 0.0f32;
    let mut max_width = 0.0f32;
    let mut min_width = 0.0f32;
    for v in &mesh.vertices {
        let p = mesh_matrix.transform_vector(*v);
        max_width = max_width.max(p.x);
        min_width = min_width.min(p.x);
        radius = radius.max(p.y);
    }
    let width = max_width - min_width;
    radius -= width * 0.5;
    CollisionShape::ChamferCylinder { radius, width }
}

/// Convex hull of the mesh vertices moved into part space
pub fn hull_shape(mesh: &Mesh, mesh_matrix: &Mat4, bone: &str) -> Result<CollisionShape, VehicleError> {
    let count = mesh.vertex_count();
    if count >= ConvexHull::MAX_POINTS {
        return Err(VehicleError::TooManyVertices {
            bone: bone.to_string(),
            count,
            max: ConvexHull::MAX_POINTS,
        });
    }
    let points: Vec<Vec3> = mesh
        .vertices
        .iter()
        .map(|v| mesh_matrix.transform_vector(*v))
        .collect();
    Ok(CollisionShape::ConvexHull(ConvexHull::new(&points, HULL_TOLERANCE)?))
}

/// Thin box near the bottom of the raw mesh bounds (fork tine contact)
pub fn palette_shape(bounds: Aabb) -> CollisionShape {
    let mut origin = bounds.center();
    let mut size = bounds.extent();
    origin.y -= size.y * 0.43;
    size.y *= 0.125;
    CollisionShape::Box {
        size,
        offset: Mat4::from_translation(origin),
    }
}

/// Fit the collision shape selected by the definition's shape kind
pub fn build_shape(entity: &SceneEntity, def: &PartDefinition) -> Result<CollisionShape, VehicleError> {
    let mesh = part_mesh(entity, def)?;
    match def.shape_kind {
        ShapeKind::TireShape => Ok(tire_shape(mesh, &entity.mesh_matrix)),
        ShapeKind::ConvexHull => hull_shape(mesh, &entity.mesh_matrix, &def.bone_name),
        ShapeKind::ConvexHullAggregate => {
            let bounds = mesh
                .aabb()
                .ok_or_else(|| VehicleError::EmptyMesh(def.bone_name.to_string()))?;
            Ok(palette_shape(bounds))
        }
    }
}

/// Create the rigid body for one part at the entity's global matrix
///
/// Mass properties come from the fitted shape, the category from the
/// definition, and the body falls under gravity.
pub fn create_body_part(
    world: &mut PhysicsWorld,
    graph: &SceneGraph,
    entity_key: EntityKey,
    def: &PartDefinition,
) -> Result<BodyKey, VehicleError> {
    let entity = graph
        .get(entity_key)
        .ok_or_else(|| VehicleError::MissingPart(def.bone_name.to_string()))?;
    let shape = build_shape(entity, def)?;
    let matrix = graph
        .global_matrix(entity_key)
        .ok_or_else(|| VehicleError::MissingPart(def.bone_name.to_string()))?;

    log::debug!(
        "Body part '{}': {} shape, mass {}",
        def.bone_name,
        shape.kind_name(),
        def.mass
    );
    let body = RigidBody::new(shape, matrix)
        .with_mass(def.mass)
        .with_category(def.category)
        .with_force_callback(ForceCallback::Gravity);
    Ok(world.add_body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ArticulationKind;
    use servo_physics::CollisionCategory;
    use std::sync::Arc;

    fn def(shape_kind: ShapeKind) -> PartDefinition {
        PartDefinition::new("part", shape_kind, 10.0, CollisionCategory::BODY_PART, ArticulationKind::LiftActuator)
    }

    // ===== Shape Tests =====

    #[test]
    fn test_tire_shape_from_disc() {
        // Disc of radius 0.5 and width 0.2 centered on the part origin
        let mesh = Mesh::disc("tire", 0.5, 0.2, 32);
        match tire_shape(&mesh, &Mat4::IDENTITY) {
            CollisionShape::ChamferCylinder { radius, width } => {
                assert!((width - 0.2).abs() < 1e-5);
                assert!((radius - 0.4).abs() < 1e-5);
            }
            other => panic!("Expected chamfer cylinder, got {:?}", other),
        }
    }

    #[test]
    fn test_tire_extents_start_at_zero() {
        // Every vertex on +X: min width stays at the origin
        let mesh = Mesh::new(
            "offset",
            vec![Vec3::new(1.0, 0.5, 0.0), Vec3::new(1.5, -0.5, 0.0)],
        );
        match tire_shape(&mesh, &Mat4::IDENTITY) {
            CollisionShape::ChamferCylinder { radius, width } => {
                assert!((width - 1.5).abs() < 1e-5);
                assert!((radius + 0.25).abs() < 1e-5);
            }
            other => panic!("Expected chamfer cylinder, got {:?}", other),
        }
    }

    #[test]
    fn test_hull_matches_transformed_vertices() {
        let mesh = Mesh::cuboid("box", Vec3::ZERO, Vec3::new(1.0, 0.5, 0.25));
        let mesh_matrix = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let shape = hull_shape(&mesh, &mesh_matrix, "box").unwrap();
        let CollisionShape::ConvexHull(hull) = shape else {
            panic!("Expected convex hull");
        };
        let expected: Vec<Vec3> = mesh
            .vertices
            .iter()
            .map(|v| mesh_matrix.transform_vector(*v))
            .collect();
        assert_eq!(hull.points(), expected.as_slice());
        assert_eq!(hull.tolerance(), HULL_TOLERANCE);
    }

    #[test]
    fn test_hull_vertex_capacity() {
        let mesh = Mesh::new("big", vec![Vec3::ZERO; ConvexHull::MAX_POINTS]);
        assert!(matches!(
            hull_shape(&mesh, &Mat4::IDENTITY, "big"),
            Err(VehicleError::TooManyVertices { count: 16384, .. })
        ));
    }

    #[test]
    fn test_palette_shape() {
        let bounds = Aabb::new(Vec3::new(-1.0, 0.0, -0.1), Vec3::new(1.0, 1.0, 0.1));
        match palette_shape(bounds) {
            CollisionShape::Box { size, offset } => {
                assert!(size.approx_eq(Vec3::new(2.0, 0.125, 0.2), 1e-5));
                assert!(offset.posit.approx_eq(Vec3::new(0.0, 0.07, 0.0), 1e-5));
            }
            other => panic!("Expected box, got {:?}", other),
        }
    }

    #[test]
    fn test_palette_ignores_mesh_matrix() {
        let entity = SceneEntity::new("teeth").with_mesh(
            Arc::new(Mesh::cuboid("teeth", Vec3::ZERO, Vec3::splat(1.0))),
            Mat4::from_translation(Vec3::new(100.0, 0.0, 0.0)),
        );
        match build_shape(&entity, &def(ShapeKind::ConvexHullAggregate)).unwrap() {
            CollisionShape::Box { offset, .. } => assert_eq!(offset.posit.x, 0.0),
            other => panic!("Expected box, got {:?}", other),
        }
    }

    // ===== Error Tests =====

    #[test]
    fn test_missing_and_empty_mesh() {
        let bare = SceneEntity::new("part");
        assert!(matches!(
            build_shape(&bare, &def(ShapeKind::ConvexHull)),
            Err(VehicleError::MissingMesh(_))
        ));

        let empty = SceneEntity::new("part").with_mesh(Arc::new(Mesh::new("e", Vec::new())), Mat4::IDENTITY);
        assert!(matches!(
            build_shape(&empty, &def(ShapeKind::TireShape)),
            Err(VehicleError::EmptyMesh(_))
        ));
    }

    // ===== Body Tests =====

    #[test]
    fn test_create_body_part() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(
            SceneEntity::new("root").with_matrix(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        );
        let part = graph
            .add_child(
                root,
                SceneEntity::new("part")
                    .with_matrix(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)))
                    .with_mesh(Arc::new(Mesh::cuboid("part", Vec3::ZERO, Vec3::splat(0.5))), Mat4::IDENTITY),
            )
            .unwrap();

        let mut world = PhysicsWorld::new();
        let body = create_body_part(&mut world, &graph, part, &def(ShapeKind::ConvexHull)).unwrap();
        let body = world.body(body).unwrap();
        assert!(body.matrix.posit.approx_eq(Vec3::new(2.0, 1.0, 0.0), 1e-5));
        assert_eq!(body.mass, 10.0);
        assert_eq!(body.category, CollisionCategory::BODY_PART);
        assert_eq!(body.force_callback, ForceCallback::Gravity);
    }
}
