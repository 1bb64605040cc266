//! Procedural forklift model
//!
//! Builds a [`ModelTemplate`] whose entity names match [`FORKLIFT_PARTS`],
//! for scenes that do not load a model file. The forks point along +X and
//! the chassis' right axis is +Z.
//!
//! [`FORKLIFT_PARTS`]: crate::definition::FORKLIFT_PARTS

use servo_core::{Mesh, ModelTemplate, NodeTemplate};
use servo_math::{Mat4, Vec3};

/// Wheel radius of the procedural model
pub const TIRE_RADIUS: f32 = 0.35;
/// Wheel width of the procedural model
pub const TIRE_WIDTH: f32 = 0.2;

const TIRE_SEGMENTS: usize = 24;

/// Wheel node: the disc axis (node X) is turned onto the chassis' Z axis
fn tire(name: &str, posit: Vec3) -> NodeTemplate {
    let matrix = Mat4::from_axes(Vec3::Z, Vec3::Y, -Vec3::X, posit);
    NodeTemplate::new(name, matrix).with_mesh(Mesh::disc(name, TIRE_RADIUS, TIRE_WIDTH, TIRE_SEGMENTS))
}

/// Mast stage: a tall plate standing on the node origin
fn lift_stage(name: &str, posit: Vec3, height: f32, half_width: f32) -> NodeTemplate {
    NodeTemplate::new(name, Mat4::from_translation(posit)).with_mesh(Mesh::cuboid(
        name,
        Vec3::new(0.0, height * 0.5, 0.0),
        Vec3::new(0.04, height * 0.5, half_width),
    ))
}

/// Fork tine: vertical back plate plus the flat blade reaching forward
fn teeth(name: &str, z: f32) -> NodeTemplate {
    let mut mesh = Mesh::cuboid(name, Vec3::new(0.05, 0.4, 0.0), Vec3::new(0.03, 0.4, 0.05));
    mesh.vertices
        .extend(Mesh::cuboid(name, Vec3::new(0.5, 0.03, 0.0), Vec3::new(0.5, 0.03, 0.05)).vertices);
    NodeTemplate::new(name, Mat4::from_translation(Vec3::new(0.06, 0.0, z))).with_mesh(mesh)
}

/// The forklift hierarchy
///
/// `fork_mount` and `cabin` are scenery nodes with no part definition: the
/// mast hangs from the chassis through `fork_mount`.
pub fn forklift_template() -> ModelTemplate {
    let body = NodeTemplate::new("body", Mat4::IDENTITY)
        .with_mesh(Mesh::cuboid("body", Vec3::new(0.0, 0.45, 0.0), Vec3::new(1.0, 0.4, 0.6)))
        .with_child(tire("fr_tire", Vec3::new(0.7, 0.0, 0.7)))
        .with_child(tire("fl_tire", Vec3::new(0.7, 0.0, -0.7)))
        .with_child(tire("rr_tire", Vec3::new(-0.7, 0.0, 0.7)))
        .with_child(tire("rl_tire", Vec3::new(-0.7, 0.0, -0.7)))
        .with_child(
            NodeTemplate::new("cabin", Mat4::from_translation(Vec3::new(-0.3, 0.85, 0.0)))
                .with_mesh(Mesh::cuboid("cabin", Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.5, 0.5, 0.55))),
        )
        .with_child(
            NodeTemplate::new("fork_mount", Mat4::from_translation(Vec3::new(1.05, 0.1, 0.0))).with_child(
                lift_stage("lift_1", Vec3::ZERO, 2.0, 0.45).with_child(
                    lift_stage("lift_2", Vec3::new(0.09, 0.05, 0.0), 1.9, 0.4).with_child(
                        lift_stage("lift_3", Vec3::new(0.09, 0.05, 0.0), 1.8, 0.35).with_child(
                            lift_stage("lift_4", Vec3::new(0.09, 0.05, 0.0), 0.6, 0.4)
                                .with_child(teeth("left_teeth", -0.25))
                                .with_child(teeth("right_teeth", 0.25)),
                        ),
                    ),
                ),
            ),
        );

    ModelTemplate::new("forklift", NodeTemplate::new("forklift", Mat4::IDENTITY).with_child(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::PartTable;
    use servo_core::SceneGraph;

    #[test]
    fn test_every_part_has_a_node() {
        let model = forklift_template();
        let mut graph = SceneGraph::new();
        let root = model.instantiate(&mut graph, None).unwrap();
        for part in PartTable::forklift().iter() {
            let key = graph.find(root, &part.bone_name);
            assert!(key.is_some(), "missing node '{}'", part.bone_name);
            assert!(graph.get(key.unwrap()).unwrap().mesh.is_some());
        }
    }

    #[test]
    fn test_node_count() {
        // forklift, body, 4 tires, cabin, fork_mount, 4 lifts, 2 teeth
        assert_eq!(forklift_template().node_count(), 14);
    }

    #[test]
    fn test_tire_axis_is_lateral() {
        let node = tire("t", Vec3::ZERO);
        assert!(node.matrix.rotate_vector(Vec3::X).approx_eq(Vec3::Z, 1e-6));
    }
}
