//! Skeleton builder
//!
//! Walks a vehicle model's entity tree, builds a body for every entity named
//! in the part table and links it to the nearest matched ancestor. Entities
//! that are not in the table are passed through: their children attach to
//! the same parent bone.

use servo_core::{EntityKey, SceneGraph};
use servo_math::{Mat4, Vec3};
use servo_physics::{
    BodyKey, CollisionShape, DoubleHinge, ForceCallback, JointKey, JointKind, Motor, PhysicsWorld, RigidBody,
};

use crate::controller::VehicleConfig;
use crate::definition::PartTable;
use crate::error::VehicleError;
use crate::joint_linker::connect_body_part;
use crate::part_factory::create_body_part;
use crate::slots::JointSlots;

/// Drop applied to the chassis centre of mass
pub const CHASSIS_COM_DROP: f32 = 0.25;
/// Height of the engine node above the chassis origin
pub const ENGINE_HEIGHT: f32 = 1.0;
/// Engine node mass
pub const ENGINE_MASS: f32 = 50.0;
/// Radius used for the engine node's spherical inertia
pub const ENGINE_INERTIA_RADIUS: f32 = 1.0;

/// Index of a bone in its skeleton
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoneHandle(usize);

impl BoneHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One rigid body of the vehicle
#[derive(Clone, Debug)]
pub struct Bone {
    pub body: BodyKey,
    /// Joint to the parent bone (`None` for the chassis)
    pub joint: Option<JointKey>,
    /// Inverse of the pass-through entities between this bone's entity and
    /// its parent bone's entity
    pub bind: Mat4,
    pub parent: Option<BoneHandle>,
    pub children: Vec<BoneHandle>,
    /// Scene entity driven by this bone (`None` for the engine node)
    pub entity: Option<EntityKey>,
}

/// Bone tree rooted at the chassis
///
/// Bones are stored in creation order, so a parent always comes before its
/// children.
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the chassis bone
    pub fn add_root(&mut self, body: BodyKey, entity: EntityKey) -> BoneHandle {
        let handle = BoneHandle(self.bones.len());
        self.bones.push(Bone {
            body,
            joint: None,
            bind: Mat4::IDENTITY,
            parent: None,
            children: Vec::new(),
            entity: Some(entity),
        });
        handle
    }

    /// Add a bone under `parent`
    pub fn add_bone(
        &mut self,
        parent: BoneHandle,
        body: BodyKey,
        joint: JointKey,
        bind: Mat4,
        entity: Option<EntityKey>,
    ) -> BoneHandle {
        let handle = BoneHandle(self.bones.len());
        self.bones.push(Bone {
            body,
            joint: Some(joint),
            bind,
            parent: Some(parent),
            children: Vec::new(),
            entity,
        });
        if let Some(p) = self.bones.get_mut(parent.0) {
            p.children.push(handle);
        }
        handle
    }

    /// The chassis bone, if any bone has been added
    pub fn root(&self) -> Option<&Bone> {
        self.bones.first()
    }

    pub fn get(&self, handle: BoneHandle) -> Option<&Bone> {
        self.bones.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Bones in creation order
    pub fn iter(&self) -> impl Iterator<Item = (BoneHandle, &Bone)> {
        self.bones.iter().enumerate().map(|(i, b)| (BoneHandle(i), b))
    }

    /// Find the bone driving a scene entity
    pub fn find_by_entity(&self, entity: EntityKey) -> Option<BoneHandle> {
        self.bones
            .iter()
            .position(|b| b.entity == Some(entity))
            .map(BoneHandle)
    }

    /// Every body of the skeleton
    pub fn bodies(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bones.iter().map(|b| b.body)
    }
}

/// Engine node frame: the chassis rolled a quarter turn, raised above it
fn engine_frame(chassis: &Mat4) -> Mat4 {
    let mut frame = Mat4::roll(std::f32::consts::FRAC_PI_2) * *chassis;
    frame.posit.y += ENGINE_HEIGHT;
    frame
}

/// Create the engine body and the double hinge holding it to the chassis
///
/// Returns `(engine body, engine joint)`.
pub fn create_engine_node(world: &mut PhysicsWorld, chassis: BodyKey) -> Result<(BodyKey, JointKey), VehicleError> {
    let chassis_matrix = world.body_matrix(chassis)?;
    let frame = engine_frame(&chassis_matrix);

    let shape = CollisionShape::Cylinder {
        radius0: 0.125,
        radius1: 0.125,
        height: 0.75,
    };
    let inertia = 2.0 * ENGINE_MASS * ENGINE_INERTIA_RADIUS * ENGINE_INERTIA_RADIUS / 5.0;
    let mut body = RigidBody::new(shape, frame)
        .with_collidable(false)
        .with_force_callback(ForceCallback::Gravity);
    body.set_mass_matrix(ENGINE_MASS, inertia, inertia, inertia);
    let engine = world.add_body(body);

    let pin = Mat4::from_axes(frame.front, frame.right, frame.front.cross(frame.right), frame.posit);
    let mut hinge = DoubleHinge::new();
    hinge.enable_limits(false);
    hinge.enable_limits1(false);
    match world.add_joint(&pin, engine, Some(chassis), JointKind::DoubleHinge(hinge)) {
        Ok(joint) => Ok((engine, joint)),
        Err(e) => {
            world.remove_body(engine);
            Err(e.into())
        }
    }
}

/// Motor driving the engine about the engine joint's spin axis
pub fn create_engine_motor(
    world: &mut PhysicsWorld,
    engine_joint: JointKey,
    torque: f32,
) -> Result<JointKey, VehicleError> {
    let (engine, chassis) = {
        let joint = world.joint(engine_joint)?;
        (joint.child, joint.parent)
    };
    let (engine_pin, _) = world.joint_global_frames(engine_joint)?;
    let mut motor = Motor::new(engine_pin.up);
    motor.set_torque(torque);
    Ok(world.add_joint(&engine_pin, engine, chassis, JointKind::Motor(motor))?)
}

/// Build the bone tree for the model under `model_root`
///
/// On failure every body created so far is removed again (which also
/// removes their joints), leaving the world as it was.
pub fn build_skeleton(
    world: &mut PhysicsWorld,
    graph: &SceneGraph,
    model_root: EntityKey,
    table: &PartTable,
    config: &VehicleConfig,
    slots: &mut JointSlots,
) -> Result<Skeleton, VehicleError> {
    let mut skeleton = Skeleton::new();
    let result = populate(world, graph, model_root, table, config, slots, &mut skeleton);
    match result {
        Ok(()) => Ok(skeleton),
        Err(e) => {
            for body in skeleton.bodies() {
                world.remove_body(body);
            }
            Err(e)
        }
    }
}

fn populate(
    world: &mut PhysicsWorld,
    graph: &SceneGraph,
    model_root: EntityKey,
    table: &PartTable,
    config: &VehicleConfig,
    slots: &mut JointSlots,
    skeleton: &mut Skeleton,
) -> Result<(), VehicleError> {
    let root_def = table.root();
    let root_entity = graph
        .find(model_root, &root_def.bone_name)
        .ok_or_else(|| VehicleError::MissingPart(root_def.bone_name.to_string()))?;

    let chassis = create_body_part(world, graph, root_entity, root_def)?;
    let root = skeleton.add_root(chassis, root_entity);

    let mut com = world.center_of_mass(chassis)?;
    com.y -= CHASSIS_COM_DROP;
    world.set_center_of_mass(chassis, com)?;

    let (engine, engine_joint) = create_engine_node(world, chassis)?;
    skeleton.add_bone(root, engine, engine_joint, Mat4::IDENTITY, None);
    slots.set_engine_joint(engine_joint)?;
    let motor = create_engine_motor(world, engine_joint, config.engine_torque)?;
    slots.set_engine_motor(motor)?;

    let mut stack: Vec<(EntityKey, BoneHandle)> = graph.children(root_entity).iter().map(|&c| (c, root)).collect();

    while let Some((entity_key, parent_bone)) = stack.pop() {
        let Some(entity) = graph.get(entity_key) else {
            continue;
        };

        let bone = match table.find_child(&entity.name) {
            Some(def) => {
                let (parent_body, parent_entity) = match skeleton.get(parent_bone) {
                    Some(p) => (p.body, p.entity),
                    None => return Err(VehicleError::MissingPart(def.bone_name.to_string())),
                };

                let body = create_body_part(world, graph, entity_key, def)?;
                let joint = match connect_body_part(world, slots, parent_body, body, def) {
                    Ok(joint) => joint,
                    Err(e) => {
                        world.remove_body(body);
                        return Err(e);
                    }
                };

                let bind = match entity.parent() {
                    Some(p) => graph
                        .global_matrix_relative_to(p, parent_entity)
                        .unwrap_or(Mat4::IDENTITY)
                        .inverse(),
                    None => Mat4::IDENTITY,
                };
                log::debug!("Bone '{}' linked as {:?}", def.bone_name, def.articulation);
                skeleton.add_bone(parent_bone, body, joint, bind, Some(entity_key))
            }
            None => parent_bone,
        };

        stack.extend(graph.children(entity_key).iter().map(|&c| (c, bone)));
    }

    log::info!(
        "Skeleton built: {} bones, chassis com {:?}",
        skeleton.len(),
        world.center_of_mass(chassis).unwrap_or(Vec3::ZERO)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ArticulationKind, PartDefinition, ShapeKind};
    use servo_core::{Mesh, SceneEntity};
    use servo_physics::CollisionCategory;
    use std::sync::Arc;

    fn cube() -> Arc<Mesh> {
        Arc::new(Mesh::cuboid("cube", Vec3::ZERO, Vec3::splat(0.25)))
    }

    /// cart -> mount (unmatched) -> arm -> arm_tip
    fn cart_graph() -> (SceneGraph, EntityKey) {
        let mut graph = SceneGraph::new();
        let model = graph.add_root(SceneEntity::new("cart_model"));
        let cart = graph
            .add_child(model, SceneEntity::new("cart").with_mesh(cube(), Mat4::IDENTITY))
            .unwrap();
        let mount = graph
            .add_child(
                cart,
                SceneEntity::new("mount").with_matrix(Mat4::from_translation(Vec3::new(1.0, 0.5, 0.0))),
            )
            .unwrap();
        let arm = graph
            .add_child(
                mount,
                SceneEntity::new("arm")
                    .with_matrix(Mat4::from_translation(Vec3::new(0.2, 0.0, 0.0)))
                    .with_mesh(cube(), Mat4::IDENTITY),
            )
            .unwrap();
        graph
            .add_child(
                arm,
                SceneEntity::new("arm_tip")
                    .with_matrix(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
                    .with_mesh(cube(), Mat4::IDENTITY),
            )
            .unwrap();
        (graph, model)
    }

    fn cart_table() -> PartTable {
        PartTable::new(vec![
            PartDefinition::new("cart", ShapeKind::ConvexHull, 100.0, CollisionCategory::BODY_PART, ArticulationKind::Root),
            PartDefinition::new("arm", ShapeKind::ConvexHull, 10.0, CollisionCategory::BODY_PART, ArticulationKind::LiftActuator),
            PartDefinition::new("arm_tip", ShapeKind::ConvexHull, 5.0, CollisionCategory::BODY_PART, ArticulationKind::LiftActuator),
        ])
        .unwrap()
    }

    // ===== Engine Node Tests =====

    #[test]
    fn test_engine_node() {
        let mut world = PhysicsWorld::new();
        let chassis = world.add_body(
            RigidBody::new(CollisionShape::Box { size: Vec3::splat(1.0), offset: Mat4::IDENTITY }, Mat4::IDENTITY)
                .with_mass(900.0),
        );
        let (engine, joint) = create_engine_node(&mut world, chassis).unwrap();

        let body = world.body(engine).unwrap();
        assert!(!body.collidable);
        assert_eq!(body.mass, ENGINE_MASS);
        assert!(body.inertia.approx_eq(Vec3::splat(20.0), 1e-5));
        assert!(body.matrix.posit.approx_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));

        let hinge = world.double_hinge(joint).unwrap();
        assert!(!hinge.limits0_enabled());
        assert!(!hinge.limits1_enabled());

        // Pin: front = engine front, up = engine right
        let (pin, _) = world.joint_global_frames(joint).unwrap();
        assert!(pin.front.approx_eq(body.matrix.front, 1e-5));
        assert!(pin.up.approx_eq(body.matrix.right, 1e-5));
        assert!(pin.right.approx_eq(pin.front.cross(pin.up), 1e-5));
    }

    #[test]
    fn test_engine_motor_torque() {
        let mut world = PhysicsWorld::new();
        let chassis = world.add_body(RigidBody::new(
            CollisionShape::Box { size: Vec3::splat(1.0), offset: Mat4::IDENTITY },
            Mat4::IDENTITY,
        ));
        let (_, joint) = create_engine_node(&mut world, chassis).unwrap();
        let motor = create_engine_motor(&mut world, joint, 1000.0).unwrap();

        let (pin, _) = world.joint_global_frames(joint).unwrap();
        let motor = world.motor(motor).unwrap();
        assert_eq!(motor.torque(), 1000.0);
        assert!(motor.pin().approx_eq(pin.up, 1e-5));
    }

    // ===== Traversal Tests =====

    #[test]
    fn test_skeleton_passes_through_unmatched() {
        let (graph, model) = cart_graph();
        let mut world = PhysicsWorld::new();
        let mut slots = JointSlots::new();
        let skeleton = build_skeleton(&mut world, &graph, model, &cart_table(), &VehicleConfig::default(), &mut slots)
            .unwrap();

        // cart + engine + arm + arm_tip
        assert_eq!(skeleton.len(), 4);
        assert_eq!(world.body_count(), 4);

        let arm_entity = graph.find(model, "arm").unwrap();
        let arm = skeleton.find_by_entity(arm_entity).unwrap();
        let arm_bone = skeleton.get(arm).unwrap();
        assert_eq!(arm_bone.parent, Some(BoneHandle(0)));
        // Bind undoes the unmatched mount entity
        assert!(arm_bone.bind.posit.approx_eq(Vec3::new(-1.0, -0.5, 0.0), 1e-5));

        let tip_entity = graph.find(model, "arm_tip").unwrap();
        let tip = skeleton.get(skeleton.find_by_entity(tip_entity).unwrap()).unwrap();
        assert_eq!(tip.parent, Some(arm));
        assert!(tip.bind.approx_eq(&Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_parents_precede_children() {
        let (graph, model) = cart_graph();
        let mut world = PhysicsWorld::new();
        let mut slots = JointSlots::new();
        let skeleton = build_skeleton(&mut world, &graph, model, &cart_table(), &VehicleConfig::default(), &mut slots)
            .unwrap();
        for (handle, bone) in skeleton.iter() {
            if let Some(parent) = bone.parent {
                assert!(parent.index() < handle.index());
                assert!(skeleton.get(parent).unwrap().children.contains(&handle));
            }
        }
    }

    #[test]
    fn test_chassis_com_lowered() {
        let (graph, model) = cart_graph();
        let mut world = PhysicsWorld::new();
        let mut slots = JointSlots::new();
        let skeleton = build_skeleton(&mut world, &graph, model, &cart_table(), &VehicleConfig::default(), &mut slots)
            .unwrap();
        let chassis = skeleton.root().unwrap().body;
        let com = world.center_of_mass(chassis).unwrap();
        assert!((com.y + CHASSIS_COM_DROP).abs() < 1e-5);
    }

    // ===== Failure Tests =====

    #[test]
    fn test_missing_root() {
        let (graph, model) = cart_graph();
        let table = PartTable::new(vec![PartDefinition::new(
            "truck",
            ShapeKind::ConvexHull,
            100.0,
            CollisionCategory::BODY_PART,
            ArticulationKind::Root,
        )])
        .unwrap();
        let mut world = PhysicsWorld::new();
        let result = build_skeleton(&mut world, &graph, model, &table, &VehicleConfig::default(), &mut JointSlots::new());
        assert!(matches!(result, Err(VehicleError::MissingPart(name)) if name == "truck"));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_failure_removes_created_bodies() {
        let (graph, model) = cart_graph();
        let table = PartTable::new(vec![
            PartDefinition::new("cart", ShapeKind::ConvexHull, 100.0, CollisionCategory::BODY_PART, ArticulationKind::Root),
            PartDefinition::new("arm", ShapeKind::ConvexHull, 10.0, CollisionCategory::BODY_PART, ArticulationKind::Root),
        ])
        .unwrap();
        let mut world = PhysicsWorld::new();
        let result = build_skeleton(&mut world, &graph, model, &table, &VehicleConfig::default(), &mut JointSlots::new());
        assert!(matches!(result, Err(VehicleError::RootArticulationOnChild(_))));
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.joint_count(), 0);
    }
}
