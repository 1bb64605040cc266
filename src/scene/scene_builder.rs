//! DemoSceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building the forklift demo: a terrain floor,
//! lumber yards to push around, and any number of forklifts.

use std::sync::Arc;

use servo_core::{EntityKey, Mesh, ModelTemplate, SceneEntity, SceneGraph};
use servo_math::{Mat4, Vec3};
use servo_physics::{
    CollisionCategory, CollisionShape, ForceCallback, PhysicsConfig, PhysicsWorld, RigidBody,
};
use servo_vehicle::{PartTable, VehicleConfig, VehicleError, VehicleHandle, VehicleManager};

/// Plank size of a lumber yard stack
const PLANK_SIZE: Vec3 = Vec3::new(0.2, 0.1, 2.0);
const PLANK_MASS: f32 = 5.0;
const PLANKS_PER_LAYER: usize = 4;
const PLANK_LAYERS: usize = 3;
const PLANK_SPACING: f32 = 0.3;

/// Everything the simulation loop needs
pub struct DemoScene {
    pub world: PhysicsWorld,
    pub graph: SceneGraph,
    pub vehicles: VehicleManager,
}

/// Builder for the forklift demo scene
///
/// # Example
/// ```ignore
/// let scene = DemoSceneBuilder::new()
///     .with_physics(PhysicsConfig::new(-10.0))
///     .add_floor(200.0)
///     .add_lumber_yard(Vec3::new(5.0, 0.0, 0.0))
///     .add_forklift(&forklift_template(), 1.5, &PartTable::forklift())?
///     .build();
/// ```
pub struct DemoSceneBuilder {
    world: PhysicsWorld,
    graph: SceneGraph,
    vehicles: VehicleManager,
    origin: Vec3,
    lumber_yards: usize,
}

impl DemoSceneBuilder {
    /// Create a new scene builder
    pub fn new() -> Self {
        Self {
            world: PhysicsWorld::new(),
            graph: SceneGraph::new(),
            vehicles: VehicleManager::new(),
            origin: Vec3::ZERO,
            lumber_yards: 0,
        }
    }

    /// Use the given physics settings
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.world = PhysicsWorld::with_config(config);
        self
    }

    /// Use the given engine tuning for forklifts added afterwards
    pub fn with_vehicle_config(mut self, config: VehicleConfig) -> Self {
        self.vehicles = VehicleManager::with_config(config);
        self
    }

    /// Point on the floor surface that placements are relative to
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Add a square static floor whose top surface passes through the origin
    pub fn add_floor(mut self, size: f32) -> Self {
        let extents = Vec3::new(size, 1.0, size);
        let matrix = Mat4::from_translation(self.origin - Vec3::new(0.0, 0.5, 0.0));
        let shape = CollisionShape::Box {
            size: extents,
            offset: Mat4::IDENTITY,
        };
        self.world
            .add_body(RigidBody::new(shape, matrix).with_category(CollisionCategory::TERRAIN));

        let mesh = Mesh::cuboid("floor", Vec3::ZERO, extents * 0.5);
        self.graph
            .add_root(SceneEntity::new("floor").with_matrix(matrix).with_mesh(Arc::new(mesh), Mat4::IDENTITY));
        self
    }

    /// Add a stack of loose planks at `offset` from the origin
    pub fn add_lumber_yard(mut self, offset: Vec3) -> Self {
        let name = format!("lumber_yard_{}", self.lumber_yards);
        self.lumber_yards += 1;

        let base = Mat4::from_translation(self.origin + offset);
        let yard = self.graph.add_root(SceneEntity::new(name.clone()).with_matrix(base));
        let mesh = Arc::new(Mesh::cuboid("plank", Vec3::ZERO, PLANK_SIZE * 0.5));

        let half_row = (PLANKS_PER_LAYER - 1) as f32 * PLANK_SPACING * 0.5;
        for layer in 0..PLANK_LAYERS {
            for i in 0..PLANKS_PER_LAYER {
                let local = Vec3::new(
                    i as f32 * PLANK_SPACING - half_row,
                    PLANK_SIZE.y * (layer as f32 + 0.5),
                    0.0,
                );
                self.add_plank(yard, &base, local, &mesh, layer * PLANKS_PER_LAYER + i);
            }
        }
        log::debug!("Added {} at {:?}", name, base.posit);
        self
    }

    fn add_plank(&mut self, yard: EntityKey, base: &Mat4, local: Vec3, mesh: &Arc<Mesh>, index: usize) {
        let local_matrix = Mat4::from_translation(local);
        let shape = CollisionShape::Box {
            size: PLANK_SIZE,
            offset: Mat4::IDENTITY,
        };
        let body = RigidBody::new(shape, local_matrix * *base)
            .with_mass(PLANK_MASS)
            .with_category(CollisionCategory::LAND_PART)
            .with_force_callback(ForceCallback::Gravity);
        self.world.add_body(body);

        let plank = SceneEntity::new(format!("plank_{}", index))
            .with_matrix(local_matrix)
            .with_mesh(Arc::clone(mesh), Mat4::IDENTITY);
        if self.graph.add_child(yard, plank).is_none() {
            log::warn!("Lumber yard entity vanished while adding planks");
        }
    }

    /// Build a forklift from `model`, `height` above the origin
    pub fn add_forklift(
        mut self,
        model: &ModelTemplate,
        height: f32,
        table: &PartTable,
    ) -> Result<Self, VehicleError> {
        let location = Mat4::from_translation(self.origin + Vec3::new(0.0, height, 0.0));
        self.vehicles
            .create_forklift(&mut self.world, &mut self.graph, model, &location, table)?;
        Ok(self)
    }

    /// Build the scene
    pub fn build(self) -> DemoScene {
        DemoScene {
            world: self.world,
            graph: self.graph,
            vehicles: self.vehicles,
        }
    }
}

impl Default for DemoSceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoScene {
    /// The vehicle receiving player input
    pub fn active_vehicle(&self) -> Option<VehicleHandle> {
        self.vehicles.active()
    }
}
