//! Vehicle manager
//!
//! Entry point for building forklifts into a physics world and scene, and
//! for driving every built vehicle once per step.

use slotmap::{new_key_type, SlotMap};

use servo_core::{ModelTemplate, SceneGraph};
use servo_input::InputRecord;
use servo_math::Mat4;
use servo_physics::PhysicsWorld;

use crate::collision_policy::ForkliftContactFilter;
use crate::controller::{ControlOutputs, ServoVehicle, VehicleConfig};
use crate::definition::PartTable;
use crate::error::VehicleError;
use crate::skeleton::build_skeleton;
use crate::slots::JointSlots;

new_key_type! {
    /// Handle to a vehicle owned by a [`VehicleManager`]
    pub struct VehicleHandle;
}

/// Owns every vehicle in a scene and tracks which one the player drives
#[derive(Debug, Default)]
pub struct VehicleManager {
    vehicles: SlotMap<VehicleHandle, ServoVehicle>,
    /// Creation order, used to cycle the active vehicle
    order: Vec<VehicleHandle>,
    active: usize,
    config: VehicleConfig,
}

impl VehicleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VehicleConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Build a forklift from `model` placed at `location`
    ///
    /// The model is instantiated as a new scene root, its root node moved to
    /// `location`, and the forklift contact filter installed on the world.
    /// On failure the world and the scene are left as they were.
    pub fn create_forklift(
        &mut self,
        world: &mut PhysicsWorld,
        graph: &mut SceneGraph,
        model: &ModelTemplate,
        location: &Mat4,
        table: &PartTable,
    ) -> Result<VehicleHandle, VehicleError> {
        let model_root = model
            .instantiate(graph, None)
            .ok_or_else(|| VehicleError::MissingPart(model.root.name.clone()))?;
        graph.set_local_matrix(model_root, *location);

        world.set_contact_filter(Box::new(ForkliftContactFilter));

        let mut slots = JointSlots::new();
        let skeleton = match build_skeleton(world, graph, model_root, table, &self.config, &mut slots) {
            Ok(skeleton) => skeleton,
            Err(e) => {
                graph.remove_subtree(model_root);
                return Err(e);
            }
        };
        let joints = match slots.build() {
            Ok(joints) => joints,
            Err(e) => {
                for body in skeleton.bodies() {
                    world.remove_body(body);
                }
                graph.remove_subtree(model_root);
                return Err(e);
            }
        };

        let vehicle = ServoVehicle::new(skeleton, joints, self.config, model_root);
        log::info!(
            "Created forklift '{}' with {} bones at {:?}",
            model.name,
            vehicle.skeleton().len(),
            location.posit
        );
        let handle = self.vehicles.insert(vehicle);
        self.order.push(handle);
        Ok(handle)
    }

    pub fn get(&self, handle: VehicleHandle) -> Option<&ServoVehicle> {
        self.vehicles.get(handle)
    }

    pub fn get_mut(&mut self, handle: VehicleHandle) -> Option<&mut ServoVehicle> {
        self.vehicles.get_mut(handle)
    }

    /// Destroy a vehicle, removing its bodies, joints and scene entities
    pub fn remove(
        &mut self,
        handle: VehicleHandle,
        world: &mut PhysicsWorld,
        graph: &mut SceneGraph,
    ) -> Result<(), VehicleError> {
        let vehicle = self.vehicles.remove(handle).ok_or(VehicleError::UnknownVehicle)?;
        self.order.retain(|h| *h != handle);
        if self.active >= self.order.len() {
            self.active = 0;
        }
        vehicle.destroy(world, graph);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Handles in creation order
    pub fn handles(&self) -> &[VehicleHandle] {
        &self.order
    }

    /// The vehicle receiving player input
    pub fn active(&self) -> Option<VehicleHandle> {
        self.order.get(self.active).copied()
    }

    /// Hand control to the next vehicle, wrapping around
    pub fn cycle_active(&mut self) -> Option<VehicleHandle> {
        if self.order.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.order.len();
        self.active()
    }

    /// Set the input of one vehicle
    pub fn set_input(&mut self, handle: VehicleHandle, input: InputRecord) -> Result<(), VehicleError> {
        let vehicle = self.vehicles.get_mut(handle).ok_or(VehicleError::UnknownVehicle)?;
        vehicle.set_input(input);
        Ok(())
    }

    /// Run the controller of every vehicle, in creation order
    pub fn pre_update_all(&mut self, world: &mut PhysicsWorld) -> Result<Vec<ControlOutputs>, VehicleError> {
        let mut outputs = Vec::with_capacity(self.order.len());
        for handle in &self.order {
            if let Some(vehicle) = self.vehicles.get_mut(*handle) {
                outputs.push(vehicle.pre_update(world)?);
            }
        }
        Ok(outputs)
    }

    /// Copy every vehicle's body frames back to the scene
    pub fn sync_all(&self, world: &PhysicsWorld, graph: &mut SceneGraph) -> Result<(), VehicleError> {
        for vehicle in self.vehicles.values() {
            vehicle.sync_transforms(world, graph)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forklift_template;
    use servo_math::Vec3;

    fn spawn(manager: &mut VehicleManager, world: &mut PhysicsWorld, graph: &mut SceneGraph, x: f32) -> VehicleHandle {
        let location = Mat4::from_translation(Vec3::new(x, 1.5, 0.0));
        manager
            .create_forklift(world, graph, &forklift_template(), &location, &PartTable::forklift())
            .unwrap()
    }

    // ===== Active Vehicle Tests =====

    #[test]
    fn test_empty_manager() {
        let mut manager = VehicleManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.active(), None);
        assert_eq!(manager.cycle_active(), None);
    }

    #[test]
    fn test_cycle_active() {
        let mut world = PhysicsWorld::new();
        let mut graph = SceneGraph::new();
        let mut manager = VehicleManager::new();
        let a = spawn(&mut manager, &mut world, &mut graph, 0.0);
        let b = spawn(&mut manager, &mut world, &mut graph, 20.0);

        assert_eq!(manager.active(), Some(a));
        assert_eq!(manager.cycle_active(), Some(b));
        assert_eq!(manager.cycle_active(), Some(a));
    }

    // ===== Removal Tests =====

    #[test]
    fn test_remove_vehicle() {
        let mut world = PhysicsWorld::new();
        let mut graph = SceneGraph::new();
        let mut manager = VehicleManager::new();
        let handle = spawn(&mut manager, &mut world, &mut graph, 0.0);
        assert!(world.body_count() > 0);

        manager.remove(handle, &mut world, &mut graph).unwrap();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.joint_count(), 0);
        assert!(graph.is_empty());
        assert!(matches!(
            manager.remove(handle, &mut world, &mut graph),
            Err(VehicleError::UnknownVehicle)
        ));
    }

    #[test]
    fn test_failed_build_leaves_scene_clean() {
        let mut world = PhysicsWorld::new();
        let mut graph = SceneGraph::new();
        let mut manager = VehicleManager::new();
        // Table without tires: slots stay empty
        let parts = PartTable::forklift().iter().filter(|p| !p.bone_name.ends_with("_tire")).cloned().collect();
        let table = PartTable::new(parts).unwrap();

        let result = manager.create_forklift(&mut world, &mut graph, &forklift_template(), &Mat4::IDENTITY, &table);
        assert!(matches!(result, Err(VehicleError::MissingJoint("front tire"))));
        assert_eq!(world.body_count(), 0);
        assert!(graph.is_empty());
        assert!(manager.is_empty());
    }
}
