//! Rigid body types

use servo_math::{Aabb, Mat4, Vec3};
use slotmap::new_key_type;

use crate::collision::CollisionCategory;
use crate::shapes::CollisionShape;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational: once a body is removed its old keys stop resolving,
    /// even if the slot is reused.
    pub struct BodyKey;
}

/// Per-step external force applied to a body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForceCallback {
    /// No external force
    #[default]
    None,
    /// Weight along Y: `mass * gravity`
    Gravity,
}

/// A rigid body with a collision shape, mass properties and a category tag
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Global frame of the body
    pub matrix: Mat4,
    /// Mass (zero means static)
    pub mass: f32,
    /// Principal moments of inertia
    pub inertia: Vec3,
    /// Center of mass in body space
    pub center_of_mass: Vec3,
    /// Collision shape in body space
    pub shape: CollisionShape,
    /// Category tag used by the contact filter
    pub category: CollisionCategory,
    /// Whether the body takes part in the broad phase at all
    pub collidable: bool,
    /// External force installed on the body
    pub force_callback: ForceCallback,
    /// Force accumulated during the last step
    pub force: Vec3,
    /// Sleeping bodies receive no force and their joints hold still
    pub sleeping: bool,
}

impl RigidBody {
    /// Create a static body (zero mass, no force) at `matrix`
    pub fn new(shape: CollisionShape, matrix: Mat4) -> Self {
        Self {
            matrix,
            mass: 0.0,
            inertia: Vec3::ZERO,
            center_of_mass: Vec3::ZERO,
            shape,
            category: CollisionCategory::default(),
            collidable: true,
            force_callback: ForceCallback::None,
            force: Vec3::ZERO,
            sleeping: false,
        }
    }

    /// Builder: set the category tag
    pub fn with_category(mut self, category: CollisionCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder: set the external force
    pub fn with_force_callback(mut self, callback: ForceCallback) -> Self {
        self.force_callback = callback;
        self
    }

    /// Builder: enable or disable collision
    pub fn with_collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }

    /// Builder: derive mass properties from the shape
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass_properties(mass);
        self
    }

    /// Derive inertia and center of mass from the collision shape
    pub fn set_mass_properties(&mut self, mass: f32) {
        self.mass = mass;
        self.inertia = self.shape.inertia(mass);
        self.center_of_mass = self.shape.centroid();
    }

    /// Set mass and principal inertia directly
    pub fn set_mass_matrix(&mut self, mass: f32, ixx: f32, iyy: f32, izz: f32) {
        self.mass = mass;
        self.inertia = Vec3::new(ixx, iyy, izz);
    }

    /// Check if this body is static (does not move)
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    /// Bounding box of the shape in global space
    pub fn world_aabb(&self) -> Aabb {
        self.shape.local_aabb().transformed(&self.matrix)
    }
}
