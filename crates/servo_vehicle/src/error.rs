//! Vehicle construction and control errors

use servo_core::ModelLoadError;
use servo_physics::{CollisionCategory, FilterError, PhysicsError, ShapeError};

/// Error building or driving a vehicle
#[derive(Debug)]
pub enum VehicleError {
    /// The part table has no entries
    EmptyDefinitionTable,
    /// Two part definitions share a bone name
    DuplicateBoneName(String),
    /// A shape kind string did not name a known shape
    UnknownShapeKind(String),
    /// An articulation kind string did not name a known articulation
    UnknownArticulationKind(String),
    /// A non-root part asked for the root articulation
    RootArticulationOnChild(String),
    /// The root part was not found in the model
    MissingPart(String),
    /// A part needs a mesh to fit its shape but has none
    MissingMesh(String),
    /// A part's mesh has no vertices
    EmptyMesh(String),
    /// A part's mesh exceeds the hull builder's capacity
    TooManyVertices { bone: String, count: usize, max: usize },
    /// More joints of one kind than the vehicle has slots for
    SlotCapacityExceeded { slot: &'static str, capacity: usize },
    /// A joint slot was never filled
    MissingJoint(&'static str),
    /// A front tire is not attached to the body the engine hangs from
    DifferentialParentMismatch(String),
    /// The contact filter has no rule for this category pair
    UnhandledCollisionPair(CollisionCategory),
    /// The vehicle handle is stale or unknown
    UnknownVehicle,
    /// Physics world error
    Physics(PhysicsError),
    /// Loading a part table or model failed
    Load(ModelLoadError),
}

impl std::fmt::Display for VehicleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleError::EmptyDefinitionTable => write!(f, "Part definition table is empty"),
            VehicleError::DuplicateBoneName(name) => write!(f, "Bone '{}' is defined twice", name),
            VehicleError::UnknownShapeKind(kind) => write!(f, "Unknown shape kind '{}'", kind),
            VehicleError::UnknownArticulationKind(kind) => {
                write!(f, "Unknown articulation kind '{}'", kind)
            }
            VehicleError::RootArticulationOnChild(bone) => {
                write!(f, "Bone '{}' uses the root articulation but is not the root", bone)
            }
            VehicleError::MissingPart(bone) => write!(f, "Part '{}' not found in model", bone),
            VehicleError::MissingMesh(bone) => write!(f, "Part '{}' has no mesh", bone),
            VehicleError::EmptyMesh(bone) => write!(f, "Part '{}' has an empty mesh", bone),
            VehicleError::TooManyVertices { bone, count, max } => write!(
                f,
                "Part '{}' has {} vertices (limit is below {})",
                bone, count, max
            ),
            VehicleError::SlotCapacityExceeded { slot, capacity } => {
                write!(f, "More than {} {} joints", capacity, slot)
            }
            VehicleError::MissingJoint(slot) => write!(f, "Vehicle has no {} joint", slot),
            VehicleError::DifferentialParentMismatch(bone) => write!(
                f,
                "Front tire '{}' is not attached to the engine's parent body",
                bone
            ),
            VehicleError::UnhandledCollisionPair(pair) => {
                write!(f, "No contact rule for category pair {:?}", pair)
            }
            VehicleError::UnknownVehicle => write!(f, "Unknown vehicle handle"),
            VehicleError::Physics(e) => write!(f, "Physics error: {}", e),
            VehicleError::Load(e) => write!(f, "Load error: {}", e),
        }
    }
}

impl std::error::Error for VehicleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VehicleError::Physics(e) => Some(e),
            VehicleError::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PhysicsError> for VehicleError {
    fn from(e: PhysicsError) -> Self {
        VehicleError::Physics(e)
    }
}

impl From<ShapeError> for VehicleError {
    fn from(e: ShapeError) -> Self {
        VehicleError::Physics(PhysicsError::Shape(e))
    }
}

impl From<FilterError> for VehicleError {
    fn from(e: FilterError) -> Self {
        VehicleError::UnhandledCollisionPair(e.pair)
    }
}

impl From<ModelLoadError> for VehicleError {
    fn from(e: ModelLoadError) -> Self {
        VehicleError::Load(e)
    }
}
