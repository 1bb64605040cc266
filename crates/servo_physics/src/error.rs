//! Physics error types

use crate::body::BodyKey;
use crate::collision::FilterError;
use crate::joint::JointKey;
use crate::shapes::ShapeError;

/// Error raised by [`PhysicsWorld`](crate::PhysicsWorld) operations
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The body key is stale or was never issued by this world
    UnknownBody(BodyKey),
    /// The joint key is stale or was never issued by this world
    UnknownJoint(JointKey),
    /// A typed joint accessor was used on a joint of another kind
    JointKindMismatch {
        joint: JointKey,
        expected: &'static str,
        found: &'static str,
    },
    /// Building a collision shape failed
    Shape(ShapeError),
    /// The contact filter rejected a category pair during a step
    Filter(FilterError),
}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::UnknownBody(key) => write!(f, "Unknown body {:?}", key),
            PhysicsError::UnknownJoint(key) => write!(f, "Unknown joint {:?}", key),
            PhysicsError::JointKindMismatch { joint, expected, found } => {
                write!(f, "Joint {:?} is a {}, expected a {}", joint, found, expected)
            }
            PhysicsError::Shape(e) => write!(f, "Shape error: {}", e),
            PhysicsError::Filter(e) => write!(f, "Contact filter error: {}", e),
        }
    }
}

impl std::error::Error for PhysicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhysicsError::Shape(e) => Some(e),
            PhysicsError::Filter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for PhysicsError {
    fn from(e: ShapeError) -> Self {
        PhysicsError::Shape(e)
    }
}

impl From<FilterError> for PhysicsError {
    fn from(e: FilterError) -> Self {
        PhysicsError::Filter(e)
    }
}
