//! Collision categories and broad-phase pair filtering
//!
//! Every body carries a [`CollisionCategory`]. When the broad phase finds two
//! overlapping bounding boxes it hands both categories to the registered
//! [`ContactFilter`], which decides whether the pair goes on to contact
//! generation.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Category tag attached to each body for contact filtering
    ///
    /// A body normally carries exactly one category. The bit values are
    /// stable and used by filters to build pair masks (`a | b`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CollisionCategory: u32 {
        /// Static ground
        const TERRAIN = 1 << 0;
        /// Free-standing scenery the vehicle can push around
        const LAND_PART = 1 << 1;
        /// Chassis, lift stages and forks
        const BODY_PART = 1 << 2;
        /// Connecting links between vehicle parts
        const LINK_PART = 1 << 3;
        /// Wheels
        const TIRE_PART = 1 << 4;
        /// Inner ring of a tire
        const TIRE_INNER_RING = 1 << 5;
    }
}

impl Default for CollisionCategory {
    fn default() -> Self {
        CollisionCategory::BODY_PART
    }
}

/// Outcome of a broad-phase pair query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairDecision {
    /// Drop the pair before contact generation
    Skip,
    /// Continue to contact generation
    Process,
}

/// A filter met a category pair it has no rule for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterError {
    /// Bitwise union of the two categories
    pub pair: CollisionCategory,
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No contact rule for category pair {:?}", self.pair)
    }
}

impl std::error::Error for FilterError {}

/// Broad-phase hook consulted for every overlapping pair
///
/// Filters are called from the simulation step and must not mutate shared
/// state.
pub trait ContactFilter: Send + Sync {
    /// Decide whether the pair `(a, b)` is processed
    fn on_aabb_overlap(
        &self,
        a: CollisionCategory,
        b: CollisionCategory,
    ) -> Result<PairDecision, FilterError>;
}

/// Filter that lets every pair through (the world's behaviour with no filter set)
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessAll;

impl ContactFilter for ProcessAll {
    fn on_aabb_overlap(
        &self,
        _a: CollisionCategory,
        _b: CollisionCategory,
    ) -> Result<PairDecision, FilterError> {
        Ok(PairDecision::Process)
    }
}
