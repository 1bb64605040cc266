//! Contact filter for forklift scenes
//!
//! Parts of the same vehicle never collide with each other; the vehicle
//! collides with terrain, and scenery collides with terrain and other
//! scenery. Any pair without a rule is an error rather than a silent pass.

use servo_physics::{CollisionCategory, ContactFilter, FilterError, PairDecision};

use crate::error::VehicleError;

/// Decide whether two overlapping categories go on to contact generation
pub fn classify_pair(a: CollisionCategory, b: CollisionCategory) -> Result<PairDecision, VehicleError> {
    let pair = a | b;
    if pair.contains(CollisionCategory::TIRE_INNER_RING) {
        return Err(VehicleError::UnhandledCollisionPair(pair));
    }

    const BODY: CollisionCategory = CollisionCategory::BODY_PART;
    const TIRE: CollisionCategory = CollisionCategory::TIRE_PART;
    const TERRAIN: CollisionCategory = CollisionCategory::TERRAIN;
    const LAND: CollisionCategory = CollisionCategory::LAND_PART;

    if pair == BODY || pair == TIRE || pair == BODY | TIRE {
        Ok(PairDecision::Skip)
    } else if pair == TERRAIN | BODY || pair == TERRAIN | TIRE || pair == TERRAIN | LAND || pair == LAND {
        Ok(PairDecision::Process)
    } else {
        Err(VehicleError::UnhandledCollisionPair(pair))
    }
}

/// [`ContactFilter`] applying [`classify_pair`]
#[derive(Clone, Copy, Debug, Default)]
pub struct ForkliftContactFilter;

impl ContactFilter for ForkliftContactFilter {
    fn on_aabb_overlap(
        &self,
        a: CollisionCategory,
        b: CollisionCategory,
    ) -> Result<PairDecision, FilterError> {
        classify_pair(a, b).map_err(|e| {
            log::warn!("Contact filter: {}", e);
            FilterError { pair: a | b }
        })
    }
}
