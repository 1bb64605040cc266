//! Part definition tables
//!
//! A part table lists, per named mesh part, how to fit its collision shape,
//! its mass, its collision category and how it is jointed to its parent.
//! The first entry is always the chassis.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use servo_core::ModelLoadError;
use servo_physics::CollisionCategory;

use crate::error::VehicleError;

/// How a part's collision shape is fitted to its mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Convex hull of the transformed mesh vertices
    ConvexHull,
    /// Chamfer cylinder fitted to the wheel's extents
    TireShape,
    /// Flattened box around the raw mesh bounds (fork tines)
    ConvexHullAggregate,
}

impl FromStr for ShapeKind {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "convexHull" => Ok(ShapeKind::ConvexHull),
            "tireShape" => Ok(ShapeKind::TireShape),
            "convexHullAggregate" => Ok(ShapeKind::ConvexHullAggregate),
            other => Err(VehicleError::UnknownShapeKind(other.to_string())),
        }
    }
}

/// Joint connecting a part to its parent bone
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticulationKind {
    /// The chassis; no joint
    Root,
    /// Steerable wheel geared to the engine
    FrontTire,
    /// Steerable wheel
    RearTire,
    /// Fork tilt hinge
    HingeActuator,
    /// Mast stage slider
    LiftActuator,
    /// Fork tine slider
    PaletteActuator,
}

impl FromStr for ArticulationKind {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "mainBody" => Ok(ArticulationKind::Root),
            "frontTire" => Ok(ArticulationKind::FrontTire),
            "rearTire" => Ok(ArticulationKind::RearTire),
            "hingeActuator" => Ok(ArticulationKind::HingeActuator),
            "liftActuator" => Ok(ArticulationKind::LiftActuator),
            "paletteActuator" => Ok(ArticulationKind::PaletteActuator),
            other => Err(VehicleError::UnknownArticulationKind(other.to_string())),
        }
    }
}

/// One row of a part table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartDefinition {
    /// Name of the scene entity this part is built from
    pub bone_name: Cow<'static, str>,
    pub shape_kind: ShapeKind,
    pub mass: f32,
    pub category: CollisionCategory,
    pub articulation: ArticulationKind,
}

impl PartDefinition {
    pub const fn new(
        bone_name: &'static str,
        shape_kind: ShapeKind,
        mass: f32,
        category: CollisionCategory,
        articulation: ArticulationKind,
    ) -> Self {
        Self {
            bone_name: Cow::Borrowed(bone_name),
            shape_kind,
            mass,
            category,
            articulation,
        }
    }
}

/// Forklift part table
pub const FORKLIFT_PARTS: &[PartDefinition] = &[
    PartDefinition::new("body", ShapeKind::ConvexHull, 900.0, CollisionCategory::BODY_PART, ArticulationKind::Root),
    PartDefinition::new("fr_tire", ShapeKind::TireShape, 50.0, CollisionCategory::TIRE_PART, ArticulationKind::FrontTire),
    PartDefinition::new("fl_tire", ShapeKind::TireShape, 50.0, CollisionCategory::TIRE_PART, ArticulationKind::FrontTire),
    PartDefinition::new("rr_tire", ShapeKind::TireShape, 50.0, CollisionCategory::TIRE_PART, ArticulationKind::RearTire),
    PartDefinition::new("rl_tire", ShapeKind::TireShape, 50.0, CollisionCategory::TIRE_PART, ArticulationKind::RearTire),
    PartDefinition::new("lift_1", ShapeKind::ConvexHull, 50.0, CollisionCategory::BODY_PART, ArticulationKind::HingeActuator),
    PartDefinition::new("lift_2", ShapeKind::ConvexHull, 40.0, CollisionCategory::BODY_PART, ArticulationKind::LiftActuator),
    PartDefinition::new("lift_3", ShapeKind::ConvexHull, 30.0, CollisionCategory::BODY_PART, ArticulationKind::LiftActuator),
    PartDefinition::new("lift_4", ShapeKind::ConvexHull, 20.0, CollisionCategory::BODY_PART, ArticulationKind::LiftActuator),
    PartDefinition::new("left_teeth", ShapeKind::ConvexHullAggregate, 10.0, CollisionCategory::BODY_PART, ArticulationKind::PaletteActuator),
    PartDefinition::new("right_teeth", ShapeKind::ConvexHullAggregate, 10.0, CollisionCategory::BODY_PART, ArticulationKind::PaletteActuator),
];

/// A validated part table
///
/// Tables are never empty and bone names are unique.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PartTable {
    parts: Vec<PartDefinition>,
}

impl PartTable {
    /// Build a table, rejecting empty tables and duplicate bone names
    pub fn new(parts: Vec<PartDefinition>) -> Result<Self, VehicleError> {
        let table = Self { parts };
        table.validate()?;
        Ok(table)
    }

    /// The built-in forklift table
    pub fn forklift() -> Self {
        Self {
            parts: FORKLIFT_PARTS.to_vec(),
        }
    }

    /// Load a table from a RON file (a list of part definitions)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VehicleError> {
        let contents = fs::read_to_string(path).map_err(ModelLoadError::from)?;
        Self::from_ron(&contents)
    }

    /// Parse a table from RON text
    pub fn from_ron(text: &str) -> Result<Self, VehicleError> {
        let parts: Vec<PartDefinition> = ron::from_str(text).map_err(ModelLoadError::from)?;
        Self::new(parts)
    }

    fn validate(&self) -> Result<(), VehicleError> {
        if self.parts.is_empty() {
            return Err(VehicleError::EmptyDefinitionTable);
        }
        let mut seen = HashSet::new();
        for part in &self.parts {
            if !seen.insert(part.bone_name.as_ref()) {
                return Err(VehicleError::DuplicateBoneName(part.bone_name.to_string()));
            }
        }
        Ok(())
    }

    /// The chassis definition (first entry)
    pub fn root(&self) -> &PartDefinition {
        &self.parts[0]
    }

    /// Definitions after the chassis
    pub fn children(&self) -> &[PartDefinition] {
        &self.parts[1..]
    }

    /// Linear scan of the non-root definitions for `name`
    pub fn find_child(&self, name: &str) -> Option<&PartDefinition> {
        self.children().iter().find(|p| p.bone_name == name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false for a validated table
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartDefinition> {
        self.parts.iter()
    }
}

impl Default for PartTable {
    fn default() -> Self {
        Self::forklift()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Kind Parsing Tests =====

    #[test]
    fn test_shape_kind_from_str() {
        assert_eq!("convexHull".parse::<ShapeKind>().unwrap(), ShapeKind::ConvexHull);
        assert_eq!("tireShape".parse::<ShapeKind>().unwrap(), ShapeKind::TireShape);
        assert_eq!(
            "convexHullAggregate".parse::<ShapeKind>().unwrap(),
            ShapeKind::ConvexHullAggregate
        );
        match "sphere".parse::<ShapeKind>() {
            Err(VehicleError::UnknownShapeKind(s)) => assert_eq!(s, "sphere"),
            other => panic!("Expected UnknownShapeKind, got {:?}", other),
        }
    }

    #[test]
    fn test_articulation_kind_from_str() {
        assert_eq!("".parse::<ArticulationKind>().unwrap(), ArticulationKind::Root);
        assert_eq!("mainBody".parse::<ArticulationKind>().unwrap(), ArticulationKind::Root);
        assert_eq!(
            "paletteActuator".parse::<ArticulationKind>().unwrap(),
            ArticulationKind::PaletteActuator
        );
        assert!(matches!(
            "ballJoint".parse::<ArticulationKind>(),
            Err(VehicleError::UnknownArticulationKind(_))
        ));
    }

    // ===== Table Tests =====

    #[test]
    fn test_forklift_table() {
        let table = PartTable::forklift();
        assert_eq!(table.len(), 11);
        assert_eq!(table.root().bone_name, "body");
        assert_eq!(table.root().mass, 900.0);
        assert_eq!(table.root().articulation, ArticulationKind::Root);

        let lift_2 = table.find_child("lift_2").unwrap();
        assert_eq!(lift_2.mass, 40.0);
        assert_eq!(lift_2.articulation, ArticulationKind::LiftActuator);
        assert!(table.find_child("body").is_none());
    }

    #[test]
    fn test_forklift_table_is_valid() {
        assert!(PartTable::new(FORKLIFT_PARTS.to_vec()).is_ok());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(PartTable::new(Vec::new()), Err(VehicleError::EmptyDefinitionTable)));
    }

    #[test]
    fn test_duplicate_bone_rejected() {
        let mut parts = FORKLIFT_PARTS.to_vec();
        parts.push(FORKLIFT_PARTS[3].clone());
        match PartTable::new(parts) {
            Err(VehicleError::DuplicateBoneName(name)) => assert_eq!(name, "rr_tire"),
            other => panic!("Expected DuplicateBoneName, got {:?}", other),
        }
    }

    #[test]
    fn test_table_from_ron() {
        let text = r#"[
            (bone_name: "cart", shape_kind: ConvexHull, mass: 100.0, category: "BODY_PART", articulation: Root),
            (bone_name: "wheel", shape_kind: TireShape, mass: 5.0, category: "TIRE_PART", articulation: RearTire),
        ]"#;
        let table = PartTable::from_ron(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.children()[0].category, CollisionCategory::TIRE_PART);
    }

    #[test]
    fn test_table_from_bad_ron() {
        assert!(matches!(PartTable::from_ron("[ (bone_name: "), Err(VehicleError::Load(_))));
    }
}
