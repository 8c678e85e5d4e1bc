//! # Project Data Structures
//!
//! The `Project` struct is the root container for a set of motor designs.
//! Projects serialize to `.mproj` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, designer, program, timestamps)
//! ├── settings: GlobalSettings (catalog path, default model names)
//! └── items: HashMap<Uuid, CalculationItem> (motors and casing checks)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use motor_core::catalog::Catalog;
//! use motor_core::calculations::{CalculationItem, IndependentVariable};
//! use motor_core::project::Project;
//! use motor_core::units::Pascals;
//!
//! let mut project = Project::new("A. Designer", "Sounding rocket");
//! let booster = project.new_motor_design(
//!     "Booster",
//!     2.0,
//!     0.5,
//!     IndependentVariable::ChamberPressure(Pascals(5.0e6)),
//! );
//! let id = project.add_item(CalculationItem::Motor(booster));
//!
//! let catalog = Catalog::builtin().unwrap();
//! let results = project.solve_all(&catalog);
//! assert!(results[&id].is_ok());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationResult, IndependentVariable, MotorDesign};
use crate::catalog::ModelLookup;
use crate::errors::CalcResult;

/// Current schema version for .mproj files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items live in a flat UUID-keyed map so references between them stay
/// stable when the host reorders its view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,
    pub settings: GlobalSettings,
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// ```rust
    /// use motor_core::project::Project;
    ///
    /// let project = Project::new("A. Designer", "Orbital launcher");
    /// assert_eq!(project.meta.program, "Orbital launcher");
    /// assert_eq!(project.item_count(), 0);
    /// ```
    pub fn new(designer: impl Into<String>, program: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                designer: designer.into(),
                program: program.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add an item and return its new UUID.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Mutable access; marks the project modified when the item exists.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// A motor design using the project's default models.
    pub fn new_motor_design(
        &self,
        label: impl Into<String>,
        length_m: f64,
        diameter_m: f64,
        independent: IndependentVariable,
    ) -> MotorDesign {
        let d = &self.settings.default_models;
        MotorDesign {
            label: label.into(),
            propellant: d.propellant.clone(),
            grain: d.grain.clone(),
            casing_material: d.casing_material.clone(),
            nozzle: d.nozzle.clone(),
            length_m,
            diameter_m,
            independent,
        }
    }

    /// Solve every item; one failure does not stop the others.
    pub fn solve_all(&self, lookup: &impl ModelLookup) -> HashMap<Uuid, CalcResult<CalculationResult>> {
        self.items
            .iter()
            .map(|(id, item)| (*id, item.calculate(lookup)))
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub designer: String,
    /// Vehicle or program the motors belong to
    pub program: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Catalog file to load instead of the built-in one
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Models picked for new designs
    #[serde(default)]
    pub default_models: DefaultModels,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            catalog_path: None,
            default_models: DefaultModels::default(),
        }
    }
}

/// Catalog names used for new designs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultModels {
    pub propellant: String,
    pub grain: String,
    pub casing_material: String,
    pub nozzle: String,
}

impl Default for DefaultModels {
    fn default() -> Self {
        DefaultModels {
            propellant: "APCP".to_string(),
            grain: "BATES".to_string(),
            casing_material: "Steel 4130".to_string(),
            nozzle: "Bell SL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CasingDesign;
    use crate::catalog::Catalog;
    use crate::units::Newtons;

    #[test]
    fn test_project_creation() {
        let project = Project::new("A. Designer", "Sounding rocket");
        assert_eq!(project.meta.designer, "A. Designer");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings, GlobalSettings::default());
    }

    #[test]
    fn test_default_models_exist_in_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let d = DefaultModels::default();
        assert!(catalog.propellant(&d.propellant).is_ok());
        assert!(catalog.grain(&d.grain).is_ok());
        assert!(catalog.casing_material(&d.casing_material).is_ok());
        assert!(catalog.nozzle(&d.nozzle).is_ok());
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("A. Designer", "Test");
        let design = project.new_motor_design("Sustainer", 1.5, 0.3, IndependentVariable::Thrust(Newtons(3000.0)));
        project.add_item(CalculationItem::Motor(design));

        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Sustainer"));
        assert!(json.contains("Steel 4130"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.item_count(), 1);
        assert_eq!(roundtrip.meta.program, "Test");
    }

    #[test]
    fn test_settings_defaults_when_missing() {
        let settings: GlobalSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GlobalSettings::default());
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = Project::new("Designer", "Test");
        let id = project.add_item(CalculationItem::Casing(CasingDesign {
            label: "Vessel".to_string(),
            casing_material: "Steel 4130".to_string(),
            length_m: 1.0,
            diameter_m: 0.2,
            pressure_pa: 3.0e6,
        }));
        assert_eq!(project.item_count(), 1);
        assert_eq!(project.get_item(&id).map(|i| i.label()), Some("Vessel"));

        assert!(project.remove_item(&id).is_some());
        assert_eq!(project.item_count(), 0);
        assert!(project.remove_item(&id).is_none());
    }

    #[test]
    fn test_solve_all_isolates_failures() {
        let catalog = Catalog::builtin().unwrap();
        let mut project = Project::new("Designer", "Test");

        let good = project.new_motor_design("Good", 2.0, 0.5, IndependentVariable::Thrust(Newtons(5000.0)));
        let mut bad = good.clone();
        bad.label = "Bad".to_string();
        bad.propellant = "Unknown".to_string();

        let good_id = project.add_item(CalculationItem::Motor(good));
        let bad_id = project.add_item(CalculationItem::Motor(bad));

        let results = project.solve_all(&catalog);
        assert!(results[&good_id].is_ok());
        assert!(results[&bad_id].is_err());
    }
}
