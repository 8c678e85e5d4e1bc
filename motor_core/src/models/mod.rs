//! # Configuration Models
//!
//! Immutable records describing what a motor is made of. They are loaded
//! once (see [`crate::catalog`]) and shared read-only by every solver that
//! uses them.
//!
//! ## Model Types
//!
//! - **Propellant**: burn-rate law and combustion constants
//! - **Grain**: burning-area scale and volumetric loading
//! - **Casing material**: allowable stress, weld and safety derating
//! - **Nozzle**: Isp efficiency and design back-pressure
//!
//! Each model has a `validate()` that the solver calls before using it.

pub mod casing_material;
pub mod grain;
pub mod nozzle;
pub mod propellant;

pub use casing_material::CasingMaterialModel;
pub use grain::GrainGeometryModel;
pub use nozzle::{NozzleModel, SEA_LEVEL_PRESSURE_PA};
pub use propellant::PropellantModel;

use serde::{Deserialize, Serialize};

/// Kinds of named records a catalog holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    Propellant,
    Grain,
    CasingMaterial,
    Nozzle,
    Curve,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Propellant,
        ModelKind::Grain,
        ModelKind::CasingMaterial,
        ModelKind::Nozzle,
        ModelKind::Curve,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::Propellant => "Propellant",
            ModelKind::Grain => "Grain geometry",
            ModelKind::CasingMaterial => "Casing material",
            ModelKind::Nozzle => "Nozzle",
            ModelKind::Curve => "Curve",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
