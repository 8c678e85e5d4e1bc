//! # Sizing Calculations
//!
//! Each calculation follows the same pattern:
//!
//! - a `*Design` naming catalog models plus the numbers the user chose
//!   (JSON-serializable, stored in projects)
//! - a `*Result` snapshot of every computed quantity
//! - `calculate(design, lookup)` resolving names and solving
//!
//! The stateful engines ([`motor::MotorSolver`], [`casing::Casing`]) are
//! public too, for hosts that tweak one input at a time and re-query.
//!
//! ## Available Calculations
//!
//! - [`motor`] - full motor operating point, masses and burn time
//! - [`casing`] - pill-shaped pressure vessel at a given pressure

pub mod casing;
pub mod motor;

use serde::{Deserialize, Serialize};

use crate::catalog::ModelLookup;
use crate::errors::CalcResult;

pub use casing::{Casing, CasingDesign, CasingEnvelope, CasingResult, EnvelopeLimit, EnvelopeViolation};
pub use motor::{DesignWarning, IndependentVariable, MotorDesign, MotorResult, MotorSolver, REFERENCE_MAX_THRUST_N};

/// Any stored calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Complete motor
    Motor(MotorDesign),
    /// Casing checked on its own
    Casing(CasingDesign),
}

/// Result of any stored calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationResult {
    Motor(MotorResult),
    Casing(CasingResult),
}

impl CalculationItem {
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Motor(m) => &m.label,
            CalculationItem::Casing(c) => &c.label,
        }
    }

    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Motor(_) => "Motor",
            CalculationItem::Casing(_) => "Casing",
        }
    }

    pub fn calculate(&self, lookup: &impl ModelLookup) -> CalcResult<CalculationResult> {
        match self {
            CalculationItem::Motor(m) => motor::calculate(m, lookup).map(CalculationResult::Motor),
            CalculationItem::Casing(c) => casing::calculate(c, lookup).map(CalculationResult::Casing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::units::Pascals;

    #[test]
    fn test_item_dispatch() {
        let catalog = Catalog::builtin().unwrap();
        let item = CalculationItem::Casing(CasingDesign {
            label: "Vessel".to_string(),
            casing_material: "Carbon Composite".to_string(),
            length_m: 1.0,
            diameter_m: 0.2,
            pressure_pa: 4.0e6,
        });
        assert_eq!(item.label(), "Vessel");
        assert_eq!(item.calc_type(), "Casing");
        assert!(matches!(item.calculate(&catalog).unwrap(), CalculationResult::Casing(_)));
    }

    #[test]
    fn test_item_serialization_tag() {
        let item = CalculationItem::Motor(MotorDesign {
            label: "Booster".to_string(),
            propellant: "APCP".to_string(),
            grain: "BATES".to_string(),
            casing_material: "Steel 4130".to_string(),
            nozzle: "Bell SL".to_string(),
            length_m: 2.0,
            diameter_m: 0.5,
            independent: IndependentVariable::ChamberPressure(Pascals(5.0e6)),
        });
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"Motor\""));
        let back: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
