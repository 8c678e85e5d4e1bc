//! Grain geometry: how much of the casing holds propellant and how much of
//! it burns at once.

use serde::{Deserialize, Serialize};

use crate::curves::CurveRef;
use crate::errors::{CalcError, CalcResult};

/// Grain geometry record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "BATES",
///   "burn_area_scale": 0.54,
///   "propellant_fraction": 0.85,
///   "thrust_curve": "bates-neutral"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrainGeometryModel {
    pub name: String,

    /// Multiplier from cylinder lateral area (π·D·L) to burning area
    pub burn_area_scale: f64,

    /// Fraction of casing internal volume filled with propellant, (0, 1]
    pub propellant_fraction: f64,

    /// Time-normalized thrust shape, evaluated by the host
    #[serde(default)]
    pub thrust_curve: Option<CurveRef>,
}

impl GrainGeometryModel {
    pub fn new(name: impl Into<String>, burn_area_scale: f64, propellant_fraction: f64) -> Self {
        GrainGeometryModel {
            name: name.into(),
            burn_area_scale,
            propellant_fraction,
            thrust_curve: None,
        }
    }

    /// Attach a thrust-shape curve handle.
    pub fn with_thrust_curve(mut self, curve: CurveRef) -> Self {
        self.thrust_curve = Some(curve);
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.burn_area_scale > 0.0) || !self.burn_area_scale.is_finite() {
            return Err(CalcError::invalid_input(
                format!("grain.{}.burn_area_scale", self.name),
                self.burn_area_scale.to_string(),
                "Burn area scale must be positive",
            ));
        }
        if !(self.propellant_fraction > 0.0 && self.propellant_fraction <= 1.0) {
            return Err(CalcError::invalid_input(
                format!("grain.{}.propellant_fraction", self.name),
                self.propellant_fraction.to_string(),
                "Propellant fraction must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
