//! Nozzle records. The solver uses the efficiency coefficient and design
//! back-pressure; the atmosphere curve and gimbal range are carried for the
//! host.

use serde::{Deserialize, Serialize};

use crate::curves::CurveRef;
use crate::errors::{CalcError, CalcResult};

/// Sea-level standard pressure (Pa)
pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;

fn default_design_pressure() -> f64 {
    SEA_LEVEL_PRESSURE_PA
}

/// Nozzle record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Bell SL",
///   "nozzle_coeff": 0.95,
///   "design_pressure_pa": 101325.0,
///   "atmosphere_curve": "bell-sl-isp",
///   "gimbal_range": 5.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NozzleModel {
    pub name: String,

    /// Empirical Isp efficiency, nominally near 1
    pub nozzle_coeff: f64,

    /// Ambient pressure the bell is expanded for (Pa)
    #[serde(default = "default_design_pressure")]
    pub design_pressure_pa: f64,

    /// Altitude correction, evaluated by the host
    #[serde(default)]
    pub atmosphere_curve: Option<CurveRef>,

    /// Gimbal range (degrees)
    #[serde(default)]
    pub gimbal_range: f64,
}

impl NozzleModel {
    /// Sea-level nozzle with no gimbal and no atmosphere curve.
    pub fn new(name: impl Into<String>, nozzle_coeff: f64) -> Self {
        NozzleModel {
            name: name.into(),
            nozzle_coeff,
            design_pressure_pa: SEA_LEVEL_PRESSURE_PA,
            atmosphere_curve: None,
            gimbal_range: 0.0,
        }
    }

    pub fn with_design_pressure(mut self, design_pressure_pa: f64) -> Self {
        self.design_pressure_pa = design_pressure_pa;
        self
    }

    pub fn with_atmosphere_curve(mut self, curve: CurveRef) -> Self {
        self.atmosphere_curve = Some(curve);
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.nozzle_coeff > 0.0) || !self.nozzle_coeff.is_finite() {
            return Err(CalcError::invalid_input(
                format!("nozzle.{}.nozzle_coeff", self.name),
                self.nozzle_coeff.to_string(),
                "Nozzle coefficient must be positive",
            ));
        }
        // Pd = 0 sends the area ratio to infinity
        if !(self.design_pressure_pa > 0.0) || !self.design_pressure_pa.is_finite() {
            return Err(CalcError::invalid_input(
                format!("nozzle.{}.design_pressure_pa", self.name),
                self.design_pressure_pa.to_string(),
                "Design pressure must be positive",
            ));
        }
        if !(self.gimbal_range >= 0.0) {
            return Err(CalcError::invalid_input(
                format!("nozzle.{}.gimbal_range", self.name),
                self.gimbal_range.to_string(),
                "Gimbal range cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let nozzle = NozzleModel::new("Bell SL", 0.95);
        assert!(nozzle.validate().is_ok());
        assert_eq!(nozzle.design_pressure_pa, SEA_LEVEL_PRESSURE_PA);
    }

    #[test]
    fn test_vacuum_design_pressure_rejected() {
        let nozzle = NozzleModel::new("Vac", 0.98).with_design_pressure(0.0);
        assert!(nozzle.validate().is_err());
    }

    #[test]
    fn test_negative_coeff_rejected() {
        assert!(NozzleModel::new("Broken", -0.9).validate().is_err());
    }

    #[test]
    fn test_deserialize_minimal() {
        let nozzle: NozzleModel = serde_json::from_str(r#"{ "name": "Stub", "nozzle_coeff": 0.9 }"#).unwrap();
        assert_eq!(nozzle.gimbal_range, 0.0);
        assert!(nozzle.atmosphere_curve.is_none());
        assert_eq!(nozzle.design_pressure_pa, SEA_LEVEL_PRESSURE_PA);
    }
}
