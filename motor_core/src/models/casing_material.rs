//! # Casing Materials
//!
//! Structural constants for the pressure vessel wall.
//!
//! Optional fields default to an idealized seamless wall: no corrosion
//! allowance, full weld efficiency, unit safety factor.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

fn default_weld_eff() -> f64 {
    1.0
}

fn default_safety_factor() -> f64 {
    1.0
}

fn default_max_thickness_fraction() -> f64 {
    0.25
}

/// Casing material record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Steel 4130",
///   "density": 7850.0,
///   "tensile_strength": 6.7e8,
///   "corrosion_safety": 0.0005,
///   "weld_eff": 0.85,
///   "safety_factor": 1.5,
///   "max_thickness_fraction": 0.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasingMaterialModel {
    pub name: String,

    /// Material density (kg/m³)
    pub density: f64,

    /// Allowable stress (Pa)
    pub tensile_strength: f64,

    /// Corrosion allowance added to the required wall (m)
    #[serde(default)]
    pub corrosion_safety: f64,

    /// Weld joint efficiency, (0, 1]
    #[serde(default = "default_weld_eff")]
    pub weld_eff: f64,

    /// Safety factor on the hoop stress, ≥ 1
    #[serde(default = "default_safety_factor")]
    pub safety_factor: f64,

    /// Largest wall as a fraction of the outer radius, (0, 1]
    #[serde(default = "default_max_thickness_fraction")]
    pub max_thickness_fraction: f64,
}

impl CasingMaterialModel {
    /// Create a material with default weld, safety and thickness limits.
    pub fn new(name: impl Into<String>, density: f64, tensile_strength: f64) -> Self {
        CasingMaterialModel {
            name: name.into(),
            density,
            tensile_strength,
            corrosion_safety: 0.0,
            weld_eff: default_weld_eff(),
            safety_factor: default_safety_factor(),
            max_thickness_fraction: default_max_thickness_fraction(),
        }
    }

    pub fn with_weld_eff(mut self, weld_eff: f64) -> Self {
        self.weld_eff = weld_eff;
        self
    }

    pub fn with_safety_factor(mut self, safety_factor: f64) -> Self {
        self.safety_factor = safety_factor;
        self
    }

    pub fn with_corrosion_safety(mut self, corrosion_safety: f64) -> Self {
        self.corrosion_safety = corrosion_safety;
        self
    }

    pub fn with_max_thickness_fraction(mut self, fraction: f64) -> Self {
        self.max_thickness_fraction = fraction;
        self
    }

    /// Effective allowable stress S·E/SF used by the hoop relations
    pub fn design_stress(&self) -> f64 {
        self.tensile_strength * self.weld_eff / self.safety_factor
    }

    pub fn validate(&self) -> CalcResult<()> {
        let check = |ok: bool, field: &str, value: f64, reason: &str| -> CalcResult<()> {
            if ok {
                Ok(())
            } else {
                Err(CalcError::invalid_input(
                    format!("casing_material.{}.{}", self.name, field),
                    value.to_string(),
                    reason,
                ))
            }
        };

        check(self.density > 0.0 && self.density.is_finite(), "density", self.density, "Density must be positive")?;
        check(
            self.tensile_strength > 0.0 && self.tensile_strength.is_finite(),
            "tensile_strength",
            self.tensile_strength,
            "Tensile strength must be positive",
        )?;
        check(
            self.weld_eff > 0.0 && self.weld_eff <= 1.0,
            "weld_eff",
            self.weld_eff,
            "Weld efficiency must be in (0, 1]",
        )?;
        check(
            self.safety_factor >= 1.0 && self.safety_factor.is_finite(),
            "safety_factor",
            self.safety_factor,
            "Safety factor must be at least 1",
        )?;
        check(
            self.corrosion_safety >= 0.0 && self.corrosion_safety.is_finite(),
            "corrosion_safety",
            self.corrosion_safety,
            "Corrosion allowance cannot be negative",
        )?;
        check(
            self.max_thickness_fraction > 0.0 && self.max_thickness_fraction <= 1.0,
            "max_thickness_fraction",
            self.max_thickness_fraction,
            "Max thickness fraction must be in (0, 1]",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steel() -> CasingMaterialModel {
        CasingMaterialModel::new("Steel", 7800.0, 6.0e8)
            .with_weld_eff(0.9)
            .with_safety_factor(1.5)
    }

    #[test]
    fn test_valid_material() {
        assert!(steel().validate().is_ok());
    }

    #[test]
    fn test_design_stress() {
        // 6e8 · 0.9 / 1.5 = 3.6e8
        assert!((steel().design_stress() - 3.6e8).abs() < 1.0);
    }

    #[test]
    fn test_invalid_values() {
        assert!(steel().with_weld_eff(1.2).validate().is_err());
        assert!(steel().with_weld_eff(0.0).validate().is_err());
        assert!(steel().with_safety_factor(0.8).validate().is_err());
        assert!(steel().with_corrosion_safety(-0.001).validate().is_err());
        assert!(steel().with_max_thickness_fraction(0.0).validate().is_err());

        let mut weak = steel();
        weak.tensile_strength = 0.0;
        let err = weak.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field.ends_with("tensile_strength")));
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{ "name": "Al 6061", "density": 2700.0, "tensile_strength": 2.4e8 }"#;
        let mat: CasingMaterialModel = serde_json::from_str(json).unwrap();
        assert_eq!(mat.weld_eff, 1.0);
        assert_eq!(mat.safety_factor, 1.0);
        assert_eq!(mat.corrosion_safety, 0.0);
        assert_eq!(mat.max_thickness_fraction, 0.25);
    }
}
