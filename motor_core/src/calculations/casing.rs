//! # Casing Sizing
//!
//! Sizes the pill-shaped pressure vessel that holds the grain: wall
//! thickness from chamber pressure (and back), wall mass, internal volume,
//! and the structural envelope the material allows at the current
//! dimensions.
//!
//! The casing never stores a pressure. The solver computes the chamber
//! pressure and hands it to each sizing call.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use motor_core::calculations::casing::Casing;
//! use motor_core::models::CasingMaterialModel;
//!
//! let steel = Arc::new(
//!     CasingMaterialModel::new("Steel", 7800.0, 6.0e8)
//!         .with_weld_eff(0.9)
//!         .with_safety_factor(1.5),
//! );
//! let casing = Casing::new(steel, 2.0, 0.5).unwrap();
//!
//! let t = casing.thickness(5.0e6);
//! assert!(t < casing.diameter() / 2.0);
//! assert!((casing.pressure_for_thickness(t) - 5.0e6).abs() < 1e-3);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::ModelLookup;
use crate::equations::vessel;
use crate::errors::{CalcError, CalcResult};
use crate::models::CasingMaterialModel;

/// Reject dimensions that cannot form a pill.
///
/// Both must be positive and finite, and the domes alone span one
/// diameter, so `length >= diameter`.
pub fn validate_geometry(length_m: f64, diameter_m: f64) -> CalcResult<()> {
    if !(length_m > 0.0) || !length_m.is_finite() {
        return Err(CalcError::invalid_geometry(
            "length_m",
            length_m.to_string(),
            "Length must be positive",
        ));
    }
    if !(diameter_m > 0.0) || !diameter_m.is_finite() {
        return Err(CalcError::invalid_geometry(
            "diameter_m",
            diameter_m.to_string(),
            "Diameter must be positive",
        ));
    }
    if length_m < diameter_m {
        return Err(CalcError::invalid_geometry(
            "length_m",
            length_m.to_string(),
            format!("Length must be at least the diameter ({} m) for the end domes to fit", diameter_m),
        ));
    }
    Ok(())
}

/// Limits of the structural envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeLimit {
    /// Required wall is thinner than the manufacturing floor
    MinPressure,
    /// Required wall is thicker than the material allows
    MaxPressure,
    /// Casing too long for its floor wall to fit under the maximum
    MaxLength,
}

impl EnvelopeLimit {
    pub fn quantity(&self) -> &'static str {
        match self {
            EnvelopeLimit::MinPressure | EnvelopeLimit::MaxPressure => "chamber_pressure_pa",
            EnvelopeLimit::MaxLength => "length_m",
        }
    }
}

/// One envelope limit the current design crosses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeViolation {
    pub limit: EnvelopeLimit,
    /// Value of the design quantity
    pub value: f64,
    /// The limit it crossed
    pub bound: f64,
}

impl EnvelopeViolation {
    pub fn description(&self) -> String {
        match self.limit {
            EnvelopeLimit::MinPressure => format!(
                "Chamber pressure {:.0} Pa is below the minimum {:.0} Pa for the thinnest buildable wall",
                self.value, self.bound
            ),
            EnvelopeLimit::MaxPressure => format!(
                "Chamber pressure {:.0} Pa exceeds the maximum {:.0} Pa the thickest allowed wall holds",
                self.value, self.bound
            ),
            EnvelopeLimit::MaxLength => format!(
                "Length {:.3} m exceeds the maximum {:.3} m for this diameter",
                self.value, self.bound
            ),
        }
    }

    /// Promote to a hard error for callers that refuse out-of-envelope designs.
    pub fn into_error(self) -> CalcError {
        CalcError::StructuralEnvelopeViolation {
            quantity: self.limit.quantity().to_string(),
            value: self.value,
            limit: self.bound,
            reason: self.description(),
        }
    }
}

/// Structural operating envelope at the current dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CasingEnvelope {
    pub min_thickness_m: f64,
    pub max_thickness_m: f64,
    pub min_pressure_pa: f64,
    pub max_pressure_pa: f64,
    pub min_length_m: f64,
    pub max_length_m: f64,
}

/// Snapshot of the casing sized for one pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasingResult {
    pub material: String,
    pub length_m: f64,
    pub diameter_m: f64,

    /// Pressure the wall was sized for (the chamber pressure)
    pub max_allowable_working_pressure_pa: f64,

    /// Hoop-stress wall thickness
    pub thickness_m: f64,

    /// Built wall: hoop thickness plus corrosion allowance
    pub wall_thickness_m: f64,

    /// Older corrosion-inclusive rule, for comparison
    pub legacy_thickness_m: f64,

    pub inner_volume_m3: f64,
    pub mass_kg: f64,
    pub envelope: CasingEnvelope,
    pub violations: Vec<EnvelopeViolation>,
}

impl CasingResult {
    /// Check if the casing sits inside its envelope
    pub fn passes(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Pill-shaped casing owned by one solver.
#[derive(Debug, Clone)]
pub struct Casing {
    material: Arc<CasingMaterialModel>,
    length_m: f64,
    diameter_m: f64,
}

impl Casing {
    /// Create a casing, validating the material and dimensions.
    pub fn new(material: Arc<CasingMaterialModel>, length_m: f64, diameter_m: f64) -> CalcResult<Self> {
        material.validate()?;
        validate_geometry(length_m, diameter_m)?;
        Ok(Casing {
            material,
            length_m,
            diameter_m,
        })
    }

    pub fn material(&self) -> &CasingMaterialModel {
        &self.material
    }

    pub fn length(&self) -> f64 {
        self.length_m
    }

    pub fn diameter(&self) -> f64 {
        self.diameter_m
    }

    /// Change both dimensions at once; state is untouched on error.
    pub fn set_dimensions(&mut self, length_m: f64, diameter_m: f64) -> CalcResult<()> {
        validate_geometry(length_m, diameter_m)?;
        self.length_m = length_m;
        self.diameter_m = diameter_m;
        Ok(())
    }

    /// Barrel length between the domes
    pub fn cylinder_length(&self) -> f64 {
        self.length_m - self.diameter_m
    }

    /// Hoop-stress wall thickness for `pressure`
    pub fn thickness(&self, pressure: f64) -> f64 {
        let m = &self.material;
        vessel::hoop_thickness(pressure, self.diameter_m, m.tensile_strength, m.weld_eff, m.safety_factor)
    }

    /// Pressure a wall of `thickness` holds; exact inverse of [`Casing::thickness`]
    pub fn pressure_for_thickness(&self, thickness: f64) -> f64 {
        let m = &self.material;
        vessel::hoop_pressure(thickness, self.diameter_m, m.tensile_strength, m.weld_eff, m.safety_factor)
    }

    /// Wall as built: required thickness plus corrosion allowance
    pub fn wall_thickness(&self, pressure: f64) -> f64 {
        self.thickness(pressure) + self.material.corrosion_safety
    }

    pub fn legacy_thickness(&self, pressure: f64) -> f64 {
        let m = &self.material;
        vessel::legacy_thickness(pressure, self.diameter_m, m.tensile_strength, m.weld_eff, m.corrosion_safety)
    }

    pub fn outer_volume(&self) -> f64 {
        vessel::pill_volume(self.cylinder_length(), self.diameter_m)
    }

    /// Internal volume with the built wall.
    ///
    /// The inner diameter bottoms out at zero when the wall would exceed the
    /// radius; [`Casing::check_envelope`] reports that case.
    pub fn inner_volume(&self, pressure: f64) -> f64 {
        let inner_diameter = (self.diameter_m - 2.0 * self.wall_thickness(pressure)).max(0.0);
        vessel::pill_volume(self.cylinder_length(), inner_diameter)
    }

    /// Wall mass (kg)
    pub fn mass(&self, pressure: f64) -> f64 {
        self.material.density * (self.outer_volume() - self.inner_volume(pressure))
    }

    pub fn envelope(&self) -> CasingEnvelope {
        let max_thickness_m = self.diameter_m / 2.0 * self.material.max_thickness_fraction;
        let min_thickness_m = vessel::min_thickness_for_length(self.length_m);
        CasingEnvelope {
            min_thickness_m,
            max_thickness_m,
            min_pressure_pa: self.pressure_for_thickness(min_thickness_m),
            max_pressure_pa: self.pressure_for_thickness(max_thickness_m),
            min_length_m: self.diameter_m,
            max_length_m: vessel::max_length_for_thickness(max_thickness_m),
        }
    }

    /// Every envelope limit the casing crosses at `pressure`.
    pub fn check_envelope(&self, pressure: f64) -> Vec<EnvelopeViolation> {
        let env = self.envelope();
        let mut violations = Vec::new();

        if pressure < env.min_pressure_pa {
            violations.push(EnvelopeViolation {
                limit: EnvelopeLimit::MinPressure,
                value: pressure,
                bound: env.min_pressure_pa,
            });
        }
        if pressure > env.max_pressure_pa {
            violations.push(EnvelopeViolation {
                limit: EnvelopeLimit::MaxPressure,
                value: pressure,
                bound: env.max_pressure_pa,
            });
        }
        if self.length_m > env.max_length_m {
            violations.push(EnvelopeViolation {
                limit: EnvelopeLimit::MaxLength,
                value: self.length_m,
                bound: env.max_length_m,
            });
        }
        violations
    }

    /// Size the casing for `pressure`.
    pub fn size(&self, pressure: f64) -> CasingResult {
        CasingResult {
            material: self.material.name.clone(),
            length_m: self.length_m,
            diameter_m: self.diameter_m,
            max_allowable_working_pressure_pa: pressure,
            thickness_m: self.thickness(pressure),
            wall_thickness_m: self.wall_thickness(pressure),
            legacy_thickness_m: self.legacy_thickness(pressure),
            inner_volume_m3: self.inner_volume(pressure),
            mass_kg: self.mass(pressure),
            envelope: self.envelope(),
            violations: self.check_envelope(pressure),
        }
    }
}

/// A stand-alone casing check: a named material sized for a given pressure.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Test stand vessel",
///   "casing_material": "Steel 4130",
///   "length_m": 1.5,
///   "diameter_m": 0.3,
///   "pressure_pa": 7000000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasingDesign {
    pub label: String,
    pub casing_material: String,
    pub length_m: f64,
    pub diameter_m: f64,
    pub pressure_pa: f64,
}

impl CasingDesign {
    pub fn validate(&self) -> CalcResult<()> {
        validate_geometry(self.length_m, self.diameter_m)?;
        if !(self.pressure_pa > 0.0) || !self.pressure_pa.is_finite() {
            return Err(CalcError::invalid_input(
                "pressure_pa",
                self.pressure_pa.to_string(),
                "Pressure must be positive",
            ));
        }
        Ok(())
    }
}

/// Size a named casing against a catalog.
pub fn calculate(design: &CasingDesign, lookup: &impl ModelLookup) -> CalcResult<CasingResult> {
    design.validate()?;
    let material = lookup.casing_material(&design.casing_material)?;
    let casing = Casing::new(material, design.length_m, design.diameter_m)?;
    Ok(casing.size(design.pressure_pa))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn steel() -> Arc<CasingMaterialModel> {
        Arc::new(
            CasingMaterialModel::new("Steel", 7800.0, 6.0e8)
                .with_weld_eff(0.9)
                .with_safety_factor(1.5)
                .with_max_thickness_fraction(0.2),
        )
    }

    fn test_casing() -> Casing {
        Casing::new(steel(), 2.0, 0.5).unwrap()
    }

    #[test]
    fn test_geometry_validation() {
        assert!(validate_geometry(2.0, 0.5).is_ok());
        assert!(validate_geometry(0.5, 0.5).is_ok());
        assert!(validate_geometry(0.4, 0.5).is_err());
        assert!(validate_geometry(-2.0, 0.5).is_err());
        assert!(validate_geometry(2.0, 0.0).is_err());
        assert!(validate_geometry(f64::NAN, 0.5).is_err());

        let err = validate_geometry(2.0, -0.5).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_thickness_roundtrip() {
        let casing = test_casing();
        for &p in &[1.0e5, 2.5e6, 5.0e6, 2.0e7] {
            let back = casing.pressure_for_thickness(casing.thickness(p));
            assert!((back - p).abs() / p < 1e-12);
        }
        for &t in &[5e-4, 3e-3, 0.02] {
            let back = casing.thickness(casing.pressure_for_thickness(t));
            assert!((back - t).abs() / t < 1e-12);
        }
    }

    #[test]
    fn test_thickness_increases_with_pressure() {
        let casing = test_casing();
        let mut last = 0.0;
        for i in 1..20 {
            let t = casing.thickness(i as f64 * 1.0e6);
            assert!(t > last);
            last = t;
        }
    }

    #[test]
    fn test_volumes_and_mass() {
        let casing = test_casing();
        let p = 5.0e6;
        let t = casing.thickness(p);

        let outer = PI * 0.5_f64.powi(3) / 6.0 + PI * 0.25 * 1.5 / 4.0;
        assert!((casing.outer_volume() - outer).abs() < 1e-12);

        let d_in = 0.5 - 2.0 * t;
        let inner = PI * d_in.powi(3) / 6.0 + PI * d_in.powi(2) * 1.5 / 4.0;
        assert!((casing.inner_volume(p) - inner).abs() < 1e-12);

        let mass = casing.mass(p);
        assert!((mass - 7800.0 * (outer - inner)).abs() < 1e-6);
        // ~3.5 mm steel pill of 2 m x 0.5 m weighs on the order of 100 kg
        assert!(mass > 50.0 && mass < 150.0, "mass = {}", mass);
    }

    #[test]
    fn test_corrosion_allowance_thickens_wall_only() {
        let material = Arc::new(
            CasingMaterialModel::new("Steel", 7800.0, 6.0e8)
                .with_weld_eff(0.9)
                .with_safety_factor(1.5)
                .with_corrosion_safety(0.001),
        );
        let corroded = Casing::new(material, 2.0, 0.5).unwrap();
        let clean = test_casing();

        assert_eq!(corroded.thickness(5.0e6), clean.thickness(5.0e6));
        assert!((corroded.wall_thickness(5.0e6) - clean.thickness(5.0e6) - 0.001).abs() < 1e-12);
        assert!(corroded.mass(5.0e6) > clean.mass(5.0e6));
        assert!(corroded.inner_volume(5.0e6) < clean.inner_volume(5.0e6));
    }

    #[test]
    fn test_envelope_values() {
        let casing = test_casing();
        let env = casing.envelope();

        assert!((env.max_thickness_m - 0.05).abs() < 1e-12);
        assert!((env.min_thickness_m - 0.002).abs() < 1e-12);
        assert!((env.max_pressure_pa - casing.pressure_for_thickness(0.05)).abs() < 1e-6);
        assert!(env.min_pressure_pa < env.max_pressure_pa);
        assert_eq!(env.min_length_m, 0.5);
        assert!((env.max_length_m - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_violations_reported() {
        let casing = test_casing();
        let env = casing.envelope();

        assert!(casing.check_envelope(5.0e6).is_empty());

        let high = casing.check_envelope(env.max_pressure_pa * 1.1);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].limit, EnvelopeLimit::MaxPressure);

        let low = casing.check_envelope(env.min_pressure_pa * 0.5);
        assert_eq!(low[0].limit, EnvelopeLimit::MinPressure);

        // Not clamped: the thickness still follows the load
        let over = env.max_pressure_pa * 2.0;
        assert!(casing.thickness(over) > env.max_thickness_m);
    }

    #[test]
    fn test_violation_into_error() {
        let casing = test_casing();
        let over = casing.envelope().max_pressure_pa * 1.5;
        let err = casing.check_envelope(over)[0].into_error();
        assert_eq!(err.error_code(), "STRUCTURAL_ENVELOPE_VIOLATION");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_wall_past_radius_floors_volume() {
        let casing = test_casing();
        let absurd = casing.pressure_for_thickness(0.3);
        assert_eq!(casing.inner_volume(absurd), 0.0);
        assert!((casing.mass(absurd) - 7800.0 * casing.outer_volume()).abs() < 1e-6);
    }

    #[test]
    fn test_set_dimensions_rejects_bad_geometry() {
        let mut casing = test_casing();
        assert!(casing.set_dimensions(0.3, 0.5).is_err());
        assert_eq!(casing.length(), 2.0);
        assert!(casing.set_dimensions(3.0, 0.6).is_ok());
        assert!((casing.cylinder_length() - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_named_design() {
        let catalog = crate::catalog::Catalog::builtin().unwrap();
        let design = CasingDesign {
            label: "Stand".to_string(),
            casing_material: "Steel 4130".to_string(),
            length_m: 1.5,
            diameter_m: 0.3,
            pressure_pa: 7.0e6,
        };
        let result = calculate(&design, &catalog).unwrap();
        assert_eq!(result.material, "Steel 4130");
        assert!(result.wall_thickness_m > result.thickness_m);

        let bad = CasingDesign { pressure_pa: -1.0, ..design };
        assert_eq!(calculate(&bad, &catalog).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_size_snapshot() {
        let result = test_casing().size(5.0e6);
        assert_eq!(result.max_allowable_working_pressure_pa, 5.0e6);
        assert!(result.thickness_m < result.diameter_m / 2.0);
        assert!(result.passes());

        let json = serde_json::to_string(&result).unwrap();
        let back: CasingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.material, "Steel");
    }
}
