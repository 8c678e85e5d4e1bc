//! # Propellant Formulations
//!
//! Burn-rate law coefficients and combustion constants for one propellant.
//!
//! ## Units
//!
//! - `burn_rate_coeff` is `a` in r = a·Pⁿ with P in Pa and r in m/s
//! - `molar_mass` is in g/mol (as published in propellant tables)
//! - everything else is base SI
//!
//! ## Example
//!
//! ```rust
//! use motor_core::models::PropellantModel;
//!
//! let apcp = PropellantModel::new("APCP", 5e-6, 0.35, 1800.0, 1.2, 1500.0);
//! assert!(apcp.validate().is_ok());
//!
//! let bad = PropellantModel::new("Runaway", 5e-6, 1.0, 1800.0, 1.2, 1500.0);
//! assert!(bad.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::ballistics;
use crate::errors::{CalcError, CalcResult};

/// Immutable propellant record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "APCP",
///   "burn_rate_coeff": 5e-6,
///   "burn_rate_exponent": 0.35,
///   "density": 1800.0,
///   "heat_capacity_ratio": 1.2,
///   "characteristic_velocity": 1500.0,
///   "molar_mass": 25.0,
///   "combustion_temperature": 3000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropellantModel {
    /// Catalog name
    pub name: String,

    /// Saint-Robert coefficient `a` (m/s per Paⁿ)
    pub burn_rate_coeff: f64,

    /// Saint-Robert exponent `n`, strictly between 0 and 1
    pub burn_rate_exponent: f64,

    /// Propellant density (kg/m³)
    pub density: f64,

    /// Ratio of specific heats γ of the combustion products
    pub heat_capacity_ratio: f64,

    /// Characteristic velocity c* (m/s)
    pub characteristic_velocity: f64,

    /// Mean molar mass of the products (g/mol), 0 if unknown
    #[serde(default)]
    pub molar_mass: f64,

    /// Adiabatic flame temperature (K), 0 if unknown
    #[serde(default)]
    pub combustion_temperature: f64,
}

impl PropellantModel {
    /// Create a propellant with a known c*.
    pub fn new(
        name: impl Into<String>,
        burn_rate_coeff: f64,
        burn_rate_exponent: f64,
        density: f64,
        heat_capacity_ratio: f64,
        characteristic_velocity: f64,
    ) -> Self {
        PropellantModel {
            name: name.into(),
            burn_rate_coeff,
            burn_rate_exponent,
            density,
            heat_capacity_ratio,
            characteristic_velocity,
            molar_mass: 0.0,
            combustion_temperature: 0.0,
        }
    }

    /// Create a propellant whose c* is derived from its combustion products.
    ///
    /// `molar_mass` is in g/mol.
    pub fn from_thermochemistry(
        name: impl Into<String>,
        burn_rate_coeff: f64,
        burn_rate_exponent: f64,
        density: f64,
        heat_capacity_ratio: f64,
        molar_mass: f64,
        combustion_temperature: f64,
    ) -> CalcResult<Self> {
        let mut model = PropellantModel {
            name: name.into(),
            burn_rate_coeff,
            burn_rate_exponent,
            density,
            heat_capacity_ratio,
            characteristic_velocity: 0.0,
            molar_mass,
            combustion_temperature,
        };
        model.characteristic_velocity = model.derived_characteristic_velocity()?;
        model.validate()?;
        Ok(model)
    }

    /// c* computed from γ, molar mass and flame temperature.
    ///
    /// Fails when the thermochemistry fields are missing or γ ≤ 1.
    pub fn derived_characteristic_velocity(&self) -> CalcResult<f64> {
        if !(self.heat_capacity_ratio > 1.0) {
            return Err(self.reject("heat_capacity_ratio", self.heat_capacity_ratio, "Must be greater than 1"));
        }
        if !(self.molar_mass > 0.0) {
            return Err(self.reject("molar_mass", self.molar_mass, "Needed to derive c*; must be positive"));
        }
        if !(self.combustion_temperature > 0.0) {
            return Err(self.reject(
                "combustion_temperature",
                self.combustion_temperature,
                "Needed to derive c*; must be positive",
            ));
        }
        Ok(ballistics::characteristic_velocity(
            self.heat_capacity_ratio,
            self.molar_mass / 1000.0,
            self.combustion_temperature,
        ))
    }

    /// Validate the constants the solver inverts.
    ///
    /// The `!(x > 0.0)` form also rejects NaN.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.burn_rate_coeff > 0.0) || !self.burn_rate_coeff.is_finite() {
            return Err(self.reject("burn_rate_coeff", self.burn_rate_coeff, "Must be positive and finite"));
        }
        if !(self.burn_rate_exponent > 0.0 && self.burn_rate_exponent < 1.0) {
            return Err(self.reject(
                "burn_rate_exponent",
                self.burn_rate_exponent,
                "Must be strictly between 0 and 1 for a stable operating point",
            ));
        }
        if !(self.density > 0.0) || !self.density.is_finite() {
            return Err(self.reject("density", self.density, "Must be positive"));
        }
        if !(self.heat_capacity_ratio > 1.0) || !self.heat_capacity_ratio.is_finite() {
            return Err(self.reject("heat_capacity_ratio", self.heat_capacity_ratio, "Must be greater than 1"));
        }
        if !(self.characteristic_velocity > 0.0) || !self.characteristic_velocity.is_finite() {
            return Err(self.reject(
                "characteristic_velocity",
                self.characteristic_velocity,
                "Must be positive",
            ));
        }
        if self.molar_mass < 0.0 || self.combustion_temperature < 0.0 {
            return Err(self.reject(
                "molar_mass",
                self.molar_mass.min(self.combustion_temperature),
                "Thermochemistry values cannot be negative",
            ));
        }
        Ok(())
    }

    /// Regression rate at `pressure` (m/s)
    pub fn burn_rate(&self, pressure: f64) -> f64 {
        ballistics::burn_rate(self.burn_rate_coeff, self.burn_rate_exponent, pressure)
    }

    pub fn display_name(&self) -> String {
        format!("{} (n = {:.2}, c* = {:.0} m/s)", self.name, self.burn_rate_exponent, self.characteristic_velocity)
    }

    fn reject(&self, field: &str, value: f64, reason: &str) -> CalcError {
        CalcError::invalid_propellant(self.name.clone(), field, value.to_string(), reason)
    }
}

impl std::fmt::Display for PropellantModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
