//! # Model Catalog
//!
//! Named propellant, grain, casing material, nozzle and curve records,
//! loaded from TOML and shared read-only through [`Arc`]s.
//!
//! ## File Format
//!
//! ```toml
//! [[propellant]]
//! name = "APCP"
//! burn_rate_coeff = 2.0e-5
//! burn_rate_exponent = 0.35
//! density = 1750.0
//! heat_capacity_ratio = 1.21
//! characteristic_velocity = 1550.0
//!
//! [[grain]]
//! name = "BATES"
//! burn_area_scale = 0.54
//! propellant_fraction = 0.82
//!
//! [[curve]]
//! name = "sea-level-atm"
//! keys = [[0.0, 1.0], [1.0, 0.92]]
//! ```
//!
//! A propellant may omit `characteristic_velocity` if it gives
//! `molar_mass` (g/mol) and `combustion_temperature` (K).
//!
//! ## Example
//!
//! ```rust
//! use motor_core::catalog::{Catalog, ModelLookup};
//! use motor_core::models::ModelKind;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let apcp = catalog.propellant("APCP").unwrap();
//! assert_eq!(apcp.burn_rate_exponent, 0.35);
//! assert!(catalog.names(ModelKind::Nozzle).contains(&"Bell SL"));
//! assert!(catalog.propellant("Unobtainium").is_err());
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::curves::{CurveEvaluator, CurveRef, FloatCurve};
use crate::errors::{CalcError, CalcResult};
use crate::models::{CasingMaterialModel, GrainGeometryModel, ModelKind, NozzleModel, PropellantModel};

const BUILTIN_CATALOG: &str = include_str!("../assets/default_catalog.toml");

/// Resolve model names to shared records.
///
/// Implemented by [`Catalog`]; hosts with their own storage can implement it
/// to drive [`crate::calculations::motor::calculate`] directly.
pub trait ModelLookup {
    fn propellant(&self, name: &str) -> CalcResult<Arc<PropellantModel>>;
    fn grain(&self, name: &str) -> CalcResult<Arc<GrainGeometryModel>>;
    fn casing_material(&self, name: &str) -> CalcResult<Arc<CasingMaterialModel>>;
    fn nozzle(&self, name: &str) -> CalcResult<Arc<NozzleModel>>;
}

/// Propellant as written in a catalog file; c* is optional here.
#[derive(Debug, Deserialize)]
struct PropellantRecord {
    name: String,
    burn_rate_coeff: f64,
    burn_rate_exponent: f64,
    density: f64,
    heat_capacity_ratio: f64,
    #[serde(default)]
    characteristic_velocity: Option<f64>,
    #[serde(default)]
    molar_mass: f64,
    #[serde(default)]
    combustion_temperature: f64,
}

impl PropellantRecord {
    fn into_model(self) -> CalcResult<PropellantModel> {
        match self.characteristic_velocity {
            Some(c_star) => {
                let mut model = PropellantModel::new(
                    self.name,
                    self.burn_rate_coeff,
                    self.burn_rate_exponent,
                    self.density,
                    self.heat_capacity_ratio,
                    c_star,
                );
                model.molar_mass = self.molar_mass;
                model.combustion_temperature = self.combustion_temperature;
                Ok(model)
            }
            None => PropellantModel::from_thermochemistry(
                self.name,
                self.burn_rate_coeff,
                self.burn_rate_exponent,
                self.density,
                self.heat_capacity_ratio,
                self.molar_mass,
                self.combustion_temperature,
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    propellant: Vec<PropellantRecord>,
    #[serde(default)]
    grain: Vec<GrainGeometryModel>,
    #[serde(default)]
    casing_material: Vec<CasingMaterialModel>,
    #[serde(default)]
    nozzle: Vec<NozzleModel>,
    #[serde(default)]
    curve: Vec<FloatCurve>,
}

/// In-memory catalog keyed by record name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    propellants: HashMap<String, Arc<PropellantModel>>,
    grains: HashMap<String, Arc<GrainGeometryModel>>,
    casing_materials: HashMap<String, Arc<CasingMaterialModel>>,
    nozzles: HashMap<String, Arc<NozzleModel>>,
    curves: HashMap<String, FloatCurve>,
}

fn insert_unique<T>(map: &mut HashMap<String, T>, kind: ModelKind, name: &str, value: T) -> CalcResult<()> {
    if map.contains_key(name) {
        return Err(CalcError::DuplicateModel {
            kind: kind.to_string(),
            name: name.to_string(),
        });
    }
    map.insert(name.to_string(), value);
    Ok(())
}

fn find<T: Clone>(map: &HashMap<String, T>, kind: ModelKind, name: &str) -> CalcResult<T> {
    map.get(name)
        .cloned()
        .ok_or_else(|| CalcError::model_not_found(kind.display_name(), name))
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate
    pub fn builtin() -> CalcResult<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog from TOML text.
    ///
    /// Every record is validated, names must be unique per kind, and every
    /// curve a model references must be defined in the same file.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let file: CatalogFile = toml::from_str(text).map_err(CalcError::serialization)?;
        let mut catalog = Catalog::new();

        // Curves first so model references can be checked as they arrive
        for curve in file.curve {
            catalog.insert_curve(curve)?;
        }
        for record in file.propellant {
            catalog.insert_propellant(record.into_model()?)?;
        }
        for grain in file.grain {
            catalog.insert_grain(grain)?;
        }
        for material in file.casing_material {
            catalog.insert_casing_material(material)?;
        }
        for nozzle in file.nozzle {
            catalog.insert_nozzle(nozzle)?;
        }
        Ok(catalog)
    }

    /// Load a catalog file from disk
    pub fn load(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn insert_propellant(&mut self, model: PropellantModel) -> CalcResult<()> {
        model.validate()?;
        let name = model.name.clone();
        insert_unique(&mut self.propellants, ModelKind::Propellant, &name, Arc::new(model))
    }

    pub fn insert_grain(&mut self, model: GrainGeometryModel) -> CalcResult<()> {
        model.validate()?;
        if let Some(curve) = &model.thrust_curve {
            self.curve(curve.name())?;
        }
        let name = model.name.clone();
        insert_unique(&mut self.grains, ModelKind::Grain, &name, Arc::new(model))
    }

    pub fn insert_casing_material(&mut self, model: CasingMaterialModel) -> CalcResult<()> {
        model.validate()?;
        let name = model.name.clone();
        insert_unique(&mut self.casing_materials, ModelKind::CasingMaterial, &name, Arc::new(model))
    }

    pub fn insert_nozzle(&mut self, model: NozzleModel) -> CalcResult<()> {
        model.validate()?;
        if let Some(curve) = &model.atmosphere_curve {
            self.curve(curve.name())?;
        }
        let name = model.name.clone();
        insert_unique(&mut self.nozzles, ModelKind::Nozzle, &name, Arc::new(model))
    }

    pub fn insert_curve(&mut self, mut curve: FloatCurve) -> CalcResult<()> {
        curve.normalize()?;
        let name = curve.name.clone();
        insert_unique(&mut self.curves, ModelKind::Curve, &name, curve)
    }

    pub fn curve(&self, name: &str) -> CalcResult<&FloatCurve> {
        self.curves
            .get(name)
            .ok_or_else(|| CalcError::model_not_found(ModelKind::Curve.display_name(), name))
    }

    /// Sorted record names of one kind
    pub fn names(&self, kind: ModelKind) -> Vec<&str> {
        let mut names: Vec<&str> = match kind {
            ModelKind::Propellant => self.propellants.keys().map(String::as_str).collect(),
            ModelKind::Grain => self.grains.keys().map(String::as_str).collect(),
            ModelKind::CasingMaterial => self.casing_materials.keys().map(String::as_str).collect(),
            ModelKind::Nozzle => self.nozzles.keys().map(String::as_str).collect(),
            ModelKind::Curve => self.curves.keys().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names
    }

    /// Total number of records of every kind
    pub fn len(&self) -> usize {
        self.propellants.len() + self.grains.len() + self.casing_materials.len() + self.nozzles.len() + self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModelLookup for Catalog {
    fn propellant(&self, name: &str) -> CalcResult<Arc<PropellantModel>> {
        find(&self.propellants, ModelKind::Propellant, name)
    }

    fn grain(&self, name: &str) -> CalcResult<Arc<GrainGeometryModel>> {
        find(&self.grains, ModelKind::Grain, name)
    }

    fn casing_material(&self, name: &str) -> CalcResult<Arc<CasingMaterialModel>> {
        find(&self.casing_materials, ModelKind::CasingMaterial, name)
    }

    fn nozzle(&self, name: &str) -> CalcResult<Arc<NozzleModel>> {
        find(&self.nozzles, ModelKind::Nozzle, name)
    }
}

impl CurveEvaluator for Catalog {
    fn evaluate(&self, curve: &CurveRef, x: f64) -> CalcResult<f64> {
        Ok(self.curve(curve.name())?.evaluate(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.names(ModelKind::Propellant), vec!["APCP", "APCP-Al", "KNDX", "KNSB"]);
        assert_eq!(catalog.names(ModelKind::Grain).len(), 3);
        assert_eq!(catalog.names(ModelKind::CasingMaterial).len(), 3);
        assert_eq!(catalog.names(ModelKind::Nozzle).len(), 3);
        assert_eq!(catalog.names(ModelKind::Curve).len(), 4);
    }

    #[test]
    fn test_derived_c_star() {
        let catalog = Catalog::builtin().unwrap();
        let al = catalog.propellant("APCP-Al").unwrap();
        // γ = 1.18, M = 29.3 g/mol, Tc = 3400 K gives about 1524 m/s
        assert!((al.characteristic_velocity - 1524.0).abs() < 2.0);
    }

    #[test]
    fn test_lookup_shares_records() {
        let catalog = Catalog::builtin().unwrap();
        let a = catalog.nozzle("Bell SL").unwrap();
        let b = catalog.nozzle("Bell SL").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_missing_model() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog.casing_material("Titanium").unwrap_err();
        assert_eq!(err.error_code(), "MODEL_NOT_FOUND");
        assert_eq!(err.to_string(), "Casing material not found: Titanium");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = r#"
            [[nozzle]]
            name = "Bell"
            nozzle_coeff = 0.95

            [[nozzle]]
            name = "Bell"
            nozzle_coeff = 0.9
        "#;
        let err = Catalog::from_toml_str(text).unwrap_err();
        assert!(matches!(err, CalcError::DuplicateModel { ref name, .. } if name == "Bell"));
    }

    #[test]
    fn test_invalid_propellant_rejected_at_load() {
        let text = r#"
            [[propellant]]
            name = "Runaway"
            burn_rate_coeff = 5e-6
            burn_rate_exponent = 1.0
            density = 1800.0
            heat_capacity_ratio = 1.2
            characteristic_velocity = 1500.0
        "#;
        let err = Catalog::from_toml_str(text).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PROPELLANT_PARAMETERS");
    }

    #[test]
    fn test_propellant_without_c_star_or_thermochemistry() {
        let text = r#"
            [[propellant]]
            name = "Mystery"
            burn_rate_coeff = 5e-6
            burn_rate_exponent = 0.3
            density = 1800.0
            heat_capacity_ratio = 1.2
        "#;
        assert!(Catalog::from_toml_str(text).is_err());
    }

    #[test]
    fn test_dangling_curve_reference() {
        let text = r#"
            [[grain]]
            name = "BATES"
            burn_area_scale = 0.5
            propellant_fraction = 0.8
            thrust_curve = "nowhere"
        "#;
        let err = Catalog::from_toml_str(text).unwrap_err();
        assert!(matches!(err, CalcError::ModelNotFound { ref name, .. } if name == "nowhere"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Catalog::from_toml_str("[[propellant]\nname = ").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_curve_evaluation() {
        let catalog = Catalog::builtin().unwrap();
        let sl = CurveRef::new("sea-level-atm");
        assert_eq!(catalog.evaluate(&sl, 0.0).unwrap(), 1.0);
        assert!((catalog.evaluate(&sl, 1.0).unwrap() - 0.92).abs() < 1e-12);
        assert!(catalog.evaluate(&CurveRef::new("missing"), 0.5).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("motor_catalog_{}.toml", std::process::id()));
        std::fs::write(&path, BUILTIN_CATALOG).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.grain("BATES").is_ok());
        std::fs::remove_file(&path).ok();

        let err = Catalog::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
