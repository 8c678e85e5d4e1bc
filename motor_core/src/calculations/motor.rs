//! # Motor Solver
//!
//! Steady-state operating point of a solid motor whose grain fills a
//! pill-shaped casing.
//!
//! Exactly one of thrust, throat area or chamber pressure is held fixed
//! (the [`IndependentVariable`]); the other two follow from the burn-rate
//! law, choked nozzle flow and the Isp relation:
//!
//! | Held fixed        | Derived                                                 |
//! |-------------------|---------------------------------------------------------|
//! | chamber pressure  | At = Ab·ρ·a·c*/P^(1−n), ṁ = ρ·Ab·a·Pⁿ                    |
//! | throat area       | P = (Ab/At·ρ·a·c*)^(1/(1−n)), ṁ = P·At/c*                 |
//! | thrust            | ṁ = F/(g0·Isp), P = (ṁ/(Ab·ρ·a))^(1/n), At from P         |
//!
//! All three agree on a single operating point, so switching modes with the
//! current derived value as input leaves every output unchanged.
//!
//! Masses and volumes come from the owned [`Casing`], sized for whatever
//! chamber pressure the current mode produces.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use motor_core::calculations::motor::{IndependentVariable, MotorSolver};
//! use motor_core::models::{CasingMaterialModel, GrainGeometryModel, NozzleModel, PropellantModel};
//! use motor_core::units::Pascals;
//!
//! let solver = MotorSolver::new(
//!     Arc::new(PropellantModel::new("APCP", 5e-6, 0.35, 1800.0, 1.2, 1500.0)),
//!     Arc::new(GrainGeometryModel::new("BATES", 0.5, 0.85)),
//!     Arc::new(CasingMaterialModel::new("Steel", 7800.0, 6.0e8).with_weld_eff(0.9).with_safety_factor(1.5)),
//!     Arc::new(NozzleModel::new("Bell", 0.95)),
//!     2.0,
//!     0.5,
//!     IndependentVariable::ChamberPressure(Pascals(5.0e6)),
//! )
//! .unwrap();
//!
//! let result = solver.solve();
//! assert!(result.thrust_n > 4000.0 && result.thrust_n < 5000.0);
//! assert!(result.burn_time_s > 0.0);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::casing::{validate_geometry, Casing, CasingEnvelope, CasingResult, EnvelopeViolation};
use crate::catalog::ModelLookup;
use crate::curves::CurveRef;
use crate::equations::ballistics::{self, G0};
use crate::errors::{CalcError, CalcResult};
use crate::models::{CasingMaterialModel, GrainGeometryModel, NozzleModel, PropellantModel};
use crate::units::{Newtons, Pascals, SquareMeters};

/// Thrust that 100 % on the throttle scale maps to (N)
pub const REFERENCE_MAX_THRUST_N: f64 = 1.0e8;

// ============================================================================
// Independent Variable
// ============================================================================

/// The quantity held fixed while the others are derived.
///
/// Serializes as `{"mode": "ChamberPressure", "value": 5000000.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value")]
pub enum IndependentVariable {
    /// Mode C: required thrust
    Thrust(Newtons),
    /// Mode B: fixed nozzle throat
    ThroatArea(SquareMeters),
    /// Mode A: target chamber pressure
    ChamberPressure(Pascals),
    /// Thrust as a percentage of [`REFERENCE_MAX_THRUST_N`]
    ThrustPercent(f64),
}

impl IndependentVariable {
    /// Build from a set of optional inputs, exactly one of which must be set.
    ///
    /// This is the boundary for hosts that collect each quantity in its own
    /// field.
    ///
    /// ```rust
    /// use motor_core::calculations::motor::IndependentVariable;
    ///
    /// assert!(IndependentVariable::from_flags(None, None, Some(5.0e6), None).is_ok());
    /// assert!(IndependentVariable::from_flags(Some(4000.0), None, Some(5.0e6), None).is_err());
    /// assert!(IndependentVariable::from_flags(None, None, None, None).is_err());
    /// ```
    pub fn from_flags(
        thrust_n: Option<f64>,
        throat_area_m2: Option<f64>,
        chamber_pressure_pa: Option<f64>,
        thrust_percent: Option<f64>,
    ) -> CalcResult<Self> {
        let candidates = [
            thrust_n.map(|v| IndependentVariable::Thrust(Newtons(v))),
            throat_area_m2.map(|v| IndependentVariable::ThroatArea(SquareMeters(v))),
            chamber_pressure_pa.map(|v| IndependentVariable::ChamberPressure(Pascals(v))),
            thrust_percent.map(IndependentVariable::ThrustPercent),
        ];
        let mut selected = candidates.into_iter().flatten();

        let first = selected.next().ok_or_else(|| {
            CalcError::invalid_mode("No independent variable given; set one of thrust, throat area or chamber pressure")
        })?;
        if let Some(second) = selected.next() {
            return Err(CalcError::invalid_mode(format!(
                "Only one independent variable may be set, got {} and {}",
                first.name(),
                second.name()
            )));
        }
        first.validate()?;
        Ok(first)
    }

    /// The raw number in this mode's unit
    pub fn value(&self) -> f64 {
        match self {
            IndependentVariable::Thrust(f) => f.0,
            IndependentVariable::ThroatArea(a) => a.0,
            IndependentVariable::ChamberPressure(p) => p.0,
            IndependentVariable::ThrustPercent(pct) => *pct,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndependentVariable::Thrust(_) => "thrust",
            IndependentVariable::ThroatArea(_) => "throat area",
            IndependentVariable::ChamberPressure(_) => "chamber pressure",
            IndependentVariable::ThrustPercent(_) => "thrust percent",
        }
    }

    /// Must be positive and finite.
    pub fn validate(&self) -> CalcResult<()> {
        let v = self.value();
        if !(v > 0.0) || !v.is_finite() {
            return Err(CalcError::invalid_input(
                self.name(),
                v.to_string(),
                "Independent variable must be positive and finite",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Non-fatal findings attached to a solved design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details")]
pub enum DesignWarning {
    /// Casing outside its structural envelope
    StructuralEnvelope(EnvelopeViolation),
    /// Chamber not above the nozzle design pressure; expansion ratio
    /// reported as 1
    ChamberBelowDesignPressure {
        chamber_pressure_pa: f64,
        design_pressure_pa: f64,
    },
}

impl DesignWarning {
    pub fn description(&self) -> String {
        match self {
            DesignWarning::StructuralEnvelope(v) => v.description(),
            DesignWarning::ChamberBelowDesignPressure {
                chamber_pressure_pa,
                design_pressure_pa,
            } => format!(
                "Chamber pressure {:.0} Pa does not exceed nozzle design pressure {:.0} Pa",
                chamber_pressure_pa, design_pressure_pa
            ),
        }
    }
}

/// Snapshot of a solved motor.
///
/// ## JSON Example
///
/// ```json
/// {
///   "mode": { "mode": "ChamberPressure", "value": 5000000.0 },
///   "chamber_pressure_pa": 5000000.0,
///   "throat_area_m2": 0.000938,
///   "thrust_n": 4454.7,
///   "warnings": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorResult {
    pub mode: IndependentVariable,
    pub length_m: f64,
    pub diameter_m: f64,

    pub burn_area_m2: f64,
    pub chamber_pressure_pa: f64,
    pub throat_area_m2: f64,
    pub mass_flow_kg_s: f64,
    pub thrust_n: f64,
    pub thrust_percent: f64,
    pub specific_impulse_s: f64,
    pub expansion_ratio: f64,

    pub wet_volume_m3: f64,
    pub fuel_mass_kg: f64,
    pub dry_mass_kg: f64,
    pub total_mass_kg: f64,
    pub thrust_to_weight: f64,
    pub burn_time_s: f64,

    pub casing: CasingResult,
    pub warnings: Vec<DesignWarning>,
}

impl MotorResult {
    /// No warnings at all
    pub fn passes(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Turn the first structural violation into an error.
    pub fn require_within_envelope(self) -> CalcResult<Self> {
        let violation = self.warnings.iter().find_map(|w| match w {
            DesignWarning::StructuralEnvelope(v) => Some(*v),
            _ => None,
        });
        match violation {
            Some(v) => Err(v.into_error()),
            None => Ok(self),
        }
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Derived triple for the current mode
#[derive(Debug, Clone, Copy)]
struct OperatingPoint {
    chamber_pressure: f64,
    throat_area: f64,
    mass_flow: f64,
}

/// One motor design: shared models, an owned casing and the current mode.
///
/// Every query recomputes from the current state; the solver caches
/// nothing.
#[derive(Debug, Clone)]
pub struct MotorSolver {
    propellant: Arc<PropellantModel>,
    grain: Arc<GrainGeometryModel>,
    nozzle: Arc<NozzleModel>,
    casing: Casing,
    independent: IndependentVariable,
}

impl MotorSolver {
    /// Validate every input and build the solver.
    pub fn new(
        propellant: Arc<PropellantModel>,
        grain: Arc<GrainGeometryModel>,
        casing_material: Arc<CasingMaterialModel>,
        nozzle: Arc<NozzleModel>,
        length_m: f64,
        diameter_m: f64,
        independent: IndependentVariable,
    ) -> CalcResult<Self> {
        propellant.validate()?;
        grain.validate()?;
        nozzle.validate()?;
        independent.validate()?;
        let casing = Casing::new(casing_material, length_m, diameter_m)?;

        let solver = MotorSolver {
            propellant,
            grain,
            nozzle,
            casing,
            independent,
        };
        solver.check_operating_point()?;
        Ok(solver)
    }

    // --- configuration ----------------------------------------------------

    pub fn set_length(&mut self, length_m: f64) -> CalcResult<()> {
        self.set_dimensions(length_m, self.diameter())
    }

    pub fn set_diameter(&mut self, diameter_m: f64) -> CalcResult<()> {
        self.set_dimensions(self.length(), diameter_m)
    }

    /// Resize the casing; state is untouched on error.
    pub fn set_dimensions(&mut self, length_m: f64, diameter_m: f64) -> CalcResult<()> {
        let (old_length, old_diameter) = (self.length(), self.diameter());
        self.casing.set_dimensions(length_m, diameter_m)?;
        if let Err(e) = self.check_operating_point() {
            self.casing.set_dimensions(old_length, old_diameter)?;
            return Err(e);
        }
        Ok(())
    }

    /// Switch mode or change the held value; state is untouched on error.
    pub fn set_independent(&mut self, independent: IndependentVariable) -> CalcResult<()> {
        independent.validate()?;
        let previous = std::mem::replace(&mut self.independent, independent);
        if let Err(e) = self.check_operating_point() {
            self.independent = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn set_thrust(&mut self, thrust: Newtons) -> CalcResult<()> {
        self.set_independent(IndependentVariable::Thrust(thrust))
    }

    pub fn set_throat_area(&mut self, throat_area: SquareMeters) -> CalcResult<()> {
        self.set_independent(IndependentVariable::ThroatArea(throat_area))
    }

    pub fn set_chamber_pressure(&mut self, pressure: Pascals) -> CalcResult<()> {
        self.set_independent(IndependentVariable::ChamberPressure(pressure))
    }

    pub fn set_thrust_percent(&mut self, percent: f64) -> CalcResult<()> {
        self.set_independent(IndependentVariable::ThrustPercent(percent))
    }

    // --- accessors --------------------------------------------------------

    pub fn independent(&self) -> IndependentVariable {
        self.independent
    }

    pub fn length(&self) -> f64 {
        self.casing.length()
    }

    pub fn diameter(&self) -> f64 {
        self.casing.diameter()
    }

    pub fn propellant(&self) -> &PropellantModel {
        &self.propellant
    }

    pub fn grain(&self) -> &GrainGeometryModel {
        &self.grain
    }

    pub fn nozzle(&self) -> &NozzleModel {
        &self.nozzle
    }

    pub fn casing(&self) -> &Casing {
        &self.casing
    }

    /// Thrust-shape curve of the grain, if any, for the host to evaluate
    pub fn thrust_curve(&self) -> Option<&CurveRef> {
        self.grain.thrust_curve.as_ref()
    }

    /// Altitude correction curve of the nozzle, if any
    pub fn atmosphere_curve(&self) -> Option<&CurveRef> {
        self.nozzle.atmosphere_curve.as_ref()
    }

    // --- ballistics -------------------------------------------------------

    pub fn burn_area(&self) -> f64 {
        ballistics::burn_area(self.diameter(), self.length(), self.grain.burn_area_scale)
    }

    pub fn specific_impulse(&self) -> f64 {
        ballistics::specific_impulse(self.nozzle.nozzle_coeff, self.propellant.characteristic_velocity)
    }

    /// Target thrust for the thrust-driven modes
    fn held_thrust(&self) -> Option<f64> {
        match self.independent {
            IndependentVariable::Thrust(f) => Some(f.0),
            IndependentVariable::ThrustPercent(pct) => Some(pct / 100.0 * REFERENCE_MAX_THRUST_N),
            _ => None,
        }
    }

    fn operating_point(&self) -> OperatingPoint {
        let p = &self.propellant;
        let ab = self.burn_area();
        let (a, n, rho, c_star) = (p.burn_rate_coeff, p.burn_rate_exponent, p.density, p.characteristic_velocity);

        match self.independent {
            IndependentVariable::ChamberPressure(pc) => OperatingPoint {
                chamber_pressure: pc.0,
                throat_area: ballistics::throat_area_for_pressure(ab, rho, a, n, c_star, pc.0),
                mass_flow: ballistics::regression_mass_flow(rho, ab, a, n, pc.0),
            },
            IndependentVariable::ThroatArea(at) => {
                let pc = ballistics::pressure_for_throat_area(ab, at.0, rho, a, n, c_star);
                OperatingPoint {
                    chamber_pressure: pc,
                    throat_area: at.0,
                    mass_flow: ballistics::choked_mass_flow(pc, at.0, c_star),
                }
            }
            IndependentVariable::Thrust(_) | IndependentVariable::ThrustPercent(_) => {
                let thrust = self.held_thrust().unwrap_or_default();
                let mass_flow = ballistics::mass_flow_for_thrust(thrust, self.specific_impulse());
                let pc = ballistics::pressure_for_mass_flow(mass_flow, ab, rho, a, n);
                OperatingPoint {
                    chamber_pressure: pc,
                    throat_area: ballistics::throat_area_for_pressure(ab, rho, a, n, c_star, pc),
                    mass_flow,
                }
            }
        }
    }

    /// The mode inversions raise to 1/n and 1/(1−n), which overflow for
    /// exponents near 0 or 1 even when every input is valid.
    fn check_operating_point(&self) -> CalcResult<()> {
        let point = self.operating_point();
        for (quantity, value) in [
            ("chamber_pressure_pa", point.chamber_pressure),
            ("throat_area_m2", point.throat_area),
            ("mass_flow_kg_s", point.mass_flow),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::numerical_failure(
                    quantity,
                    value,
                    format!("Holding {} gives no finite positive operating point", self.independent.name()),
                ));
            }
        }
        Ok(())
    }

    pub fn chamber_pressure(&self) -> f64 {
        self.operating_point().chamber_pressure
    }

    pub fn throat_area(&self) -> f64 {
        self.operating_point().throat_area
    }

    pub fn mass_flow(&self) -> f64 {
        self.operating_point().mass_flow
    }

    pub fn thrust(&self) -> f64 {
        match self.held_thrust() {
            Some(f) => f,
            None => ballistics::thrust(self.specific_impulse(), self.mass_flow()),
        }
    }

    /// Thrust on the 0-100 % throttle scale
    pub fn thrust_percent(&self) -> f64 {
        match self.independent {
            IndependentVariable::ThrustPercent(pct) => pct,
            _ => self.thrust() / REFERENCE_MAX_THRUST_N * 100.0,
        }
    }

    /// Ideal area ratio down to the nozzle design pressure.
    ///
    /// Reported as 1 when the chamber does not exceed the design pressure.
    pub fn expansion_ratio(&self) -> f64 {
        ballistics::expansion_ratio(
            self.chamber_pressure(),
            self.nozzle.design_pressure_pa,
            self.propellant.heat_capacity_ratio,
        )
        .unwrap_or(1.0)
    }

    // --- masses -----------------------------------------------------------

    /// Casing wall mass at the current chamber pressure
    pub fn dry_mass(&self) -> f64 {
        self.casing.mass(self.chamber_pressure())
    }

    /// Propellant volume
    pub fn wet_volume(&self) -> f64 {
        self.casing.inner_volume(self.chamber_pressure()) * self.grain.propellant_fraction
    }

    pub fn fuel_mass(&self) -> f64 {
        self.wet_volume() * self.propellant.density
    }

    pub fn total_mass(&self) -> f64 {
        self.dry_mass() + self.fuel_mass()
    }

    pub fn thrust_to_weight(&self) -> f64 {
        self.thrust() / (G0 * self.total_mass())
    }

    /// Time to consume the fuel at the steady mass flow
    pub fn burn_time(&self) -> f64 {
        self.fuel_mass() / self.mass_flow()
    }

    // --- structure --------------------------------------------------------

    /// Hoop-stress wall thickness at the current chamber pressure
    pub fn casing_thickness(&self) -> f64 {
        self.casing.thickness(self.chamber_pressure())
    }

    pub fn casing_inner_volume(&self) -> f64 {
        self.casing.inner_volume(self.chamber_pressure())
    }

    pub fn envelope(&self) -> CasingEnvelope {
        self.casing.envelope()
    }

    pub fn warnings(&self) -> Vec<DesignWarning> {
        self.warnings_at(self.chamber_pressure())
    }

    fn warnings_at(&self, pressure: f64) -> Vec<DesignWarning> {
        let mut warnings: Vec<DesignWarning> = self
            .casing
            .check_envelope(pressure)
            .into_iter()
            .map(DesignWarning::StructuralEnvelope)
            .collect();

        if pressure <= self.nozzle.design_pressure_pa {
            warnings.push(DesignWarning::ChamberBelowDesignPressure {
                chamber_pressure_pa: pressure,
                design_pressure_pa: self.nozzle.design_pressure_pa,
            });
        }
        warnings
    }

    /// Compute every output once and collect them.
    ///
    /// The operating point is finite here: construction and every setter
    /// reject states whose mode inversion overflows.
    pub fn solve(&self) -> MotorResult {
        let op = self.operating_point();
        let pc = op.chamber_pressure;
        let isp = self.specific_impulse();

        let thrust_n = self.held_thrust().unwrap_or_else(|| ballistics::thrust(isp, op.mass_flow));
        let casing = self.casing.size(pc);
        let wet_volume_m3 = casing.inner_volume_m3 * self.grain.propellant_fraction;
        let fuel_mass_kg = wet_volume_m3 * self.propellant.density;
        let dry_mass_kg = casing.mass_kg;
        let total_mass_kg = dry_mass_kg + fuel_mass_kg;

        MotorResult {
            mode: self.independent,
            length_m: self.length(),
            diameter_m: self.diameter(),
            burn_area_m2: self.burn_area(),
            chamber_pressure_pa: pc,
            throat_area_m2: op.throat_area,
            mass_flow_kg_s: op.mass_flow,
            thrust_n,
            thrust_percent: self.thrust_percent(),
            specific_impulse_s: isp,
            expansion_ratio: ballistics::expansion_ratio(
                pc,
                self.nozzle.design_pressure_pa,
                self.propellant.heat_capacity_ratio,
            )
            .unwrap_or(1.0),
            wet_volume_m3,
            fuel_mass_kg,
            dry_mass_kg,
            total_mass_kg,
            thrust_to_weight: thrust_n / (G0 * total_mass_kg),
            burn_time_s: fuel_mass_kg / op.mass_flow,
            warnings: self.warnings_at(pc),
            casing,
        }
    }
}

// ============================================================================
// Named Designs
// ============================================================================

/// A motor described by catalog names, as stored in projects.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Booster",
///   "propellant": "APCP",
///   "grain": "BATES",
///   "casing_material": "Steel 4130",
///   "nozzle": "Bell SL",
///   "length_m": 2.0,
///   "diameter_m": 0.5,
///   "independent": { "mode": "ChamberPressure", "value": 5000000.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorDesign {
    /// User label (e.g., "Booster", "Upper stage")
    pub label: String,
    pub propellant: String,
    pub grain: String,
    pub casing_material: String,
    pub nozzle: String,
    pub length_m: f64,
    pub diameter_m: f64,
    pub independent: IndependentVariable,
}

impl MotorDesign {
    /// Check the numbers without resolving any names.
    pub fn validate(&self) -> CalcResult<()> {
        validate_geometry(self.length_m, self.diameter_m)?;
        self.independent.validate()
    }

    /// Resolve every model name and build a solver.
    pub fn build_solver(&self, lookup: &impl ModelLookup) -> CalcResult<MotorSolver> {
        MotorSolver::new(
            lookup.propellant(&self.propellant)?,
            lookup.grain(&self.grain)?,
            lookup.casing_material(&self.casing_material)?,
            lookup.nozzle(&self.nozzle)?,
            self.length_m,
            self.diameter_m,
            self.independent,
        )
    }
}

/// Solve a named design against a catalog.
pub fn calculate(design: &MotorDesign, lookup: &impl ModelLookup) -> CalcResult<MotorResult> {
    design.validate()?;
    Ok(design.build_solver(lookup)?.solve())
}

/// Solve several designs; each gets its own solver and its own result.
pub fn solve_many(designs: &[MotorDesign], lookup: &impl ModelLookup) -> Vec<CalcResult<MotorResult>> {
    designs.iter().map(|d| calculate(d, lookup)).collect()
}
