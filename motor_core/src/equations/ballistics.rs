//! # Interior Ballistics Formulas
//!
//! Steady-state relations for a solid motor operating at a single chamber
//! pressure. Two independent mass-flow expressions meet at the operating
//! point:
//!
//! ```text
//!   propellant regression     ṁ = ρ · Ab · a · Pⁿ
//!   choked nozzle throat      ṁ = P · At / c*
//! ```
//!
//! Equating them gives the chamber pressure for a given throat, or the
//! throat for a given pressure. The inversions divide by `n` or `1 − n`, so
//! callers must have validated `0 < n < 1` before reaching these functions.
//!
//! ## Notation
//!
//! - `a`, `n` = Saint-Robert burn-rate coefficient and exponent (r = a·Pⁿ)
//! - `ρ` = propellant density (kg/m³)
//! - `Ab` = burning surface area (m²)
//! - `At` = nozzle throat area (m²)
//! - `c*` = characteristic velocity (m/s)
//! - `γ` = ratio of specific heats
//! - `P` = chamber pressure (Pa), `Pd` = nozzle design back-pressure (Pa)
//!
//! ## References
//!
//! - Sutton & Biblarz, Rocket Propulsion Elements, 9th Ed., Ch. 3 and 12

use std::f64::consts::PI;

/// Standard gravity used for Isp conversions (m/s²)
pub const G0: f64 = 9.81;

/// Universal gas constant (J/(mol·K))
pub const R_UNIVERSAL: f64 = 8.31446261815324;

// =============================================================================
// BURNING SURFACE AND REGRESSION
// =============================================================================

/// Effective burning area of a grain filling a cylinder
///
/// # Formula
/// Ab = π · D · L · k
///
/// where `k` converts the lateral cylinder area into the area actually
/// burning for the grain geometry.
#[inline]
pub fn burn_area(diameter: f64, length: f64, burn_area_scale: f64) -> f64 {
    PI * diameter * length * burn_area_scale
}

/// Saint-Robert burn rate r = a·Pⁿ (m/s)
#[inline]
pub fn burn_rate(burn_rate_coeff: f64, burn_rate_exponent: f64, pressure: f64) -> f64 {
    burn_rate_coeff * pressure.powf(burn_rate_exponent)
}

/// Mass generated by the regressing grain surface
///
/// # Formula
/// ṁ = ρ · Ab · a · Pⁿ
#[inline]
pub fn regression_mass_flow(
    density: f64,
    burn_area: f64,
    burn_rate_coeff: f64,
    burn_rate_exponent: f64,
    pressure: f64,
) -> f64 {
    density * burn_area * burn_rate(burn_rate_coeff, burn_rate_exponent, pressure)
}

// =============================================================================
// CHOKED NOZZLE
// =============================================================================

/// Mass flow through a choked throat
///
/// # Formula
/// ṁ = P · At / c*
#[inline]
pub fn choked_mass_flow(pressure: f64, throat_area: f64, characteristic_velocity: f64) -> f64 {
    pressure * throat_area / characteristic_velocity
}

/// Throat area that holds the chamber at `pressure`
///
/// # Formula
/// At = Ab · ρ · a · c* / P^(1−n)
///
/// # Example
/// ```rust
/// use motor_core::equations::ballistics::{throat_area_for_pressure, pressure_for_throat_area};
///
/// let at = throat_area_for_pressure(1.5, 1800.0, 5e-6, 0.35, 1500.0, 5.0e6);
/// let p = pressure_for_throat_area(1.5, at, 1800.0, 5e-6, 0.35, 1500.0);
/// assert!((p - 5.0e6).abs() / 5.0e6 < 1e-9);
/// ```
#[inline]
pub fn throat_area_for_pressure(
    burn_area: f64,
    density: f64,
    burn_rate_coeff: f64,
    burn_rate_exponent: f64,
    characteristic_velocity: f64,
    pressure: f64,
) -> f64 {
    burn_area * density * burn_rate_coeff * characteristic_velocity
        / pressure.powf(1.0 - burn_rate_exponent)
}

/// Equilibrium chamber pressure for a fixed throat
///
/// # Formula
/// P = (Ab/At · ρ · a · c*)^(1/(1−n))
#[inline]
pub fn pressure_for_throat_area(
    burn_area: f64,
    throat_area: f64,
    density: f64,
    burn_rate_coeff: f64,
    burn_rate_exponent: f64,
    characteristic_velocity: f64,
) -> f64 {
    (burn_area / throat_area * density * burn_rate_coeff * characteristic_velocity)
        .powf(1.0 / (1.0 - burn_rate_exponent))
}

/// Chamber pressure at which the grain produces `mass_flow`
///
/// # Formula
/// P = (ṁ / (Ab · ρ · a))^(1/n)
#[inline]
pub fn pressure_for_mass_flow(
    mass_flow: f64,
    burn_area: f64,
    density: f64,
    burn_rate_coeff: f64,
    burn_rate_exponent: f64,
) -> f64 {
    (mass_flow / (burn_area * density * burn_rate_coeff)).powf(1.0 / burn_rate_exponent)
}

// =============================================================================
// PERFORMANCE
// =============================================================================

/// Specific impulse without ambient correction
///
/// # Formula
/// Isp = Cn · c* / g0
#[inline]
pub fn specific_impulse(nozzle_coeff: f64, characteristic_velocity: f64) -> f64 {
    nozzle_coeff * characteristic_velocity / G0
}

/// Thrust F = g0 · Isp · ṁ
#[inline]
pub fn thrust(isp: f64, mass_flow: f64) -> f64 {
    G0 * isp * mass_flow
}

/// Mass flow required for a thrust, ṁ = F / (g0 · Isp)
#[inline]
pub fn mass_flow_for_thrust(thrust: f64, isp: f64) -> f64 {
    thrust / (G0 * isp)
}

/// Nozzle area ratio for ideal expansion from `pressure` down to
/// `design_pressure`
///
/// # Formula
/// ```text
/// ε = 1 / [ ((γ+1)/2)^(1/(γ−1)) · (Pd/P)^(1/γ) · √( (γ+1)/(γ−1) · (1 − (Pd/P)^((γ−1)/γ)) ) ]
/// ```
///
/// Returns `None` when the chamber is not above the design pressure, where
/// no divergent section can expand the flow.
pub fn expansion_ratio(pressure: f64, design_pressure: f64, gamma: f64) -> Option<f64> {
    if pressure <= design_pressure {
        return None;
    }
    let pr = design_pressure / pressure;
    let gp1 = gamma + 1.0;
    let gm1 = gamma - 1.0;

    let denom = (gp1 / 2.0).powf(1.0 / gm1)
        * pr.powf(1.0 / gamma)
        * (gp1 / gm1 * (1.0 - pr.powf(gm1 / gamma))).sqrt();
    Some(1.0 / denom)
}

// =============================================================================
// THERMOCHEMISTRY
// =============================================================================

/// Characteristic velocity from combustion products
///
/// # Formula
/// ```text
/// c* = √(γ·R·Tc/M) / ( γ · √( (2/(γ+1))^((γ+1)/(γ−1)) ) )
/// ```
///
/// # Arguments
/// * `gamma` - Ratio of specific heats
/// * `molar_mass_kg_mol` - Mean molar mass of the products (kg/mol)
/// * `combustion_temperature` - Adiabatic flame temperature (K)
pub fn characteristic_velocity(gamma: f64, molar_mass_kg_mol: f64, combustion_temperature: f64) -> f64 {
    let numerator = (gamma * R_UNIVERSAL * combustion_temperature / molar_mass_kg_mol).sqrt();
    let choke = (2.0 / (gamma + 1.0)).powf((gamma + 1.0) / (gamma - 1.0));
    numerator / (gamma * choke.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RHO: f64 = 1800.0;
    const A: f64 = 5e-6;
    const N: f64 = 0.35;
    const C_STAR: f64 = 1500.0;

    #[test]
    fn test_burn_area() {
        // π · 0.5 · 2 · 0.5 = π/2
        assert!((burn_area(0.5, 2.0, 0.5) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mass_flow_expressions_agree() {
        let ab = burn_area(0.5, 2.0, 0.5);
        let p = 5.0e6;
        let at = throat_area_for_pressure(ab, RHO, A, N, C_STAR, p);

        let from_grain = regression_mass_flow(RHO, ab, A, N, p);
        let from_throat = choked_mass_flow(p, at, C_STAR);
        assert!((from_grain - from_throat).abs() / from_grain < 1e-12);
    }

    #[test]
    fn test_pressure_from_mass_flow_inverts_regression() {
        let ab = 1.2;
        let p = 7.0e6;
        let mdot = regression_mass_flow(RHO, ab, A, N, p);
        let back = pressure_for_mass_flow(mdot, ab, RHO, A, N);
        assert!((back - p).abs() / p < 1e-9);
    }

    #[test]
    fn test_isp_and_thrust() {
        let isp = specific_impulse(0.95, C_STAR);
        // 0.95 · 1500 / 9.81 = 145.26 s
        assert!((isp - 145.26).abs() < 0.01);

        let f = thrust(isp, 10.0);
        assert!((f - 0.95 * C_STAR * 10.0).abs() < 1e-9);
        assert!((mass_flow_for_thrust(f, isp) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_expansion_ratio_reference_value() {
        // γ = 1.2, P/Pd = 50 gives ε ≈ 7.05
        let eps = expansion_ratio(50.0 * 101_325.0, 101_325.0, 1.2).unwrap();
        assert!((eps - 7.05).abs() < 0.05, "eps = {}", eps);
    }

    #[test]
    fn test_expansion_ratio_grows_with_pressure() {
        let low = expansion_ratio(2.0e6, 101_325.0, 1.2).unwrap();
        let high = expansion_ratio(8.0e6, 101_325.0, 1.2).unwrap();
        assert!(high > low);
        assert!(low > 1.0);
    }

    #[test]
    fn test_expansion_ratio_rejects_low_chamber() {
        assert!(expansion_ratio(101_325.0, 101_325.0, 1.2).is_none());
        assert!(expansion_ratio(50_000.0, 101_325.0, 1.2).is_none());
    }

    #[test]
    fn test_characteristic_velocity_typical_apcp() {
        // γ = 1.2, M = 25 g/mol, Tc = 3000 K gives c* near 1500 m/s
        let c = characteristic_velocity(1.2, 0.025, 3000.0);
        assert!(c > 1400.0 && c < 1650.0, "c* = {}", c);
    }
}
