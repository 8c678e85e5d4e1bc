//! # Pressure Vessel Formulas
//!
//! Thin-wall relations for a "pill" casing: a cylindrical barrel closed by
//! two hemispherical domes of the same diameter.
//!
//! ```text
//!      ╭──┬──────────────────┬──╮
//!     │   │                  │   │  D
//!      ╰──┴──────────────────┴──╯
//!     ←───────────── L ────────────→
//!          ←──── L − D ─────→
//! ```
//!
//! ## Notation
//!
//! - `P` = internal pressure (Pa)
//! - `D` = outer diameter (m), `t` = wall thickness (m)
//! - `S` = allowable tensile stress (Pa)
//! - `E` = weld joint efficiency
//! - `SF` = safety factor
//! - `c` = corrosion allowance (m)
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Ed., Table 13.1
//! - ASME BPVC Section VIII Div. 1, UG-27

use std::f64::consts::PI;

/// Minimum wall thickness per meter of casing length
pub const MIN_THICKNESS_PER_LENGTH: f64 = 0.001;

/// Volume of a pill: one full sphere plus the cylindrical section
///
/// # Formula
/// V = π·d³/6 + π·d²·h/4
#[inline]
pub fn pill_volume(cylinder_length: f64, diameter: f64) -> f64 {
    let sphere = PI * diameter.powi(3) / 6.0;
    let cylinder = PI * diameter.powi(2) * cylinder_length / 4.0;
    sphere + cylinder
}

/// Wall thickness required to hold `pressure` (hoop stress)
///
/// # Formula
/// t = P · (D/2) · SF / (S · E)
///
/// # Example
/// ```rust
/// use motor_core::equations::vessel::{hoop_thickness, hoop_pressure};
///
/// let t = hoop_thickness(5.0e6, 0.5, 6.0e8, 0.9, 1.5);
/// let p = hoop_pressure(t, 0.5, 6.0e8, 0.9, 1.5);
/// assert!((p - 5.0e6).abs() < 1e-6);
/// ```
#[inline]
pub fn hoop_thickness(pressure: f64, diameter: f64, tensile_strength: f64, weld_eff: f64, safety_factor: f64) -> f64 {
    pressure * (diameter / 2.0) * safety_factor / (tensile_strength * weld_eff)
}

/// Pressure a wall of `thickness` can hold (inverse of [`hoop_thickness`])
///
/// # Formula
/// P = S · t · E / ((D/2) · SF)
#[inline]
pub fn hoop_pressure(thickness: f64, diameter: f64, tensile_strength: f64, weld_eff: f64, safety_factor: f64) -> f64 {
    tensile_strength * thickness * weld_eff / ((diameter / 2.0) * safety_factor)
}

/// Older thickness rule with the corrosion allowance folded in
///
/// # Formula
/// t = (P·(D − c) + 2·S·E·c) / (2·S·E + P)
///
/// Not an exact inverse of [`hoop_pressure`]; kept for comparison only.
#[inline]
pub fn legacy_thickness(pressure: f64, diameter: f64, tensile_strength: f64, weld_eff: f64, corrosion: f64) -> f64 {
    let se2 = 2.0 * tensile_strength * weld_eff;
    (pressure * (diameter - corrosion) + se2 * corrosion) / (se2 + pressure)
}

/// Smallest wall a casing of `length` may be built with
#[inline]
pub fn min_thickness_for_length(length: f64) -> f64 {
    length * MIN_THICKNESS_PER_LENGTH
}

/// Longest casing whose minimum wall still fits inside `max_thickness`
#[inline]
pub fn max_length_for_thickness(max_thickness: f64) -> f64 {
    max_thickness / MIN_THICKNESS_PER_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pill_volume_sphere_only() {
        // No barrel: just a 1 m sphere
        let v = pill_volume(0.0, 1.0);
        assert!((v - PI / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_pill_volume_with_barrel() {
        // 0.5 m diameter, 1.5 m barrel
        let v = pill_volume(1.5, 0.5);
        let expected = PI * 0.125 / 6.0 + PI * 0.25 * 1.5 / 4.0;
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hoop_thickness_value() {
        // 5e6 · 0.25 · 1.5 / (6e8 · 0.9) = 3.472 mm
        let t = hoop_thickness(5.0e6, 0.5, 6.0e8, 0.9, 1.5);
        assert!((t - 0.003472).abs() < 1e-6);
    }

    #[test]
    fn test_thickness_roundtrip() {
        for &t in &[1e-4, 2.5e-3, 0.01, 0.05] {
            let p = hoop_pressure(t, 0.8, 4.5e8, 0.85, 2.0);
            let back = hoop_thickness(p, 0.8, 4.5e8, 0.85, 2.0);
            assert!((back - t).abs() / t < 1e-12);
        }
    }

    #[test]
    fn test_legacy_thickness_without_corrosion() {
        // c = 0 reduces to t = P·D / (2SE + P)
        let t = legacy_thickness(5.0e6, 0.5, 6.0e8, 0.9, 0.0);
        let expected = 5.0e6 * 0.5 / (2.0 * 6.0e8 * 0.9 + 5.0e6);
        assert!((t - expected).abs() < 1e-12);
    }

    #[test]
    fn test_legacy_thickness_adds_allowance() {
        let bare = legacy_thickness(5.0e6, 0.5, 6.0e8, 0.9, 0.0);
        let corroded = legacy_thickness(5.0e6, 0.5, 6.0e8, 0.9, 0.002);
        assert!(corroded > bare);
    }

    #[test]
    fn test_length_floor_inverse() {
        let t = min_thickness_for_length(3.0);
        assert!((max_length_for_thickness(t) - 3.0).abs() < 1e-12);
    }
}
