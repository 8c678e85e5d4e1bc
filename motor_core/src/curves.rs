//! # Curves
//!
//! Thrust-shape and altitude-correction curves are owned by whoever loads
//! the catalog. Models only hold a [`CurveRef`] naming the curve; anything
//! that needs a value goes through a [`CurveEvaluator`].
//!
//! [`FloatCurve`] is the evaluator's storage format: sorted `(x, y)` keys
//! with linear interpolation, held flat past either end.
//!
//! ## Example
//!
//! ```rust
//! use motor_core::curves::FloatCurve;
//!
//! let curve = FloatCurve::new("atm", vec![(0.0, 1.0), (1.0, 0.8)]).unwrap();
//! assert!((curve.evaluate(0.5) - 0.9).abs() < 1e-12);
//! assert_eq!(curve.evaluate(2.0), 0.8);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Name of a curve held by an external evaluator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveRef(pub String);

impl CurveRef {
    pub fn new(name: impl Into<String>) -> Self {
        CurveRef(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurveRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability to evaluate a named curve at `x`
pub trait CurveEvaluator {
    fn evaluate(&self, curve: &CurveRef, x: f64) -> CalcResult<f64>;
}

/// Piecewise-linear curve keyed on x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatCurve {
    pub name: String,
    /// `[x, y]` pairs, sorted by x after [`FloatCurve::normalize`]
    pub keys: Vec<[f64; 2]>,
}

impl FloatCurve {
    /// Build a curve, validating and sorting the keys.
    pub fn new(name: impl Into<String>, keys: Vec<(f64, f64)>) -> CalcResult<Self> {
        let mut curve = FloatCurve {
            name: name.into(),
            keys: keys.into_iter().map(|(x, y)| [x, y]).collect(),
        };
        curve.normalize()?;
        Ok(curve)
    }

    /// Reject empty or non-finite keys, then sort by x.
    pub fn normalize(&mut self) -> CalcResult<()> {
        if self.keys.is_empty() {
            return Err(CalcError::invalid_input(
                format!("curve.{}", self.name),
                "[]",
                "Curve needs at least one key",
            ));
        }
        if let Some(bad) = self.keys.iter().find(|k| !k[0].is_finite() || !k[1].is_finite()) {
            return Err(CalcError::invalid_input(
                format!("curve.{}", self.name),
                format!("[{}, {}]", bad[0], bad[1]),
                "Curve keys must be finite",
            ));
        }
        self.keys.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Ok(())
    }

    /// Linear interpolation between the bracketing keys.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if x <= first[0] {
            return first[1];
        }
        if x >= last[0] {
            return last[1];
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x >= a[0] && x <= b[0] {
                let dx = b[0] - a[0];
                if dx <= 0.0 {
                    return a[1];
                }
                let frac = (x - a[0]) / dx;
                return a[1] + frac * (b[1] - a[1]);
            }
        }
        last[1]
    }
}
