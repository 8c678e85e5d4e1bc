//! # Motor Sizing Equations
//!
//! Every closed-form relation the solver uses lives here as a plain
//! function of `f64`s, so each can be checked against a textbook in
//! isolation.
//!
//! ## Modules
//!
//! - [`ballistics`] - burn rate, choked flow, Isp, thrust, expansion ratio, c*
//! - [`vessel`] - pill volume and thin-wall hoop-stress sizing
//!
//! ## Units
//!
//! Base SI throughout: m, m², m³, Pa, N, kg, s, K.

pub mod ballistics;
pub mod vessel;

pub use ballistics::{
    burn_area,
    burn_rate,
    characteristic_velocity,
    choked_mass_flow,
    expansion_ratio,
    mass_flow_for_thrust,
    pressure_for_mass_flow,
    pressure_for_throat_area,
    regression_mass_flow,
    specific_impulse,
    throat_area_for_pressure,
    thrust,
    G0,
    R_UNIVERSAL,
};

pub use vessel::{
    hoop_pressure,
    hoop_thickness,
    legacy_thickness,
    max_length_for_thickness,
    min_thickness_for_length,
    pill_volume,
    MIN_THICKNESS_PER_LENGTH,
};
