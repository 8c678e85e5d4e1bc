//! # motor_core - Solid Rocket Motor Sizing Engine
//!
//! `motor_core` sizes a solid rocket motor whose grain fills a pill-shaped
//! casing. Given propellant, grain, casing material and nozzle records plus
//! the motor's length and diameter, it solves the steady operating point
//! (chamber pressure, throat area, mass flow, thrust, Isp) and the casing
//! that holds it (wall thickness, dry mass, propellant load, burn time).
//!
//! ## Design Philosophy
//!
//! - **One operating point**: any of thrust, throat area or chamber
//!   pressure can be held fixed and the rest follow consistently
//! - **JSON-First**: designs, results and errors all serialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Shared models**: catalog records are immutable and shared via `Arc`
//!
//! ## Quick Start
//!
//! ```rust
//! use motor_core::catalog::Catalog;
//! use motor_core::calculations::motor::{calculate, IndependentVariable, MotorDesign};
//! use motor_core::units::Newtons;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let design = MotorDesign {
//!     label: "Booster".to_string(),
//!     propellant: "APCP".to_string(),
//!     grain: "BATES".to_string(),
//!     casing_material: "Steel 4130".to_string(),
//!     nozzle: "Bell SL".to_string(),
//!     length_m: 2.0,
//!     diameter_m: 0.5,
//!     independent: IndependentVariable::Thrust(Newtons(20_000.0)),
//! };
//!
//! let result = calculate(&design, &catalog).unwrap();
//! assert_eq!(result.thrust_n, 20_000.0);
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - motor solver and casing sizer
//! - [`catalog`] - named model records loaded from TOML
//! - [`models`] - propellant, grain, casing material and nozzle records
//! - [`equations`] - closed-form ballistic and vessel relations
//! - [`curves`] - curve handles and piecewise-linear evaluation
//! - [`project`] - project container, metadata and settings
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types
//! - [`file_io`] - atomic saves and file locking

pub mod calculations;
pub mod catalog;
pub mod curves;
pub mod equations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod models;
pub mod project;
pub mod units;

pub use calculations::{IndependentVariable, MotorDesign, MotorResult, MotorSolver};
pub use catalog::{Catalog, ModelLookup};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use project::{GlobalSettings, Project, ProjectMetadata};
