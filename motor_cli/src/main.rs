//! # Motor Sizer CLI
//!
//! Prompt-driven front end for `motor_core`. Loads the built-in catalog
//! (or the TOML file given as the first argument), asks for the motor
//! dimensions and the held quantity, and prints a report followed by the
//! JSON result.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use motor_core::calculations::motor::{calculate, DesignWarning, IndependentVariable, MotorResult};
use motor_core::catalog::Catalog;
use motor_core::curves::CurveEvaluator;
use motor_core::errors::CalcResult;
use motor_core::models::ModelKind;
use motor_core::project::Project;
use motor_core::units::{Kilonewtons, Megapascals, Meters, Millimeters, Newtons, Pascals, SquareCentimeters, SquareMeters};
use motor_core::ModelLookup;

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn prompt_independent() -> IndependentVariable {
    println!("Hold which quantity fixed?");
    println!("  1) Chamber pressure (MPa)");
    println!("  2) Throat area (cm²)");
    println!("  3) Thrust (kN)");
    println!("  4) Thrust (% of reference maximum)");

    match prompt_line("Mode [1]: ").as_deref() {
        Some("2") => {
            let cm2 = prompt_f64("Throat area (cm²) [9.0]: ", 9.0);
            IndependentVariable::ThroatArea(SquareMeters::from(SquareCentimeters(cm2)))
        }
        Some("3") => {
            let kn = prompt_f64("Thrust (kN) [20.0]: ", 20.0);
            IndependentVariable::Thrust(Newtons::from(Kilonewtons(kn)))
        }
        Some("4") => IndependentVariable::ThrustPercent(prompt_f64("Thrust percent [0.02]: ", 0.02)),
        _ => {
            let mpa = prompt_f64("Chamber pressure (MPa) [5.0]: ", 5.0);
            IndependentVariable::ChamberPressure(Pascals::from(Megapascals(mpa)))
        }
    }
}

fn load_catalog() -> CalcResult<Catalog> {
    match std::env::args().nth(1) {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    }
}

/// JSON payload printed after the report
#[derive(Serialize)]
struct Report<'a> {
    result: &'a MotorResult,
    sea_level_isp_s: Option<f64>,
}

fn run() -> CalcResult<()> {
    let catalog = load_catalog()?;
    let project = Project::new("", "CLI session");
    let defaults = &project.settings.default_models;

    println!("Models (defaults from project settings):");
    for kind in [ModelKind::Propellant, ModelKind::Grain, ModelKind::CasingMaterial, ModelKind::Nozzle] {
        println!("  {:<16} {}", format!("{}:", kind), catalog.names(kind).join(", "));
    }
    println!();

    let mut design = project.new_motor_design("CLI-Demo", 2.0, 0.5, prompt_independent());
    if let Some(name) = prompt_line(&format!("Propellant [{}]: ", defaults.propellant)) {
        design.propellant = name;
    }
    if let Some(name) = prompt_line(&format!("Nozzle [{}]: ", defaults.nozzle)) {
        design.nozzle = name;
    }
    design.length_m = prompt_f64("Motor length (m) [2.0]: ", 2.0);
    design.diameter_m = prompt_f64("Motor diameter (m) [0.5]: ", 0.5);

    println!();
    println!("Solving {} / {} / {} / {}...", design.propellant, design.grain, design.casing_material, design.nozzle);
    println!();

    let result = calculate(&design, &catalog)?;

    let nozzle = catalog.nozzle(&design.nozzle)?;
    let sea_level_isp_s = match &nozzle.atmosphere_curve {
        Some(curve) => Some(result.specific_impulse_s * catalog.evaluate(curve, 1.0)?),
        None => None,
    };

    print!("{}", format_report(&result, sea_level_isp_s));

    println!();
    println!("JSON Output:");
    let report = Report {
        result: &result,
        sea_level_isp_s,
    };
    if let Ok(json) = serde_json::to_string_pretty(&report) {
        println!("{}", json);
    }
    Ok(())
}

/// `println!` into the report buffer
macro_rules! report_line {
    ($out:expr, $($arg:tt)*) => {{
        $out.push_str(&format!($($arg)*));
        $out.push('\n');
    }};
}

fn format_report(result: &MotorResult, sea_level_isp_s: Option<f64>) -> String {
    let mut out = String::new();
    let mpa = Megapascals::from(Pascals(result.chamber_pressure_pa));
    let throat = SquareCentimeters::from(SquareMeters(result.throat_area_m2));
    let thrust = Kilonewtons::from(Newtons(result.thrust_n));
    let wall = Millimeters::from(Meters(result.casing.wall_thickness_m));

    report_line!(out, "═══════════════════════════════════════");
    report_line!(out, "  MOTOR SIZING RESULTS");
    report_line!(out, "═══════════════════════════════════════");
    out.push('\n');
    report_line!(out, "Geometry:");
    report_line!(out, "  Length x Diameter: {:.3} m x {:.3} m", result.length_m, result.diameter_m);
    report_line!(out, "  Burn area:         {:.4} m²", result.burn_area_m2);
    out.push('\n');
    report_line!(out, "Ballistics ({} held):", result.mode.name());
    report_line!(out, "  Chamber pressure:  {:.3} MPa", mpa.value());
    report_line!(out, "  Throat area:       {:.3} cm²", throat.value());
    report_line!(out, "  Mass flow:         {:.3} kg/s", result.mass_flow_kg_s);
    report_line!(out, "  Thrust:            {:.3} kN ({:.4} %)", thrust.value(), result.thrust_percent);
    report_line!(out, "  Isp (uncorrected): {:.1} s", result.specific_impulse_s);
    if let Some(isp) = sea_level_isp_s {
        report_line!(out, "  Isp (sea level):   {:.1} s", isp);
    }
    report_line!(out, "  Expansion ratio:   {:.2}", result.expansion_ratio);
    out.push('\n');
    report_line!(out, "Casing ({}):", result.casing.material);
    report_line!(out, "  Wall thickness:    {:.2} mm", wall.value());
    report_line!(out, "  Dry mass:          {:.1} kg", result.dry_mass_kg);
    report_line!(out, "  Propellant mass:   {:.1} kg", result.fuel_mass_kg);
    report_line!(out, "  Total mass:        {:.1} kg", result.total_mass_kg);
    report_line!(out, "  Thrust / weight:   {:.2}", result.thrust_to_weight);
    report_line!(out, "  Burn time:         {:.1} s", result.burn_time_s);
    out.push('\n');

    for warning in &result.warnings {
        let tag = match warning {
            DesignWarning::StructuralEnvelope(_) => "[ENVELOPE]",
            DesignWarning::ChamberBelowDesignPressure { .. } => "[NOZZLE]",
        };
        report_line!(out, "  {} {}", tag, warning.description());
    }

    report_line!(out, "═══════════════════════════════════════");
    report_line!(out, "  RESULT: {}", if result.passes() { "PASS" } else { "CHECK WARNINGS" });
    report_line!(out, "═══════════════════════════════════════");
    out
}

fn main() {
    println!("Motor Sizer - Solid Rocket Motor Sizing");
    println!("=======================================");
    println!();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motor_core::calculations::motor::MotorDesign;

    fn sample_result() -> MotorResult {
        let design = MotorDesign {
            label: "Report".to_string(),
            propellant: "APCP".to_string(),
            grain: "BATES".to_string(),
            casing_material: "Steel 4130".to_string(),
            nozzle: "Bell SL".to_string(),
            length_m: 2.0,
            diameter_m: 0.5,
            independent: IndependentVariable::ChamberPressure(Pascals(5.0e6)),
        };
        calculate(&design, &Catalog::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_report_labels_isp_as_uncorrected() {
        let result = sample_result();
        let report = format_report(&result, Some(result.specific_impulse_s * 0.9));
        assert!(report.contains("Isp (uncorrected):"));
        assert!(report.contains("Isp (sea level):"));
        assert!(!report.contains("vacuum"));
    }

    #[test]
    fn test_report_omits_sea_level_isp_without_curve() {
        let report = format_report(&sample_result(), None);
        assert!(!report.contains("sea level"));
        assert!(report.contains("MOTOR SIZING RESULTS"));
    }
}
