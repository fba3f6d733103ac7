//! Engine performance snapshot.

use crate::validation::ValidationReport;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpPower {
    pub name: String,
    pub power_w: f64,
}

/// Solved performance of an assembly. Missing quantities are reported as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSummary {
    pub name: String,
    pub target_thrust_n: f64,
    pub thrust_n: f64,
    pub specific_impulse_s: f64,
    pub chamber_pressure_pa: f64,
    pub mass_flow_rate_kgps: f64,
    pub exit_velocity_mps: f64,
    pub total_mass_kg: f64,
    pub thrust_to_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixture_ratio: Option<f64>,
    #[serde(default)]
    pub pump_powers: Vec<PumpPower>,
    pub checks: ValidationReport,
    /// Why resolution failed, when it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl EngineSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `pump_pressure_adequate` → `Pump Pressure Adequate`
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for EngineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name.to_uppercase())?;
        writeln!(f, "Target Thrust: {:.0} N", self.target_thrust_n)?;
        writeln!(f, "Actual Thrust: {:.0} N", self.thrust_n)?;
        writeln!(f, "Specific Impulse: {:.1} s", self.specific_impulse_s)?;
        writeln!(f, "Chamber Pressure: {:.1} MPa", self.chamber_pressure_pa / 1e6)?;
        writeln!(f, "Mass Flow Rate: {:.2} kg/s", self.mass_flow_rate_kgps)?;
        writeln!(f, "Exit Velocity: {:.0} m/s", self.exit_velocity_mps)?;
        writeln!(f, "Total Mass: {:.1} kg", self.total_mass_kg)?;
        writeln!(f, "Thrust-to-Weight: {:.2}", self.thrust_to_weight)?;
        if let Some(of) = self.mixture_ratio {
            writeln!(f, "O/F Ratio: {of:.1}")?;
        }
        for pump in &self.pump_powers {
            writeln!(f, "{} Power: {:.1} kW", title_case(&pump.name), pump.power_w / 1e3)?;
        }
        if let Some(diagnostic) = &self.diagnostic {
            writeln!(f, "Resolution: {diagnostic}")?;
        }

        writeln!(f)?;
        writeln!(f, "=== CONSTRAINT VALIDATION ===")?;
        writeln!(
            f,
            "Constraints Passed: {}/{}",
            self.checks.passed(),
            self.checks.total()
        )?;
        for result in self.checks.iter() {
            let status = if result.passed { "PASS" } else { "FAIL" };
            writeln!(f, "  {}: {status}", title_case(result.check.key()))?;
        }
        Ok(())
    }
}
