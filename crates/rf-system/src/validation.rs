//! Engineering acceptance checks.

use rf_components::quantities::{
    CHAMBER_PRESSURE, PUMP_PRESSURE_GAIN, SPECIFIC_IMPULSE, TANK_PRESSURE, THRUST,
    TOTAL_MASS_FLOW_RATE,
};
use rf_pool::KnownValues;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds for the acceptance checks. Defaults suit a 25 kN LOX/LH2 stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AcceptanceCriteria {
    pub target_thrust_n: f64,
    pub thrust_tolerance_n: f64,
    pub isp_min_s: f64,
    pub isp_max_s: f64,
    pub min_thrust_to_weight: f64,
    pub chamber_pressure_min_pa: f64,
    pub chamber_pressure_max_pa: f64,
    pub of_ratio_min: f64,
    pub of_ratio_max: f64,
    pub expansion_ratio_min: f64,
    pub expansion_ratio_max: f64,
}

impl Default for AcceptanceCriteria {
    fn default() -> Self {
        Self {
            target_thrust_n: 25_000.0,
            thrust_tolerance_n: 1_000.0,
            isp_min_s: 300.0,
            isp_max_s: 450.0,
            min_thrust_to_weight: 1.0,
            chamber_pressure_min_pa: 1e6,
            chamber_pressure_max_pa: 20e6,
            of_ratio_min: 4.0,
            of_ratio_max: 8.0,
            expansion_ratio_min: 10.0,
            expansion_ratio_max: 100.0,
        }
    }
}

/// One named acceptance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    ThrustTarget,
    SpecificImpulseRange,
    ThrustToWeight,
    ChamberPressureRange,
    MassFlowRatePositive,
    OfRatioReasonable,
    PumpPressureAdequate,
    ExpansionRatioReasonable,
}

impl Check {
    /// Every check, in report order.
    pub const ALL: [Check; 8] = [
        Check::ThrustTarget,
        Check::SpecificImpulseRange,
        Check::ThrustToWeight,
        Check::ChamberPressureRange,
        Check::MassFlowRatePositive,
        Check::OfRatioReasonable,
        Check::PumpPressureAdequate,
        Check::ExpansionRatioReasonable,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Check::ThrustTarget => "thrust_target",
            Check::SpecificImpulseRange => "specific_impulse_range",
            Check::ThrustToWeight => "thrust_to_weight",
            Check::ChamberPressureRange => "chamber_pressure_range",
            Check::MassFlowRatePositive => "mass_flow_rate_positive",
            Check::OfRatioReasonable => "of_ratio_reasonable",
            Check::PumpPressureAdequate => "pump_pressure_adequate",
            Check::ExpansionRatioReasonable => "expansion_ratio_reasonable",
        }
    }

    pub fn from_key(key: &str) -> Option<Check> {
        Check::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: Check,
    pub passed: bool,
}

/// Check outcomes in report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    results: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn get(&self, check: Check) -> Option<bool> {
        self.results
            .iter()
            .find(|r| r.check == check)
            .map(|r| r.passed)
    }

    /// Look a check up by its key, e.g. `"thrust_to_weight"`.
    pub fn by_key(&self, key: &str) -> Option<bool> {
        Check::from_key(key).and_then(|c| self.get(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Checks whose outcome differs from `other`.
    pub fn differences(&self, other: &ValidationReport) -> Vec<Check> {
        Check::ALL
            .into_iter()
            .filter(|&c| self.get(c) != other.get(c))
            .collect()
    }
}

fn in_range(value: f64, lo: f64, hi: f64) -> bool {
    (lo..=hi).contains(&value)
}

/// Evaluate every check. Missing quantities read as 0, so checks that need
/// them fail rather than error.
///
/// `mixture_ratio` is `None` when the assembly has no fuel-side flow;
/// `expansion_ratio` is the first nozzle's, if any.
pub fn run_checks(
    criteria: &AcceptanceCriteria,
    known: &KnownValues,
    thrust_to_weight: f64,
    mixture_ratio: Option<f64>,
    expansion_ratio: Option<f64>,
) -> ValidationReport {
    let get = |name: &str| known.get(name).copied().unwrap_or(0.0);

    let thrust = get(THRUST);
    let isp = get(SPECIFIC_IMPULSE);
    let pc = get(CHAMBER_PRESSURE);
    let mdot = get(TOTAL_MASS_FLOW_RATE);
    let tank = get(TANK_PRESSURE);
    let gain = get(PUMP_PRESSURE_GAIN);

    let c = criteria;
    let outcome = |check: Check| match check {
        Check::ThrustTarget => (thrust - c.target_thrust_n).abs() < c.thrust_tolerance_n,
        Check::SpecificImpulseRange => in_range(isp, c.isp_min_s, c.isp_max_s),
        Check::ThrustToWeight => thrust_to_weight > c.min_thrust_to_weight,
        Check::ChamberPressureRange => {
            in_range(pc, c.chamber_pressure_min_pa, c.chamber_pressure_max_pa)
        }
        Check::MassFlowRatePositive => mdot > 0.0,
        Check::OfRatioReasonable => {
            mixture_ratio.is_some_and(|of| in_range(of, c.of_ratio_min, c.of_ratio_max))
        }
        Check::PumpPressureAdequate => tank != 0.0 && pc != 0.0 && tank + gain > pc,
        Check::ExpansionRatioReasonable => expansion_ratio
            .is_some_and(|eps| in_range(eps, c.expansion_ratio_min, c.expansion_ratio_max)),
    };

    ValidationReport {
        results: Check::ALL
            .into_iter()
            .map(|check| CheckResult {
                check,
                passed: outcome(check),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(pairs: &[(&str, f64)]) -> KnownValues {
        pairs.iter().map(|&(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn empty_state_fails_everything() {
        let report = run_checks(&AcceptanceCriteria::default(), &KnownValues::new(), 0.0, None, None);
        assert_eq!(report.total(), 8);
        assert_eq!(report.passed(), 0);
    }

    #[test]
    fn pump_adequacy_needs_tank_and_chamber() {
        let criteria = AcceptanceCriteria::default();
        let no_tank = known(&[(CHAMBER_PRESSURE, 10e6), (PUMP_PRESSURE_GAIN, 20e6)]);
        let report = run_checks(&criteria, &no_tank, 0.0, None, None);
        assert_eq!(report.get(Check::PumpPressureAdequate), Some(false));

        let with_tank = known(&[
            (CHAMBER_PRESSURE, 10e6),
            (PUMP_PRESSURE_GAIN, 9e6),
            (TANK_PRESSURE, 2e6),
        ]);
        let report = run_checks(&criteria, &with_tank, 0.0, None, None);
        assert_eq!(report.get(Check::PumpPressureAdequate), Some(true));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let criteria = AcceptanceCriteria::default();
        let k = known(&[(SPECIFIC_IMPULSE, 450.0), (CHAMBER_PRESSURE, 1e6)]);
        let report = run_checks(&criteria, &k, 0.0, Some(8.0), Some(10.0));
        assert_eq!(report.by_key("specific_impulse_range"), Some(true));
        assert_eq!(report.by_key("chamber_pressure_range"), Some(true));
        assert_eq!(report.by_key("of_ratio_reasonable"), Some(true));
        assert_eq!(report.by_key("expansion_ratio_reasonable"), Some(true));
        assert_eq!(report.by_key("no_such_check"), None);
    }

    #[test]
    fn criteria_deserialize_with_defaults() {
        let criteria: AcceptanceCriteria =
            serde_yaml::from_str("target_thrust_n: 100000.0\nthrust_tolerance_n: 5000.0\n")
                .unwrap();
        assert_eq!(criteria.target_thrust_n, 100_000.0);
        assert_eq!(criteria.isp_min_s, 300.0);
    }

    #[test]
    fn report_serializes_in_order() {
        let report = run_checks(&AcceptanceCriteria::default(), &KnownValues::new(), 2.0, None, None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json[0]["check"], "thrust_target");
        assert_eq!(json[2]["passed"], true);
    }
}
