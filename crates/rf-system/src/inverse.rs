//! Closed-form inversions the propagation pool cannot do.
//!
//! Exit velocity enters the pool only through the chamber's direct
//! evaluation, so nothing in the relationship set leads from a target Isp back
//! to chamber pressure. These helpers bracket and bisect instead.

use crate::error::{SystemError, SystemResult};
use rf_components::isentropic_exit_velocity;
use rf_core::units::constants::G0_MPS2;
use rf_solver::{BisectConfig, bisect};
use tracing::debug;

/// Largest bracket end tried when searching upward for chamber pressure.
const MAX_CHAMBER_PRESSURE_PA: f64 = 1e15;

/// Exit velocity for infinite expansion: `sqrt(2γ R Tc / (γ - 1))`.
pub fn limiting_exit_velocity(gamma: f64, gas_constant: f64, chamber_temperature: f64) -> f64 {
    (2.0 * gamma * gas_constant * chamber_temperature / (gamma - 1.0)).sqrt()
}

/// Chamber pressure (Pa) at which the isentropic exit velocity gives
/// `target_isp` seconds, for a fixed exit pressure, γ, R and Tc.
///
/// Fails when the inputs are outside the relation's domain or the target is
/// at or above what infinite expansion could deliver.
pub fn required_chamber_pressure(
    target_isp: f64,
    exit_pressure: f64,
    gamma: f64,
    gas_constant: f64,
    chamber_temperature: f64,
) -> SystemResult<f64> {
    if !(target_isp > 0.0 && target_isp.is_finite()) {
        return Err(SystemError::Inversion {
            what: format!("target Isp must be positive, got {target_isp}"),
        });
    }
    if !(exit_pressure > 0.0 && gamma > 1.0 && gas_constant > 0.0 && chamber_temperature > 0.0) {
        return Err(SystemError::Inversion {
            what: "exit pressure, R and Tc must be positive and gamma above 1".to_owned(),
        });
    }

    let target_ve = target_isp * G0_MPS2;
    let limit = limiting_exit_velocity(gamma, gas_constant, chamber_temperature);
    if target_ve >= limit {
        return Err(SystemError::Inversion {
            what: format!(
                "target exit velocity {target_ve:.1} m/s is not below the infinite-expansion limit {limit:.1} m/s"
            ),
        });
    }

    let ve = |pc: f64| {
        isentropic_exit_velocity(gamma, gas_constant, chamber_temperature, pc, exit_pressure)
            .unwrap_or(0.0)
    };
    let lo = exit_pressure;
    let mut hi = 2.0 * exit_pressure;
    while ve(hi) < target_ve {
        hi *= 2.0;
        if hi > MAX_CHAMBER_PRESSURE_PA {
            return Err(SystemError::Inversion {
                what: format!("no chamber pressure below {MAX_CHAMBER_PRESSURE_PA:e} Pa reaches the target"),
            });
        }
    }

    let pc = bisect(|pc| ve(pc) - target_ve, lo, hi, &BisectConfig::default())?;
    debug!(target_isp, pc, "required chamber pressure");
    Ok(pc)
}

/// Pump pressure rise needed to feed `chamber_pressure` from `tank_pressure`
/// through `losses` of feed-line and injector drop.
pub fn required_pump_gain(chamber_pressure: f64, tank_pressure: f64, losses: f64) -> f64 {
    chamber_pressure - tank_pressure + losses
}

#[cfg(test)]
mod tests {
    use super::*;

    const R_LH2: f64 = 8314.5 / 2.016;

    #[test]
    fn inverts_the_forward_relation() {
        let r = 8314.5 / 18.0;
        let ve = isentropic_exit_velocity(1.2, r, 3400.0, 10e6, 101_325.0).unwrap();
        let pc = required_chamber_pressure(ve / G0_MPS2, 101_325.0, 1.2, r, 3400.0).unwrap();
        assert!((pc - 10e6).abs() / 10e6 < 1e-6);
    }

    #[test]
    fn thousand_second_hydrogen_engine() {
        let pc = required_chamber_pressure(1000.0, 101_325.0, 1.22, R_LH2, 3500.0).unwrap();
        let ve = isentropic_exit_velocity(1.22, R_LH2, 3500.0, pc, 101_325.0).unwrap();
        assert!((ve / G0_MPS2 - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn target_above_limit_is_rejected() {
        let limit_isp = limiting_exit_velocity(1.2, 461.9, 3400.0) / G0_MPS2;
        let err = required_chamber_pressure(limit_isp * 1.01, 101_325.0, 1.2, 461.9, 3400.0)
            .unwrap_err();
        assert!(matches!(err, SystemError::Inversion { .. }));
    }

    #[test]
    fn pump_gain_balances_pressures() {
        assert_eq!(required_pump_gain(10e6, 2e6, 0.5e6), 8.5e6);
    }
}
