//! Turbopump stage.

use crate::common::{PhysicalProps, check_efficiency, check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::quantities::{PUMP_MASS_FLOW_RATE, PUMP_PRESSURE_GAIN};
use crate::traits::Contributor;
use rf_core::units::{Density, Mass, MassRate, Power, Pressure, watts};
use rf_pool::Pool;

/// Which propellant line a component feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropellantRole {
    Fuel,
    Oxidizer,
}

/// Pump that raises propellant pressure.
///
/// ## Model
///
/// Hydraulic power for a pressure rise Δp at mass flow ṁ through a fluid of
/// density ρ, with efficiency η:
///
/// ```text
/// P = Δp · (ṁ / ρ) / η
/// ```
///
/// Only the pressure gain and mass flow are contributed to the pool, under
/// the shared names `pump_pressure_gain` and `pump_mass_flow_rate`; several
/// pumps in one assembly overwrite each other there. Per-pump values stay
/// available on the component itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pump {
    pub props: PhysicalProps,
    pub role: Option<PropellantRole>,
    pub pressure_gain: Option<Pressure>,
    /// Pump efficiency (0 < eta <= 1)
    pub efficiency: Option<f64>,
    pub mass_flow_rate: Option<MassRate>,
    pub fluid_density: Option<Density>,
}

impl Pump {
    pub fn new(role: PropellantRole) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn with_pressure_gain(mut self, gain: Pressure) -> Self {
        self.pressure_gain = Some(gain);
        self
    }

    pub fn with_efficiency(mut self, eta: f64) -> Self {
        self.efficiency = Some(eta);
        self
    }

    pub fn with_mass_flow_rate(mut self, mdot: MassRate) -> Self {
        self.mass_flow_rate = Some(mdot);
        self
    }

    pub fn with_fluid_density(mut self, rho: Density) -> Self {
        self.fluid_density = Some(rho);
        self
    }

    pub fn with_mass(mut self, mass: Mass) -> Self {
        self.props.mass = Some(mass);
        self
    }

    /// Shaft power required, when gain, flow, density and efficiency are all known.
    pub fn power(&self) -> Option<Power> {
        let dp = self.pressure_gain?.value;
        let mdot = self.mass_flow_rate?.value;
        let rho = self.fluid_density?.value;
        let eta = self.efficiency?;
        if rho <= 0.0 || eta <= 0.0 {
            return None;
        }
        let volumetric = mdot / rho;
        Some(watts(dp * volumetric / eta))
    }
}

impl Contributor for Pump {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, pool: &mut Pool) {
        if let Some(dp) = self.pressure_gain {
            pool.set(PUMP_PRESSURE_GAIN, dp.value);
        }
        if let Some(mdot) = self.mass_flow_rate {
            pool.set(PUMP_MASS_FLOW_RATE, mdot.value);
        }
    }

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(eta) = self.efficiency {
            check_efficiency(eta, "pump efficiency must be in (0,1]")?;
        }
        if let Some(dp) = self.pressure_gain {
            check_non_negative(dp.value, "pump pressure gain cannot be negative")?;
        }
        if let Some(mdot) = self.mass_flow_rate {
            check_non_negative(mdot.value, "pump mass flow rate cannot be negative")?;
        }
        if let Some(rho) = self.fluid_density {
            check_positive(rho.value, "pump fluid density must be positive")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::units::{kgpm3, kgps, mpa};

    fn fuel_pump() -> Pump {
        Pump::new(PropellantRole::Fuel)
            .with_pressure_gain(mpa(8.0))
            .with_efficiency(0.75)
            .with_mass_flow_rate(kgps(1.2))
            .with_fluid_density(kgpm3(70.8))
    }

    #[test]
    fn power_from_complete_inputs() {
        let p = fuel_pump().power().unwrap();
        let expected = 8e6 * (1.2 / 70.8) / 0.75;
        assert!((p.value - expected).abs() < 1e-6);
    }

    #[test]
    fn power_needs_every_input() {
        let mut pump = fuel_pump();
        pump.efficiency = None;
        assert!(pump.power().is_none());
    }

    #[test]
    fn declares_gain_and_flow() {
        let mut pool = Pool::new();
        fuel_pump().declare(&mut pool);
        assert_eq!(pool.value(PUMP_PRESSURE_GAIN), Some(8e6));
        assert_eq!(pool.value(PUMP_MASS_FLOW_RATE), Some(1.2));
    }

    #[test]
    fn pump_creation_rejects_bad_efficiency() {
        assert!(fuel_pump().with_efficiency(1.5).validate().is_err());
        assert!(fuel_pump().with_efficiency(0.0).validate().is_err());
        assert!(fuel_pump().validate().is_ok());
    }
}
