//! Propellant tank.

use crate::common::{PhysicalProps, check_non_negative};
use crate::error::ComponentResult;
use crate::fuel::Fuel;
use crate::quantities::TANK_PRESSURE;
use crate::traits::Contributor;
use rf_core::units::{Mass, Pressure, Volume};
use rf_pool::Pool;

/// Pressurised propellant tank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tank {
    pub props: PhysicalProps,
    pub fuel: Option<Fuel>,
    pub pressure: Option<Pressure>,
}

impl Tank {
    pub fn new(fuel: Fuel) -> Self {
        Self {
            fuel: Some(fuel),
            ..Default::default()
        }
    }

    pub fn with_pressure(mut self, pressure: Pressure) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_mass(mut self, mass: Mass) -> Self {
        self.props.mass = Some(mass);
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.props.volume = Some(volume);
        self
    }
}

impl Contributor for Tank {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, pool: &mut Pool) {
        if let Some(p) = self.pressure {
            pool.set(TANK_PRESSURE, p.value);
        }
    }

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(p) = self.pressure {
            check_non_negative(p.value, "tank pressure must be non-negative")?;
        }
        if let Some(fuel) = &self.fuel {
            fuel.validate()?;
        }
        Ok(())
    }
}
