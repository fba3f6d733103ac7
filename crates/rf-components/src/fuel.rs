//! Propellants and generic working fluids.

use crate::common::{PhysicalProps, check_positive};
use crate::error::ComponentResult;
use crate::traits::Contributor;
use rf_core::units::constants::specific_gas_constant;
use rf_core::units::{Pressure, Temperature, k, kgpm3};
use rf_pool::Pool;

/// A propellant.
///
/// Propellants are descriptive: they carry the properties a tank or a caller
/// may want, but contribute nothing beyond mass to the pool. Combustion
/// product properties are supplied on the chamber instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fuel {
    pub name: Option<String>,
    pub props: PhysicalProps,
    /// kg/kmol
    pub molecular_mass: Option<f64>,
    pub boiling_point: Option<Temperature>,
    pub combustion_temperature: Option<Temperature>,
    /// J/(kg·K)
    pub specific_heat: Option<f64>,
}

impl Fuel {
    fn preset(name: &str, molecular_mass: f64, boiling_k: f64, cp: f64, density: f64) -> Self {
        Self {
            name: Some(name.to_owned()),
            props: PhysicalProps {
                density: Some(kgpm3(density)),
                ..Default::default()
            },
            molecular_mass: Some(molecular_mass),
            boiling_point: Some(k(boiling_k)),
            combustion_temperature: Some(k(3500.0)),
            specific_heat: Some(cp),
        }
    }

    /// Liquid oxygen.
    pub fn lox() -> Self {
        Self::preset("LOX", 32.0, 90.19, 1700.0, 1141.0)
    }

    /// Liquid hydrogen.
    pub fn lh2() -> Self {
        Self::preset("LH2", 2.016, 20.28, 14_300.0, 70.8)
    }

    /// Liquid methane.
    pub fn methane() -> Self {
        Self::preset("CH4", 16.04, 111.65, 2200.0, 422.8)
    }

    /// Specific gas constant R = Ru / M in J/(kg·K), when M is known.
    pub fn gas_constant(&self) -> Option<f64> {
        self.molecular_mass.and_then(specific_gas_constant)
    }
}

impl Contributor for Fuel {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, _pool: &mut Pool) {}

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(m) = self.molecular_mass {
            check_positive(m, "molecular mass must be positive")?;
        }
        if let Some(cp) = self.specific_heat {
            check_positive(cp, "specific heat must be positive")?;
        }
        Ok(())
    }
}

/// Generic working-fluid state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fluid {
    pub props: PhysicalProps,
    pub pressure: Option<Pressure>,
    pub temperature: Option<Temperature>,
}

impl Contributor for Fluid {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, _pool: &mut Pool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_constant_from_molecular_mass() {
        let r = Fuel::lh2().gas_constant().unwrap();
        assert!((r - 8314.5 / 2.016).abs() < 1e-9);
        assert_eq!(Fuel::default().gas_constant(), None);
    }

    #[test]
    fn presets_carry_density() {
        assert_eq!(Fuel::lox().props.density.unwrap().value, 1141.0);
        assert_eq!(Fuel::methane().molecular_mass, Some(16.04));
        assert!(Fuel::lh2().validate().is_ok());
    }

    #[test]
    fn propellants_contribute_nothing() {
        let mut pool = Pool::new();
        Fuel::lox().declare(&mut pool);
        Fluid::default().declare(&mut pool);
        assert!(pool.registry().is_empty());
    }
}
