//! Combustion chamber.
//!
//! The chamber is the only component with both contribution kinds. It
//! declares its state and two linear performance relationships:
//!
//! ```text
//! thrust            = total_mass_flow_rate · exit_velocity
//! specific_impulse · g0 = exit_velocity
//! ```
//!
//! and, once Pc, Tc and ṁ are known, evaluates exit velocity directly from
//! the isentropic expansion relation
//!
//! ```text
//! Ve = sqrt( 2γ R Tc / (γ - 1) · (1 - (Pe/Pc)^((γ - 1)/γ)) )
//! ```
//!
//! The exponent makes the second relation a poor fit for the generic solver,
//! so nothing ties `exit_velocity` back to `chamber_pressure` in the
//! relationship set. Use `rf_system::inverse` to go from Isp to Pc.

use crate::common::{PhysicalProps, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::injector::{Injector, Throat};
use crate::quantities::{
    CHAMBER_PRESSURE, CHAMBER_TEMPERATURE, EXIT_PRESSURE, EXIT_VELOCITY, GAMMA, MOLECULAR_MASS,
    SPECIFIC_IMPULSE, THRUST, TOTAL_MASS_FLOW_RATE,
};
use crate::traits::Contributor;
use rf_core::units::constants::{G0_MPS2, STANDARD_ATMOSPHERE_PA, specific_gas_constant};
use rf_core::units::{Mass, MassRate, Pressure, Temperature};
use rf_pool::Pool;
use rf_solver::Equation;
use tracing::debug;

/// Ratio of specific heats used when the pool has no `gamma`.
pub const DEFAULT_GAMMA: f64 = 1.2;
/// Product molecular mass (kg/kmol) used when the pool has no `molecular_mass`.
pub const DEFAULT_MOLECULAR_MASS: f64 = 18.0;
/// Exit pressure (Pa) used when the pool has no `exit_pressure`.
pub const DEFAULT_EXIT_PRESSURE: f64 = STANDARD_ATMOSPHERE_PA;

/// Combustion product properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombustionProducts {
    pub gamma: f64,
    /// kg/kmol
    pub molecular_mass: f64,
}

impl Default for CombustionProducts {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            molecular_mass: DEFAULT_MOLECULAR_MASS,
        }
    }
}

/// Ideal isentropic exit velocity (m/s).
///
/// `None` when the inputs are outside the relation's domain: γ ≤ 1,
/// non-positive R, Tc or Pc, negative Pe, Pe ≥ Pc, or a non-finite result.
pub fn isentropic_exit_velocity(gamma: f64, r: f64, tc: f64, pc: f64, pe: f64) -> Option<f64> {
    if !(gamma > 1.0 && r > 0.0 && tc > 0.0 && pc > 0.0 && pe >= 0.0 && pe < pc) {
        return None;
    }
    let expansion = 1.0 - (pe / pc).powf((gamma - 1.0) / gamma);
    let ve = (2.0 * gamma * r * tc / (gamma - 1.0) * expansion).sqrt();
    ve.is_finite().then_some(ve)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chamber {
    pub props: PhysicalProps,
    pub injector: Option<Injector>,
    pub throat: Option<Throat>,
    pub pressure: Option<Pressure>,
    pub temperature: Option<Temperature>,
    pub mass_flow_rate: Option<MassRate>,
    pub products: Option<CombustionProducts>,
}

impl Chamber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pressure(mut self, pc: Pressure) -> Self {
        self.pressure = Some(pc);
        self
    }

    pub fn with_temperature(mut self, tc: Temperature) -> Self {
        self.temperature = Some(tc);
        self
    }

    pub fn with_mass_flow_rate(mut self, mdot: MassRate) -> Self {
        self.mass_flow_rate = Some(mdot);
        self
    }

    pub fn with_injector(mut self, injector: Injector) -> Self {
        self.injector = Some(injector);
        self
    }

    pub fn with_throat(mut self, throat: Throat) -> Self {
        self.throat = Some(throat);
        self
    }

    pub fn with_products(mut self, products: CombustionProducts) -> Self {
        self.products = Some(products);
        self
    }

    pub fn with_mass(mut self, mass: Mass) -> Self {
        self.props.mass = Some(mass);
        self
    }
}

impl Contributor for Chamber {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, pool: &mut Pool) {
        if let Some(pc) = self.pressure {
            pool.set(CHAMBER_PRESSURE, pc.value);
        }
        if let Some(tc) = self.temperature {
            pool.set(CHAMBER_TEMPERATURE, tc.value);
        }
        if let Some(throat) = &self.throat {
            throat.declare(pool);
        }
        if let Some(mdot) = self.mass_flow_rate {
            pool.set(TOTAL_MASS_FLOW_RATE, mdot.value);
        }
        if let Some(products) = self.products {
            pool.set(GAMMA, products.gamma);
            pool.set(MOLECULAR_MASS, products.molecular_mass);
        }

        let mdot = pool.quantity(TOTAL_MASS_FLOW_RATE);
        let ve = pool.quantity(EXIT_VELOCITY);
        let thrust = pool.quantity(THRUST);
        let isp = pool.quantity(SPECIFIC_IMPULSE);
        pool.relate(Equation::new(thrust, mdot * ve.clone()));
        pool.relate(Equation::new(isp * G0_MPS2, ve));
    }

    fn evaluate(&self, pool: &mut Pool) {
        let (Some(pc), Some(tc), Some(mdot)) = (
            pool.value(CHAMBER_PRESSURE),
            pool.value(CHAMBER_TEMPERATURE),
            pool.value(TOTAL_MASS_FLOW_RATE),
        ) else {
            return;
        };

        let gamma = pool.value_or(GAMMA, DEFAULT_GAMMA);
        let molecular_mass = pool.value_or(MOLECULAR_MASS, DEFAULT_MOLECULAR_MASS);
        let pe = pool.value_or(EXIT_PRESSURE, DEFAULT_EXIT_PRESSURE);

        let ve = specific_gas_constant(molecular_mass)
            .and_then(|r| isentropic_exit_velocity(gamma, r, tc, pc, pe));
        let Some(ve) = ve else {
            debug!(gamma, molecular_mass, pc, pe, "chamber performance not evaluable");
            return;
        };

        debug!(exit_velocity = ve, "chamber performance evaluated");
        pool.set(EXIT_VELOCITY, ve);
        pool.set(THRUST, mdot * ve);
        pool.set(SPECIFIC_IMPULSE, ve / G0_MPS2);
    }

    fn direct_outputs(&self) -> &'static [&'static str] {
        &[EXIT_VELOCITY, THRUST, SPECIFIC_IMPULSE]
    }

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(pc) = self.pressure {
            check_positive(pc.value, "chamber pressure must be positive")?;
        }
        if let Some(tc) = self.temperature {
            check_positive(tc.value, "chamber temperature must be positive")?;
        }
        if let Some(mdot) = self.mass_flow_rate {
            check_positive(mdot.value, "chamber mass flow rate must be positive")?;
        }
        if let Some(products) = self.products {
            if !(products.gamma > 1.0 && products.gamma.is_finite()) {
                return Err(ComponentError::NonPhysical {
                    what: "gamma must be greater than 1",
                });
            }
            check_positive(products.molecular_mass, "product molecular mass must be positive")?;
        }
        if let Some(injector) = &self.injector {
            injector.validate()?;
        }
        if let Some(throat) = &self.throat {
            throat.validate()?;
        }
        Ok(())
    }
}
