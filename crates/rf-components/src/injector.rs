//! Injector and throat records held by a chamber.

use crate::common::{PhysicalProps, check_efficiency, check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::quantities::THROAT_AREA;
use crate::traits::Contributor;
use rf_core::units::{Area, Pressure};
use rf_pool::Pool;

/// Propellant injector. Descriptive only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Injector {
    pub props: PhysicalProps,
    pub efficiency: Option<f64>,
    pub pressure_loss: Option<Pressure>,
    /// Free-form element type, e.g. "coaxial".
    pub design_type: Option<String>,
}

impl Injector {
    pub fn new(design_type: impl Into<String>) -> Self {
        Self {
            design_type: Some(design_type.into()),
            ..Default::default()
        }
    }

    pub fn with_efficiency(mut self, eta: f64) -> Self {
        self.efficiency = Some(eta);
        self
    }

    pub fn with_pressure_loss(mut self, loss: Pressure) -> Self {
        self.pressure_loss = Some(loss);
        self
    }
}

impl Contributor for Injector {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, _pool: &mut Pool) {}

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(eta) = self.efficiency {
            check_efficiency(eta, "injector efficiency must be in (0,1]")?;
        }
        if let Some(loss) = self.pressure_loss {
            check_non_negative(loss.value, "injector pressure loss cannot be negative")?;
        }
        Ok(())
    }
}

/// Nozzle throat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Throat {
    pub props: PhysicalProps,
    pub area: Option<Area>,
}

impl Throat {
    pub fn new(area: Area) -> Self {
        Self {
            area: Some(area),
            ..Default::default()
        }
    }
}

impl Contributor for Throat {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, pool: &mut Pool) {
        if let Some(a) = self.area {
            pool.set(THROAT_AREA, a.value);
        }
    }

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(a) = self.area {
            check_positive(a.value, "throat area must be positive")?;
        }
        Ok(())
    }
}
