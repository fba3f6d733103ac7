//! Attributes and parameter checks shared by all components.

use crate::error::{ComponentError, ComponentResult};
use rf_core::numeric::{ensure_finite, ensure_non_negative, ensure_positive};
use rf_core::units::{Density, Mass, Volume};

pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what)?;
    Ok(())
}

pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_non_negative(value, what)?;
    Ok(())
}

pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_positive(value, what)?;
    Ok(())
}

/// Efficiencies live in (0, 1].
pub fn check_efficiency(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 || value > 1.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(())
}

/// Mass, volume and density every component may carry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhysicalProps {
    pub mass: Option<Mass>,
    pub volume: Option<Volume>,
    pub density: Option<Density>,
}

impl PhysicalProps {
    pub fn validate(&self) -> ComponentResult<()> {
        if let Some(m) = self.mass {
            check_non_negative(m.value, "mass must be non-negative")?;
        }
        if let Some(v) = self.volume {
            check_non_negative(v.value, "volume must be non-negative")?;
        }
        if let Some(rho) = self.density {
            check_positive(rho.value, "density must be positive")?;
        }
        Ok(())
    }
}
