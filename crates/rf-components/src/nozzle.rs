//! Converging-diverging nozzle.

use crate::common::{PhysicalProps, check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::quantities::{EXIT_AREA, EXIT_PRESSURE, EXPANSION_RATIO, THROAT_AREA};
use crate::traits::Contributor;
use rf_core::units::{Area, Mass, Pressure};
use rf_pool::Pool;
use rf_solver::Equation;

/// Nozzle geometry and exit condition.
///
/// With at least two of expansion ratio, throat area and exit area given,
/// the nozzle relates them as `exit_area = expansion_ratio · throat_area`
/// so the third can be solved for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nozzle {
    pub props: PhysicalProps,
    /// Ae / At
    pub expansion_ratio: Option<f64>,
    pub exit_pressure: Option<Pressure>,
    pub throat_area: Option<Area>,
    pub exit_area: Option<Area>,
}

impl Nozzle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expansion_ratio(mut self, ratio: f64) -> Self {
        self.expansion_ratio = Some(ratio);
        self
    }

    pub fn with_exit_pressure(mut self, pe: Pressure) -> Self {
        self.exit_pressure = Some(pe);
        self
    }

    pub fn with_throat_area(mut self, at: Area) -> Self {
        self.throat_area = Some(at);
        self
    }

    pub fn with_exit_area(mut self, ae: Area) -> Self {
        self.exit_area = Some(ae);
        self
    }

    pub fn with_mass(mut self, mass: Mass) -> Self {
        self.props.mass = Some(mass);
        self
    }

    fn geometry_count(&self) -> usize {
        [
            self.expansion_ratio.is_some(),
            self.throat_area.is_some(),
            self.exit_area.is_some(),
        ]
        .into_iter()
        .filter(|&set| set)
        .count()
    }
}

impl Contributor for Nozzle {
    fn props(&self) -> &PhysicalProps {
        &self.props
    }

    fn declare(&self, pool: &mut Pool) {
        if let Some(pe) = self.exit_pressure {
            pool.set(EXIT_PRESSURE, pe.value);
        }
        if let Some(eps) = self.expansion_ratio {
            pool.set(EXPANSION_RATIO, eps);
        }
        if let Some(at) = self.throat_area {
            pool.set(THROAT_AREA, at.value);
        }
        if let Some(ae) = self.exit_area {
            pool.set(EXIT_AREA, ae.value);
        }

        if self.geometry_count() >= 2 {
            let ae = pool.quantity(EXIT_AREA);
            let eps = pool.quantity(EXPANSION_RATIO);
            let at = pool.quantity(THROAT_AREA);
            pool.relate(Equation::new(ae, eps * at));
        }
    }

    fn validate(&self) -> ComponentResult<()> {
        self.props.validate()?;
        if let Some(eps) = self.expansion_ratio {
            check_positive(eps, "expansion ratio must be positive")?;
            if eps < 1.0 {
                return Err(ComponentError::NonPhysical {
                    what: "expansion ratio must be at least 1",
                });
            }
        }
        if let Some(pe) = self.exit_pressure {
            check_non_negative(pe.value, "exit pressure cannot be negative")?;
        }
        if let Some(at) = self.throat_area {
            check_positive(at.value, "nozzle throat area must be positive")?;
        }
        if let Some(ae) = self.exit_area {
            check_positive(ae.value, "nozzle exit area must be positive")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::units::{m2, pa};
    use rf_solver::NewtonSolver;

    #[test]
    fn solves_missing_exit_area() {
        let mut pool = Pool::new();
        Nozzle::new()
            .with_expansion_ratio(25.0)
            .with_throat_area(m2(0.007))
            .with_exit_pressure(pa(101_325.0))
            .declare(&mut pool);
        assert_eq!(pool.relations().len(), 1);

        pool.solve(&NewtonSolver::default());
        assert!((pool.value(EXIT_AREA).unwrap() - 0.175).abs() < 1e-9);
    }

    #[test]
    fn solves_expansion_ratio_in_reverse() {
        let mut pool = Pool::new();
        Nozzle::new()
            .with_throat_area(m2(0.007))
            .with_exit_area(m2(0.175))
            .declare(&mut pool);
        pool.solve(&NewtonSolver::default());
        assert!((pool.value(EXPANSION_RATIO).unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn single_geometry_value_adds_no_relationship() {
        let mut pool = Pool::new();
        Nozzle::new().with_expansion_ratio(25.0).declare(&mut pool);
        assert!(pool.relations().is_empty());
        assert_eq!(pool.value(EXPANSION_RATIO), Some(25.0));
    }

    #[test]
    fn rejects_contracting_nozzle() {
        assert!(Nozzle::new().with_expansion_ratio(0.5).validate().is_err());
    }
}
