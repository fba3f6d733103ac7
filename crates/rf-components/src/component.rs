//! Closed set of components an assembly can hold.

use crate::chamber::Chamber;
use crate::fuel::{Fluid, Fuel};
use crate::injector::{Injector, Throat};
use crate::nozzle::Nozzle;
use crate::pump::Pump;
use crate::tank::Tank;
use crate::traits::Contributor;

#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Fuel(Fuel),
    Fluid(Fluid),
    Tank(Tank),
    Pump(Pump),
    Injector(Injector),
    Throat(Throat),
    Chamber(Chamber),
    Nozzle(Nozzle),
}

impl Component {
    pub fn as_contributor(&self) -> &dyn Contributor {
        match self {
            Component::Fuel(c) => c,
            Component::Fluid(c) => c,
            Component::Tank(c) => c,
            Component::Pump(c) => c,
            Component::Injector(c) => c,
            Component::Throat(c) => c,
            Component::Chamber(c) => c,
            Component::Nozzle(c) => c,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Component::Fuel(_) => "fuel",
            Component::Fluid(_) => "fluid",
            Component::Tank(_) => "tank",
            Component::Pump(_) => "pump",
            Component::Injector(_) => "injector",
            Component::Throat(_) => "throat",
            Component::Chamber(_) => "chamber",
            Component::Nozzle(_) => "nozzle",
        }
    }

    pub fn as_pump(&self) -> Option<&Pump> {
        match self {
            Component::Pump(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_nozzle(&self) -> Option<&Nozzle> {
        match self {
            Component::Nozzle(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_chamber(&self) -> Option<&Chamber> {
        match self {
            Component::Chamber(c) => Some(c),
            _ => None,
        }
    }

    /// Static mass in kg, if the component carries one.
    pub fn static_mass(&self) -> Option<f64> {
        self.as_contributor().props().mass.map(|m| m.value)
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Component {
                fn from(c: $variant) -> Self {
                    Component::$variant(c)
                }
            }
        )*
    };
}

impl_from!(Fuel, Fluid, Tank, Pump, Injector, Throat, Chamber, Nozzle);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pump::PropellantRole;
    use rf_core::units::kg;

    #[test]
    fn kind_and_downcasts() {
        let c: Component = Pump::new(PropellantRole::Oxidizer).with_mass(kg(15.0)).into();
        assert_eq!(c.kind(), "pump");
        assert!(c.as_pump().is_some());
        assert!(c.as_nozzle().is_none());
        assert_eq!(c.static_mass(), Some(15.0));
    }

    #[test]
    fn only_chamber_has_direct_outputs() {
        let all: Vec<Component> = vec![
            Fuel::lox().into(),
            Fluid::default().into(),
            Tank::default().into(),
            Pump::default().into(),
            Injector::default().into(),
            Throat::default().into(),
            Nozzle::default().into(),
        ];
        for c in &all {
            assert!(c.as_contributor().direct_outputs().is_empty(), "{}", c.kind());
        }
        let chamber: Component = Chamber::new().into();
        assert_eq!(chamber.as_contributor().direct_outputs().len(), 3);
    }
}
