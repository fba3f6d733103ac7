//! A named set of components sharing one propagation pool.

use crate::error::{SystemError, SystemResult};
use crate::summary::{EngineSummary, PumpPower};
use crate::validation::{AcceptanceCriteria, ValidationReport, run_checks};
use rf_components::quantities::{
    CHAMBER_PRESSURE, EXIT_VELOCITY, SPECIFIC_IMPULSE, THRUST, TOTAL_MASS_FLOW_RATE, mass_of,
};
use rf_components::{Component, PropellantRole};
use rf_core::units::Power;
use rf_core::units::constants::G0_MPS2;
use rf_pool::{KnownValues, Pool, Resolution};
use rf_solver::{Equation, EquationSolver, NewtonSolver};
use std::fmt;
use tracing::debug;

/// Engine model: components, caller inputs, and the pool built from them.
///
/// The pool is never patched in place. Any structural change (a component,
/// an override, a relationship) rebuilds it from scratch:
///
/// 1. every component's declarations, in insertion order, plus
///    `{name}_mass` for components with a static mass;
/// 2. caller relationships;
/// 3. caller overrides;
/// 4. every component's direct evaluation, in insertion order;
/// 5. caller overrides again, so they win over direct outputs.
///
/// Relationships therefore appear exactly once per rebuild, however many
/// times components were added.
pub struct PropulsionAssembly {
    name: String,
    components: Vec<(String, Component)>,
    overrides: KnownValues,
    relationships: Vec<Equation>,
    criteria: AcceptanceCriteria,
    backend: Box<dyn EquationSolver>,
    pool: Pool,
    last_resolution: Option<Resolution>,
}

impl PropulsionAssembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            overrides: KnownValues::new(),
            relationships: Vec::new(),
            criteria: AcceptanceCriteria::default(),
            backend: Box::new(NewtonSolver::default()),
            pool: Pool::new(),
            last_resolution: None,
        }
    }

    /// Replace the solving backend. Values merged by the previous backend are
    /// dropped along with the old pool.
    pub fn with_backend(mut self, backend: impl EquationSolver + 'static) -> Self {
        self.backend = Box::new(backend);
        self.rebuild();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn criteria(&self) -> &AcceptanceCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: AcceptanceCriteria) {
        self.criteria = criteria;
    }

    /// Validate and insert `component` under `name`, then rebuild.
    ///
    /// An existing component with the same name is replaced in place, keeping
    /// its position in the registration order.
    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        component: impl Into<Component>,
    ) -> SystemResult<()> {
        let name = name.into();
        let component = component.into();
        component
            .as_contributor()
            .validate()
            .map_err(|source| SystemError::Component {
                name: name.clone(),
                source,
            })?;

        match self.components.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = component,
            None => self.components.push((name, component)),
        }
        self.rebuild();
        Ok(())
    }

    /// Pin a quantity. Overrides survive rebuilds and win over contributions.
    pub fn set_known(&mut self, name: impl Into<String>, value: f64) {
        self.overrides.insert(name.into(), value);
        self.rebuild();
    }

    /// Add a relationship of the caller's own. It survives rebuilds.
    pub fn add_relationship(&mut self, equation: Equation) {
        self.relationships.push(equation);
        self.rebuild();
    }

    /// Rebuild the pool from the full component set.
    pub fn rebuild(&mut self) {
        let mut pool = Pool::new();

        for (name, component) in &self.components {
            component.as_contributor().declare(&mut pool);
            if let Some(mass) = component.static_mass() {
                pool.set(&mass_of(name), mass);
            }
        }
        for equation in &self.relationships {
            pool.relate(equation.clone());
        }
        for (name, &value) in &self.overrides {
            pool.set(name, value);
        }
        for (_, component) in &self.components {
            component.as_contributor().evaluate(&mut pool);
        }
        for (name, &value) in &self.overrides {
            pool.set(name, value);
        }

        debug!(
            assembly = %self.name,
            components = self.components.len(),
            quantities = pool.registry().len(),
            relationships = pool.relations().len(),
            known = pool.known().len(),
            "pool rebuilt"
        );
        self.pool = pool;
        self.last_resolution = None;
    }

    /// Resolve the pool and return the known values.
    ///
    /// Resolution runs once per rebuild; later calls return the same mapping.
    /// A failed resolution leaves the mapping as the rebuild produced it.
    pub fn solve(&mut self) -> &KnownValues {
        if self.last_resolution.is_none() {
            let resolution = self.pool.solve(self.backend.as_ref());
            debug!(assembly = %self.name, ?resolution, "resolution finished");
            self.last_resolution = Some(resolution);
        }
        self.pool.known()
    }

    /// Known values as of the last rebuild or solve, without solving.
    pub fn known_values(&self) -> &KnownValues {
        self.pool.known()
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Outcome of the last resolution since the most recent rebuild.
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.components.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Solved value of `name`, or 0 when it stays unknown.
    pub fn solved_or_zero(&mut self, name: &str) -> f64 {
        self.solve().get(name).copied().unwrap_or(0.0)
    }

    pub fn thrust(&mut self) -> f64 {
        self.solved_or_zero(THRUST)
    }

    pub fn specific_impulse(&mut self) -> f64 {
        self.solved_or_zero(SPECIFIC_IMPULSE)
    }

    /// Total mass in kg; see [`aggregate_mass`].
    pub fn total_mass(&mut self) -> f64 {
        self.solve();
        aggregate_mass(&self.components, self.pool.known())
    }

    /// Thrust over weight at standard gravity. 0 for a massless assembly.
    pub fn thrust_to_weight_ratio(&mut self) -> f64 {
        let mass = self.total_mass();
        if mass <= 0.0 {
            return 0.0;
        }
        self.thrust() / (mass * G0_MPS2)
    }

    /// Pump mass flow through all pumps of one role, in kg/s.
    pub fn role_mass_flow(&self, role: PropellantRole) -> f64 {
        self.components
            .iter()
            .filter_map(|(_, c)| c.as_pump())
            .filter(|p| p.role == Some(role))
            .filter_map(|p| p.mass_flow_rate)
            .map(|mdot| mdot.value)
            .sum()
    }

    /// Oxidizer-to-fuel pump mass flow ratio, when fuel flow is positive.
    pub fn mixture_ratio(&self) -> Option<f64> {
        let fuel = self.role_mass_flow(PropellantRole::Fuel);
        if fuel <= 0.0 {
            return None;
        }
        Some(self.role_mass_flow(PropellantRole::Oxidizer) / fuel)
    }

    /// Shaft power of every pump whose inputs are complete, in insertion order.
    pub fn pump_powers(&self) -> Vec<(String, Power)> {
        self.components
            .iter()
            .filter_map(|(name, c)| {
                let power = c.as_pump()?.power()?;
                Some((name.clone(), power))
            })
            .collect()
    }

    /// Run the acceptance checks against the solved state.
    pub fn validate_constraints(&mut self) -> ValidationReport {
        let thrust_to_weight = self.thrust_to_weight_ratio();
        let mixture_ratio = self.mixture_ratio();
        let expansion_ratio = self
            .components
            .iter()
            .filter_map(|(_, c)| c.as_nozzle())
            .find_map(|n| n.expansion_ratio.filter(|&eps| eps != 0.0));
        self.solve();
        run_checks(
            &self.criteria,
            self.pool.known(),
            thrust_to_weight,
            mixture_ratio,
            expansion_ratio,
        )
    }

    /// Snapshot of performance, mass, pump power and checks.
    pub fn summary(&mut self) -> EngineSummary {
        let checks = self.validate_constraints();
        let total_mass_kg = self.total_mass();
        let thrust_to_weight = self.thrust_to_weight_ratio();
        let mixture_ratio = self.mixture_ratio();
        let pump_powers = self
            .pump_powers()
            .into_iter()
            .map(|(name, power)| PumpPower {
                name,
                power_w: power.value,
            })
            .collect();
        let diagnostic = match &self.last_resolution {
            Some(Resolution::Failed { diagnostic }) => Some(diagnostic.clone()),
            Some(Resolution::NoSolution { unknowns }) => {
                Some(format!("no solution for {}", unknowns.join(", ")))
            }
            _ => None,
        };
        let get = |name: &str| self.pool.known().get(name).copied().unwrap_or(0.0);
        EngineSummary {
            name: self.name.clone(),
            target_thrust_n: self.criteria.target_thrust_n,
            thrust_n: get(THRUST),
            specific_impulse_s: get(SPECIFIC_IMPULSE),
            chamber_pressure_pa: get(CHAMBER_PRESSURE),
            mass_flow_rate_kgps: get(TOTAL_MASS_FLOW_RATE),
            exit_velocity_mps: get(EXIT_VELOCITY),
            total_mass_kg,
            thrust_to_weight,
            mixture_ratio,
            pump_powers,
            checks,
            diagnostic,
        }
    }
}

impl fmt::Debug for PropulsionAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropulsionAssembly")
            .field("name", &self.name)
            .field("components", &self.components)
            .field("overrides", &self.overrides)
            .field("relationships", &self.relationships.len())
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

/// Sum of component masses in kg.
///
/// Each component counts its `{name}_mass` from `known` when present, else
/// its static mass, else nothing.
pub fn aggregate_mass(components: &[(String, Component)], known: &KnownValues) -> f64 {
    components
        .iter()
        .map(|(name, c)| {
            known
                .get(&mass_of(name))
                .copied()
                .or_else(|| c.static_mass())
                .unwrap_or(0.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_components::{ComponentError, Nozzle, Pump, Tank};
    use rf_core::RfError;
    use rf_core::units::{kg, kgps, mpa};
    use rf_solver::{Assignment, Expr, SolverError, SolverResult, Symbol};

    #[test]
    fn re_adding_a_name_replaces_in_place() {
        let mut asm = PropulsionAssembly::new("test");
        asm.add_component("tank", Tank::default().with_pressure(mpa(2.0)))
            .unwrap();
        asm.add_component("nozzle", Nozzle::new().with_expansion_ratio(25.0))
            .unwrap();
        asm.add_component("tank", Tank::default().with_pressure(mpa(3.0)))
            .unwrap();

        let names: Vec<_> = asm.components().map(|(n, _)| n).collect();
        assert_eq!(names, ["tank", "nozzle"]);
        assert_eq!(asm.known_values()["tank_pressure"], 3e6);
    }

    #[test]
    fn invalid_component_is_rejected_untouched() {
        let mut asm = PropulsionAssembly::new("test");
        let err = asm
            .add_component(
                "fuel_pump",
                Pump::new(PropellantRole::Fuel).with_efficiency(1.5),
            )
            .unwrap_err();
        assert!(matches!(err, SystemError::Component { .. }));
        assert!(asm.is_empty());
    }

    struct RefusingSolver;

    impl EquationSolver for RefusingSolver {
        fn name(&self) -> &str {
            "refusing"
        }

        fn solve(
            &self,
            _equations: &[Equation],
            _unknowns: &[Symbol],
        ) -> SolverResult<Vec<Assignment>> {
            Err(SolverError::Numeric {
                what: "refused".to_owned(),
            })
        }
    }

    #[test]
    fn swapping_backend_discards_previously_solved_values() {
        let mut asm = PropulsionAssembly::new("test");
        asm.add_relationship(Equation::new(Expr::symbol("x"), 5.0));
        assert_eq!(asm.solve().get("x"), Some(&5.0));

        let mut asm = asm.with_backend(RefusingSolver);
        assert!(!asm.known_values().contains_key("x"));
        assert!(asm.last_resolution().is_none());

        assert!(!asm.solve().contains_key("x"));
        assert!(matches!(asm.last_resolution(), Some(Resolution::Failed { .. })));
    }

    #[test]
    fn negative_tank_pressure_reports_the_value() {
        let mut asm = PropulsionAssembly::new("test");
        let err = asm
            .add_component("fuel_tank", Tank::default().with_pressure(mpa(-2.0)))
            .unwrap_err();
        match err {
            SystemError::Component { name, source } => {
                assert_eq!(name, "fuel_tank");
                assert!(matches!(
                    source,
                    ComponentError::Core(RfError::OutOfRange { value, .. }) if value == -2e6
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(asm.is_empty());
    }

    #[test]
    fn aggregate_mass_prefers_known_values() {
        let components = vec![
            ("a".to_owned(), Component::from(Tank::default().with_mass(kg(40.0)))),
            ("b".to_owned(), Component::from(Nozzle::new())),
        ];
        let static_only = aggregate_mass(&components, &KnownValues::new());
        assert_eq!(static_only, 40.0);

        let known = KnownValues::from([("a_mass".to_owned(), 10.0), ("b_mass".to_owned(), 5.0)]);
        assert_eq!(aggregate_mass(&components, &known), 15.0);
    }

    #[test]
    fn mixture_ratio_by_role() {
        let mut asm = PropulsionAssembly::new("test");
        // Names deliberately say nothing about the role
        asm.add_component(
            "pump_a",
            Pump::new(PropellantRole::Oxidizer).with_mass_flow_rate(kgps(7.2)),
        )
        .unwrap();
        assert_eq!(asm.mixture_ratio(), None);
        asm.add_component(
            "pump_b",
            Pump::new(PropellantRole::Fuel).with_mass_flow_rate(kgps(1.2)),
        )
        .unwrap();
        assert!((asm.mixture_ratio().unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn massless_assembly_has_zero_thrust_to_weight() {
        let mut asm = PropulsionAssembly::new("empty");
        assert_eq!(asm.total_mass(), 0.0);
        assert_eq!(asm.thrust_to_weight_ratio(), 0.0);
    }
}
