//! Registry + relationships, the unit components contribute into.

use crate::registry::{KnownValues, QuantityRegistry};
use crate::relations::RelationshipSet;
use crate::resolve::{Resolution, resolve};
use rf_solver::{Equation, EquationSolver, Expr};

/// One propagation pool.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    registry: QuantityRegistry,
    relations: RelationshipSet,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name`, overwriting its value when one is given.
    pub fn declare(&mut self, name: &str, value: Option<f64>) -> Expr {
        Expr::from(self.registry.declare(name, value))
    }

    /// Declare `name` with a known value.
    pub fn set(&mut self, name: &str, value: f64) {
        self.registry.declare(name, Some(value));
    }

    /// Declare `name` without touching its value; returns it as an expression.
    pub fn quantity(&mut self, name: &str) -> Expr {
        self.declare(name, None)
    }

    /// Add a relationship. Its symbols are registered as quantities.
    pub fn relate(&mut self, equation: Equation) {
        for symbol in equation.free_symbols() {
            self.registry.declare(symbol.name(), None);
        }
        self.relations.add(equation);
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.registry.value(name)
    }

    pub fn value_or(&self, name: &str, default: f64) -> f64 {
        self.value(name).unwrap_or(default)
    }

    pub fn known(&self) -> &KnownValues {
        self.registry.known()
    }

    pub fn registry(&self) -> &QuantityRegistry {
        &self.registry
    }

    pub fn relations(&self) -> &RelationshipSet {
        &self.relations
    }

    /// Run the resolution procedure once and merge what it finds.
    pub fn solve(&mut self, backend: &dyn EquationSolver) -> Resolution {
        resolve(&self.relations, self.registry.known_mut(), backend)
    }
}
