//! Accumulated relationships between quantities.

use rf_solver::Equation;

/// Ordered list of equations. There is no removal.
#[derive(Clone, Debug, Default)]
pub struct RelationshipSet {
    equations: Vec<Equation>,
}

impl RelationshipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, equation: Equation) {
        self.equations.push(equation);
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Equation> {
        self.equations.iter()
    }

    pub fn as_slice(&self) -> &[Equation] {
        &self.equations
    }
}

impl<'a> IntoIterator for &'a RelationshipSet {
    type Item = &'a Equation;
    type IntoIter = std::slice::Iter<'a, Equation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
