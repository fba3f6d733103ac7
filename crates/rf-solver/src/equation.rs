//! Equality relations between expressions.

use crate::expr::{Expr, Symbol};
use std::collections::BTreeSet;
use std::fmt;

/// `lhs = rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// Residual expression `lhs - rhs`; zero when the equation holds.
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    pub fn substitute<F>(&self, lookup: &F) -> Equation
    where
        F: Fn(&Symbol) -> Option<f64>,
    {
        Equation {
            lhs: self.lhs.substitute(lookup),
            rhs: self.rhs.substitute(lookup),
        }
    }

    pub fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        self.lhs.collect_symbols(out);
        self.rhs.collect_symbols(out);
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    /// Both sides evaluated, or `None` if a symbol is missing.
    pub fn sides_with<F>(&self, lookup: &F) -> Option<(f64, f64)>
    where
        F: Fn(&Symbol) -> Option<f64>,
    {
        Some((self.lhs.eval_with(lookup)?, self.rhs.eval_with(lookup)?))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_leaves_only_unknowns() {
        let eq = Equation::new(
            Expr::symbol("thrust"),
            Expr::symbol("total_mass_flow_rate") * Expr::symbol("exit_velocity"),
        );
        let known = |s: &Symbol| match s.name() {
            "total_mass_flow_rate" => Some(3.0),
            _ => None,
        };
        let sub = eq.substitute(&known);
        let free: Vec<_> = sub.free_symbols().into_iter().collect();
        assert_eq!(
            free,
            vec![Symbol::new("exit_velocity"), Symbol::new("thrust")]
        );
        assert_eq!(sub.to_string(), "thrust = 3 * exit_velocity");
    }

    #[test]
    fn sides_evaluate_when_fully_known() {
        let eq = Equation::new(Expr::symbol("a") * 2.0, 4.0);
        assert_eq!(eq.sides_with(&|_| Some(2.0)), Some((4.0, 4.0)));
        assert_eq!(eq.sides_with(&|_| None), None);
    }
}
