//! The resolution procedure: substitute, find what is still free, solve once.

use crate::registry::KnownValues;
use crate::relations::RelationshipSet;
use rf_solver::{Equation, EquationSolver, Symbol};
use std::collections::BTreeSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, warn};

/// What a single resolution attempt did.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// No free symbols remained after substitution; nothing was solved.
    AlreadyDetermined,
    /// The backend returned an assignment, merged into the known values.
    Solved { assigned: Vec<String> },
    /// The backend found no satisfying assignment.
    NoSolution { unknowns: Vec<String> },
    /// The backend failed; known values are untouched.
    Failed { diagnostic: String },
}

impl Resolution {
    pub fn is_failure(&self) -> bool {
        matches!(self, Resolution::NoSolution { .. } | Resolution::Failed { .. })
    }
}

/// Resolve `relations` against `known` with one backend invocation.
///
/// Known values are only written when the backend returns a complete, finite
/// assignment; any failure leaves them exactly as they were. Nothing is
/// iterated: values solved here do not trigger a second pass.
pub fn resolve(
    relations: &RelationshipSet,
    known: &mut KnownValues,
    backend: &dyn EquationSolver,
) -> Resolution {
    let lookup = |s: &Symbol| known.get(s.name()).copied();
    let substituted: Vec<Equation> = relations.iter().map(|eq| eq.substitute(&lookup)).collect();

    let mut free = BTreeSet::new();
    for eq in &substituted {
        eq.collect_symbols(&mut free);
    }
    if free.is_empty() {
        return Resolution::AlreadyDetermined;
    }

    let unknowns: Vec<Symbol> = free.into_iter().collect();
    let names = || unknowns.iter().map(|s| s.name().to_owned()).collect::<Vec<_>>();
    debug!(
        backend = backend.name(),
        equations = substituted.len(),
        unknowns = unknowns.len(),
        "resolving relationships"
    );

    let outcome = catch_unwind(AssertUnwindSafe(|| backend.solve(&substituted, &unknowns)));
    let solutions = match outcome {
        Ok(Ok(solutions)) => solutions,
        Ok(Err(e)) => {
            warn!(error = %e, "could not solve relationship set");
            return Resolution::Failed {
                diagnostic: e.to_string(),
            };
        }
        Err(_) => {
            warn!(backend = backend.name(), "solver backend panicked");
            return Resolution::Failed {
                diagnostic: format!("solver backend `{}` panicked", backend.name()),
            };
        }
    };

    let Some(first) = solutions.into_iter().next() else {
        warn!(unknowns = ?names(), "relationship set has no solution");
        return Resolution::NoSolution { unknowns: names() };
    };

    if let Some((symbol, value)) = first.iter().find(|(_, v)| !v.is_finite()) {
        warn!(%symbol, value, "solver returned a non-finite value");
        return Resolution::Failed {
            diagnostic: format!("non-finite value {value} for {symbol}"),
        };
    }

    let assigned = first.keys().map(|s| s.name().to_owned()).collect();
    for (symbol, value) in first {
        known.insert(symbol.name().to_owned(), value);
    }
    Resolution::Solved { assigned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_solver::{Assignment, Expr, NewtonSolver, SolverResult};

    struct Panicking;

    impl EquationSolver for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn solve(&self, _: &[Equation], _: &[Symbol]) -> SolverResult<Vec<Assignment>> {
            panic!("backend bug")
        }
    }

    fn thrust_relations() -> RelationshipSet {
        let mut rel = RelationshipSet::new();
        rel.add(Equation::new(
            Expr::symbol("thrust"),
            Expr::symbol("total_mass_flow_rate") * Expr::symbol("exit_velocity"),
        ));
        rel
    }

    #[test]
    fn fully_known_returns_early() {
        let mut known = KnownValues::from([
            ("thrust".to_owned(), 1.0),
            ("total_mass_flow_rate".to_owned(), 2.0),
            ("exit_velocity".to_owned(), 3.0),
        ]);
        let before = known.clone();
        let r = resolve(&thrust_relations(), &mut known, &NewtonSolver::default());
        assert_eq!(r, Resolution::AlreadyDetermined);
        // Early exit does not check consistency
        assert_eq!(known, before);
    }

    #[test]
    fn solves_single_unknown() {
        let mut known = KnownValues::from([
            ("total_mass_flow_rate".to_owned(), 3.0),
            ("exit_velocity".to_owned(), 9490.0),
        ]);
        let r = resolve(&thrust_relations(), &mut known, &NewtonSolver::default());
        assert_eq!(
            r,
            Resolution::Solved {
                assigned: vec!["thrust".to_owned()]
            }
        );
        assert!((known["thrust"] - 28_470.0).abs() < 1e-6);
    }

    #[test]
    fn panic_in_backend_is_contained() {
        let mut known = KnownValues::from([("total_mass_flow_rate".to_owned(), 3.0)]);
        let before = known.clone();
        let r = resolve(&thrust_relations(), &mut known, &Panicking);
        assert!(matches!(r, Resolution::Failed { .. }));
        assert_eq!(known, before);
    }
}
