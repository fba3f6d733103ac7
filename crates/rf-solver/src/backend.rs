//! The solving capability the propagation pool depends on.

use crate::equation::Equation;
use crate::error::{SolverError, SolverResult};
use crate::expr::Symbol;
use crate::jacobian::CompiledSystem;
use crate::newton::{NewtonConfig, newton_solve, numerical_rank};
use nalgebra::DVector;
use rf_core::nearly_equal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One satisfying assignment of values to unknowns.
pub type Assignment = BTreeMap<Symbol, f64>;

/// Simultaneous equation solver.
///
/// Given equations whose only free symbols are `unknowns`, return zero or more
/// satisfying assignments. Callers use the first one, if any.
pub trait EquationSolver: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    fn solve(&self, equations: &[Equation], unknowns: &[Symbol])
    -> SolverResult<Vec<Assignment>>;
}

/// Numeric backend: Gauss-Newton on the analytic Jacobian.
///
/// Being numeric, it can only report unique points. Systems with fewer
/// independent equations than unknowns are rejected as under-determined
/// rather than answered with one arbitrary member of the solution family.
#[derive(Clone, Debug, Default)]
pub struct NewtonSolver {
    pub config: NewtonConfig,
}

impl NewtonSolver {
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }
}

impl EquationSolver for NewtonSolver {
    fn name(&self) -> &str {
        "newton"
    }

    fn solve(
        &self,
        equations: &[Equation],
        unknowns: &[Symbol],
    ) -> SolverResult<Vec<Assignment>> {
        let tol = self.config.tolerances;
        let wanted: BTreeSet<&Symbol> = unknowns.iter().collect();

        // Split off equations with nothing left to solve: they either hold
        // (and are dropped) or make the whole set unsatisfiable.
        let mut active = Vec::with_capacity(equations.len());
        for eq in equations {
            let free = eq.free_symbols();
            if free.is_empty() {
                let (lhs, rhs) = eq.sides_with(&|_| None).ok_or_else(|| {
                    SolverError::ProblemSetup {
                        what: format!("cannot evaluate `{eq}`"),
                    }
                })?;
                if !nearly_equal(lhs, rhs, tol) {
                    debug!(equation = %eq, "constant equation does not hold");
                    return Ok(Vec::new());
                }
                continue;
            }
            if let Some(stray) = free.iter().find(|s| !wanted.contains(s)) {
                return Err(SolverError::ProblemSetup {
                    what: format!("`{eq}` references {stray}, which is neither known nor an unknown"),
                });
            }
            active.push(eq.clone());
        }

        if unknowns.is_empty() {
            return Ok(vec![Assignment::new()]);
        }
        if active.len() < unknowns.len() {
            return Err(SolverError::Underdetermined {
                equations: active.len(),
                unknowns: unknowns.len(),
            });
        }

        let system = CompiledSystem::new(active, unknowns);
        let accept = |x: &DVector<f64>| {
            system
                .sides(x)
                .is_some_and(|sides| sides.iter().all(|&(l, r)| nearly_equal(l, r, tol)))
        };

        let x0 = DVector::from_element(system.num_unknowns(), self.config.initial_guess);
        let result = newton_solve(
            x0,
            |x| system.residual(x),
            |x| system.jacobian(x),
            accept,
            &self.config,
        )?;

        let jac = system.jacobian(&result.x)?;
        let rank = numerical_rank(&jac, self.config.singular_tol);
        if rank < system.num_unknowns() {
            return Err(SolverError::Underdetermined {
                equations: rank,
                unknowns: system.num_unknowns(),
            });
        }

        debug!(
            iterations = result.iterations,
            residual_norm = result.residual_norm,
            unknowns = system.num_unknowns(),
            "newton backend converged"
        );

        let assignment = system
            .unknowns()
            .iter()
            .cloned()
            .zip(result.x.iter().copied())
            .collect();
        Ok(vec![assignment])
    }
}
