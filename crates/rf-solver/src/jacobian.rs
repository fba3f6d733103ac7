//! Residuals and analytic Jacobian for a set of equations.

use crate::equation::Equation;
use crate::error::{SolverError, SolverResult};
use crate::expr::{Expr, Symbol};
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

/// Equations compiled against an ordered list of unknowns.
///
/// Row i of the Jacobian holds the partial derivatives of residual i
/// (`lhs - rhs`) with respect to each unknown, differentiated symbolically
/// once at construction.
pub struct CompiledSystem {
    unknowns: Vec<Symbol>,
    index: HashMap<Symbol, usize>,
    equations: Vec<Equation>,
    residuals: Vec<Expr>,
    partials: Vec<Vec<Expr>>,
}

impl CompiledSystem {
    pub fn new(equations: Vec<Equation>, unknowns: &[Symbol]) -> Self {
        let index = unknowns
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let residuals: Vec<Expr> = equations.iter().map(Equation::residual).collect();
        let partials = residuals
            .iter()
            .map(|r| unknowns.iter().map(|u| r.diff(u)).collect())
            .collect();
        Self {
            unknowns: unknowns.to_vec(),
            index,
            equations,
            residuals,
            partials,
        }
    }

    pub fn num_unknowns(&self) -> usize {
        self.unknowns.len()
    }

    pub fn unknowns(&self) -> &[Symbol] {
        &self.unknowns
    }

    fn lookup<'a>(&'a self, x: &'a DVector<f64>) -> impl Fn(&Symbol) -> Option<f64> + 'a {
        move |s: &Symbol| self.index.get(s).map(|&i| x[i])
    }

    pub fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let lookup = self.lookup(x);
        let mut r = DVector::zeros(self.residuals.len());
        for (i, expr) in self.residuals.iter().enumerate() {
            let v = expr.eval_with(&lookup).ok_or_else(|| SolverError::ProblemSetup {
                what: format!("residual {i} references a symbol outside the unknown set"),
            })?;
            if !v.is_finite() {
                return Err(SolverError::Numeric {
                    what: format!("non-finite residual for `{}`", self.equations[i]),
                });
            }
            r[i] = v;
        }
        Ok(r)
    }

    pub fn jacobian(&self, x: &DVector<f64>) -> SolverResult<DMatrix<f64>> {
        let lookup = self.lookup(x);
        let mut jac = DMatrix::zeros(self.residuals.len(), self.unknowns.len());
        for (i, row) in self.partials.iter().enumerate() {
            for (j, d) in row.iter().enumerate() {
                let v = d.eval_with(&lookup).ok_or_else(|| SolverError::ProblemSetup {
                    what: format!("partial ({i}, {j}) references an unknown symbol"),
                })?;
                if !v.is_finite() {
                    return Err(SolverError::Numeric {
                        what: format!(
                            "non-finite derivative of `{}` with respect to {}",
                            self.equations[i], self.unknowns[j]
                        ),
                    });
                }
                jac[(i, j)] = v;
            }
        }
        Ok(jac)
    }

    /// Evaluated `(lhs, rhs)` per equation, for tolerance checks.
    pub fn sides(&self, x: &DVector<f64>) -> Option<Vec<(f64, f64)>> {
        let lookup = self.lookup(x);
        self.equations.iter().map(|e| e.sides_with(&lookup)).collect()
    }
}
