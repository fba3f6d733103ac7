//! Gauss-Newton solver with backtracking line search.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use rf_core::Tolerances;

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Per-equation acceptance tolerance on `lhs` versus `rhs`
    pub tolerances: Tolerances,
    /// Starting value for every unknown
    pub initial_guess: f64,
    /// Relative singular value cutoff for least-squares steps and rank tests
    pub singular_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerances: Tolerances::default(),
            initial_guess: 1.0,
            singular_tol: 1e-10,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

/// Newton iteration result.
#[derive(Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Minimum-norm least-squares step `J dx = -r`.
fn least_squares_step(
    jac: DMatrix<f64>,
    r: &DVector<f64>,
    singular_tol: f64,
) -> SolverResult<DVector<f64>> {
    let svd = jac.svd(true, true);
    let cutoff = svd.singular_values.max() * singular_tol;
    svd.solve(&(-r), cutoff).map_err(|e| SolverError::Numeric {
        what: format!("least-squares step failed: {e}"),
    })
}

/// Numerical rank of `jac`, relative to its largest singular value.
pub fn numerical_rank(jac: &DMatrix<f64>, singular_tol: f64) -> usize {
    let sv = jac.clone().svd(false, false).singular_values;
    let largest = sv.max();
    if largest <= 0.0 {
        return 0;
    }
    sv.iter().filter(|&&s| s > largest * singular_tol).count()
}

/// Gauss-Newton with line search.
///
/// `accept` decides convergence from the current point, so callers can apply a
/// per-equation tolerance instead of a single residual norm. A stationary
/// point that is not accepted means the least-squares optimum does not satisfy
/// the equations, which is reported as [`SolverError::Inconsistent`].
pub fn newton_solve<F, J, A>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    accept: A,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
    A: Fn(&DVector<f64>) -> bool,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();

    for iter in 0..config.max_iterations {
        if accept(&x) {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = jacobian_fn(&x)?;
        let dx = least_squares_step(jac, &r, config.singular_tol)?;

        if dx.norm() <= f64::EPSILON * (1.0 + x.norm()) {
            return Err(SolverError::Inconsistent {
                residual_norm: r_norm,
            });
        }

        // Backtrack until the residual decreases; points where the residual
        // is undefined count as no decrease.
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if let Ok(r_new) = residual_fn(&x_new) {
                let r_new_norm = r_new.norm();
                if r_new_norm < r_norm || accept(&x_new) {
                    accepted = Some((x_new, r_new, r_new_norm));
                    break;
                }
            }
            alpha *= config.line_search_beta;
        }

        match accepted {
            Some((x_new, r_new, r_new_norm)) => {
                x = x_new;
                r = r_new;
                r_norm = r_new_norm;
            }
            None => {
                return Err(SolverError::Inconsistent {
                    residual_norm: r_norm,
                });
            }
        }
    }

    if accept(&x) {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
        });
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NewtonConfig {
        NewtonConfig::default()
    }

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0 from x0 = 3
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };
        let accept = |x: &DVector<f64>| (x[0] * x[0] - 4.0).abs() < 1e-12;

        let result =
            newton_solve(DVector::from_element(1, 3.0), residual, jacobian, accept, &cfg()).unwrap();
        assert!((result.x[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn contradictory_pair_is_inconsistent() {
        // x = 5 and x = 7
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] - 5.0, x[0] - 7.0]))
        };
        let jacobian =
            |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> { Ok(DMatrix::from_element(2, 1, 1.0)) };
        let accept = |x: &DVector<f64>| (x[0] - 5.0).abs() < 1e-9 && (x[0] - 7.0).abs() < 1e-9;

        let err = newton_solve(DVector::from_element(1, 1.0), residual, jacobian, accept, &cfg())
            .unwrap_err();
        assert!(matches!(err, SolverError::Inconsistent { .. }));
    }

    #[test]
    fn rank_of_duplicate_rows() {
        let jac = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(numerical_rank(&jac, 1e-10), 1);
        assert_eq!(numerical_rank(&DMatrix::identity(3, 3), 1e-10), 3);
    }
}
