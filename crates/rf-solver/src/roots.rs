//! Scalar root finding.

use crate::error::{SolverError, SolverResult};

/// Bisection configuration.
#[derive(Clone, Copy, Debug)]
pub struct BisectConfig {
    pub max_iterations: usize,
    /// Stop once the bracket is narrower than `x_rel_tol * |x|`
    pub x_rel_tol: f64,
    /// Stop once `|f(x)|` drops below this
    pub f_abs_tol: f64,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            x_rel_tol: 1e-12,
            f_abs_tol: 1e-9,
        }
    }
}

/// Find x in `[lo, hi]` with `f(x) = 0`, given a sign change across the bracket.
pub fn bisect<F>(f: F, lo: f64, hi: f64, config: &BisectConfig) -> SolverResult<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = (lo.min(hi), lo.max(hi));
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if !f_lo.is_finite() || !f_hi.is_finite() {
        return Err(SolverError::Numeric {
            what: format!("non-finite function value at bracket ends [{lo}, {hi}]"),
        });
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(SolverError::NoBracket { lo, hi });
    }

    for _ in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return Err(SolverError::Numeric {
                what: format!("non-finite function value at {mid}"),
            });
        }

        if f_mid.abs() < config.f_abs_tol || (hi - lo) <= config.x_rel_tol * mid.abs() {
            return Ok(mid);
        }

        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!("bisection did not converge on [{lo}, {hi}]"),
    })
}
