//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur while solving a set of equations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Under-determined system: {equations} independent equations for {unknowns} unknowns")]
    Underdetermined { equations: usize, unknowns: usize },

    #[error("Inconsistent system: no assignment satisfies every equation (residual norm {residual_norm:.3e})")]
    Inconsistent { residual_norm: f64 },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Root not bracketed on [{lo}, {hi}]")]
    NoBracket { lo: f64, hi: f64 },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
